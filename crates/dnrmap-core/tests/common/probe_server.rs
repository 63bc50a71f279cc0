//! Minimal HTTP/1.1 server for probe integration tests.
//!
//! Each server plays one [`Behavior`] on `/` and answers `200 OK` on
//! `/landing`. Requests are counted so tests can assert on retries.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// `200 OK` straight away.
    Ok,
    /// `301` to `http://localhost:<port>/landing`.
    RedirectToLocalhost,
    /// `403` when a User-Agent header is sent, `200` otherwise.
    ForbidUserAgent,
    /// `503` on the first request, `200` afterwards.
    BusyOnce,
    /// Always answers with this status.
    Status(u16),
    /// Accepts the connection and never answers.
    Stall,
}

pub struct ProbeServer {
    pub port: u16,
    hits: Arc<AtomicUsize>,
}

impl ProbeServer {
    /// `127.0.0.1:<port>`, usable as a domain in the probe matrix.
    pub fn domain(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Requests received on `/`.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(behavior: Behavior) -> ProbeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, behavior, port, &counter));
        }
    });
    ProbeServer { port, hits }
}

/// A port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().unwrap().port()
}

fn handle(mut stream: TcpStream, behavior: Behavior, port: u16, hits: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (path, has_user_agent) = parse_request(request);

    if path == "/landing" {
        respond(&mut stream, "200 OK", None);
        return;
    }

    let seen = hits.fetch_add(1, Ordering::SeqCst);
    match behavior {
        Behavior::Ok => respond(&mut stream, "200 OK", None),
        Behavior::RedirectToLocalhost => {
            let location = format!("http://localhost:{}/landing", port);
            respond(&mut stream, "301 Moved Permanently", Some(&location));
        }
        Behavior::ForbidUserAgent if has_user_agent => respond(&mut stream, "403 Forbidden", None),
        Behavior::ForbidUserAgent => respond(&mut stream, "200 OK", None),
        Behavior::BusyOnce if seen == 0 => respond(&mut stream, "503 Service Unavailable", None),
        Behavior::BusyOnce => respond(&mut stream, "200 OK", None),
        Behavior::Status(code) => respond(&mut stream, &format!("{} Status", code), None),
        Behavior::Stall => thread::sleep(Duration::from_secs(5)),
    }
}

fn respond(stream: &mut TcpStream, status: &str, location: Option<&str>) {
    let body = b"ok";
    let location = location
        .map(|l| format!("Location: {}\r\n", l))
        .unwrap_or_default();
    let body_len = if location.is_empty() { body.len() } else { 0 };
    let response = format!(
        "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n",
        status, location, body_len
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body[..body_len]);
}

/// Returns (path, whether a User-Agent header was sent).
fn parse_request(request: &str) -> (&str, bool) {
    let mut path = "";
    let mut has_user_agent = false;
    for (i, line) in request.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if i == 0 {
            path = line.split_whitespace().nth(1).unwrap_or("");
            continue;
        }
        if let Some((name, _)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                has_user_agent = true;
            }
        }
    }
    (path, has_user_agent)
}
