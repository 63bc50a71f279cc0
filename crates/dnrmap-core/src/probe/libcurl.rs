//! libcurl-backed transport.
//!
//! GET with redirects followed and TLS verification off: the probe asks
//! "where does this site end up", not "is this site trustworthy".

use curl::easy::{Easy, List};

use super::error::FetchError;
use super::transport::{FetchRequest, FetchResponse, Transport};
use crate::retry::{classify_curl_error, ErrorKind};

/// Fresh easy handle per request; nothing is shared between probes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlTransport;

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        match classify_curl_error(&e) {
            ErrorKind::Timeout => FetchError::Timeout(e.to_string()),
            ErrorKind::Connection => FetchError::Connection(e.to_string()),
            _ => FetchError::Other(e.to_string()),
        }
    }
}

impl Transport for CurlTransport {
    fn fetch(&self, req: &FetchRequest<'_>) -> Result<FetchResponse, FetchError> {
        let mut easy = Easy::new();
        easy.url(req.url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(req.max_redirects)?;
        easy.connect_timeout(req.connect_timeout)?;
        easy.timeout(req.timeout)?;
        easy.ssl_verify_peer(false)?;
        easy.ssl_verify_host(false)?;

        if !req.headers.is_empty() {
            let mut list = List::new();
            for (k, v) in req.headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
            easy.http_headers(list)?;
        }

        let performed = {
            let mut transfer = easy.transfer();
            // Redirect bodies are skipped by libcurl; the first body byte we see
            // belongs to the final response, which is all we need. Stop there.
            transfer.write_function(|_data| Ok(0))?;
            transfer.perform()
        };
        match performed {
            Ok(()) => {}
            Err(e) if e.is_write_error() => {}
            Err(e) => return Err(e.into()),
        }

        let status = easy.response_code()?;
        let effective_url = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| req.url.to_string());

        Ok(FetchResponse {
            status,
            effective_url,
        })
    }
}
