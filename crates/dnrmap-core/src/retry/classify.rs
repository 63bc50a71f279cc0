//! Classify HTTP status and curl errors into retry policy error kinds.

use crate::probe::FetchError;
use crate::retry::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify a fetch error into an ErrorKind.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Timeout(_) => ErrorKind::Timeout,
        FetchError::Connection(_) => ErrorKind::Connection,
        FetchError::Http(code) => classify_http_status(*code),
        FetchError::MissingHost(_) | FetchError::Other(_) => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_and_503_throttled() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
    }

    #[test]
    fn http_5xx_retryable() {
        assert!(matches!(classify_http_status(500), ErrorKind::Http5xx(500)));
        assert!(matches!(classify_http_status(502), ErrorKind::Http5xx(502)));
    }

    #[test]
    fn http_4xx_other() {
        assert_eq!(classify_http_status(404), ErrorKind::Other);
        assert_eq!(classify_http_status(403), ErrorKind::Other);
    }

    #[test]
    fn fetch_errors_map_to_kinds() {
        assert_eq!(
            classify(&FetchError::Timeout("slow".into())),
            ErrorKind::Timeout
        );
        assert_eq!(
            classify(&FetchError::Connection("refused".into())),
            ErrorKind::Connection
        );
        assert_eq!(classify(&FetchError::Http(503)), ErrorKind::Throttled);
        assert_eq!(
            classify(&FetchError::MissingHost("about:blank".into())),
            ErrorKind::Other
        );
    }
}
