//! Transport seam between the probe matrix and the network.

use std::collections::BTreeMap;
use std::time::Duration;

use super::error::FetchError;

/// A single GET to issue, redirects followed.
#[derive(Debug, Clone)]
pub struct FetchRequest<'a> {
    pub url: &'a str,
    pub headers: &'a BTreeMap<String, String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_redirects: u32,
}

/// Final response after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u32,
    /// URL of the last response in the redirect chain.
    pub effective_url: String,
}

impl FetchResponse {
    /// 2xx and 3xx count as "the site answered".
    pub fn is_usable(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Issues one request. Implementations block the calling thread; the
/// scheduler runs them on the blocking pool.
pub trait Transport: Send + Sync {
    fn fetch(&self, req: &FetchRequest<'_>) -> Result<FetchResponse, FetchError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn fetch(&self, req: &FetchRequest<'_>) -> Result<FetchResponse, FetchError> {
        (**self).fetch(req)
    }
}
