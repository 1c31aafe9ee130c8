pub mod http;

use std::error::Error as _;
use std::future::Future;

pub use http::HttpFetcher;

/// Raw response captured for one source URL
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code; non-2xx responses are still pages
    pub status: u16,
    pub body: String,
}

/// Failure to obtain any response for a URL
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// Transport failure reported by a non-HTTP source
    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    /// Message including every underlying cause, e.g. DNS or connect errors
    pub fn describe(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

/// Something that can retrieve a page for a URL
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}
