use crate::config::SnapshotConfig;
use crate::crawlers::{FetchError, FetchedPage, Fetcher};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

/// Plain HTTP GET fetcher with fixed polite headers.
///
/// No timeout and no retries are configured; a request waits as long as the
/// transport allows.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher sending the given `user-agent` and `accept` headers
    pub fn new(user_agent: &str, accept: &str) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(accept)?);

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Create a fetcher from the headers in a snapshot configuration
    pub fn from_config(config: &SnapshotConfig) -> Result<Self, FetchError> {
        Self::new(&config.user_agent, &config.accept)
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        ::log::debug!("GET {} -> {}", url, status);

        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }
}
