use std::time::Duration;

use async_trait::async_trait;
use nt_core::{Error, RawPage, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use tracing::debug;
use url::Url;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/117.0";
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Downloads the page at `url`. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<RawPage>;
}

/// Accepts absolute `http` and `https` URLs only.
pub fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::InvalidUrl(format!("{}: unsupported scheme {}", url, scheme))),
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage> {
        let parsed = parse_url(url)?;
        debug!("Fetching {}", parsed);

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Scraping(format!("{} returned {}", url, status)));
        }
        let html = response.text().await?;

        Ok(RawPage {
            url: url.to_string(),
            html,
        })
    }
}
