use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use harvest_core::RawListingRow;

use crate::decode::decode_listing_body;
use crate::listing::{parse_listing, TableSelectors};
use crate::types::{FailureKind, FetchError};

/// Realistic browser identity. The portal rejects requests that do not
/// carry one.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Listing endpoint without the page parameter.
    pub listing_url: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub table_selectors: TableSelectors,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            listing_url: "https://finance.naver.com/research/company_list.naver".to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            table_selectors: TableSelectors::default(),
        }
    }
}

/// Retrieves one page of the source listing as structured rows.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    /// `page` starts at 1. An empty row set means "no more data".
    async fn fetch(&self, page: u32) -> Result<Vec<RawListingRow>, FetchError>;
}

pub struct HttpListingFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl HttpListingFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// Client handle shared with the attachment harvester so both sides
    /// present the same browser identity to the portal.
    pub fn client(&self) -> reqwest::Client {
        self.client.clone()
    }

    fn page_url(&self, page: u32) -> String {
        // Query shape mirrors the portal's own pagination links.
        format!("{}?&page={}", self.settings.listing_url, page)
    }
}

#[async_trait]
impl ListingFetcher for HttpListingFetcher {
    async fn fetch(&self, page: u32) -> Result<Vec<RawListingRow>, FetchError> {
        let url = self.page_url(page);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        let html = decode_listing_body(&bytes, content_type.as_deref());
        Ok(parse_listing(&html, &self.settings.table_selectors))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
