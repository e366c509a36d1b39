pub mod open_api;
pub mod scrape;
pub mod search_ad;

pub use open_api::OpenBookSearchClient;
pub use scrape::NaverSearchScraper;
pub use search_ad::SearchAdClient;

use std::time::Duration;

use super::SearchError;

/// The book vertical serves a stripped page to non-browser agents.
pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Shared client for every Naver endpoint.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .map_err(SearchError::from)
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub(crate) fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SearchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SearchError::Status {
            status: status.as_u16(),
        })
    }
}
