use async_trait::async_trait;
use tracing::debug;

use super::{ensure_success, join_url};
use crate::integrations::{ResultPageSource, SearchError};

/// Fetches the raw book-vertical result page for a title.
#[derive(Debug, Clone)]
pub struct NaverSearchScraper {
    client: reqwest::Client,
    base_url: String,
}

impl NaverSearchScraper {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn search_url(&self, title: &str) -> String {
        let path = format!(
            "/search.naver?where=book&query={}",
            urlencoding::encode(title)
        );
        join_url(&self.base_url, &path)
    }
}

#[async_trait]
impl ResultPageSource for NaverSearchScraper {
    async fn fetch_result_page(&self, title: &str) -> Result<String, SearchError> {
        let url = self.search_url(title);
        debug!(%url, "fetching book search page");
        let response = self.client.get(&url).send().await?;
        let body = ensure_success(response)?.text().await?;
        Ok(body)
    }

    fn result_link(&self, title: &str) -> String {
        self.search_url(title)
    }
}
