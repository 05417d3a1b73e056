use crate::config::SearchConfig;
use crate::utils::error::{Result, SearchError};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_JSON: &str = "application/json";

/// 所有來源共用的 HTTP 客戶端；逾時設定在 client 上，每個請求各自受限
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client })
    }

    pub async fn get_html(&self, source_id: &str, url: &str) -> Result<String> {
        tracing::debug!(source = source_id, %url, "Fetching HTML page");
        let response = self.client.get(url).header(ACCEPT, ACCEPT_HTML).send().await?;

        if !response.status().is_success() {
            return Err(SearchError::UpstreamStatus {
                source_id: source_id.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, source_id: &str, url: &str) -> Result<T> {
        tracing::debug!(source = source_id, %url, "Fetching JSON");
        let response = self.client.get(url).header(ACCEPT, ACCEPT_JSON).send().await?;

        if !response.status().is_success() {
            return Err(SearchError::UpstreamStatus {
                source_id: source_id.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SearchError::parse(source_id, e.to_string()))
    }
}
