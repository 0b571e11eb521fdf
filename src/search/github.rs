use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::debug;

use super::RepositorySearch;
use crate::config::Config;
use crate::error::SearchError;
use crate::types::SearchResponse;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Builds `<base>/search/repositories?q=<query>`.
pub fn search_url(base: &str, query: &str) -> String {
    format!(
        "{}/search/repositories?q={}",
        base.trim_end_matches('/'),
        urlencoding::encode(query)
    )
}

/// Search backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base: String,
}

impl GitHubClient {
    pub fn new(base: &str, user_agent: &str, timeout: Option<Duration>) -> Result<Self, SearchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder
                .build()
                .map_err(|e| SearchError::Client(format!("can't build HTTP client: {}", e)))?,
            base: base.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Self::new(
            &config.api_base,
            &config.user_agent,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

#[async_trait]
impl RepositorySearch for GitHubClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let url = search_url(&self.base, query);
        debug!(%url, "searching repositories");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&bytes)?;
        debug!(count = parsed.items.len(), "search returned");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_query() {
        assert_eq!(
            search_url(DEFAULT_API_BASE, "redux"),
            "https://api.github.com/search/repositories?q=redux"
        );
        assert_eq!(
            search_url("http://localhost:8080/", "tokio language:rust"),
            "http://localhost:8080/search/repositories?q=tokio%20language%3Arust"
        );
    }

    #[test]
    fn bad_user_agent_is_a_client_error() {
        let err = GitHubClient::new(DEFAULT_API_BASE, "bad\nagent", None).unwrap_err();
        assert!(matches!(err, SearchError::Client(_)));
    }

    #[test]
    fn client_keeps_configured_base() {
        let config = Config::default();
        let client = GitHubClient::from_config(&config).unwrap();
        assert_eq!(client.base(), DEFAULT_API_BASE);
    }
}
