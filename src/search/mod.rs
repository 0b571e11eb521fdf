//! Remote repository search.
//!
//! `RepositorySearch` is the seam between the query controller and whatever
//! answers searches: the GitHub REST API in production, `MockSearch` in tests.

mod github;
mod mock;

pub use github::{search_url, GitHubClient, DEFAULT_API_BASE};
pub use mock::MockSearch;

use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::SearchResponse;

#[async_trait]
pub trait RepositorySearch: Send + Sync {
    /// Run one search. Pagination metadata is ignored.
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;
}
