//! Scripted search backend for testing.
//!
//! Answers each query from a table, optionally after a delay, and records
//! every query it was asked.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::RepositorySearch;
use crate::error::SearchError;
use crate::types::{Repository, SearchResponse};

#[derive(Debug, Clone)]
enum Reply {
    Items(Vec<Repository>),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockSearchInner {
    replies: HashMap<String, Reply>,
    delays: HashMap<String, Duration>,
    calls: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct MockSearch {
    inner: Arc<Mutex<MockSearchInner>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `items`.
    pub fn respond(&self, query: &str, items: Vec<Repository>) {
        let mut inner = self.inner.lock().unwrap();
        inner.replies.insert(query.to_string(), Reply::Items(items));
    }

    /// Fail `query` with the given message.
    pub fn fail(&self, query: &str, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.replies.insert(query.to_string(), Reply::Fail(error.to_string()));
    }

    /// Hold the reply to `query` for `delay` before resolving.
    pub fn delay(&self, query: &str, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.delays.insert(query.to_string(), delay);
    }

    /// Every query issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl RepositorySearch for MockSearch {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let (reply, delay) = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(query.to_string());
            (
                inner.replies.get(query).cloned(),
                inner.delays.get(query).copied(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(Reply::Items(items)) => Ok(SearchResponse { items }),
            Some(Reply::Fail(error)) => Err(SearchError::Client(error)),
            None => Ok(SearchResponse::default()),
        }
    }
}
