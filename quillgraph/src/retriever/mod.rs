//! Document retrieval: query in, ranked documents out.
//!
//! [`DocumentRetriever`] is what search nodes call. [`MockRetriever`] serves
//! fixed documents for tests; `TavilyRetriever` (feature `tavily`) calls the
//! Tavily search API.

mod mock;

#[cfg(feature = "tavily")]
mod tavily;

pub use mock::MockRetriever;

#[cfg(feature = "tavily")]
pub use tavily::TavilyRetriever;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::NodeError;

/// One search hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Failure of a retrieval call. An empty result set is not an error.
#[derive(Debug, Error)]
pub enum RetrieverError {
    #[error("search request failed: {0}")]
    Request(String),

    #[error("search request timed out: {0}")]
    Timeout(String),

    #[error("search service returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl From<RetrieverError> for NodeError {
    fn from(e: RetrieverError) -> Self {
        NodeError::ExternalCallFailure(e.to_string())
    }
}

/// Search service used by research and fact-check nodes.
///
/// **Interaction**: Held by nodes as `Arc<dyn DocumentRetriever>`; shared
/// across concurrent runs.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Returns up to `k` documents for `query`, best first.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrieverError>;
}

/// Joins documents as `title: content`, one per line.
pub fn format_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| format!("{}: {}", d.title, d.content))
        .collect::<Vec<_>>()
        .join("\n")
}
