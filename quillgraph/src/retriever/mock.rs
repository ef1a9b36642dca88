//! Mock DocumentRetriever for tests: fixed documents, recorded queries.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{Document, DocumentRetriever, RetrieverError};

/// Returns the same documents (truncated to `k`) for every query.
///
/// `failing()` builds a retriever whose every call fails with a timeout.
#[derive(Default)]
pub struct MockRetriever {
    documents: Vec<Document>,
    fail: bool,
    queries: Mutex<Vec<(String, usize)>>,
}

impl MockRetriever {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(query, k)` of each call, in order.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl DocumentRetriever for MockRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrieverError> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((query.to_string(), k));
        if self.fail {
            return Err(RetrieverError::Timeout("mock retriever".to_string()));
        }
        Ok(self.documents.iter().take(k).cloned().collect())
    }
}
