//! Tavily search API client implementing `DocumentRetriever`.
//!
//! POSTs `{api_key, query, max_results}` to the search endpoint and reads
//! `results[].{title, url, content}`. Depends on `reqwest` (feature `tavily`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{Document, DocumentRetriever, RetrieverError};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: String,
}

/// Tavily-backed retriever.
pub struct TavilyRetriever {
    api_key: String,
    endpoint: String,
    http: reqwest::Client,
}

impl TavilyRetriever {
    pub fn new(api_key: impl Into<String>) -> Result<Self, RetrieverError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RetrieverError::Request(e.to_string()))?;
        Ok(Self {
            api_key: api_key.into(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
            http,
        })
    }

    /// Points the client at another endpoint (e.g. a proxy).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

fn request_error(e: reqwest::Error) -> RetrieverError {
    if e.is_timeout() {
        RetrieverError::Timeout(e.to_string())
    } else {
        RetrieverError::Request(e.to_string())
    }
}

#[async_trait]
impl DocumentRetriever for TavilyRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrieverError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": k,
            }))
            .send()
            .await
            .map_err(request_error)?
            .error_for_status()
            .map_err(request_error)?;

        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| RetrieverError::MalformedResponse(e.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .take(k)
            .map(|r| Document {
                title: r.title,
                content: r.content,
                url: r.url,
            })
            .collect())
    }
}
