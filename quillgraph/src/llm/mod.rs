//! Text-generation client abstraction used by workflow nodes.
//!
//! Nodes call [`LlmClient::generate`] with a prompt and [`GenerateOptions`];
//! the client returns plain text or, when a [`ResponseSchema`] was requested,
//! a structured JSON value. [`LlmClientExt`] adds typed helpers that map
//! failures into [`NodeError`].

mod mock;
mod retry;

#[cfg(feature = "openai")]
mod openai;

pub use mock::{MockCall, MockLlm};
pub use retry::{RetryPolicy, RetryingLlm};

#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::error::NodeError;

/// Shape a structured response must have.
///
/// `schema` is a JSON Schema object (or an example object); clients that
/// support a JSON response format forward it to the model.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
}

impl ResponseSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Per-call options.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerateOptions {
    /// Sampling temperature; `None` uses the client's default.
    pub temperature: Option<f32>,
    /// When set, the client must return `LlmOutput::Structured`.
    pub response_schema: Option<ResponseSchema>,
}

impl GenerateOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Result of one generation call.
#[derive(Clone, Debug, PartialEq)]
pub enum LlmOutput {
    Text(String),
    Structured(Value),
}

/// Failure of a text-generation call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network or API error.
    #[error("llm request failed: {0}")]
    Request(String),

    /// The service is rate limiting this client.
    #[error("llm rate limited: {0}")]
    RateLimited(String),

    #[error("llm request timed out: {0}")]
    Timeout(String),

    /// A structured response was requested but the reply does not parse.
    #[error("llm returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Transient failures worth retrying; a malformed reply is not one.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::MalformedResponse(_))
    }
}

impl From<LlmError> for NodeError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MalformedResponse(_) => NodeError::NodeLogicFailure(e.to_string()),
            _ => NodeError::ExternalCallFailure(e.to_string()),
        }
    }
}

/// Text-generation service: prompt in, text or structured object out.
///
/// Implementations: [`MockLlm`] (scripted, for tests), [`RetryingLlm`]
/// (wraps another client), `ChatOpenAI` (feature `openai`).
///
/// **Interaction**: Held by workflow nodes as `Arc<dyn LlmClient>`; shared
/// across concurrent runs, so implementations must be `Send + Sync`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerateOptions)
        -> Result<LlmOutput, LlmError>;
}

/// Typed helpers over [`LlmClient`] for use inside nodes.
#[async_trait]
pub trait LlmClientExt: LlmClient {
    /// Generates plain text.
    async fn generate_text(&self, prompt: &str, temperature: f32) -> Result<String, NodeError> {
        let options = GenerateOptions::default().with_temperature(temperature);
        match self.generate(prompt, &options).await? {
            LlmOutput::Text(text) => Ok(text),
            LlmOutput::Structured(Value::String(text)) => Ok(text),
            LlmOutput::Structured(value) => Ok(value.to_string()),
        }
    }

    /// Generates a structured response and decodes it into `T`.
    ///
    /// A reply that does not match `T` is a `NodeLogicFailure`.
    async fn generate_structured<T>(
        &self,
        prompt: &str,
        schema: ResponseSchema,
        temperature: f32,
    ) -> Result<T, NodeError>
    where
        T: DeserializeOwned + Send,
    {
        let name = schema.name.clone();
        let options = GenerateOptions::default()
            .with_temperature(temperature)
            .with_schema(schema);
        let decoded = match self.generate(prompt, &options).await? {
            LlmOutput::Structured(value) => serde_json::from_value(value),
            LlmOutput::Text(text) => serde_json::from_str(strip_json_fence(&text)),
        };
        decoded.map_err(|e| {
            NodeError::NodeLogicFailure(format!("response does not match `{}`: {}", name, e))
        })
    }
}

impl<C: LlmClient + ?Sized> LlmClientExt for C {}

/// Strips a surrounding ```json fence some models add around JSON replies.
pub(crate) fn strip_json_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
