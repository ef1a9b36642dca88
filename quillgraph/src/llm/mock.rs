//! Mock LlmClient for tests.
//!
//! Replies come from prompt-substring rules first, then from an ordered
//! queue, then from an optional fallback. Every call is recorded.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{GenerateOptions, LlmClient, LlmError, LlmOutput};

/// One recorded call to [`MockLlm`].
#[derive(Clone, Debug, PartialEq)]
pub struct MockCall {
    pub prompt: String,
    pub temperature: Option<f32>,
    /// Name of the requested response schema, if any.
    pub schema: Option<String>,
}

/// Scripted text-generation client.
///
/// Rules (`with_rule`) match when the prompt contains the needle and may
/// answer any number of times, which keeps replies stable when runs
/// interleave. Queued replies (`with_text`, `with_structured`, `with_error`)
/// are consumed in order. With nothing left, the call fails with
/// `LlmError::Request` unless a fallback is set.
///
/// **Interaction**: Implements `LlmClient`; used by workflow tests.
#[derive(Default)]
pub struct MockLlm {
    rules: Vec<(String, LlmOutput)>,
    queue: Mutex<VecDeque<Result<LlmOutput, LlmError>>>,
    fallback: Option<LlmOutput>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a text reply.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(Ok(LlmOutput::Text(text.into())))
    }

    /// Queues a structured reply.
    pub fn with_structured(self, value: Value) -> Self {
        self.push(Ok(LlmOutput::Structured(value)))
    }

    /// Queues a failure.
    pub fn with_error(self, error: LlmError) -> Self {
        self.push(Err(error))
    }

    /// Answers every prompt containing `needle` with `output`. Earlier rules win.
    pub fn with_rule(mut self, needle: impl Into<String>, output: LlmOutput) -> Self {
        self.rules.push((needle.into(), output));
        self
    }

    /// Reply used once rules and queue are exhausted.
    pub fn with_fallback(mut self, output: LlmOutput) -> Self {
        self.fallback = Some(output);
        self
    }

    fn push(self, reply: Result<LlmOutput, LlmError>) -> Self {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Prompts of the calls made so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.prompt).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<LlmOutput, LlmError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(MockCall {
                prompt: prompt.to_string(),
                temperature: options.temperature,
                schema: options.response_schema.as_ref().map(|s| s.name.clone()),
            });

        if let Some((_, output)) = self.rules.iter().find(|(needle, _)| prompt.contains(needle)) {
            return Ok(output.clone());
        }
        let queued = self
            .queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match (queued, &self.fallback) {
            (Some(reply), _) => reply,
            (None, Some(output)) => Ok(output.clone()),
            (None, None) => Err(LlmError::Request(
                "mock llm has no scripted response left".to_string(),
            )),
        }
    }
}
