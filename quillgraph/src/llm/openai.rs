//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Sends each prompt as a single user message. When a response schema is
//! requested, the request asks for the JSON-object response format, the schema
//! is appended to the prompt as a JSON-only instruction and the reply is parsed
//! as JSON.
//!
//! **Interaction**: Implements `LlmClient`; used by workflow nodes like
//! `MockLlm`. Depends on `async_openai` (feature `openai`).

use async_trait::async_trait;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};

use super::{strip_json_fence, GenerateOptions, LlmClient, LlmError, LlmOutput, ResponseSchema};

/// OpenAI Chat Completions client implementing `LlmClient`.
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide config
/// via `ChatOpenAI::with_config`. A temperature set with `with_temperature`
/// overrides the per-call temperature nodes ask for.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: None,
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
        }
    }

    /// Force a temperature (0–2) for every call.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn structured_prompt(prompt: &str, schema: &ResponseSchema) -> String {
        format!(
            "{}\n\nRespond with a single JSON object named \"{}\" matching this schema, and nothing else:\n{}",
            prompt, schema.name, schema.schema
        )
    }

    fn build_request(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<CreateChatCompletionRequest, LlmError> {
        let text = match &options.response_schema {
            Some(schema) => Self::structured_prompt(prompt, schema),
            None => prompt.to_string(),
        };
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(text.as_str()),
        )]);
        if options.response_schema.is_some() {
            args.response_format(ResponseFormat::JsonObject);
        }
        if let Some(t) = self.temperature.or(options.temperature) {
            args.temperature(t);
        }

        args.build()
            .map_err(|e| LlmError::Request(format!("OpenAI request build failed: {}", e)))
    }
}

/// Maps a client error by its API `code`/`type` fields and transport kind.
fn classify(e: OpenAIError) -> LlmError {
    match e {
        OpenAIError::ApiError(api) => {
            let tagged = |needle: &str| {
                api.code
                    .iter()
                    .chain(api.r#type.iter())
                    .any(|field| field.contains(needle))
            };
            if tagged("rate_limit") || tagged("insufficient_quota") {
                LlmError::RateLimited(api.message)
            } else if tagged("timeout") {
                LlmError::Timeout(api.message)
            } else {
                LlmError::Request(api.message)
            }
        }
        OpenAIError::Reqwest(err) if err.is_timeout() => LlmError::Timeout(err.to_string()),
        other => LlmError::Request(other.to_string()),
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<LlmOutput, LlmError> {
        let request = self.build_request(prompt, options)?;
        let response = self.client.chat().create(request).await.map_err(classify)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedResponse("OpenAI returned no choices".to_string()))?;
        let content = choice.message.content.unwrap_or_default();

        match &options.response_schema {
            Some(schema) => serde_json::from_str(strip_json_fence(&content))
                .map(LlmOutput::Structured)
                .map_err(|e| {
                    LlmError::MalformedResponse(format!("`{}` reply is not JSON: {}", schema.name, e))
                }),
            None => Ok(LlmOutput::Text(content)),
        }
    }
}
