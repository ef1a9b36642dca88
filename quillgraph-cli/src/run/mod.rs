//! Run entry points: build the workbench from config, generate, judge, A/B test.
//!
//! Re-exports [`ab_test`] items and [`Error`].

pub use crate::config::Error;


use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use quillgraph::{
    clean_mdx_output, ChatOpenAI, JudgeKind, LlmClient, RetryingLlm, TavilyRetriever, Workbench,
    WorkflowKind,
};
use serde_json::Value;

use crate::config::{RunConfig, RunOptions};
use crate::middleware::LoggingMiddleware;

pub use ab_test::{read_prompts, run_ab_test, write_results, AbTestPlan, AbTestRecord};

/// Loads `.env`, builds `RunConfig` from env and applies `options`.
pub fn load_config(options: &RunOptions) -> Result<RunConfig, Error> {
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(options);
    Ok(config)
}

/// Builds the OpenAI client (with retries), the Tavily retriever when a key is
/// set, and node logging when `config.verbose`.
pub fn build_workbench(config: &RunConfig) -> Result<Workbench, Error> {
    let openai_config = OpenAIConfig::new()
        .with_api_base(&config.api_base)
        .with_api_key(config.api_key.clone());
    let mut chat = ChatOpenAI::with_config(openai_config, config.model.clone());
    if let Some(t) = config.temperature {
        chat = chat.with_temperature(t);
    }
    let llm: Arc<dyn LlmClient> = Arc::new(RetryingLlm::new(Arc::new(chat), config.retry_policy()));
    with_collaborators(llm, config)
}

/// Workbench over `llm` with the rest of `config` applied; used by
/// `build_workbench` and by tests that inject a mock client.
pub(crate) fn with_collaborators(
    llm: Arc<dyn LlmClient>,
    config: &RunConfig,
) -> Result<Workbench, Error> {
    let mut bench = Workbench::new(llm).with_settings(config.workflow_settings());
    if let Some(key) = &config.tavily_api_key {
        bench = bench.with_retriever(Arc::new(TavilyRetriever::new(key.clone())?));
    }
    if config.verbose {
        bench = bench.with_middleware(Arc::new(LoggingMiddleware));
    }
    Ok(bench)
}

/// Runs one pipeline and returns its MDX with any code fence removed.
pub async fn generate(
    bench: &Workbench,
    kind: WorkflowKind,
    prompt: &str,
    raw_mdx: Option<&str>,
) -> Result<String, Error> {
    let output = bench.run_workflow(kind, prompt, raw_mdx).await?;
    Ok(clean_mdx_output(&output))
}

/// Runs one judge on `content` and returns its verdict.
pub async fn judge(
    bench: &Workbench,
    kind: JudgeKind,
    topic: &str,
    content: &str,
) -> Result<Value, Error> {
    Ok(bench.run_judge(kind, topic, content).await?)
}
