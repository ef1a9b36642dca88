//! Run config: OpenAI endpoint, search key, pipeline knobs. Filled from env / .env.
//!
//! Interacts with [`RunOptions`](super::RunOptions) and
//! [`build_workbench`](crate::build_workbench).

use std::str::FromStr;

use quillgraph::{RetryPolicy, WorkflowSettings};

/// Error type used by the CLI library.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Run config: API base, key, model, temperature, search and loop settings.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// OpenAI API base URL, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    /// OpenAI API key.
    pub api_key: String,
    /// Model name, e.g. `gpt-4o-mini`.
    pub model: String,
    /// Forced sampling temperature. Default: unset (each step picks its own).
    pub temperature: Option<f32>,
    /// Tavily API key; pipelines and judges that search fail without it.
    pub tavily_api_key: Option<String>,
    /// Documents fetched per search.
    pub search_results_k: usize,
    /// Critic / refine cycles of the looping pipelines.
    pub max_iterations: u32,
    /// Step ceiling of every run. Default: unset (each pipeline sizes its own).
    pub max_steps: Option<usize>,
    /// Retries of a failed LLM call before the node fails.
    pub llm_max_retries: u32,
    /// When true, attach node enter/exit logging.
    pub verbose: bool,
}

impl RunConfig {
    /// Apply optional overrides from `RunOptions` to this config.
    pub fn apply_options(&mut self, options: &super::RunOptions) {
        if let Some(t) = options.temperature {
            self.temperature = Some(t);
        }
        if let Some(n) = options.max_steps {
            self.max_steps = Some(n);
        }
        if let Some(n) = options.max_iterations {
            self.max_iterations = n;
        }
        self.verbose = options.verbose;
    }

    /// Pipeline settings derived from this config.
    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            max_iterations: self.max_iterations,
            search_results_k: self.search_results_k,
            max_steps: self.max_steps,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_max_retries(self.llm_max_retries)
    }
}

impl RunConfig {
    /// Fill config from env vars (and .env). Call `dotenv::dotenv().ok()` first.
    ///
    /// `OPENAI_API_KEY` required; `OPENAI_API_BASE`, `OPENAI_MODEL` have defaults.
    /// `OPENAI_TEMPERATURE` and `TAVILY_API_KEY` optional. `SEARCH_RESULTS_K` (3),
    /// `MAX_ITERATIONS` (1), `MAX_STEPS` (unset) and `LLM_MAX_RETRIES` (2) must
    /// parse when set.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "OPENAI_API_KEY is not set; please configure it in .env",
            )
        })?;
        let api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let temperature = std::env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok());
        let tavily_api_key = std::env::var("TAVILY_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        Ok(Self {
            api_base,
            api_key,
            model,
            temperature,
            tavily_api_key,
            search_results_k: env_or("SEARCH_RESULTS_K", 3)?,
            max_iterations: env_or("MAX_ITERATIONS", 1)?,
            max_steps: env_opt("MAX_STEPS")?,
            llm_max_retries: env_or("LLM_MAX_RETRIES", 2)?,
            verbose: false,
        })
    }
}

/// Parses `name` when set, else returns `default`.
fn env_or<T>(name: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(env_opt(name)?.unwrap_or(default))
}

/// Parses `name` when set.
fn env_opt<T>(name: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|e: T::Err| {
            Error::from(format!("{} has an invalid value `{}`: {}", name, raw, e))
        }),
        Err(_) => Ok(None),
    }
}
