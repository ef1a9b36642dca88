//! quillgraph-cli library: config loading and run logic behind the `quillgraph` binary.
//!
//! Reads OpenAI / Tavily config from env and .env, builds a [`Workbench`] with
//! retrying LLM calls, and runs a pipeline, a judge, or an A/B evaluation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quillgraph_cli::{build_workbench, generate, load_config, RunOptions, WorkflowKind};
//!
//! # async fn demo() -> Result<(), quillgraph_cli::Error> {
//! let config = load_config(&RunOptions::default())?;
//! let bench = build_workbench(&config)?;
//! let mdx = generate(&bench, WorkflowKind::WriterCritic, "Rust lifetimes", None).await?;
//! println!("{}", mdx);
//! # Ok(())
//! # }
//! ```

mod config;
mod middleware;
mod run;

pub use config::{Error, RunConfig, RunOptions};
pub use middleware::LoggingMiddleware;
pub use quillgraph::{JudgeKind, Workbench, WorkflowKind};
pub use run::{
    build_workbench, generate, judge, load_config, read_prompts, run_ab_test, write_results,
    AbTestPlan, AbTestRecord,
};

use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber. `RUST_LOG` wins; otherwise `debug`
/// when `verbose`, else `warn`. Calling it twice is harmless.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests;
