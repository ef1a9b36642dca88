//! Blog pipelines and judges built on the state graph engine.
//!
//! Each submodule builds a `CompiledStateGraph` from its collaborators and
//! exposes a `run` function that seeds the initial state and extracts the
//! output field. [`Workbench`] picks a pipeline or judge by kind, which is
//! what the CLI uses.

pub mod basic;
pub mod chain_of_thoughts;
pub mod deep_research;
pub mod fact_check;
pub mod prompts;
pub mod relevance;
pub mod writer_critic;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::error::RunError;
use crate::graph::{
    CompiledStateGraph, GraphValidationError, NodeMiddleware, RunnableConfig, DEFAULT_MAX_STEPS,
};
use crate::llm::LlmClient;
use crate::retriever::DocumentRetriever;
use crate::state::StateError;

/// Sampling temperature of content-writing steps.
pub const WRITER_TEMPERATURE: f32 = 0.7;
/// Sampling temperature of judging steps; lower for consistent verdicts.
pub const JUDGE_TEMPERATURE: f32 = 0.2;

/// Extra steps a looping pipeline allows beyond its longest legitimate path.
const LOOP_STEP_SLACK: usize = 5;

/// Step ceiling for a pipeline whose longest run takes `path_len` node calls.
/// Never below [`DEFAULT_MAX_STEPS`].
pub(crate) fn loop_step_ceiling(path_len: usize) -> usize {
    DEFAULT_MAX_STEPS.max(path_len.saturating_add(LOOP_STEP_SLACK))
}

/// Failure of a pipeline or judge.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow graph is invalid: {0}")]
    Graph(#[from] GraphValidationError),

    #[error(transparent)]
    Run(#[from] RunError),

    /// The run finished without setting its output field.
    #[error("workflow output unavailable: {0}")]
    Output(#[from] StateError),

    #[error("could not encode workflow output: {0}")]
    Encode(#[from] serde_json::Error),

    /// A search-backed workflow was requested without a retriever.
    #[error("`{0}` needs a document retriever (set TAVILY_API_KEY)")]
    MissingRetriever(&'static str),
}

/// Content-generation pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    Basic,
    ChainOfThoughts,
    WriterCritic,
    DeepResearch,
}

impl WorkflowKind {
    pub const ALL: [WorkflowKind; 4] = [
        WorkflowKind::Basic,
        WorkflowKind::ChainOfThoughts,
        WorkflowKind::WriterCritic,
        WorkflowKind::DeepResearch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowKind::Basic => "basic",
            WorkflowKind::ChainOfThoughts => "chain-of-thoughts",
            WorkflowKind::WriterCritic => "writer-critic",
            WorkflowKind::DeepResearch => "deep-research",
        }
    }

    /// Whether the pipeline calls the search service.
    pub fn needs_retriever(&self) -> bool {
        matches!(self, WorkflowKind::DeepResearch)
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "basic" => Ok(Self::Basic),
            "chain-of-thoughts" | "chainofthoughts" => Ok(Self::ChainOfThoughts),
            "writer-critic" | "writercritic" => Ok(Self::WriterCritic),
            "deep-research" | "deepresearch" => Ok(Self::DeepResearch),
            _ => Err(format!(
                "unknown workflow: {} (use basic, chain-of-thoughts, writer-critic, or deep-research)",
                s
            )),
        }
    }
}

/// Evaluation of a generated post.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JudgeKind {
    Relevance,
    Fact,
}

impl JudgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeKind::Relevance => "relevance",
            JudgeKind::Fact => "fact",
        }
    }

    pub fn needs_retriever(&self) -> bool {
        matches!(self, JudgeKind::Fact)
    }
}

impl fmt::Display for JudgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JudgeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "fact" | "fact-check" => Ok(Self::Fact),
            _ => Err(format!("unknown judge: {} (use relevance or fact)", s)),
        }
    }
}

/// Knobs shared by every pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkflowSettings {
    /// Critic / refine cycles of the looping pipelines.
    pub max_iterations: u32,
    /// Documents fetched per search.
    pub search_results_k: usize,
    /// Per-run step ceiling; `None` keeps the graph default.
    pub max_steps: Option<usize>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            max_iterations: 1,
            search_results_k: 3,
            max_steps: None,
        }
    }
}

/// Collaborators plus settings; runs any pipeline or judge by kind.
///
/// Cheap to clone. Graphs are built per call, so concurrent calls share
/// nothing but the collaborators.
#[derive(Clone)]
pub struct Workbench {
    llm: Arc<dyn LlmClient>,
    retriever: Option<Arc<dyn DocumentRetriever>>,
    middleware: Option<Arc<dyn NodeMiddleware>>,
    settings: WorkflowSettings,
}

impl Workbench {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            retriever: None,
            middleware: None,
            settings: WorkflowSettings::default(),
        }
    }

    pub fn with_retriever(mut self, retriever: Arc<dyn DocumentRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Wraps every node of every pipeline and judge in `middleware`.
    pub fn with_middleware(mut self, middleware: Arc<dyn NodeMiddleware>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    pub fn with_settings(mut self, settings: WorkflowSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    fn retriever(&self, needed_by: &'static str) -> Result<Arc<dyn DocumentRetriever>, WorkflowError> {
        self.retriever
            .clone()
            .ok_or(WorkflowError::MissingRetriever(needed_by))
    }

    fn attach(&self, graph: CompiledStateGraph) -> CompiledStateGraph {
        match &self.middleware {
            Some(middleware) => graph.with_middleware(middleware.clone()),
            None => graph,
        }
    }

    fn config(&self, run_name: &str) -> RunnableConfig {
        RunnableConfig {
            max_steps: self.settings.max_steps,
            run_name: Some(run_name.to_string()),
        }
    }

    /// Generates (or, for pipelines that support it, modifies) a post.
    ///
    /// Returns the pipeline's raw MDX text; see [`clean_mdx_output`].
    pub async fn run_workflow(
        &self,
        kind: WorkflowKind,
        prompt: &str,
        raw_mdx: Option<&str>,
    ) -> Result<String, WorkflowError> {
        let config = Some(self.config(kind.as_str()));
        let llm = self.llm.clone();
        let s = &self.settings;
        match kind {
            WorkflowKind::Basic => {
                let graph = self.attach(basic::build_graph(llm)?);
                basic::run(&graph, prompt, raw_mdx, config).await
            }
            WorkflowKind::ChainOfThoughts => {
                let graph = self.attach(chain_of_thoughts::build_graph(llm)?);
                chain_of_thoughts::run(&graph, prompt, raw_mdx, config).await
            }
            WorkflowKind::WriterCritic => {
                if raw_mdx.is_some() {
                    tracing::warn!(workflow = kind.as_str(), "existing MDX is ignored");
                }
                let graph = self.attach(writer_critic::build_graph(llm, s.max_iterations)?);
                writer_critic::run(&graph, prompt, config).await
            }
            WorkflowKind::DeepResearch => {
                if raw_mdx.is_some() {
                    tracing::warn!(workflow = kind.as_str(), "existing MDX is ignored");
                }
                let retriever = self.retriever(kind.as_str())?;
                let graph = self.attach(deep_research::build_graph(
                    llm,
                    retriever,
                    s.search_results_k,
                    s.max_iterations,
                )?);
                deep_research::run(&graph, prompt, config).await
            }
        }
    }

    /// Evaluates `content` written for `topic`; returns the judge's verdict as JSON.
    pub async fn run_judge(
        &self,
        kind: JudgeKind,
        topic: &str,
        content: &str,
    ) -> Result<Value, WorkflowError> {
        let config = Some(self.config(kind.as_str()));
        match kind {
            JudgeKind::Relevance => {
                let graph = self.attach(relevance::build_graph(self.llm.clone())?);
                let verdict = relevance::run(&graph, topic, content, config).await?;
                Ok(serde_json::to_value(verdict)?)
            }
            JudgeKind::Fact => {
                let retriever = self.retriever(kind.as_str())?;
                let graph = self.attach(fact_check::build_graph(
                    self.llm.clone(),
                    retriever,
                    self.settings.search_results_k,
                )?);
                let report = fact_check::run(&graph, topic, content, config).await?;
                Ok(serde_json::to_value(report)?)
            }
        }
    }
}

/// Strips a surrounding ```mdx code fence and trims whitespace.
pub fn clean_mdx_output(output: &str) -> String {
    let trimmed = output.trim();
    match trimmed.strip_prefix("```mdx") {
        Some(rest) => {
            let rest = rest.trim_start();
            rest.strip_suffix("```").unwrap_or(rest).trim().to_string()
        }
        None => trimmed.to_string(),
    }
}
