//! Deep-research pipeline: search, summarize, draft, refine, optimize, format.
//!
//! ```text
//! START -> research -> summarize -> create_draft -> refine -> (refine | seo)
//! seo -> format -> END
//! ```
//!
//! `refine` always runs at least once; it loops while
//! `iteration < max_iterations`. Each pass refines the latest text, not the
//! first draft.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::NodeError;
use crate::graph::{
    node_fn, BranchKey, CompiledStateGraph, GraphValidationError, Node, RunnableConfig,
    StateGraph, END, START,
};
use crate::llm::{LlmClient, LlmClientExt, ResponseSchema};
use crate::retriever::{format_documents, DocumentRetriever};
use crate::state::{Reducer, RunState, StateSchema, StateUpdate};

use super::{loop_step_ceiling, prompts, WorkflowError, WRITER_TEMPERATURE};

pub const TOPIC: &str = "topic";
pub const SEARCH_RESULTS: &str = "search_results";
pub const SUMMARY: &str = "summary";
pub const DRAFT: &str = "draft";
pub const REFINED: &str = "refined";
pub const ITERATION: &str = "iteration";
pub const SEO: &str = "seo";
pub const FINAL_MDX: &str = "final_mdx";

/// SEO step output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeoData {
    pub title: String,
    pub meta: String,
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterRefine {
    Refine,
    Seo,
}

impl BranchKey for AfterRefine {
    fn variants() -> &'static [Self] {
        &[AfterRefine::Refine, AfterRefine::Seo]
    }

    fn as_key(&self) -> &'static str {
        match self {
            AfterRefine::Refine => "refine",
            AfterRefine::Seo => "seo",
        }
    }
}

fn schema() -> StateSchema {
    let mut schema = StateSchema::new();
    for field in [TOPIC, SEARCH_RESULTS, SUMMARY, DRAFT, REFINED, SEO, FINAL_MDX] {
        schema.declare_field(field, Reducer::replace());
    }
    schema.declare_field_with_default(ITERATION, Reducer::replace(), 0);
    schema
}

/// Searches the topic and stores the hits as `title: content` lines.
struct ResearchNode {
    retriever: Arc<dyn DocumentRetriever>,
    k: usize,
}

#[async_trait]
impl Node for ResearchNode {
    async fn run(&self, state: &RunState) -> Result<StateUpdate, NodeError> {
        let topic: String = state.require(TOPIC)?;
        let documents = self.retriever.retrieve(&topic, self.k).await?;
        tracing::debug!(documents = documents.len(), "research results");
        Ok(StateUpdate::new().with(SEARCH_RESULTS, format_documents(&documents)))
    }
}

/// Refines the latest text (`refined`, or `draft` on the first pass).
struct RefineNode {
    llm: Arc<dyn LlmClient>,
}

#[async_trait]
impl Node for RefineNode {
    async fn run(&self, state: &RunState) -> Result<StateUpdate, NodeError> {
        let latest: String = match state.get::<String>(REFINED)? {
            Some(refined) => refined,
            None => state.require(DRAFT)?,
        };
        let iteration: u32 = state.require(ITERATION)?;
        let refined = self
            .llm
            .generate_text(&prompts::refine_blog(&latest), WRITER_TEMPERATURE)
            .await?;
        Ok(StateUpdate::new()
            .with(REFINED, refined)
            .with(ITERATION, iteration + 1))
    }
}

/// Asks for SEO title, meta description and content as JSON.
struct SeoNode {
    llm: Arc<dyn LlmClient>,
}

fn seo_schema() -> ResponseSchema {
    ResponseSchema::new(
        "SeoData",
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "meta": { "type": "string" },
                "content": { "type": "string" }
            },
            "required": ["title", "meta", "content"]
        }),
    )
}

#[async_trait]
impl Node for SeoNode {
    async fn run(&self, state: &RunState) -> Result<StateUpdate, NodeError> {
        let topic: String = state.require(TOPIC)?;
        let refined: String = state.require(REFINED)?;
        let seo: SeoData = self
            .llm
            .generate_structured(&prompts::seo(&topic, &refined), seo_schema(), WRITER_TEMPERATURE)
            .await?;
        Ok(StateUpdate::new().try_with(SEO, &seo)?)
    }
}

pub fn build_graph(
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn DocumentRetriever>,
    search_results_k: usize,
    max_iterations: u32,
) -> Result<CompiledStateGraph, GraphValidationError> {
    let summarize = {
        let llm = llm.clone();
        node_fn(move |state: RunState| {
            let llm = llm.clone();
            async move {
                let topic: String = state.require(TOPIC)?;
                let results: String = state.require(SEARCH_RESULTS)?;
                let summary = llm
                    .generate_text(&prompts::research_summary(&topic, &results), WRITER_TEMPERATURE)
                    .await?;
                Ok::<_, NodeError>(StateUpdate::new().with(SUMMARY, summary))
            }
        })
    };
    let create_draft = {
        let llm = llm.clone();
        node_fn(move |state: RunState| {
            let llm = llm.clone();
            async move {
                let topic: String = state.require(TOPIC)?;
                let summary: String = state.require(SUMMARY)?;
                let draft = llm
                    .generate_text(&prompts::draft_blog(&topic, &summary), WRITER_TEMPERATURE)
                    .await?;
                Ok::<_, NodeError>(StateUpdate::new().with(DRAFT, draft))
            }
        })
    };
    let format = {
        let llm = llm.clone();
        node_fn(move |state: RunState| {
            let llm = llm.clone();
            async move {
                let seo: SeoData = state.require(SEO)?;
                let mdx = llm
                    .generate_text(
                        &prompts::format_mdx(&seo.title, &seo.meta, &seo.content),
                        WRITER_TEMPERATURE,
                    )
                    .await?;
                Ok::<_, NodeError>(StateUpdate::new().with(FINAL_MDX, mdx))
            }
        })
    };

    // research, summarize, create_draft, refine per pass, seo, format.
    let longest_path = (max_iterations as usize).max(1) + 5;
    let mut graph = StateGraph::new(schema()).with_max_steps(loop_step_ceiling(longest_path));
    graph
        .add_node(
            "research",
            Arc::new(ResearchNode {
                retriever,
                k: search_results_k,
            }),
        )
        .add_node("summarize", summarize)
        .add_node("create_draft", create_draft)
        .add_node("refine", Arc::new(RefineNode { llm: llm.clone() }))
        .add_node("seo", Arc::new(SeoNode { llm }))
        .add_node("format", format)
        .add_edge(START, "research")
        .add_edge("research", "summarize")
        .add_edge("summarize", "create_draft")
        .add_edge("create_draft", "refine")
        .add_conditional_edges(
            "refine",
            move |s: &RunState| {
                let iteration = s.get::<u32>(ITERATION).ok().flatten().unwrap_or(0);
                if iteration < max_iterations {
                    AfterRefine::Refine
                } else {
                    AfterRefine::Seo
                }
            },
            [(AfterRefine::Refine, "refine"), (AfterRefine::Seo, "seo")],
        )
        .add_edge("seo", "format")
        .add_edge("format", END);
    graph.compile()
}

pub async fn run(
    graph: &CompiledStateGraph,
    topic: &str,
    config: Option<RunnableConfig>,
) -> Result<String, WorkflowError> {
    let state = graph.initial_state(StateUpdate::new().with(TOPIC, topic))?;
    let out = graph.invoke(state, config).await?;
    Ok(out.require(FINAL_MDX)?)
}
