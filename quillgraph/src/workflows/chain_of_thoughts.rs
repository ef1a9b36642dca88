//! Chain-of-thoughts pipeline: `intentions -> compose`.
//!
//! The first step distills what the user wants (or, in modification mode,
//! what the requested changes mean); the second writes or updates the post
//! from that statement.

use std::sync::Arc;

use crate::error::NodeError;
use crate::graph::{
    node_fn, CompiledStateGraph, GraphValidationError, Node, RunnableConfig, StateGraph, END,
    START,
};
use crate::llm::{LlmClient, LlmClientExt};
use crate::state::{Reducer, RunState, StateSchema, StateUpdate};

use super::{prompts, WorkflowError, WRITER_TEMPERATURE};

pub const PROMPT: &str = "prompt";
pub const RAW_MDX: &str = "raw_mdx";
pub const INTENTION: &str = "intention";
pub const MDX: &str = "mdx";

fn schema() -> StateSchema {
    let mut schema = StateSchema::new();
    for field in [PROMPT, RAW_MDX, INTENTION, MDX] {
        schema.declare_field(field, Reducer::replace());
    }
    schema
}

fn intentions_node(llm: Arc<dyn LlmClient>) -> Arc<dyn Node> {
    node_fn(move |state: RunState| {
        let llm = llm.clone();
        async move {
            let prompt: String = state.require(PROMPT)?;
            let text = if state.get::<String>(RAW_MDX)?.is_some() {
                prompts::modification_intentions(&prompt)
            } else {
                prompts::extract_intentions(&prompt)
            };
            let intention = llm.generate_text(&text, WRITER_TEMPERATURE).await?;
            tracing::debug!(%intention, "extracted intention");
            Ok::<_, NodeError>(StateUpdate::new().with(INTENTION, intention))
        }
    })
}

fn compose_node(llm: Arc<dyn LlmClient>) -> Arc<dyn Node> {
    node_fn(move |state: RunState| {
        let llm = llm.clone();
        async move {
            let intention: String = state.require(INTENTION)?;
            let text = match state.get::<String>(RAW_MDX)? {
                Some(raw) => prompts::modification(&raw, &intention),
                None => prompts::blog_from_intention(&intention),
            };
            let mdx = llm.generate_text(&text, WRITER_TEMPERATURE).await?;
            Ok::<_, NodeError>(StateUpdate::new().with(MDX, mdx))
        }
    })
}

pub fn build_graph(llm: Arc<dyn LlmClient>) -> Result<CompiledStateGraph, GraphValidationError> {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("intentions", intentions_node(llm.clone()))
        .add_node("compose", compose_node(llm))
        .add_edge(START, "intentions")
        .add_edge("intentions", "compose")
        .add_edge("compose", END);
    graph.compile()
}

pub async fn run(
    graph: &CompiledStateGraph,
    prompt: &str,
    raw_mdx: Option<&str>,
    config: Option<RunnableConfig>,
) -> Result<String, WorkflowError> {
    let mut input = StateUpdate::new().with(PROMPT, prompt);
    if let Some(raw) = raw_mdx {
        input.set(RAW_MDX, raw);
    }
    let state = graph.initial_state(input)?;
    let out = graph.invoke(state, config).await?;
    Ok(out.require(MDX)?)
}
