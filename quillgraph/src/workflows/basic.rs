//! Basic pipeline: a single generation step.
//!
//! Creates a post from the prompt, or applies the prompt as modifications
//! when existing MDX is given.

use std::sync::Arc;

use crate::error::NodeError;
use crate::graph::{
    node_fn, CompiledStateGraph, GraphValidationError, RunnableConfig, StateGraph, END, START,
};
use crate::llm::{LlmClient, LlmClientExt};
use crate::state::{Reducer, RunState, StateSchema, StateUpdate};

use super::{prompts, WorkflowError, WRITER_TEMPERATURE};

pub const PROMPT: &str = "prompt";
pub const RAW_MDX: &str = "raw_mdx";
pub const MDX: &str = "mdx";

fn schema() -> StateSchema {
    let mut schema = StateSchema::new();
    schema
        .declare_field(PROMPT, Reducer::replace())
        .declare_field(RAW_MDX, Reducer::replace())
        .declare_field(MDX, Reducer::replace());
    schema
}

pub fn build_graph(llm: Arc<dyn LlmClient>) -> Result<CompiledStateGraph, GraphValidationError> {
    let generate = node_fn(move |state: RunState| {
        let llm = llm.clone();
        async move {
            let prompt: String = state.require(PROMPT)?;
            let raw_mdx: Option<String> = state.get(RAW_MDX)?;
            let text = match raw_mdx {
                Some(raw) => prompts::modification(&raw, &prompt),
                None => prompts::basic_creation(&prompt),
            };
            let mdx = llm.generate_text(&text, WRITER_TEMPERATURE).await?;
            Ok::<_, NodeError>(StateUpdate::new().with(MDX, mdx))
        }
    });

    let mut graph = StateGraph::new(schema());
    graph
        .add_node("generate", generate)
        .add_edge(START, "generate")
        .add_edge("generate", END);
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
