//! Writer/critic pipeline with a bounded revision loop.
//!
//! ```text
//! START -> writer_initial -> (critic | formatting)
//! critic -> writer_revision -> (critic | formatting)
//! formatting -> END
//! ```
//!
//! `writer_revision` bumps `iteration`; the loop runs the critic while
//! `iteration < max_iterations`, so `max_iterations` critic passes happen in
//! total and zero skips the critic entirely.

use std::sync::Arc;

use crate::error::NodeError;
use crate::graph::{
    node_fn, BranchKey, CompiledStateGraph, GraphValidationError, Node, RunnableConfig,
    StateGraph, END, START,
};
use crate::llm::{LlmClient, LlmClientExt};
use crate::state::{Reducer, RunState, StateSchema, StateUpdate};

use super::{loop_step_ceiling, prompts, WorkflowError, WRITER_TEMPERATURE};

pub const TOPIC: &str = "topic";
pub const BLOG_DRAFT: &str = "blog_draft";
pub const SUGGESTIONS: &str = "suggestions";
pub const ITERATION: &str = "iteration";
pub const FINAL_BLOG: &str = "final_blog";

/// Where to go after a writer step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterWriter {
    Critic,
    Formatting,
}

impl BranchKey for AfterWriter {
    fn variants() -> &'static [Self] {
        &[AfterWriter::Critic, AfterWriter::Formatting]
    }

    fn as_key(&self) -> &'static str {
        match self {
            AfterWriter::Critic => "critic",
            AfterWriter::Formatting => "formatting",
        }
    }
}

fn schema() -> StateSchema {
    let mut schema = StateSchema::new();
    schema
        .declare_field(TOPIC, Reducer::replace())
        .declare_field(BLOG_DRAFT, Reducer::replace())
        .declare_field(SUGGESTIONS, Reducer::replace())
        .declare_field_with_default(ITERATION, Reducer::replace(), 0)
        .declare_field(FINAL_BLOG, Reducer::replace());
    schema
}

/// One LLM call: renders a prompt from the state and writes the reply to `output`.
fn text_step<P>(llm: Arc<dyn LlmClient>, output: &'static str, render: P) -> Arc<dyn Node>
where
    P: Fn(&RunState) -> Result<String, NodeError> + Send + Sync + 'static,
{
    let render = Arc::new(render);
    node_fn(move |state: RunState| {
        let llm = llm.clone();
        let render = render.clone();
        async move {
            let prompt = render(&state)?;
            let text = llm.generate_text(&prompt, WRITER_TEMPERATURE).await?;
            Ok::<_, NodeError>(StateUpdate::new().with(output, text))
        }
    })
}

fn writer_revision_node(llm: Arc<dyn LlmClient>) -> Arc<dyn Node> {
    node_fn(move |state: RunState| {
        let llm = llm.clone();
        async move {
            let draft: String = state.require(BLOG_DRAFT)?;
            let suggestions: String = state.require(SUGGESTIONS)?;
            let iteration: u32 = state.require(ITERATION)?;
            let revised = llm
                .generate_text(&prompts::writer_revision(&draft, &suggestions), WRITER_TEMPERATURE)
                .await?;
            Ok::<_, NodeError>(
                StateUpdate::new()
                    .with(BLOG_DRAFT, revised)
                    .with(ITERATION, iteration + 1),
            )
        }
    })
}

pub fn build_graph(
    llm: Arc<dyn LlmClient>,
    max_iterations: u32,
) -> Result<CompiledStateGraph, GraphValidationError> {
    let writer_initial = text_step(llm.clone(), BLOG_DRAFT, |s| {
        Ok(prompts::writer_initial(&s.require::<String>(TOPIC)?))
    });
    let critic = text_step(llm.clone(), SUGGESTIONS, |s| {
        Ok(prompts::critic(&s.require::<String>(BLOG_DRAFT)?))
    });
    let formatting = text_step(llm.clone(), FINAL_BLOG, |s| {
        Ok(prompts::format_blog(&s.require::<String>(BLOG_DRAFT)?))
    });

    let branches = [
        (AfterWriter::Critic, "critic"),
        (AfterWriter::Formatting, "formatting"),
    ];

    // writer_initial, (critic, writer_revision) per iteration, formatting.
    let longest_path = 2 * max_iterations as usize + 2;
    let mut graph = StateGraph::new(schema()).with_max_steps(loop_step_ceiling(longest_path));
    graph
        .add_node("writer_initial", writer_initial)
        .add_node("critic", critic)
        .add_node("writer_revision", writer_revision_node(llm))
        .add_node("formatting", formatting)
        .add_edge(START, "writer_initial")
        .add_conditional_edges(
            "writer_initial",
            move |_: &RunState| {
                if max_iterations > 0 {
                    AfterWriter::Critic
                } else {
                    AfterWriter::Formatting
                }
            },
            branches,
        )
        .add_edge("critic", "writer_revision")
        .add_conditional_edges(
            "writer_revision",
            move |s: &RunState| {
                let iteration = s.get::<u32>(ITERATION).ok().flatten().unwrap_or(0);
                if iteration < max_iterations {
                    AfterWriter::Critic
                } else {
                    AfterWriter::Formatting
                }
            },
            branches,
        )
        .add_edge("formatting", END);
    graph.compile()
}

pub async fn run(
    graph: &CompiledStateGraph,
    topic: &str,
    config: Option<RunnableConfig>,
) -> Result<String, WorkflowError> {
    let state = graph.initial_state(StateUpdate::new().with(TOPIC, topic))?;
    let out = graph.invoke(state, config).await?;
    Ok(out.require(FINAL_BLOG)?)
}
