//! Relevance judge: one structured call scoring topic alignment from 0 to 10.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::NodeError;
use crate::graph::{
    node_fn, CompiledStateGraph, GraphValidationError, RunnableConfig, StateGraph, END, START,
};
use crate::llm::{LlmClient, LlmClientExt, ResponseSchema};
use crate::state::{Reducer, RunState, StateSchema, StateUpdate};

use super::{prompts, WorkflowError, JUDGE_TEMPERATURE};

pub const TOPIC: &str = "topic";
pub const CONTENT: &str = "content";
pub const VERDICT: &str = "verdict";

pub const MAX_SCORE: f64 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelevanceVerdict {
    pub score: f64,
    pub explanation: String,
}

fn schema() -> StateSchema {
    let mut schema = StateSchema::new();
    for field in [TOPIC, CONTENT, VERDICT] {
        schema.declare_field(field, Reducer::replace());
    }
    schema
}

fn verdict_schema() -> ResponseSchema {
    ResponseSchema::new(
        "RelevanceVerdict",
        json!({
            "type": "object",
            "properties": {
                "score": { "type": "number", "minimum": 0, "maximum": 10 },
                "explanation": { "type": "string" }
            },
            "required": ["score", "explanation"]
        }),
    )
}

pub fn build_graph(llm: Arc<dyn LlmClient>) -> Result<CompiledStateGraph, GraphValidationError> {
    let judge = node_fn(move |state: RunState| {
        let llm = llm.clone();
        async move {
            let topic: String = state.require(TOPIC)?;
            let content: String = state.require(CONTENT)?;
            let verdict: RelevanceVerdict = llm
                .generate_structured(
                    &prompts::relevance_judge(&topic, &content),
                    verdict_schema(),
                    JUDGE_TEMPERATURE,
                )
                .await?;
            if !(0.0..=MAX_SCORE).contains(&verdict.score) {
                return Err(NodeError::NodeLogicFailure(format!(
                    "relevance score {} is outside 0..=10",
                    verdict.score
                )));
            }
            Ok::<_, NodeError>(StateUpdate::new().try_with(VERDICT, &verdict)?)
        }
    });

    let mut graph = StateGraph::new(schema());
    graph
        .add_node("judge", judge)
        .add_edge(START, "judge")
        .add_edge("judge", END);
    graph.compile()
}

pub async fn run(
    graph: &CompiledStateGraph,
    topic: &str,
    content: &str,
    config: Option<RunnableConfig>,
) -> Result<RelevanceVerdict, WorkflowError> {
    let state = graph.initial_state(
        StateUpdate::new()
            .with(TOPIC, topic)
            .with(CONTENT, content),
    )?;
    let out = graph.invoke(state, config).await?;
    Ok(out.require(VERDICT)?)
}
