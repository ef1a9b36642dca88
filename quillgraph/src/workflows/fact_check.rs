//! Fact-check judge.
//!
//! ```text
//! START -> assess_factuality -> (extract_claims | skip)
//! extract_claims -> check_facts -> END
//! skip -> END
//! ```
//!
//! Non-factual posts (fiction, satire) skip straight to an empty report.
//! Otherwise every verifiable claim is searched and judged on its own.

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

use super::{prompts, WorkflowError, JUDGE_TEMPERATURE};

pub const TOPIC: &str = "topic";
pub const BLOG_CONTENT: &str = "blog_content";
pub const FACTUAL: &str = "factual";
pub const CLAIMS: &str = "claims";
pub const CHECKED_CLAIMS: &str = "checked_claims";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactualityDecision {
    pub factual: bool,
}

/// A claim found in the post.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    pub is_verifiable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimExtraction {
    pub claims: Vec<Claim>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correctness {
    True,
    False,
    Uncertain,
}

/// Verdict on one claim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimVerdict {
    pub text: String,
    pub verifiable: bool,
    pub correctness: Correctness,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub explanation: String,
}

/// Judge output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FactCheckReport {
    pub checked_claims: Vec<ClaimVerdict>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterAssess {
    ExtractClaims,
    Skip,
}

impl BranchKey for AfterAssess {
    fn variants() -> &'static [Self] {
        &[AfterAssess::ExtractClaims, AfterAssess::Skip]
    }

    fn as_key(&self) -> &'static str {
        match self {
            AfterAssess::ExtractClaims => "extract_claims",
            AfterAssess::Skip => "skip",
        }
    }
}

fn schema() -> StateSchema {
    let mut schema = StateSchema::new();
    schema
        .declare_field(TOPIC, Reducer::replace())
        .declare_field(BLOG_CONTENT, Reducer::replace())
        .declare_field_with_default(FACTUAL, Reducer::replace(), false)
        .declare_field(CLAIMS, Reducer::replace())
        .declare_field(CHECKED_CLAIMS, Reducer::replace());
    schema
}

fn factuality_schema() -> ResponseSchema {
    ResponseSchema::new(
        "FactualityDecision",
        json!({
            "type": "object",
            "properties": { "factual": { "type": "boolean" } },
            "required": ["factual"]
        }),
    )
}

fn claims_schema() -> ResponseSchema {
    ResponseSchema::new(
        "ClaimExtraction",
        json!({
            "type": "object",
            "properties": {
                "claims": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "text": { "type": "string" },
                            "is_verifiable": { "type": "boolean" }
                        },
                        "required": ["text", "is_verifiable"]
                    }
                }
            },
            "required": ["claims"]
        }),
    )
}

fn verdict_schema() -> ResponseSchema {
    ResponseSchema::new(
        "ClaimVerdict",
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string" },
                "verifiable": { "type": "boolean" },
                "correctness": { "type": "string", "enum": ["true", "false", "uncertain"] },
                "source": { "type": "string" },
                "explanation": { "type": "string" }
            },
            "required": ["text", "verifiable", "correctness", "explanation"]
        }),
    )
}

/// Searches each verifiable claim and asks for a verdict, in claim order.
struct CheckFactsNode {
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn DocumentRetriever>,
    k: usize,
}

#[async_trait]
impl Node for CheckFactsNode {
    async fn run(&self, state: &RunState) -> Result<StateUpdate, NodeError> {
        let claims: Vec<Claim> = state.get(CLAIMS)?.unwrap_or_default();
        let mut checked = Vec::new();
        for claim in claims.iter().filter(|c| c.is_verifiable) {
            let documents = self.retriever.retrieve(&claim.text, self.k).await?;
            let prompt = prompts::fact_check_with_search(&claim.text, &format_documents(&documents));
            let mut verdict: ClaimVerdict = self
                .llm
                .generate_structured(&prompt, verdict_schema(), JUDGE_TEMPERATURE)
                .await?;
            if verdict.source.as_deref() == Some("") {
                verdict.source = None;
            }
            tracing::debug!(claim = %claim.text, correctness = ?verdict.correctness, "checked claim");
            checked.push(verdict);
        }
        Ok(StateUpdate::new().try_with(CHECKED_CLAIMS, &checked)?)
    }
}

pub fn build_graph(
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn DocumentRetriever>,
    search_results_k: usize,
) -> Result<CompiledStateGraph, GraphValidationError> {
    let assess = {
        let llm = llm.clone();
        node_fn(move |state: RunState| {
            let llm = llm.clone();
            async move {
                let topic: String = state.require(TOPIC)?;
                let content: String = state.require(BLOG_CONTENT)?;
                let decision: FactualityDecision = llm
                    .generate_structured(
                        &prompts::assess_factuality(&topic, &content),
                        factuality_schema(),
                        JUDGE_TEMPERATURE,
                    )
                    .await?;
                Ok::<_, NodeError>(StateUpdate::new().with(FACTUAL, decision.factual))
            }
        })
    };
    let extract = {
        let llm = llm.clone();
        node_fn(move |state: RunState| {
            let llm = llm.clone();
            async move {
                let content: String = state.require(BLOG_CONTENT)?;
                let extraction: ClaimExtraction = llm
                    .generate_structured(
                        &prompts::extract_claims(&content),
                        claims_schema(),
                        JUDGE_TEMPERATURE,
                    )
                    .await?;
                Ok::<_, NodeError>(StateUpdate::new().try_with(CLAIMS, &extraction.claims)?)
            }
        })
    };
    let skip = node_fn(|_| async {
        tracing::info!("post is not factual; skipping fact check");
        Ok::<_, NodeError>(StateUpdate::new().with(CHECKED_CLAIMS, json!([])))
    });

    let mut graph = StateGraph::new(schema());
    graph
        .add_node("assess_factuality", assess)
        .add_node("extract_claims", extract)
        .add_node(
            "check_facts",
            Arc::new(CheckFactsNode {
                llm,
                retriever,
                k: search_results_k,
            }),
        )
        .add_node("skip", skip)
        .add_edge(START, "assess_factuality")
        .add_conditional_edges(
            "assess_factuality",
            |s: &RunState| match s.get::<bool>(FACTUAL) {
                Ok(Some(true)) => AfterAssess::ExtractClaims,
                _ => AfterAssess::Skip,
            },
            [
                (AfterAssess::ExtractClaims, "extract_claims"),
                (AfterAssess::Skip, "skip"),
            ],
        )
        .add_edge("extract_claims", "check_facts")
        .add_edge("check_facts", END)
        .add_edge("skip", END);
    graph.compile()
}

pub async fn run(
    graph: &CompiledStateGraph,
    topic: &str,
    content: &str,
    config: Option<RunnableConfig>,
) -> Result<FactCheckReport, WorkflowError> {
    let state = graph.initial_state(
        StateUpdate::new()
            .with(TOPIC, topic)
            .with(BLOG_CONTENT, content),
    )?;
    let out = graph.invoke(state, config).await?;
    Ok(FactCheckReport {
        checked_claims: out.require(CHECKED_CLAIMS)?,
    })
}
