//! # quillgraph
//!
//! A small graph-based workflow engine and the AI-assisted blog pipelines
//! built on it. Describe a pipeline as a directed graph of asynchronous
//! steps over a shared state object, with conditional branching and
//! bounded loops, then run it to completion.
//!
//! ## Design Principles
//!
//! - **Declared state**: a [`StateSchema`] lists every field with its
//!   [`Reducer`]; nodes return a partial [`StateUpdate`] and the engine merges
//!   it into the running [`RunState`].
//! - **One step at a time**: a run executes exactly one node per step and
//!   follows exactly one outgoing transition after it. No fan-out.
//! - **Validate up front**: [`StateGraph::compile`] rejects dangling edges,
//!   missing entry or exit, ambiguous transitions and unmapped branch keys.
//! - **Fail whole**: any node failure, unknown branch key or step-ceiling
//!   breach aborts the run with a [`RunError`]; there is no partial result.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `BranchKey`,
//!   `NodeMiddleware`.
//! - [`state`]: `StateSchema`, `Reducer`, `RunState`, `StateUpdate`.
//! - [`stream`]: `StreamMode` and `StreamEvent` for `CompiledStateGraph::stream`.
//! - [`llm`]: `LlmClient` trait, `MockLlm`, `RetryingLlm`, and `ChatOpenAI`
//!   (feature `openai`).
//! - [`retriever`]: `DocumentRetriever` trait, `MockRetriever`, and
//!   `TavilyRetriever` (feature `tavily`).
//! - [`workflows`]: the blog pipelines (basic, chain-of-thoughts,
//!   writer/critic, deep research) and judges (relevance, fact check).
//!
//! ## Features
//!
//! - `openai`: OpenAI chat completions via `async-openai`.
//! - `tavily`: Tavily web search via `reqwest`.
//!
//! ## Quick Start
//!
//! ```rust
//! use quillgraph::{node_fn, NodeError, Reducer, StateGraph, StateSchema, StateUpdate, END, START};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut schema = StateSchema::new();
//! schema.declare_field_with_default("count", Reducer::replace(), 0);
//!
//! let mut graph = StateGraph::new(schema);
//! graph
//!     .add_node(
//!         "inc",
//!         node_fn(|state| async move {
//!             let count: i64 = state.require("count")?;
//!             Ok::<_, NodeError>(StateUpdate::new().with("count", count + 1))
//!         }),
//!     )
//!     .add_edge(START, "inc")
//!     .add_edge("inc", END);
//! let graph = graph.compile().unwrap();
//!
//! let state = graph.initial_state(StateUpdate::new()).unwrap();
//! let out = graph.invoke(state, None).await.unwrap();
//! assert_eq!(out.get::<i64>("count").unwrap(), Some(1));
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod llm;
pub mod retriever;
pub mod state;
pub mod stream;
pub mod workflows;

pub use error::{NodeError, RunError};
pub use graph::{
    node_fn, BranchKey, CompiledStateGraph, FnNode, GraphValidationError, NextNode, Node,
    NodeFuture, NodeMiddleware, RunnableConfig, StateGraph, DEFAULT_MAX_STEPS, END, START,
};
pub use llm::{
    GenerateOptions, LlmClient, LlmClientExt, LlmError, LlmOutput, MockLlm, ResponseSchema,
    RetryPolicy, RetryingLlm,
};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use retriever::{format_documents, Document, DocumentRetriever, MockRetriever, RetrieverError};
#[cfg(feature = "tavily")]
pub use retriever::TavilyRetriever;
pub use state::{Reducer, RunState, StateError, StateSchema, StateUpdate};
pub use stream::{StreamEvent, StreamMode};
pub use workflows::{
    clean_mdx_output, JudgeKind, Workbench, WorkflowError, WorkflowKind, WorkflowSettings,
};
