//! Node trait: one asynchronous unit of work in a graph.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::state::{RunState, StateUpdate};

/// One step of a graph: reads the current state and returns the fields to change.
///
/// Nodes must not keep run-visible state between invocations; a compiled graph
/// shares the same node instances across concurrent runs. Any I/O (LLM calls,
/// search) happens inside `run`.
///
/// **Interaction**: Registered with `StateGraph::add_node`; the engine merges
/// the returned `StateUpdate` through the schema's reducers.
#[async_trait]
pub trait Node: Send + Sync {
    async fn run(&self, state: &RunState) -> Result<StateUpdate, NodeError>;
}

/// Node backed by an async closure over an owned state snapshot.
///
/// Handy for pure computation and small glue steps:
///
/// ```
/// use quillgraph::{node_fn, NodeError, StateUpdate};
///
/// let skip = node_fn(|_state| async {
///     Ok::<_, NodeError>(StateUpdate::new().with("checked_claims", serde_json::json!([])))
/// });
/// # let _ = skip;
/// ```
pub struct FnNode<F> {
    f: F,
}

impl<F, Fut> FnNode<F>
where
    F: Fn(RunState) -> Fut + Send + Sync,
    Fut: Future<Output = Result<StateUpdate, NodeError>> + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Node for FnNode<F>
where
    F: Fn(RunState) -> Fut + Send + Sync,
    Fut: Future<Output = Result<StateUpdate, NodeError>> + Send,
{
    async fn run(&self, state: &RunState) -> Result<StateUpdate, NodeError> {
        (self.f)(state.clone()).await
    }
}

/// Wraps an async closure as `Arc<dyn Node>`, ready for `add_node`.
pub fn node_fn<F, Fut>(f: F) -> Arc<dyn Node>
where
    F: Fn(RunState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StateUpdate, NodeError>> + Send + 'static,
{
    Arc::new(FnNode::new(f))
}
