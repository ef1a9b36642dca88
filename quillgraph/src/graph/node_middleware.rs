//! Node middleware: wraps every node invocation of a compiled graph.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::state::{RunState, StateUpdate};

/// Boxed future of one node invocation.
pub type NodeFuture = Pin<Box<dyn Future<Output = Result<StateUpdate, NodeError>> + Send>>;

/// Continuation that runs the wrapped node on the given snapshot.
pub type NextNode = Box<dyn FnOnce(RunState) -> NodeFuture + Send>;

/// Around-advice for node execution (logging, timing, per-node timeouts).
///
/// Implementations call `inner(state)` to run the node, or return early
/// without running it. Attached with `StateGraph::with_middleware`.
#[async_trait]
pub trait NodeMiddleware: Send + Sync {
    async fn around_run(
        &self,
        node_id: &str,
        state: RunState,
        inner: NextNode,
    ) -> Result<StateUpdate, NodeError>;
}
