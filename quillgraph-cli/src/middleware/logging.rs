//! Logging middleware that traces node enter/exit around each node run.

use std::time::Instant;

use async_trait::async_trait;
use quillgraph::{NextNode, NodeError, NodeMiddleware, RunState, StateUpdate};
use tracing::{debug, warn};

/// Middleware that logs node enter/exit around each node run.
///
/// Logs go through `tracing` (stderr in the CLI) so that the generated MDX on
/// stdout can be redirected separately.
pub struct LoggingMiddleware;

#[async_trait]
impl NodeMiddleware for LoggingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: RunState,
        inner: NextNode,
    ) -> Result<StateUpdate, NodeError> {
        debug!(node_id, "node enter");
        let started = Instant::now();
        let result = inner(state).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(update) => debug!(node_id, fields = update.len(), elapsed_ms, "node exit"),
            Err(e) => warn!(node_id, error = %e, elapsed_ms, "node failed"),
        }
        result
    }
}
