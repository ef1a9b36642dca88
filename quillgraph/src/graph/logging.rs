//! Logging for graph execution.
//!
//! Structured `tracing` events for run start/end, node execution and state
//! merges. Runs are wrapped in a `graph_run` span by the compiled graph.

use crate::error::RunError;

pub(crate) fn log_node_start(node_id: &str, step: usize) {
    tracing::debug!(node_id, step, "Starting node execution");
}

pub(crate) fn log_node_complete(node_id: &str, next: &str) {
    tracing::debug!(node_id, next, "Node execution complete");
}

pub(crate) fn log_state_update(node_id: &str, fields: usize) {
    tracing::debug!(node_id, fields, "State updated");
}

pub(crate) fn log_graph_start(max_steps: usize) {
    tracing::info!(max_steps, "Starting graph execution");
}

pub(crate) fn log_graph_complete(steps: usize) {
    tracing::info!(steps, "Graph execution complete");
}

pub(crate) fn log_graph_error(error: &RunError) {
    tracing::error!(%error, "Graph execution error");
}
