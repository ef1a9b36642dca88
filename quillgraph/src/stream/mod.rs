//! Streaming types for graph runs.
//!
//! Defines stream modes and events emitted by `CompiledStateGraph::stream`.

use crate::error::RunError;
use crate::state::{RunState, StateUpdate};

/// Stream mode selector: which kinds of events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit full state after each node's update is merged.
    Values,
    /// Emit the node id and the update it returned.
    Updates,
}

/// Event emitted while running a graph.
#[derive(Debug)]
pub enum StreamEvent {
    /// Full state snapshot after a node finishes.
    Values(RunState),
    /// The update a node returned, before merging.
    Updates { node_id: String, update: StateUpdate },
    /// The run failed; this is always the last event of a failed run.
    Failed(RunError),
}
