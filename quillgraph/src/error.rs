//! Run-time error types.
//!
//! [`NodeError`] is what a node returns; [`RunError`] is what
//! `CompiledStateGraph::invoke` returns. Every run-time failure aborts the
//! whole run: there is no partial result and no resume.

use thiserror::Error;

use crate::state::StateError;

/// Failure inside a node.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A call to an external collaborator (text generation, search) failed or timed out.
    #[error("external call failed: {0}")]
    ExternalCallFailure(String),

    /// The node's own processing failed (e.g. a response did not match the expected shape).
    #[error("node logic failed: {0}")]
    NodeLogicFailure(String),
}

impl From<StateError> for NodeError {
    fn from(e: StateError) -> Self {
        NodeError::NodeLogicFailure(e.to_string())
    }
}

/// Failure of a whole graph run.
#[derive(Debug, Error)]
pub enum RunError {
    /// A node failed; `source` is the node's own error, unchanged.
    #[error("node `{node}` failed: {source}")]
    Node {
        node: String,
        #[source]
        source: NodeError,
    },

    /// A router returned a key that is not in its branch map.
    #[error("router after `{node}` returned unknown branch key `{key}`")]
    UnknownBranchKey { node: String, key: String },

    /// The run hit the step ceiling without reaching END.
    #[error("run exceeded the maximum of {limit} steps without reaching END")]
    MaxStepsExceeded { limit: usize },

    /// A node returned an update the schema rejects.
    #[error("update from node `{node}` rejected: {source}")]
    InvalidUpdate {
        node: String,
        #[source]
        source: StateError,
    },

    /// The initial values do not fit the schema.
    #[error("invalid initial state: {0}")]
    InvalidInput(#[source] StateError),
}

impl RunError {
    /// The node error behind this failure, if a node failed.
    pub fn node_error(&self) -> Option<&NodeError> {
        match self {
            RunError::Node { source, .. } => Some(source),
            _ => None,
        }
    }
}
