//! Graph validation error.
//!
//! Returned by `StateGraph::compile` when the graph is structurally invalid.
//! A graph that fails validation is never executed.

use thiserror::Error;

/// Error when compiling a state graph.
///
/// A valid graph has unique, non-reserved node ids; every edge endpoint and
/// branch target is a declared node or START/END; exactly one transition
/// leaves START; at least one transition reaches END; every node has exactly
/// one outgoing transition; conditional edges have non-empty branch maps that
/// cover every key their router is declared to return.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphValidationError {
    /// Two nodes were added with the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// A node was added under the reserved START or END id.
    #[error("node id is reserved: {0}")]
    ReservedNodeName(String),

    /// An edge or branch refers to an id that is not a node (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// An edge leaves END.
    #[error("edges cannot leave END")]
    EdgeFromEnd,

    /// An edge or branch from the given node points back at START.
    #[error("edge from `{0}` targets START")]
    EdgeIntoStart(String),

    /// No transition leaves START.
    #[error("graph must have exactly one edge from START, found none")]
    MissingStart,

    /// More than one transition leaves START.
    #[error("graph must have exactly one edge from START, found several")]
    MultipleStart,

    /// No transition reaches END.
    #[error("graph has no transition into END")]
    MissingEnd,

    /// A conditional edge from the given node has no branches.
    #[error("conditional edge from `{0}` has an empty branch map")]
    EmptyBranchMap(String),

    /// A router is declared to return a key its branch map does not contain.
    #[error("conditional edge from `{from}` has no branch for key `{key}`")]
    UnmappedBranchKey { from: String, key: String },

    /// A node has more than one outgoing transition.
    #[error("node `{0}` has more than one outgoing transition")]
    AmbiguousTransition(String),

    /// A node has no outgoing transition.
    #[error("node `{0}` has no outgoing transition")]
    NoOutgoingTransition(String),
}
