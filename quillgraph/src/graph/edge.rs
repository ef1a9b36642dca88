//! Transitions between nodes: static edges and conditional (routed) edges.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RunError;
use crate::state::RunState;

/// Closed set of keys a router can return.
///
/// Implement for a small `Copy` enum; `StateGraph::add_conditional_edges`
/// then checks at compile time that every variant has a branch.
///
/// ```
/// use quillgraph::BranchKey;
///
/// #[derive(Clone, Copy)]
/// enum AfterRefine { Refine, Seo }
///
/// impl BranchKey for AfterRefine {
///     fn variants() -> &'static [Self] { &[AfterRefine::Refine, AfterRefine::Seo] }
///     fn as_key(&self) -> &'static str {
///         match self { AfterRefine::Refine => "refine", AfterRefine::Seo => "seo" }
///     }
/// }
/// ```
pub trait BranchKey: Copy + Send + Sync + 'static {
    /// Every key the router may return.
    fn variants() -> &'static [Self];
    /// String form used in the branch map.
    fn as_key(&self) -> &'static str;
}

pub(crate) type RouterFn = Arc<dyn Fn(&RunState) -> String + Send + Sync>;

/// Router plus its branch map (key -> target node or END).
#[derive(Clone)]
pub(crate) struct ConditionalEdge {
    pub(crate) router: RouterFn,
    pub(crate) branches: BTreeMap<String, String>,
    /// Keys the router is known to return; `None` for string routers, checked at run time.
    pub(crate) declared_keys: Option<Vec<&'static str>>,
}

impl ConditionalEdge {
    /// Calls the router on the post-merge state and maps its key to a target.
    fn resolve(&self, from: &str, state: &RunState) -> Result<String, RunError> {
        let key = (self.router)(state);
        match self.branches.get(&key) {
            Some(target) => Ok(target.clone()),
            None => Err(RunError::UnknownBranchKey {
                node: from.to_string(),
                key,
            }),
        }
    }
}

impl fmt::Debug for ConditionalEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalEdge")
            .field("branches", &self.branches)
            .field("declared_keys", &self.declared_keys)
            .finish_non_exhaustive()
    }
}

/// The single outgoing transition of a node (or of START).
#[derive(Clone, Debug)]
pub(crate) enum Transition {
    Static(String),
    Conditional(ConditionalEdge),
}

impl Transition {
    /// Every node this transition can lead to.
    pub(crate) fn targets(&self) -> Vec<&str> {
        match self {
            Transition::Static(to) => vec![to.as_str()],
            Transition::Conditional(edge) => edge.branches.values().map(String::as_str).collect(),
        }
    }

    pub(crate) fn resolve(&self, from: &str, state: &RunState) -> Result<String, RunError> {
        match self {
            Transition::Static(to) => Ok(to.clone()),
            Transition::Conditional(edge) => edge.resolve(from, state),
        }
    }
}
