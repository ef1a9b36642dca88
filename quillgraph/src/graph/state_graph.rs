//! State graph builder: nodes + static and conditional edges.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` and
//! `add_conditional_edges`, using `START` and `END` for entry and exit, then
//! `compile` to get an immutable, validated `CompiledStateGraph`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::graph::compile_error::GraphValidationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::config::DEFAULT_MAX_STEPS;
use crate::graph::edge::{BranchKey, ConditionalEdge, Transition};
use crate::graph::node::Node;
use crate::graph::node_middleware::NodeMiddleware;
use crate::state::{RunState, StateSchema};

/// Sentinel for graph entry: use as `from` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to` in `add_edge(last_node_id, END)` or as a branch target.
pub const END: &str = "__end__";

/// Mutable graph definition; frozen by [`compile`](Self::compile).
///
/// **Interaction**: Accepts `Arc<dyn Node>` and routers; produces
/// `CompiledStateGraph`. Middleware and the step ceiling are optional and
/// carried into the compiled graph.
pub struct StateGraph {
    schema: StateSchema,
    nodes: Vec<(String, Arc<dyn Node>)>,
    edges: Vec<(String, String)>,
    conditional_edges: Vec<(String, ConditionalEdge)>,
    middleware: Option<Arc<dyn NodeMiddleware>>,
    max_steps: usize,
}

impl StateGraph {
    /// Creates an empty graph over `schema`.
    pub fn new(schema: StateSchema) -> Self {
        Self {
            schema,
            nodes: Vec::new(),
            edges: Vec::new(),
            conditional_edges: Vec::new(),
            middleware: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Wraps every node invocation of the compiled graph with `middleware`.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Sets the ceiling on node invocations per run (default [`DEFAULT_MAX_STEPS`]).
    pub fn with_max_steps(self, max_steps: usize) -> Self {
        Self { max_steps, ..self }
    }

    /// Adds a node. Ids must be unique; duplicates are reported by `compile`.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node>) -> &mut Self {
        self.nodes.push((id.into(), node));
        self
    }

    /// Adds a static edge from `from` to `to`.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Adds a conditional edge whose router returns a [`BranchKey`].
    ///
    /// Every variant of `K` must appear in `branches`; this is checked by
    /// `compile`. Targets are node ids or `END`.
    pub fn add_conditional_edges<K, R, I, T>(
        &mut self,
        from: impl Into<String>,
        router: R,
        branches: I,
    ) -> &mut Self
    where
        K: BranchKey,
        R: Fn(&RunState) -> K + Send + Sync + 'static,
        I: IntoIterator<Item = (K, T)>,
        T: Into<String>,
    {
        let branches = branches
            .into_iter()
            .map(|(key, target)| (key.as_key().to_string(), target.into()))
            .collect();
        let edge = ConditionalEdge {
            router: Arc::new(move |state: &RunState| router(state).as_key().to_string()),
            branches,
            declared_keys: Some(K::variants().iter().map(BranchKey::as_key).collect()),
        };
        self.conditional_edges.push((from.into(), edge));
        self
    }

    /// Adds a conditional edge whose router returns a free-form string key.
    ///
    /// Keys cannot be checked ahead of time; a key missing from `branches`
    /// fails the run with `RunError::UnknownBranchKey`.
    pub fn add_conditional_edges_by_name<R, I, B, T>(
        &mut self,
        from: impl Into<String>,
        router: R,
        branches: I,
    ) -> &mut Self
    where
        R: Fn(&RunState) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = (B, T)>,
        B: Into<String>,
        T: Into<String>,
    {
        let branches: BTreeMap<String, String> = branches
            .into_iter()
            .map(|(key, target)| (key.into(), target.into()))
            .collect();
        let edge = ConditionalEdge {
            router: Arc::new(router),
            branches,
            declared_keys: None,
        };
        self.conditional_edges.push((from.into(), edge));
        self
    }

    /// Validates the definition and freezes it.
    ///
    /// Returns `GraphValidationError` for duplicate or reserved node ids,
    /// dangling edges, a missing or repeated START transition, no transition
    /// into END, empty branch maps, unmapped router keys, and nodes without
    /// exactly one outgoing transition.
    pub fn compile(self) -> Result<CompiledStateGraph, GraphValidationError> {
        let mut nodes: HashMap<String, Arc<dyn Node>> = HashMap::new();
        for (id, node) in self.nodes {
            if id == START || id == END {
                return Err(GraphValidationError::ReservedNodeName(id));
            }
            if nodes.contains_key(&id) {
                return Err(GraphValidationError::DuplicateNode(id));
            }
            nodes.insert(id, node);
        }

        let static_edges = self
            .edges
            .into_iter()
            .map(|(from, to)| (from, Transition::Static(to)));
        let conditional_edges = self
            .conditional_edges
            .into_iter()
            .map(|(from, edge)| (from, Transition::Conditional(edge)));

        let mut transitions: HashMap<String, Transition> = HashMap::new();
        for (from, transition) in static_edges.chain(conditional_edges) {
            if from == END {
                return Err(GraphValidationError::EdgeFromEnd);
            }
            if from != START && !nodes.contains_key(&from) {
                return Err(GraphValidationError::NodeNotFound(from));
            }
            if let Transition::Conditional(edge) = &transition {
                if edge.branches.is_empty() {
                    return Err(GraphValidationError::EmptyBranchMap(from));
                }
                if let Some(keys) = &edge.declared_keys {
                    if let Some(key) = keys.iter().find(|k| !edge.branches.contains_key(**k)) {
                        return Err(GraphValidationError::UnmappedBranchKey {
                            from,
                            key: key.to_string(),
                        });
                    }
                }
            }
            for target in transition.targets() {
                if target == START {
                    return Err(GraphValidationError::EdgeIntoStart(from));
                }
                if target != END && !nodes.contains_key(target) {
                    return Err(GraphValidationError::NodeNotFound(target.to_string()));
                }
            }
            if transitions.contains_key(&from) {
                return Err(if from == START {
                    GraphValidationError::MultipleStart
                } else {
                    GraphValidationError::AmbiguousTransition(from)
                });
            }
            transitions.insert(from, transition);
        }

        if !transitions.contains_key(START) {
            return Err(GraphValidationError::MissingStart);
        }
        if !transitions.values().any(|t| t.targets().contains(&END)) {
            return Err(GraphValidationError::MissingEnd);
        }
        let mut dead_ends: Vec<&String> = nodes
            .keys()
            .filter(|id| !transitions.contains_key(*id))
            .collect();
        dead_ends.sort();
        if let Some(id) = dead_ends.first() {
            return Err(GraphValidationError::NoOutgoingTransition((*id).clone()));
        }

        Ok(CompiledStateGraph {
            schema: Arc::new(self.schema),
            nodes: Arc::new(nodes),
            transitions: Arc::new(transitions),
            middleware: self.middleware,
            max_steps: self.max_steps,
        })
    }
}
