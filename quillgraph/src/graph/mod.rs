//! State graph: nodes + static and conditional edges, compile, then invoke.
//!
//! Build a [`StateGraph`] over a [`StateSchema`](crate::StateSchema), add nodes
//! and edges between `START` and `END`, compile to a [`CompiledStateGraph`]
//! and invoke or stream it with an initial state.

mod compile_error;
mod compiled;
mod config;
mod edge;
mod logging;
mod node;
mod node_middleware;
mod run_context;
mod state_graph;

pub use compile_error::GraphValidationError;
pub use compiled::CompiledStateGraph;
pub use config::{RunnableConfig, DEFAULT_MAX_STEPS};
pub use edge::BranchKey;
pub use node::{node_fn, FnNode, Node};
pub use node_middleware::{NextNode, NodeFuture, NodeMiddleware};
pub use state_graph::{StateGraph, END, START};
