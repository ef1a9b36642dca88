//! Shared schema and nodes for state graph integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quillgraph::{Node, NodeError, Reducer, RunState, StateSchema, StateUpdate};

/// Fields: `count` (replace, default 0), `visits` (append), `topic` (replace).
pub fn schema() -> StateSchema {
    let mut schema = StateSchema::new();
    schema
        .declare_field_with_default("count", Reducer::replace(), 0)
        .declare_field("visits", Reducer::append())
        .declare_field("topic", Reducer::replace());
    schema
}

/// Appends its name to `visits`, bumps `count`, and counts its own invocations.
pub struct VisitNode {
    name: &'static str,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl VisitNode {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            calls: AtomicUsize::new(0),
            delay: None,
        })
    }

    /// Sleeps before answering so concurrent runs interleave.
    pub fn slow(name: &'static str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            calls: AtomicUsize::new(0),
            delay: Some(delay),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Node for VisitNode {
    async fn run(&self, state: &RunState) -> Result<StateUpdate, NodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let count: i64 = state.require("count")?;
        Ok(StateUpdate::new()
            .with("visits", self.name)
            .with("count", count + 1))
    }
}

/// Always fails with the given error kind.
pub struct FailingNode {
    pub external: bool,
}

#[async_trait]
impl Node for FailingNode {
    async fn run(&self, _state: &RunState) -> Result<StateUpdate, NodeError> {
        if self.external {
            Err(NodeError::ExternalCallFailure("service unavailable".into()))
        } else {
            Err(NodeError::NodeLogicFailure("could not parse".into()))
        }
    }
}

/// `visits` of a state as owned strings.
pub fn visits(state: &RunState) -> Vec<String> {
    state
        .get::<Vec<String>>("visits")
        .expect("visits is a string list")
        .unwrap_or_default()
}

/// Node that returns an empty update.
pub fn noop() -> Arc<dyn Node> {
    quillgraph::node_fn(|_state| async { Ok::<_, NodeError>(StateUpdate::new()) })
}
