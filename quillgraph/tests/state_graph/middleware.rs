//! Node middleware attached with `StateGraph::with_middleware`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quillgraph::{
    NextNode, NodeError, NodeMiddleware, RunState, StateGraph, StateUpdate, END, START,
};

use crate::common::{schema, visits, VisitNode};

/// Records `before:<id>` / `after:<id>` around every node.
struct Recording {
    events: Mutex<Vec<String>>,
}

#[async_trait]
impl NodeMiddleware for Recording {
    async fn around_run(
        &self,
        node_id: &str,
        state: RunState,
        inner: NextNode,
    ) -> Result<StateUpdate, NodeError> {
        self.events.lock().unwrap().push(format!("before:{}", node_id));
        let result = inner(state).await;
        self.events.lock().unwrap().push(format!("after:{}", node_id));
        result
    }
}

/// Answers for `cached` without running it.
struct ShortCircuit;

#[async_trait]
impl NodeMiddleware for ShortCircuit {
    async fn around_run(
        &self,
        node_id: &str,
        state: RunState,
        inner: NextNode,
    ) -> Result<StateUpdate, NodeError> {
        if node_id == "cached" {
            return Ok(StateUpdate::new().with("visits", "from-cache"));
        }
        inner(state).await
    }
}

/// **Scenario**: middleware wraps each node invocation in execution order.
#[tokio::test]
async fn middleware_wraps_every_node() {
    let recording = Arc::new(Recording {
        events: Mutex::new(Vec::new()),
    });
    let mut graph = StateGraph::new(schema()).with_middleware(recording.clone());
    graph
        .add_node("a", VisitNode::new("a"))
        .add_node("b", VisitNode::new("b"))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let graph = graph.compile().unwrap();

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    let out = graph.invoke(state, None).await.unwrap();

    assert_eq!(visits(&out), vec!["a", "b"]);
    assert_eq!(
        *recording.events.lock().unwrap(),
        vec!["before:a", "after:a", "before:b", "after:b"]
    );
}

/// **Scenario**: middleware may return an update without calling the node.
#[tokio::test]
async fn middleware_can_skip_node() {
    let cached = VisitNode::new("cached");
    let mut graph = StateGraph::new(schema()).with_middleware(Arc::new(ShortCircuit));
    graph
        .add_node("cached", cached.clone())
        .add_node("live", VisitNode::new("live"))
        .add_edge(START, "cached")
        .add_edge("cached", "live")
        .add_edge("live", END);
    let graph = graph.compile().unwrap();

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    let out = graph.invoke(state, None).await.unwrap();

    assert_eq!(visits(&out), vec!["from-cache", "live"]);
    assert_eq!(cached.calls(), 0);
}
