//! stream(): per-node events and the terminal failure event.

use std::sync::Arc;

use quillgraph::{RunError, StateGraph, StateUpdate, StreamEvent, StreamMode, END, START};
use tokio_stream::StreamExt;

use crate::common::{schema, visits, FailingNode, VisitNode};

/// **Scenario**: with both modes each node yields Updates then Values, in execution order.
#[tokio::test]
async fn stream_emits_updates_then_values_per_node() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("a", VisitNode::new("a"))
        .add_node("b", VisitNode::new("b"))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let graph = graph.compile().unwrap();

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    let events: Vec<StreamEvent> = graph
        .stream(state, None, [StreamMode::Updates, StreamMode::Values])
        .collect()
        .await;

    assert_eq!(events.len(), 4);
    match (&events[0], &events[1], &events[2], &events[3]) {
        (
            StreamEvent::Updates { node_id: first, .. },
            StreamEvent::Values(after_a),
            StreamEvent::Updates { node_id: second, update },
            StreamEvent::Values(after_b),
        ) => {
            assert_eq!(first, "a");
            assert_eq!(second, "b");
            assert_eq!(update.get("visits"), Some(&serde_json::json!("b")));
            assert_eq!(visits(after_a), vec!["a"]);
            assert_eq!(visits(after_b), vec!["a", "b"]);
        }
        other => panic!("unexpected event order: {:?}", other),
    }
}

/// **Scenario**: a failing run ends the stream with a single Failed event.
#[tokio::test]
async fn stream_ends_with_failed() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("a", VisitNode::new("a"))
        .add_node("boom", Arc::new(FailingNode { external: false }))
        .add_edge(START, "a")
        .add_edge("a", "boom")
        .add_edge("boom", END);
    let graph = graph.compile().unwrap();

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    let events: Vec<StreamEvent> = graph
        .stream(state, None, [StreamMode::Updates])
        .collect()
        .await;

    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], StreamEvent::Updates { node_id, .. } if node_id == "a"));
    match events.last() {
        Some(StreamEvent::Failed(RunError::Node { node, .. })) => assert_eq!(node, "boom"),
        other => panic!("expected Failed last, got {:?}", other),
    }
}
