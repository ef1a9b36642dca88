//! invoke(): linear runs, merge rules, failures and concurrent runs.

use std::sync::Arc;
use std::time::Duration;

use quillgraph::{
    node_fn, NodeError, RunError, RunnableConfig, StateError, StateGraph, StateUpdate,
    DEFAULT_MAX_STEPS, END, START,
};

use crate::common::{schema, visits, FailingNode, VisitNode};

/// **Scenario**: an acyclic graph visits each node once, in edge order.
#[tokio::test]
async fn acyclic_graph_visits_each_node_once() {
    let (a, b, c) = (VisitNode::new("a"), VisitNode::new("b"), VisitNode::new("c"));
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("a", a.clone())
        .add_node("b", b.clone())
        .add_node("c", c.clone())
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", "c")
        .add_edge("c", END);
    let graph = graph.compile().unwrap();

    let state = graph
        .initial_state(StateUpdate::new().with("topic", "rust"))
        .unwrap();
    let out = graph.invoke(state, None).await.unwrap();

    assert_eq!(visits(&out), vec!["a", "b", "c"]);
    assert_eq!(out.get::<i64>("count").unwrap(), Some(3));
    assert_eq!(out.get::<String>("topic").unwrap().as_deref(), Some("rust"));
    assert_eq!((a.calls(), b.calls(), c.calls()), (1, 1, 1));
}

/// **Scenario**: a node returning an empty update leaves the state unchanged.
#[tokio::test]
async fn empty_update_is_identity() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("noop", crate::common::noop())
        .add_edge(START, "noop")
        .add_edge("noop", END);
    let graph = graph.compile().unwrap();

    let state = graph
        .initial_state(StateUpdate::new().with("topic", "rust").with("count", 4))
        .unwrap();
    let out = graph.invoke(state.clone(), None).await.unwrap();
    assert_eq!(out, state);
}

/// **Scenario**: a failing node aborts the run and later nodes never execute.
#[tokio::test]
async fn node_failure_stops_run() {
    let after = VisitNode::new("after");
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("fail", Arc::new(FailingNode { external: true }))
        .add_node("after", after.clone())
        .add_edge(START, "fail")
        .add_edge("fail", "after")
        .add_edge("after", END);
    let graph = graph.compile().unwrap();

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    let err = graph.invoke(state, None).await.unwrap_err();
    match &err {
        RunError::Node { node, source } => {
            assert_eq!(node, "fail");
            assert!(matches!(source, NodeError::ExternalCallFailure(_)));
        }
        other => panic!("expected node failure, got {:?}", other),
    }
    assert_eq!(after.calls(), 0);
}

/// **Scenario**: initial values naming an undeclared field are InvalidInput.
#[tokio::test]
async fn undeclared_initial_field_is_invalid_input() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("a", VisitNode::new("a"))
        .add_edge(START, "a")
        .add_edge("a", END);
    let graph = graph.compile().unwrap();

    match graph.initial_state(StateUpdate::new().with("title", "x")) {
        Err(RunError::InvalidInput(StateError::UnknownField(field))) => assert_eq!(field, "title"),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}

/// **Scenario**: an update with one bad field is rejected whole.
#[tokio::test]
async fn invalid_update_rejected_atomically() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node(
            "bad",
            node_fn(|_| async {
                Ok::<_, NodeError>(StateUpdate::new().with("count", 99).with("extra", true))
            }),
        )
        .add_edge(START, "bad")
        .add_edge("bad", END);
    let graph = graph.compile().unwrap();

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    match graph.invoke(state, None).await {
        Err(RunError::InvalidUpdate { node, source }) => {
            assert_eq!(node, "bad");
            assert!(matches!(source, StateError::UnknownField(ref f) if f == "extra"));
        }
        other => panic!("expected InvalidUpdate, got {:?}", other),
    }
}

/// **Scenario**: a cycle with no exit hits the default ceiling after exactly 25 invocations.
#[tokio::test]
async fn endless_cycle_exceeds_max_steps() {
    let spin = VisitNode::new("spin");
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("spin", spin.clone())
        .add_edge(START, "spin")
        .add_conditional_edges_by_name(
            "spin",
            |_| "again".to_string(),
            [("again", "spin"), ("done", END)],
        );
    let graph = graph.compile().unwrap();

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    match graph.invoke(state, None).await {
        Err(RunError::MaxStepsExceeded { limit }) => assert_eq!(limit, DEFAULT_MAX_STEPS),
        other => panic!("expected MaxStepsExceeded, got {:?}", other),
    }
    assert_eq!(spin.calls(), DEFAULT_MAX_STEPS);
}

/// **Scenario**: the graph-level ceiling applies unless the run overrides it.
#[tokio::test]
async fn graph_and_run_step_ceilings() {
    let spin = VisitNode::new("spin");
    let mut graph = StateGraph::new(schema()).with_max_steps(5);
    graph
        .add_node("spin", spin.clone())
        .add_edge(START, "spin")
        .add_conditional_edges_by_name(
            "spin",
            |state| {
                let count: i64 = state.get("count").ok().flatten().unwrap_or(0);
                (if count < 8 { "again" } else { "done" }).to_string()
            },
            [("again", "spin"), ("done", END)],
        );
    let graph = graph.compile().unwrap();
    assert_eq!(graph.max_steps(), 5);

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    assert!(matches!(
        graph.invoke(state.clone(), None).await,
        Err(RunError::MaxStepsExceeded { limit: 5 })
    ));

    let out = graph
        .invoke(state, Some(RunnableConfig::default().with_max_steps(10)))
        .await
        .unwrap();
    assert_eq!(out.get::<i64>("count").unwrap(), Some(8));
}

/// **Scenario**: concurrent runs on one compiled graph keep separate state.
#[tokio::test]
async fn concurrent_runs_are_isolated() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("a", VisitNode::slow("a", Duration::from_millis(20)))
        .add_node("b", VisitNode::slow("b", Duration::from_millis(5)))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let graph = graph.compile().unwrap();

    let first = graph
        .initial_state(StateUpdate::new().with("topic", "first").with("count", 10))
        .unwrap();
    let second = graph
        .initial_state(StateUpdate::new().with("topic", "second"))
        .unwrap();
    let (first, second) = tokio::join!(graph.invoke(first, None), graph.invoke(second, None));
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!(first.get::<i64>("count").unwrap(), Some(12));
    assert_eq!(second.get::<i64>("count").unwrap(), Some(2));
    assert_eq!(first.get::<String>("topic").unwrap().as_deref(), Some("first"));
    assert_eq!(second.get::<String>("topic").unwrap().as_deref(), Some("second"));
    assert_eq!(visits(&first), vec!["a", "b"]);
    assert_eq!(visits(&second), vec!["a", "b"]);
}

/// **Scenario**: wrapping invoke in a timeout abandons a slow run.
#[tokio::test]
async fn caller_timeout_abandons_run() {
    let slow = VisitNode::slow("slow", Duration::from_secs(5));
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("slow", slow.clone())
        .add_edge(START, "slow")
        .add_edge("slow", END);
    let graph = graph.compile().unwrap();

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    let result =
        tokio::time::timeout(Duration::from_millis(20), graph.invoke(state, None)).await;
    assert!(result.is_err());
    assert_eq!(slow.calls(), 1);
}
