//! Compile-time validation failures.

use quillgraph::{BranchKey, GraphValidationError, StateGraph, END, START};

use crate::common::{noop, schema};

#[derive(Clone, Copy)]
enum Route {
    Again,
    Done,
}

impl BranchKey for Route {
    fn variants() -> &'static [Self] {
        &[Route::Again, Route::Done]
    }

    fn as_key(&self) -> &'static str {
        match self {
            Route::Again => "again",
            Route::Done => "done",
        }
    }
}

/// **Scenario**: an edge into a node that was never added fails with NodeNotFound.
#[tokio::test]
async fn compile_fails_when_edge_targets_unknown_node() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("draft", noop())
        .add_edge(START, "draft")
        .add_edge("draft", "publish");
    match graph.compile() {
        Err(GraphValidationError::NodeNotFound(id)) => assert_eq!(id, "publish"),
        other => panic!("expected NodeNotFound(publish), got {:?}", other.err()),
    }
}

/// **Scenario**: a graph with no START transition fails with MissingStart.
#[tokio::test]
async fn compile_fails_when_start_missing() {
    let mut graph = StateGraph::new(schema());
    graph.add_node("draft", noop()).add_edge("draft", END);
    match graph.compile() {
        Err(GraphValidationError::MissingStart) => {}
        other => panic!("expected MissingStart, got {:?}", other.err()),
    }
}

/// **Scenario**: two transitions out of START fail with MultipleStart.
#[tokio::test]
async fn compile_fails_when_start_repeated() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("a", noop())
        .add_node("b", noop())
        .add_edge(START, "a")
        .add_edge(START, "b")
        .add_edge("a", END)
        .add_edge("b", END);
    match graph.compile() {
        Err(GraphValidationError::MultipleStart) => {}
        other => panic!("expected MultipleStart, got {:?}", other.err()),
    }
}

/// **Scenario**: nothing ever reaches END.
#[tokio::test]
async fn compile_fails_when_end_unreachable() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("a", noop())
        .add_node("b", noop())
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", "a");
    match graph.compile() {
        Err(GraphValidationError::MissingEnd) => {}
        other => panic!("expected MissingEnd, got {:?}", other.err()),
    }
}

/// **Scenario**: adding the same node id twice fails with DuplicateNode.
#[tokio::test]
async fn compile_fails_when_node_added_twice() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("draft", noop())
        .add_node("draft", noop())
        .add_edge(START, "draft")
        .add_edge("draft", END);
    match graph.compile() {
        Err(GraphValidationError::DuplicateNode(id)) => assert_eq!(id, "draft"),
        other => panic!("expected DuplicateNode, got {:?}", other.err()),
    }
}

/// **Scenario**: START and END cannot be used as node ids.
#[tokio::test]
async fn compile_fails_when_node_uses_reserved_name() {
    let mut graph = StateGraph::new(schema());
    graph.add_node(END, noop()).add_edge(START, END);
    match graph.compile() {
        Err(GraphValidationError::ReservedNodeName(id)) => assert_eq!(id, END),
        other => panic!("expected ReservedNodeName, got {:?}", other.err()),
    }
}

/// **Scenario**: a node with both a static and a conditional edge is ambiguous.
#[tokio::test]
async fn compile_fails_when_node_has_two_transitions() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("draft", noop())
        .add_edge(START, "draft")
        .add_edge("draft", END)
        .add_conditional_edges(
            "draft",
            |_| Route::Done,
            [(Route::Again, "draft"), (Route::Done, END)],
        );
    match graph.compile() {
        Err(GraphValidationError::AmbiguousTransition(id)) => assert_eq!(id, "draft"),
        other => panic!("expected AmbiguousTransition, got {:?}", other.err()),
    }
}

/// **Scenario**: a typed router whose variant has no branch fails with UnmappedBranchKey.
#[tokio::test]
async fn compile_fails_when_branch_key_unmapped() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("draft", noop())
        .add_edge(START, "draft")
        .add_conditional_edges("draft", |_| Route::Done, [(Route::Done, END)]);
    match graph.compile() {
        Err(GraphValidationError::UnmappedBranchKey { from, key }) => {
            assert_eq!(from, "draft");
            assert_eq!(key, "again");
        }
        other => panic!("expected UnmappedBranchKey, got {:?}", other.err()),
    }
}

/// **Scenario**: a string router with no branches fails with EmptyBranchMap.
#[tokio::test]
async fn compile_fails_when_branch_map_empty() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("draft", noop())
        .add_node("done", noop())
        .add_edge(START, "draft")
        .add_edge("done", END)
        .add_conditional_edges_by_name(
            "draft",
            |_| "x".to_string(),
            Vec::<(String, String)>::new(),
        );
    match graph.compile() {
        Err(GraphValidationError::EmptyBranchMap(id)) => assert_eq!(id, "draft"),
        other => panic!("expected EmptyBranchMap, got {:?}", other.err()),
    }
}

/// **Scenario**: a node with no outgoing transition is rejected.
#[tokio::test]
async fn compile_fails_when_node_is_dead_end() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("draft", noop())
        .add_node("orphan", noop())
        .add_edge(START, "draft")
        .add_edge("draft", END);
    match graph.compile() {
        Err(GraphValidationError::NoOutgoingTransition(id)) => assert_eq!(id, "orphan"),
        other => panic!("expected NoOutgoingTransition, got {:?}", other.err()),
    }
}

/// **Scenario**: edges out of END or into START are rejected.
#[tokio::test]
async fn compile_fails_on_edges_around_reserved_ids() {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("draft", noop())
        .add_edge(START, "draft")
        .add_edge("draft", END)
        .add_edge(END, "draft");
    assert!(matches!(
        graph.compile(),
        Err(GraphValidationError::EdgeFromEnd)
    ));

    let mut graph = StateGraph::new(schema());
    graph
        .add_node("draft", noop())
        .add_edge(START, "draft")
        .add_edge("draft", START);
    match graph.compile() {
        Err(GraphValidationError::EdgeIntoStart(from)) => assert_eq!(from, "draft"),
        other => panic!("expected EdgeIntoStart, got {:?}", other.err()),
    }
}
