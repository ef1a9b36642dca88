//! Conditional edges: typed and string routers, bounded loops, unknown keys.

use std::sync::{Arc, Mutex};

use quillgraph::{
    node_fn, BranchKey, NodeError, RunError, RunState, StateGraph, StateUpdate, END, START,
};

use crate::common::{schema, visits, VisitNode};

#[derive(Clone, Copy)]
enum Loop {
    Again,
    Done,
}

impl BranchKey for Loop {
    fn variants() -> &'static [Self] {
        &[Loop::Again, Loop::Done]
    }

    fn as_key(&self) -> &'static str {
        match self {
            Loop::Again => "again",
            Loop::Done => "done",
        }
    }
}

fn count(state: &RunState) -> i64 {
    state.get("count").ok().flatten().unwrap_or(0)
}

/// Graph: START -> work, then work loops while `keep_going(count)` holds.
fn looping_graph(
    work: Arc<VisitNode>,
    keep_going: impl Fn(i64) -> bool + Send + Sync + 'static,
) -> quillgraph::CompiledStateGraph {
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("work", work)
        .add_edge(START, "work")
        .add_conditional_edges(
            "work",
            move |state| {
                if keep_going(count(state)) {
                    Loop::Again
                } else {
                    Loop::Done
                }
            },
            [(Loop::Again, "work"), (Loop::Done, END)],
        );
    graph.compile().unwrap()
}

/// **Scenario**: a `counter <= N` router loops back N times, so the node runs N+1 times.
#[tokio::test]
async fn inclusive_bound_runs_n_plus_one_times() {
    for n in [0_i64, 1, 3] {
        let work = VisitNode::new("work");
        let graph = looping_graph(work.clone(), move |c| c <= n);
        let state = graph.initial_state(StateUpdate::new()).unwrap();
        let out = graph.invoke(state, None).await.unwrap();
        assert_eq!(work.calls() as i64, n + 1, "n = {}", n);
        assert_eq!(visits(&out).len() as i64, n + 1);
    }
}

/// **Scenario**: a `counter < N` router runs the node max(N, 1) times.
#[tokio::test]
async fn exclusive_bound_runs_at_least_once() {
    for (n, expected) in [(0_i64, 1_usize), (1, 1), (3, 3)] {
        let work = VisitNode::new("work");
        let graph = looping_graph(work.clone(), move |c| c < n);
        let state = graph.initial_state(StateUpdate::new()).unwrap();
        graph.invoke(state, None).await.unwrap();
        assert_eq!(work.calls(), expected, "n = {}", n);
    }
}

/// **Scenario**: a string router returning a key outside its map fails the run.
#[tokio::test]
async fn unknown_string_key_fails_run() {
    let next = VisitNode::new("next");
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("work", VisitNode::new("work"))
        .add_node("next", next.clone())
        .add_edge(START, "work")
        .add_edge("next", END)
        .add_conditional_edges_by_name(
            "work",
            |_| "sideways".to_string(),
            [("forward", "next"), ("stop", END)],
        );
    let graph = graph.compile().unwrap();

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    match graph.invoke(state, None).await {
        Err(RunError::UnknownBranchKey { node, key }) => {
            assert_eq!(node, "work");
            assert_eq!(key, "sideways");
        }
        other => panic!("expected UnknownBranchKey, got {:?}", other),
    }
    assert_eq!(next.calls(), 0);
}

/// **Scenario**: START itself can route on the initial state.
#[tokio::test]
async fn conditional_entry_routes_on_initial_state() {
    let build = || {
        let mut graph = StateGraph::new(schema());
        graph
            .add_node("short", VisitNode::new("short"))
            .add_node("long", VisitNode::new("long"))
            .add_edge("short", END)
            .add_edge("long", END)
            .add_conditional_edges_by_name(
                START,
                |state| {
                    let topic: String = state.get("topic").ok().flatten().unwrap_or_default();
                    if topic.len() > 5 {
                        "long".to_string()
                    } else {
                        "short".to_string()
                    }
                },
                [("long", "long"), ("short", "short")],
            );
        graph.compile().unwrap()
    };

    let graph = build();
    let out = graph
        .invoke(
            graph
                .initial_state(StateUpdate::new().with("topic", "async rust"))
                .unwrap(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(visits(&out), vec!["long"]);

    let out = graph
        .invoke(
            graph
                .initial_state(StateUpdate::new().with("topic", "io"))
                .unwrap(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(visits(&out), vec!["short"]);
}

/// **Scenario**: a branch straight to END skips the remaining nodes.
#[tokio::test]
async fn branch_to_end_skips_rest() {
    let check = VisitNode::new("check");
    let detail = VisitNode::new("detail");
    let mut graph = StateGraph::new(schema());
    graph
        .add_node("check", check.clone())
        .add_node("detail", detail.clone())
        .add_edge(START, "check")
        .add_edge("detail", END)
        .add_conditional_edges(
            "check",
            |_| Loop::Done,
            [(Loop::Again, "detail"), (Loop::Done, END)],
        );
    let graph = graph.compile().unwrap();

    let state = graph.initial_state(StateUpdate::new()).unwrap();
    let out = graph.invoke(state, None).await.unwrap();
    assert_eq!(visits(&out), vec!["check"]);
    assert_eq!(detail.calls(), 0);
}

/// **Scenario**: the router sees the state after the node's update is merged.
#[tokio::test]
async fn router_sees_merged_state() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_router = seen.clone();
    let mut graph = StateGraph::new(schema());
    graph
        .add_node(
            "set",
            node_fn(|_| async {
                Ok::<_, NodeError>(StateUpdate::new().with("topic", "merged").with("count", 7))
            }),
        )
        .add_edge(START, "set")
        .add_conditional_edges(
            "set",
            move |state| {
                seen_by_router
                    .lock()
                    .unwrap()
                    .push((state.get::<String>("topic").ok().flatten(), count(state)));
                Loop::Done
            },
            [(Loop::Again, "set"), (Loop::Done, END)],
        );
    let graph = graph.compile().unwrap();

    let state = graph
        .initial_state(StateUpdate::new().with("topic", "initial"))
        .unwrap();
    graph.invoke(state, None).await.unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(Some("merged".to_string()), 7)]
    );
}
