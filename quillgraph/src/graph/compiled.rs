//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Holds the node table, one transition per
//! node (plus START), the state schema, optional middleware and the step
//! ceiling. Cloning is cheap; clones share everything and may run concurrently.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use crate::error::{NodeError, RunError};
use crate::state::{RunState, StateSchema, StateUpdate};
use crate::stream::{StreamEvent, StreamMode};

use super::edge::Transition;
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_state_update,
};
use super::node_middleware::{NextNode, NodeFuture, NodeMiddleware};
use super::run_context::RunContext;
use super::{Node, RunnableConfig, END, START};

/// Compiled graph: immutable structure, supports invoke and stream.
///
/// Created by `StateGraph::compile()`. A run starts at START's transition and
/// follows one transition per step: run the node, merge its update through
/// the schema, then resolve the node's outgoing edge on the merged state.
/// The run ends when END is reached.
#[derive(Clone)]
pub struct CompiledStateGraph {
    pub(super) schema: Arc<StateSchema>,
    pub(super) nodes: Arc<HashMap<String, Arc<dyn Node>>>,
    pub(super) transitions: Arc<HashMap<String, Transition>>,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware>>,
    pub(super) max_steps: usize,
}

impl CompiledStateGraph {
    pub fn schema(&self) -> &StateSchema {
        &self.schema
    }

    /// Returns a copy that runs every node through `middleware`, replacing any set before.
    pub fn with_middleware(mut self, middleware: Arc<dyn NodeMiddleware>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    /// Step ceiling used when the run config does not override it.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Builds the initial state from schema defaults plus `values`.
    pub fn initial_state(&self, values: StateUpdate) -> Result<RunState, RunError> {
        self.schema
            .initial_state(values)
            .map_err(RunError::InvalidInput)
    }

    fn run_span(config: &RunnableConfig) -> tracing::Span {
        let run_name = config.run_name.as_deref().unwrap_or("graph");
        tracing::info_span!("graph_run", run_name)
    }

    fn next_after(&self, from: &str, state: &RunState) -> Result<String, RunError> {
        self.transitions
            .get(from)
            .expect("compiled graph has a transition for every node")
            .resolve(from, state)
    }

    /// Runs one node on a snapshot, through the middleware when set.
    async fn run_node(&self, node_id: &str, state: RunState) -> Result<StateUpdate, NodeError> {
        let node = self
            .nodes
            .get(node_id)
            .expect("compiled graph has all nodes")
            .clone();
        match &self.middleware {
            Some(middleware) => {
                let inner: NextNode = Box::new(move |s: RunState| -> NodeFuture {
                    Box::pin(async move { node.run(&s).await })
                });
                middleware.around_run(node_id, state, inner).await
            }
            None => node.run(&state).await,
        }
    }

    /// Steps through nodes until END; returns the number of node invocations.
    async fn run_steps(&self, state: &mut RunState, ctx: &RunContext) -> Result<usize, RunError> {
        let limit = ctx.config.max_steps.unwrap_or(self.max_steps);
        let mut steps = 0;
        let mut current = self.next_after(START, state)?;

        while current != END {
            if steps >= limit {
                return Err(RunError::MaxStepsExceeded { limit });
            }
            steps += 1;
            log_node_start(&current, steps);

            let update = self
                .run_node(&current, state.clone())
                .await
                .map_err(|source| RunError::Node {
                    node: current.clone(),
                    source,
                })?;

            if ctx.wants(StreamMode::Updates) {
                ctx.emit(StreamEvent::Updates {
                    node_id: current.clone(),
                    update: update.clone(),
                })
                .await;
            }

            let fields = update.len();
            self.schema
                .merge(state, update)
                .map_err(|source| RunError::InvalidUpdate {
                    node: current.clone(),
                    source,
                })?;
            log_state_update(&current, fields);

            if ctx.wants(StreamMode::Values) {
                ctx.emit(StreamEvent::Values(state.clone())).await;
            }

            let next = self.next_after(&current, state)?;
            log_node_complete(&current, &next);
            current = next;
        }
        Ok(steps)
    }

    /// Shared run loop used by invoke() and stream().
    async fn run_loop_inner(&self, state: RunState, ctx: &RunContext) -> Result<RunState, RunError> {
        let mut state = state;
        log_graph_start(ctx.config.max_steps.unwrap_or(self.max_steps));
        match self.run_steps(&mut state, ctx).await {
            Ok(steps) => {
                log_graph_complete(steps);
                Ok(state)
            }
            Err(e) => {
                log_graph_error(&e);
                Err(e)
            }
        }
    }

    /// Runs the graph from START to END and returns the final state.
    ///
    /// Any node failure, unknown branch key, rejected update or step-ceiling
    /// breach aborts the run; no partial state is returned. Pass `None` for
    /// config to use the graph's defaults.
    pub async fn invoke(
        &self,
        state: RunState,
        config: Option<RunnableConfig>,
    ) -> Result<RunState, RunError> {
        let ctx = RunContext::new(config.unwrap_or_default());
        let span = Self::run_span(&ctx.config);
        self.run_loop_inner(state, &ctx).instrument(span).await
    }

    /// Streams graph execution, emitting events via channel-backed Stream.
    ///
    /// Events for the selected modes are sent after each node; a failed run
    /// ends with a single `StreamEvent::Failed` whatever the modes.
    pub fn stream(
        &self,
        state: RunState,
        config: Option<RunnableConfig>,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let ctx = RunContext::streaming(config.unwrap_or_default(), tx, stream_mode.into());
        let span = Self::run_span(&ctx.config);

        tokio::spawn(
            async move {
                if let Err(e) = graph.run_loop_inner(state, &ctx).await {
                    ctx.emit(StreamEvent::Failed(e)).await;
                }
            }
            .instrument(span),
        );

        ReceiverStream::new(rx)
    }
}
