//! Per-run configuration passed to `CompiledStateGraph::invoke` / `stream`.

/// Step ceiling used when neither the graph nor the run sets one.
pub const DEFAULT_MAX_STEPS: usize = 25;

/// Config for a single run.
///
/// **Interaction**: Passed to `CompiledStateGraph::invoke(state, config)`;
/// `None` means defaults.
#[derive(Debug, Clone, Default)]
pub struct RunnableConfig {
    /// Overrides the graph's step ceiling for this run.
    pub max_steps: Option<usize>,
    /// Name recorded on the run's tracing span.
    pub run_name: Option<String>,
}

impl RunnableConfig {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_run_name(mut self, name: impl Into<String>) -> Self {
        self.run_name = Some(name.into());
        self
    }
}
