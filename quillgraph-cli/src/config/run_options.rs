//! Optional overrides for a run (CLI flags or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options). Callers
//! build a `RunOptions` and apply it on top of the env-based config.

/// Optional overrides: temperature, step ceiling, loop iterations, verbosity.
///
/// Only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Force a sampling temperature (0–2) on every LLM call.
    pub temperature: Option<f32>,
    /// Per-run step ceiling.
    pub max_steps: Option<usize>,
    /// Critic / refine cycles of the looping pipelines.
    pub max_iterations: Option<u32>,
    /// Debug logs plus node enter/exit logging.
    pub verbose: bool,
}
