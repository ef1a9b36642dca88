//! Node middleware for CLI runs.
//!
//! Re-exports [`LoggingMiddleware`].

mod logging;

pub use logging::LoggingMiddleware;
