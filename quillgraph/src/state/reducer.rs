//! Field reducers: combine a field's previous value with an incoming one.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

type ReduceFn = dyn Fn(Option<Value>, Value) -> Value + Send + Sync;

/// Combines `(previous, incoming)` into the field's new value.
///
/// `previous` is `None` when the field is still undefined. Reducers are cheap
/// to clone and shared by every run of a compiled graph.
#[derive(Clone)]
pub struct Reducer {
    name: &'static str,
    f: Arc<ReduceFn>,
}

impl Reducer {
    /// Last write wins. This is the default for every field.
    ///
    /// Counters use this too: the node writes `prev + 1` itself.
    pub fn replace() -> Self {
        Self {
            name: "replace",
            f: Arc::new(|_, next| next),
        }
    }

    /// Sequence concatenation: arrays are appended, a single value is pushed.
    pub fn append() -> Self {
        Self {
            name: "append",
            f: Arc::new(|prev, next| {
                let mut items = match prev {
                    Some(Value::Array(items)) => items,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => vec![other],
                };
                match next {
                    Value::Array(more) => items.extend(more),
                    other => items.push(other),
                }
                Value::Array(items)
            }),
        }
    }

    /// Custom reducer.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<Value>, Value) -> Value + Send + Sync + 'static,
    {
        Self {
            name: "custom",
            f: Arc::new(f),
        }
    }

    pub fn apply(&self, previous: Option<Value>, incoming: Value) -> Value {
        (self.f)(previous, incoming)
    }
}

impl Default for Reducer {
    fn default() -> Self {
        Self::replace()
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reducer").field(&self.name).finish()
    }
}
