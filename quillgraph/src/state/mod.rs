//! Run state: the object threaded through one graph run, and the schema that
//! says how a node's partial update is merged into it.
//!
//! State is a map of field name to JSON value. A [`StateSchema`] declares every
//! field together with its [`Reducer`]; nodes read a [`RunState`] snapshot and
//! return a [`StateUpdate`] holding only the fields they change.

mod reducer;
mod run_state;
mod schema;
mod update;

pub use reducer::Reducer;
pub use run_state::RunState;
pub use schema::StateSchema;
pub use update::StateUpdate;

use thiserror::Error;

/// Error reading, building or merging state.
#[derive(Debug, Error)]
pub enum StateError {
    /// The field is not declared in the graph's state schema.
    #[error("field not declared in state schema: {0}")]
    UnknownField(String),

    /// A field the caller requires has no value yet.
    #[error("required field is not set: {0}")]
    MissingField(String),

    /// The stored value does not deserialize into the requested type.
    #[error("field `{field}` does not match the expected type: {source}")]
    Decode {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized into JSON for an update.
    #[error("value for field `{field}` could not be serialized: {source}")]
    Encode {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}
