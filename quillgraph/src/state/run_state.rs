//! Read-only view of a run's state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::StateError;

/// State of one run. Created per invocation and owned by the engine.
///
/// Nodes and routers only ever see `&RunState`; all changes go through
/// [`StateSchema::merge`](super::StateSchema::merge). A field that was never
/// set is undefined: [`get`](Self::get) returns `Ok(None)` for it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RunState {
    values: Map<String, Value>,
}

impl RunState {
    pub(crate) fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Decodes `field` into `T`. Undefined and `null` fields give `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, StateError> {
        match self.values.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|source| StateError::Decode {
                    field: field.to_string(),
                    source,
                }),
        }
    }

    /// Like [`get`](Self::get) but an undefined field is an error.
    pub fn require<T: DeserializeOwned>(&self, field: &str) -> Result<T, StateError> {
        self.get(field)?
            .ok_or_else(|| StateError::MissingField(field.to_string()))
    }

    pub fn get_value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    pub(crate) fn take(&mut self, field: &str) -> Option<Value> {
        self.values.remove(field)
    }

    pub(crate) fn insert(&mut self, field: String, value: Value) {
        self.values.insert(field, value);
    }
}
