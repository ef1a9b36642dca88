//! Partial state update returned by a node.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StateError;

/// Fields a node wants to change. Fields left out keep their current value.
///
/// Built with [`with`](Self::with) for values that convert into JSON directly,
/// or [`try_with`](Self::try_with) for any `Serialize` type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateUpdate(Map<String, Value>);

impl StateUpdate {
    /// Empty update; merging it changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field` to `value`.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Sets `field` to the JSON form of `value`.
    pub fn try_with<T>(mut self, field: impl Into<String>, value: &T) -> Result<Self, StateError>
    where
        T: Serialize + ?Sized,
    {
        let field = field.into();
        let value =
            serde_json::to_value(value).map_err(|source| StateError::Encode {
                field: field.clone(),
                source,
            })?;
        self.0.insert(field, value);
        Ok(self)
    }

    /// In-place variant of [`with`](Self::with).
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Names of the fields this update touches.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, Value)> {
        self.0.into_iter()
    }
}

impl From<Map<String, Value>> for StateUpdate {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
