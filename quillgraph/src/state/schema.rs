//! State schema: declared fields, their reducers and defaults.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{Reducer, RunState, StateError, StateUpdate};

#[derive(Clone, Debug)]
struct FieldSpec {
    reducer: Reducer,
    default: Option<Value>,
}

/// Declares the fields that flow through a graph and how updates merge.
///
/// Built once per graph and shared read-only by all its runs. Updates and
/// initial values may only name declared fields.
///
/// ```
/// use quillgraph::{Reducer, StateSchema, StateUpdate};
///
/// let mut schema = StateSchema::new();
/// schema
///     .declare_field("topic", Reducer::replace())
///     .declare_field_with_default("iteration", Reducer::replace(), 0);
/// let state = schema
///     .initial_state(StateUpdate::new().with("topic", "ownership"))
///     .unwrap();
/// assert_eq!(state.get::<u32>("iteration").unwrap(), Some(0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct StateSchema {
    fields: BTreeMap<String, FieldSpec>,
}

impl StateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with `reducer`. Re-declaring a field replaces it.
    pub fn declare_field(&mut self, name: impl Into<String>, reducer: Reducer) -> &mut Self {
        self.fields.insert(
            name.into(),
            FieldSpec {
                reducer,
                default: None,
            },
        );
        self
    }

    /// Registers `name` with `reducer` and a value it holds before any update.
    pub fn declare_field_with_default(
        &mut self,
        name: impl Into<String>,
        reducer: Reducer,
        default: impl Into<Value>,
    ) -> &mut Self {
        self.fields.insert(
            name.into(),
            FieldSpec {
                reducer,
                default: Some(default.into()),
            },
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Declared field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Builds a fresh state: defaults first, then `values` set as given.
    ///
    /// Fields without a default that are not in `values` stay undefined.
    pub fn initial_state(&self, values: StateUpdate) -> Result<RunState, StateError> {
        self.check_declared(&values)?;
        let mut map: Map<String, Value> = self
            .fields
            .iter()
            .filter_map(|(name, spec)| spec.default.clone().map(|v| (name.clone(), v)))
            .collect();
        for (field, value) in values.into_entries() {
            map.insert(field, value);
        }
        Ok(RunState::from_map(map))
    }

    /// Merges `update` into `state` field by field, each through its own reducer.
    ///
    /// Either every field is merged or, when the update names an undeclared
    /// field, nothing is and `UnknownField` is returned.
    pub fn merge(&self, state: &mut RunState, update: StateUpdate) -> Result<(), StateError> {
        self.check_declared(&update)?;
        for (field, incoming) in update.into_entries() {
            let spec = self
                .fields
                .get(&field)
                .ok_or_else(|| StateError::UnknownField(field.clone()))?;
            let previous = state.take(&field);
            let merged = spec.reducer.apply(previous, incoming);
            state.insert(field, merged);
        }
        Ok(())
    }

    fn check_declared(&self, update: &StateUpdate) -> Result<(), StateError> {
        match update.fields().find(|f| !self.fields.contains_key(*f)) {
            Some(unknown) => Err(StateError::UnknownField(unknown.to_string())),
            None => Ok(()),
        }
    }
}
