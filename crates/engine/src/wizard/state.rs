//! Collected wizard values and the read-only view binders evaluate against.

use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::WizardError;

/// Field name to value map accumulated while a wizard runs.
///
/// Values are stored as JSON so fields of different types can share one
/// record; [`StateView`] and [`WizardState::decode`] read them back as typed
/// values. An absent entry means the field is unresolved or was skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WizardState {
    values: IndexMap<String, Value>,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value before the wizard runs. Seeded fields are never prompted.
    ///
    /// # Errors
    /// Returns [`WizardError::InvalidValue`] when `value` cannot be represented as JSON.
    pub fn with<T: Serialize>(mut self, field: &str, value: T) -> Result<Self, WizardError> {
        let encoded = serde_json::to_value(value).map_err(|error| WizardError::InvalidValue {
            field: field.to_string(),
            message: error.to_string(),
        })?;
        self.values.insert(field.to_string(), encoded);
        Ok(self)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.values.shift_remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
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

    /// Decode a field into `T`, or `None` when absent.
    pub fn decode<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, WizardError> {
        self.values.get(field).map(|value| decode_value(field, value)).transpose()
    }

    /// Decode a field that must be present.
    pub fn require<T: DeserializeOwned>(&self, field: &str) -> Result<T, WizardError> {
        self.decode(field)?.ok_or_else(|| WizardError::InvalidValue {
            field: field.to_string(),
            message: "value is missing".into(),
        })
    }

    pub fn into_values(self) -> IndexMap<String, Value> {
        self.values
    }
}

fn decode_value<T: DeserializeOwned>(field: &str, value: &Value) -> Result<T, WizardError> {
    T::deserialize(value).map_err(|error| WizardError::InvalidValue {
        field: field.to_string(),
        message: error.to_string(),
    })
}

/// Snapshot handed to a field's binder.
///
/// Reads are restricted to the dependencies the field declared, so a binder
/// cannot quietly observe a value it is not re-evaluated for on back
/// navigation.
pub struct StateView<'a> {
    field: &'a str,
    depends_on: &'a [String],
    state: &'a WizardState,
}

impl<'a> StateView<'a> {
    pub(crate) fn new(field: &'a str, depends_on: &'a [String], state: &'a WizardState) -> Self {
        Self { field, depends_on, state }
    }

    /// Name of the field being bound.
    pub fn field(&self) -> &str {
        self.field
    }

    /// Read a dependency that must already be resolved.
    ///
    /// # Errors
    /// - [`WizardError::UndeclaredDependency`] when `dependency` was not declared.
    /// - [`WizardError::DependencyViolation`] when it has no value.
    /// - [`WizardError::InvalidValue`] when the value does not decode as `T`.
    pub fn require<T: DeserializeOwned>(&self, dependency: &str) -> Result<T, WizardError> {
        self.get(dependency)?.ok_or_else(|| WizardError::DependencyViolation {
            field: self.field.to_string(),
            dependency: dependency.to_string(),
        })
    }

    /// Read a dependency that may legitimately be absent (for example a skipped field).
    pub fn get<T: DeserializeOwned>(&self, dependency: &str) -> Result<Option<T>, WizardError> {
        self.check_declared(dependency)?;
        self.state
            .get(dependency)
            .map(|value| {
                T::deserialize(value).map_err(|error| WizardError::InvalidValue {
                    field: self.field.to_string(),
                    message: format!("dependency '{dependency}': {error}"),
                })
            })
            .transpose()
    }

    fn check_declared(&self, dependency: &str) -> Result<(), WizardError> {
        if self.depends_on.iter().any(|declared| declared == dependency) {
            Ok(())
        } else {
            Err(WizardError::UndeclaredDependency {
                field: self.field.to_string(),
                dependency: dependency.to_string(),
            })
        }
    }
}
