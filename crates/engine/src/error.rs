//! Error taxonomy of the engine.
//!
//! Cancellation is deliberately absent: a user leaving a step is reported as
//! [`WizardOutcome::Cancelled`](crate::WizardOutcome::Cancelled), never as an error.

use thiserror::Error;

/// A page fetch failed. Items yielded before the failure stay valid.
#[derive(Debug, Error)]
#[error("{operation} failed: {source:#}")]
pub struct FetchError {
    operation: String,
    #[source]
    source: anyhow::Error,
}

impl FetchError {
    pub fn new(operation: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            operation: operation.into(),
            source: source.into(),
        }
    }

    /// Name of the listing operation that failed (for example `GetJobRuns`).
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

/// Failures raised while declaring or running a wizard.
#[derive(Debug, Error)]
pub enum WizardError {
    /// Field declarations do not respect dependency order (detected at construction).
    #[error("field '{field}' cannot depend on '{dependency}': {reason}")]
    DependencyOrder { field: String, dependency: String, reason: String },
    /// Two fields were declared with the same name.
    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },
    /// A binder required a dependency that has no value yet.
    #[error("field '{field}' requires '{dependency}', which has not been resolved")]
    DependencyViolation { field: String, dependency: String },
    /// A binder read a field it never declared as a dependency.
    #[error("field '{field}' read undeclared dependency '{dependency}'")]
    UndeclaredDependency { field: String, dependency: String },
    /// A value exists but cannot be used by the reading field.
    #[error("field '{field}' has an unusable value: {message}")]
    InvalidValue { field: String, message: String },
    /// The presentation layer failed while a step was waiting for input.
    #[error("step for field '{field}' failed: {source:#}")]
    Prompt {
        field: String,
        #[source]
        source: anyhow::Error,
    },
}

impl WizardError {
    /// True for errors that indicate a bug in the field declarations rather
    /// than a runtime condition.
    pub fn is_declaration_bug(&self) -> bool {
        matches!(
            self,
            Self::DependencyOrder { .. } | Self::DuplicateField { .. } | Self::DependencyViolation { .. } | Self::UndeclaredDependency { .. }
        )
    }
}

/// The incoming collection cannot be keyed, so no minimal diff exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("item at position {position} has no key")]
    MissingKey { position: usize },
    #[error("key '{key}' appears more than once in the incoming collection")]
    DuplicateKey { key: String },
}

/// Failures refreshing an explorer node.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error("job configuration has no name")]
    MissingName,
}
