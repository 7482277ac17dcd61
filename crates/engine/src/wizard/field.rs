//! Field declarations and their construction-time ordering checks.

use std::{collections::HashSet, fmt, sync::Arc};

use super::{Prompter, StateView};
use crate::error::WizardError;

/// What a binder decided for its field given the current state.
pub enum FieldBinding {
    /// Ask the user with this step.
    Prompt(Box<dyn Prompter>),
    /// The field does not apply; it stays absent.
    Skip,
}

impl FieldBinding {
    pub fn prompt(prompter: impl Prompter + 'static) -> Self {
        Self::Prompt(Box::new(prompter))
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt(_) => f.write_str("Prompt(..)"),
            Self::Skip => f.write_str("Skip"),
        }
    }
}

pub type Binder = Arc<dyn Fn(&StateView<'_>) -> Result<FieldBinding, WizardError> + Send + Sync>;

/// A named slot and the function that builds its step.
#[derive(Clone)]
pub struct FieldDeclaration {
    pub(crate) name: String,
    pub(crate) depends_on: Vec<String>,
    pub(crate) binder: Binder,
}

impl FieldDeclaration {
    pub fn new<F>(name: impl Into<String>, binder: F) -> Self
    where
        F: Fn(&StateView<'_>) -> Result<FieldBinding, WizardError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
            binder: Arc::new(binder),
        }
    }

    /// Declare the fields this binder reads.
    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[String] {
        &self.depends_on
    }
}

impl fmt::Debug for FieldDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDeclaration")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// Verify that names are unique and every dependency is declared earlier.
///
/// Declaration order must be a topological order of the dependency graph,
/// which also rules out cycles and self-references.
pub(crate) fn validate_order(fields: &[FieldDeclaration]) -> Result<(), WizardError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(fields.len());
    let all: HashSet<&str> = fields.iter().map(|field| field.name.as_str()).collect();

    for field in fields {
        for dependency in &field.depends_on {
            if dependency == &field.name {
                return Err(WizardError::DependencyOrder {
                    field: field.name.clone(),
                    dependency: dependency.clone(),
                    reason: "a field cannot depend on itself".into(),
                });
            }
            if !seen.contains(dependency.as_str()) {
                let reason = if all.contains(dependency.as_str()) {
                    "dependency is declared later"
                } else {
                    "dependency is not declared"
                };
                return Err(WizardError::DependencyOrder {
                    field: field.name.clone(),
                    dependency: dependency.clone(),
                    reason: reason.into(),
                });
            }
        }
        if !seen.insert(field.name.as_str()) {
            return Err(WizardError::DuplicateField { field: field.name.clone() });
        }
    }
    Ok(())
}
