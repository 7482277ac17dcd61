//! Dependent-field wizard.
//!
//! A wizard collects a fixed, ordered list of fields. Each field owns a
//! binder: a function from the values collected so far to either a
//! [`Prompter`] or [`FieldBinding::Skip`]. Binders run lazily, when their
//! field is reached, so the options a step offers can depend on earlier
//! answers (the job runs of the chosen region, the log streams of the chosen
//! run, ...).
//!
//! The run loop is an explicit state machine:
//!
//! ```text
//! Pending(i) --bind--> AwaitingInput(i) --select--> Resolved(i) --> Pending(i + 1)
//!     |                     |   |
//!     +--skip--> Resolved(i)|   +--back--> Pending(prev), fields >= prev cleared
//!                           +--cancel--> Cancelled
//! Pending(N) --> Complete
//! ```
//!
//! Declaration order must respect dependencies; [`WizardBuilder::build`]
//! rejects anything else, and a binder reading a value that is not there
//! fails the run with [`WizardError::DependencyViolation`].

mod field;
mod prompt;
mod state;

use std::{collections::HashSet, fmt};

use tracing::debug;

pub use field::{Binder, FieldBinding, FieldDeclaration};
pub use prompt::{PromptContext, PromptResult, Prompter};
pub use state::{StateView, WizardState};

use crate::error::WizardError;

/// Observable position of a running wizard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardPhase {
    Pending(usize),
    AwaitingInput(usize),
    Resolved(usize),
    Cancelled,
    Complete,
}

/// Terminal result of [`Wizard::run`].
#[derive(Clone, Debug, PartialEq)]
pub enum WizardOutcome {
    /// Every field is resolved or explicitly absent.
    Complete(WizardState),
    /// The user left; no partial state is returned.
    Cancelled,
}

impl WizardOutcome {
    pub fn into_state(self) -> Option<WizardState> {
        match self {
            Self::Complete(state) => Some(state),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Run-loop state. `AwaitingInput` owns the step built by the binder.
enum Step {
    Pending(usize),
    AwaitingInput(usize, Box<dyn Prompter>),
    Resolved(usize),
    Cancelled,
    Complete,
}

impl Step {
    fn phase(&self) -> WizardPhase {
        match self {
            Self::Pending(index) => WizardPhase::Pending(*index),
            Self::AwaitingInput(index, _) => WizardPhase::AwaitingInput(*index),
            Self::Resolved(index) => WizardPhase::Resolved(*index),
            Self::Cancelled => WizardPhase::Cancelled,
            Self::Complete => WizardPhase::Complete,
        }
    }
}

/// Collects declarations for a [`Wizard`].
#[derive(Debug, Default)]
pub struct WizardBuilder {
    fields: Vec<FieldDeclaration>,
}

impl WizardBuilder {
    pub fn field(mut self, declaration: FieldDeclaration) -> Self {
        self.fields.push(declaration);
        self
    }

    /// Validate the declarations and produce a runnable wizard.
    ///
    /// # Errors
    /// [`WizardError::DuplicateField`] for a repeated name and
    /// [`WizardError::DependencyOrder`] when a field depends on itself, on a
    /// later field, or on an unknown one.
    pub fn build(self) -> Result<Wizard, WizardError> {
        field::validate_order(&self.fields)?;
        Ok(Wizard { fields: self.fields })
    }
}

/// An ordered, validated set of dependent fields.
#[derive(Clone)]
pub struct Wizard {
    fields: Vec<FieldDeclaration>,
}

impl fmt::Debug for Wizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wizard").field("fields", &self.fields).finish()
    }
}

impl Wizard {
    pub fn builder() -> WizardBuilder {
        WizardBuilder::default()
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDeclaration::name)
    }

    /// Resolve every field starting from `initial`.
    ///
    /// Fields already present in `initial` are treated as answered: they are
    /// never prompted and never cleared by back navigation.
    ///
    /// # Errors
    /// Binder failures (including dependency violations) and presenter
    /// failures end the run immediately. Cancellation is not an error.
    pub async fn run(&self, initial: WizardState) -> Result<WizardOutcome, WizardError> {
        self.run_observed(initial, |_, _| {}).await
    }

    /// Like [`run`](Self::run), reporting every phase and the state at that
    /// point to `observe`.
    pub async fn run_observed<O>(&self, initial: WizardState, mut observe: O) -> Result<WizardOutcome, WizardError>
    where
        O: FnMut(WizardPhase, &WizardState) + Send,
    {
        let total = self.fields.len();
        let seeded: HashSet<String> = initial.fields().map(str::to_string).collect();
        let mut state = initial;
        let mut history: Vec<usize> = Vec::new();
        let mut step = Step::Pending(0);

        loop {
            observe(step.phase(), &state);
            step = match step {
                Step::Pending(index) if index >= total => Step::Complete,
                Step::Pending(index) => self.bind(index, &seeded, &mut state)?,
                Step::AwaitingInput(index, mut prompter) => {
                    let field = &self.fields[index];
                    let context = PromptContext {
                        step: index + 1,
                        total_steps: total,
                        can_go_back: !history.is_empty(),
                    };
                    let result = prompter.prompt(&context).await.map_err(|source| WizardError::Prompt {
                        field: field.name.clone(),
                        source,
                    })?;
                    match result {
                        PromptResult::Selected(value) => {
                            state.insert(field.name.clone(), value);
                            history.push(index);
                            Step::Resolved(index)
                        }
                        PromptResult::Cancelled => {
                            debug!(field = %field.name, "wizard cancelled");
                            Step::Cancelled
                        }
                        PromptResult::Back => match history.pop() {
                            Some(previous) => {
                                self.invalidate_from(previous, &seeded, &mut state);
                                debug!(field = %field.name, back_to = %self.fields[previous].name, "navigating back");
                                Step::Pending(previous)
                            }
                            None => {
                                debug!(field = %field.name, "back from first step; cancelling");
                                Step::Cancelled
                            }
                        },
                    }
                }
                Step::Resolved(index) => Step::Pending(index + 1),
                Step::Cancelled => return Ok(WizardOutcome::Cancelled),
                Step::Complete => {
                    debug!(fields = state.len(), "wizard complete");
                    return Ok(WizardOutcome::Complete(state));
                }
            };
        }
    }

    fn bind(&self, index: usize, seeded: &HashSet<String>, state: &mut WizardState) -> Result<Step, WizardError> {
        let field = &self.fields[index];
        if seeded.contains(&field.name) {
            debug!(field = %field.name, "field seeded; not prompting");
            return Ok(Step::Resolved(index));
        }

        let view = StateView::new(&field.name, &field.depends_on, state);
        match (field.binder)(&view)? {
            FieldBinding::Prompt(prompter) => {
                debug!(field = %field.name, step = index + 1, "awaiting input");
                Ok(Step::AwaitingInput(index, prompter))
            }
            FieldBinding::Skip => {
                debug!(field = %field.name, "field not applicable; skipping");
                state.remove(&field.name);
                Ok(Step::Resolved(index))
            }
        }
    }

    /// Clear every non-seeded field at or after `from`.
    fn invalidate_from(&self, from: usize, seeded: &HashSet<String>, state: &mut WizardState) {
        for field in &self.fields[from..] {
            if !seeded.contains(&field.name) {
                state.remove(&field.name);
            }
        }
    }
}
