//! The interactive step a field binder produces.

use serde_json::Value;

/// Position of the running step, for presenters that show progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PromptContext {
    /// One-based index of the field among all declared fields.
    pub step: usize,
    pub total_steps: usize,
    /// Whether an earlier prompted field exists to navigate back to.
    pub can_go_back: bool,
}

/// What the user did with a step.
#[derive(Clone, Debug, PartialEq)]
pub enum PromptResult {
    Selected(Value),
    Back,
    /// The user left without choosing. Terminal for the whole wizard.
    Cancelled,
}

/// One interactive choice yielding a single value.
///
/// A prompter is built fresh by its field's binder every time the field is
/// reached, so it may capture values of the fields it depends on.
#[async_trait::async_trait]
pub trait Prompter: Send {
    /// Run the step until the user selects, goes back, or cancels.
    ///
    /// An `Err` is a failure of the presentation layer, not a cancellation.
    async fn prompt(&mut self, context: &PromptContext) -> anyhow::Result<PromptResult>;
}
