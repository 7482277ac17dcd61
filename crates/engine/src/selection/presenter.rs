//! Presentation capability consumed by [`SelectionStep`](super::SelectionStep).
//!
//! The engine never draws anything itself. A presenter receives a fully
//! materialized [`PickRequest`] and reports what the user did; the terminal
//! front end and the scripted presenters used in tests both implement it.

use gluetty_types::CandidateIcon;

/// Display data for one candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub detail: Option<String>,
    pub icon: Option<CandidateIcon>,
}

/// Everything a presenter needs to show one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickRequest {
    pub title: String,
    pub placeholder: Option<String>,
    pub items: Vec<PickItem>,
    /// Labels of auxiliary actions, addressed by index in [`PickResponse::Action`].
    pub actions: Vec<String>,
    pub can_go_back: bool,
    /// Set when listing the candidates failed part way; `items` holds what
    /// arrived before the failure.
    pub error: Option<String>,
    pub step: usize,
    pub total_steps: usize,
}

impl PickRequest {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickResponse {
    /// Index into [`PickRequest::items`].
    Selected(usize),
    /// Index into [`PickRequest::actions`].
    Action(usize),
    Back,
    Dismissed,
}

#[async_trait::async_trait]
pub trait PickPresenter: Send + Sync {
    async fn pick(&self, request: PickRequest) -> anyhow::Result<PickResponse>;
}
