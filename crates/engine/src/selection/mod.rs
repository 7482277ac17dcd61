//! Single-choice steps built from a lazy candidate listing.

mod presenter;

use std::{cmp::Ordering, fmt, sync::Arc};

use anyhow::{Context, bail};
use futures_util::{StreamExt, stream::BoxStream};
use gluetty_types::Candidate;
use serde::Serialize;
use tracing::{debug, warn};

pub use presenter::{PickItem, PickPresenter, PickRequest, PickResponse};

use crate::{
    error::FetchError,
    wizard::{PromptContext, PromptResult, Prompter},
};

pub type CandidateStream<T> = BoxStream<'static, Result<Candidate<T>, FetchError>>;

/// Produces a fresh candidate stream each time a step is shown.
pub struct CandidateSource<T> {
    open: Arc<dyn Fn() -> CandidateStream<T> + Send + Sync>,
}

impl<T> Clone for CandidateSource<T> {
    fn clone(&self) -> Self {
        Self { open: self.open.clone() }
    }
}

impl<T: Send + 'static> CandidateSource<T> {
    pub fn from_fn<F>(open: F) -> Self
    where
        F: Fn() -> CandidateStream<T> + Send + Sync + 'static,
    {
        Self { open: Arc::new(open) }
    }

    /// A fixed list of candidates.
    pub fn from_items(items: Vec<Candidate<T>>) -> Self
    where
        T: Clone + Sync,
    {
        Self::from_fn(move || futures_util::stream::iter(items.clone().into_iter().map(Ok)).boxed())
    }

    pub fn open(&self) -> CandidateStream<T> {
        (self.open)()
    }
}

/// A labelled side action offered next to the candidates. Running it does not
/// resolve the step; the step is shown again afterwards.
#[derive(Clone)]
pub struct AuxAction {
    label: String,
    handler: Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>,
}

impl AuxAction {
    pub fn new<F>(label: impl Into<String>, handler: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn invoke(&self) -> anyhow::Result<()> {
        (self.handler)()
    }
}

impl fmt::Debug for AuxAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuxAction").field("label", &self.label).finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One interactive choice over a candidate listing.
///
/// Every prompt re-opens the source, so candidates are never cached between
/// showings. Listing failures do not fail the step: the candidates received
/// before the failure are offered along with the error message.
pub struct SelectionStep<T> {
    title: String,
    placeholder: Option<String>,
    source: CandidateSource<T>,
    actions: Vec<AuxAction>,
    sort: Option<SortOrder>,
    presenter: Arc<dyn PickPresenter>,
}

impl<T> SelectionStep<T>
where
    T: Serialize + Send + 'static,
{
    pub fn new(title: impl Into<String>, source: CandidateSource<T>, presenter: Arc<dyn PickPresenter>) -> Self {
        Self {
            title: title.into(),
            placeholder: None,
            source,
            actions: Vec::new(),
            sort: None,
            presenter,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = AuxAction>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Order candidates by their sort key. Candidates without a key go last.
    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    async fn materialize(&self) -> (Vec<Candidate<T>>, Option<String>) {
        let mut stream = self.source.open();
        let mut candidates = Vec::new();
        let mut error = None;
        while let Some(next) = stream.next().await {
            match next {
                Ok(candidate) => candidates.push(candidate),
                Err(fetch_error) => {
                    warn!(title = %self.title, error = %fetch_error, received = candidates.len(), "candidate listing failed");
                    error = Some(fetch_error.to_string());
                    break;
                }
            }
        }
        if let Some(order) = self.sort {
            candidates.sort_by(|left, right| compare_sort_keys(left.sort_key.as_deref(), right.sort_key.as_deref(), order));
        }
        (candidates, error)
    }

    fn request(&self, candidates: &[Candidate<T>], error: Option<String>, context: &PromptContext) -> PickRequest {
        PickRequest {
            title: self.title.clone(),
            placeholder: self.placeholder.clone(),
            items: candidates
                .iter()
                .map(|candidate| PickItem {
                    label: candidate.label.clone(),
                    detail: candidate.detail.clone(),
                    icon: candidate.icon,
                })
                .collect(),
            actions: self.actions.iter().map(|action| action.label.clone()).collect(),
            can_go_back: context.can_go_back,
            error,
            step: context.step,
            total_steps: context.total_steps,
        }
    }
}

fn compare_sort_keys(left: Option<&str>, right: Option<&str>, order: SortOrder) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => match order {
            SortOrder::Ascending => left.cmp(right),
            SortOrder::Descending => right.cmp(left),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait::async_trait]
impl<T> Prompter for SelectionStep<T>
where
    T: Serialize + Send + Sync + 'static,
{
    async fn prompt(&mut self, context: &PromptContext) -> anyhow::Result<PromptResult> {
        let (candidates, error) = self.materialize().await;
        let request = self.request(&candidates, error, context);
        debug!(title = %self.title, candidates = candidates.len(), "presenting selection");

        loop {
            match self.presenter.pick(request.clone()).await? {
                PickResponse::Selected(index) => {
                    let Some(candidate) = candidates.get(index) else {
                        bail!("presenter selected item {index} of {}", candidates.len());
                    };
                    let value = serde_json::to_value(&candidate.payload)
                        .with_context(|| format!("encode selection '{}'", candidate.label))?;
                    return Ok(PromptResult::Selected(value));
                }
                PickResponse::Action(index) => match self.actions.get(index) {
                    Some(action) => {
                        if let Err(error) = action.invoke() {
                            warn!(action = %action.label, error = %error, "auxiliary action failed");
                        }
                    }
                    None => warn!(index, "presenter chose an unknown action"),
                },
                PickResponse::Back => return Ok(PromptResult::Back),
                PickResponse::Dismissed => return Ok(PromptResult::Cancelled),
            }
        }
    }
}
