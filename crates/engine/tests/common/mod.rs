#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use anyhow::{Context, anyhow};
use gluetty_engine::{FetchError, GlueService, PickPresenter, PickRequest, PickResponse, StatusIndicator, StatusToken};
use gluetty_types::{GlueJob, JobRun, LogStream, Page, PageToken};

/// Status indicator that counts shows and clears.
#[derive(Default)]
pub struct CountingStatus {
    next: AtomicU64,
    shown: AtomicUsize,
    cleared: AtomicUsize,
}

impl CountingStatus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    pub fn cleared(&self) -> usize {
        self.cleared.load(Ordering::SeqCst)
    }
}

impl StatusIndicator for CountingStatus {
    fn show(&self, _message: &str) -> StatusToken {
        self.shown.fetch_add(1, Ordering::SeqCst);
        StatusToken::new(self.next.fetch_add(1, Ordering::SeqCst))
    }

    fn clear(&self, _token: StatusToken) {
        self.cleared.fetch_add(1, Ordering::SeqCst);
    }
}

/// One scripted user reaction.
#[derive(Clone, Debug)]
pub enum Answer {
    Pick(&'static str),
    Action(usize),
    Back,
    Dismiss,
    Fail,
}

/// Presenter that replays answers in order and records every request.
#[derive(Default)]
pub struct ScriptedPresenter {
    answers: Mutex<VecDeque<Answer>>,
    requests: Mutex<Vec<PickRequest>>,
}

impl ScriptedPresenter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into_iter().collect()),
            requests: Mutex::default(),
        })
    }

    pub fn requests(&self) -> Vec<PickRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.title).collect()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().expect("answers lock").len()
    }
}

#[async_trait::async_trait]
impl PickPresenter for ScriptedPresenter {
    async fn pick(&self, request: PickRequest) -> anyhow::Result<PickResponse> {
        self.requests.lock().expect("requests lock").push(request.clone());
        let answer = self
            .answers
            .lock()
            .expect("answers lock")
            .pop_front()
            .with_context(|| format!("no scripted answer for '{}'", request.title))?;
        match answer {
            Answer::Pick(label) => request
                .items
                .iter()
                .position(|item| item.label == label)
                .map(PickResponse::Selected)
                .with_context(|| format!("'{label}' not offered by '{}'", request.title)),
            Answer::Action(index) => Ok(PickResponse::Action(index)),
            Answer::Back => Ok(PickResponse::Back),
            Answer::Dismiss => Ok(PickResponse::Dismissed),
            Answer::Fail => Err(anyhow!("terminal went away")),
        }
    }
}

pub fn job(name: &str) -> GlueJob {
    GlueJob {
        name: Some(name.to_string()),
        ..GlueJob::default()
    }
}

/// In-memory listing service. Job pages can be swapped between refreshes.
#[derive(Default)]
pub struct FakeGlue {
    pub region: String,
    pub job_pages: Mutex<Vec<Page<GlueJob>>>,
    pub job_runs: HashMap<String, Vec<JobRun>>,
    pub log_streams: HashMap<String, Vec<LogStream>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_jobs: bool,
}

impl FakeGlue {
    pub fn in_region(region: &str) -> Self {
        Self {
            region: region.to_string(),
            ..Self::default()
        }
    }

    pub fn set_jobs(&self, pages: Vec<Vec<&str>>) {
        let count = pages.len();
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(index, names)| {
                let next = (index + 1 < count).then(|| PageToken::new(format!("page-{}", index + 1)));
                Page::new(names.into_iter().map(job).collect(), next)
            })
            .collect();
        *self.job_pages.lock().expect("pages lock") = pages;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

fn page_index(token: &Option<PageToken>) -> usize {
    token
        .as_ref()
        .and_then(|token| token.as_str().strip_prefix("page-"))
        .and_then(|index| index.parse().ok())
        .unwrap_or(0)
}

#[async_trait::async_trait]
impl GlueService for FakeGlue {
    fn region(&self) -> &str {
        &self.region
    }

    async fn get_jobs(&self, next_token: Option<PageToken>) -> Result<Page<GlueJob>, FetchError> {
        self.record(format!("GetJobs({})", next_token.as_ref().map(PageToken::as_str).unwrap_or("-")));
        if self.fail_jobs {
            return Err(FetchError::new("GetJobs", anyhow!("AccessDeniedException")));
        }
        let pages = self.job_pages.lock().expect("pages lock");
        Ok(pages.get(page_index(&next_token)).cloned().unwrap_or_else(|| Page::last(Vec::new())))
    }

    async fn get_job_runs(&self, job_name: &str, _next_token: Option<PageToken>) -> Result<Page<JobRun>, FetchError> {
        self.record(format!("GetJobRuns({job_name})"));
        Ok(Page::last(self.job_runs.get(job_name).cloned().unwrap_or_default()))
    }

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        prefix: Option<&str>,
        _next_token: Option<PageToken>,
    ) -> Result<Page<LogStream>, FetchError> {
        self.record(format!("DescribeLogStreams({log_group_name}, {})", prefix.unwrap_or("-")));
        let streams = self
            .log_streams
            .get(log_group_name)
            .into_iter()
            .flatten()
            .filter(|stream| {
                let name = stream.log_stream_name.as_deref().unwrap_or_default();
                prefix.is_none_or(|prefix| name.starts_with(prefix))
            })
            .cloned()
            .collect();
        Ok(Page::last(streams))
    }
}
