//! Wizard that picks the log stream of one job run.
//!
//! The flow is region, then job run, then log group, then log stream. Each
//! listing step reads the answers before it: the job runs come from the
//! chosen region, and the log streams are those of the chosen group whose
//! names start with the chosen run id.

use std::sync::Arc;

use futures_util::{StreamExt, future};
use gluetty_types::{Candidate, CandidateIcon, JobRun, JobRunState, LogStream, regions};
use gluetty_util::date_handling::{format_duration_seconds, format_local};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{FetchError, WizardError},
    selection::{AuxAction, CandidateSource, CandidateStream, PickPresenter, SelectionStep, SortOrder},
    service::{GlueService, GlueServiceFactory, list_job_runs, list_log_streams},
    status::StatusIndicator,
    wizard::{FieldBinding, FieldDeclaration, StateView, Wizard, WizardOutcome, WizardState},
};

pub const REGION: &str = "region";
pub const JOB_RUN_ID: &str = "job_run_id";
pub const LOG_GROUP_NAME: &str = "log_group_name";
pub const LOG_STREAM_NAME: &str = "log_stream_name";

pub const NO_LOG_EVENTS_FOUND: &str = "[No Log Events found]";

/// Log groups a job writes to, as `(label, group name)`.
pub const JOB_LOG_GROUPS: &[(&str, &str)] = &[
    ("All logs", "/aws-glue/jobs/logs-v2"),
    ("Output logs", "/aws-glue/jobs/output"),
    ("Error logs", "/aws-glue/jobs/error"),
];

/// The completed selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLogStreamSelection {
    pub region: String,
    pub job_name: String,
    pub job_run_id: String,
    pub log_group_name: String,
    pub log_stream_name: String,
}

/// Collaborators shared by every step of the wizard.
#[derive(Clone)]
pub struct RunLogsContext {
    pub services: Arc<dyn GlueServiceFactory>,
    pub presenter: Arc<dyn PickPresenter>,
    pub status: Arc<dyn StatusIndicator>,
    /// Offered on every step (for example "copy job name").
    pub actions: Vec<AuxAction>,
}

/// Builds and runs the run-log-stream wizard for one job.
pub struct RunLogsWizard {
    job_name: String,
    wizard: Wizard,
}

impl RunLogsWizard {
    /// # Errors
    /// Only fails if the field declarations are inconsistent.
    pub fn new(job_name: impl Into<String>, context: RunLogsContext) -> Result<Self, WizardError> {
        let job_name = job_name.into();
        let shared = Arc::new(context);

        let region_step = {
            let shared = shared.clone();
            FieldDeclaration::new(REGION, move |_| Ok(FieldBinding::prompt(region_step(&shared))))
        };
        let run_step = {
            let shared = shared.clone();
            let job_name = job_name.clone();
            FieldDeclaration::new(JOB_RUN_ID, move |view| job_run_step(view, &job_name, &shared)).depends_on([REGION])
        };
        let group_step = {
            let shared = shared.clone();
            let job_name = job_name.clone();
            FieldDeclaration::new(LOG_GROUP_NAME, move |_| Ok(FieldBinding::prompt(log_group_step(&job_name, &shared))))
        };
        let stream_step = {
            let shared = shared.clone();
            let job_name = job_name.clone();
            FieldDeclaration::new(LOG_STREAM_NAME, move |view| log_stream_step(view, &job_name, &shared))
                .depends_on([REGION, LOG_GROUP_NAME, JOB_RUN_ID])
        };

        let wizard = Wizard::builder()
            .field(region_step)
            .field(run_step)
            .field(group_step)
            .field(stream_step)
            .build()?;
        Ok(Self { job_name, wizard })
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Run the wizard. `region` seeds the region field (the region of the job
    /// node the flow was started from); without it the user is asked.
    pub async fn run(&self, region: Option<&str>) -> Result<Option<RunLogStreamSelection>, WizardError> {
        let mut initial = WizardState::new();
        if let Some(region) = region {
            initial = initial.with(REGION, region)?;
        }

        let state = match self.wizard.run(initial).await? {
            WizardOutcome::Complete(state) => state,
            WizardOutcome::Cancelled => {
                debug!(job = %self.job_name, "run log selection cancelled");
                return Ok(None);
            }
        };

        Ok(Some(RunLogStreamSelection {
            region: state.require(REGION)?,
            job_name: self.job_name.clone(),
            job_run_id: state.require(JOB_RUN_ID)?,
            log_group_name: state.require(LOG_GROUP_NAME)?,
            log_stream_name: state.require(LOG_STREAM_NAME)?,
        }))
    }
}

fn region_step(context: &RunLogsContext) -> SelectionStep<String> {
    let candidates = regions()
        .into_iter()
        .map(|region| {
            Candidate::new(region.name, region.id.clone())
                .with_detail(region.id)
                .with_icon(CandidateIcon::Region)
        })
        .collect();
    SelectionStep::new("Select a region", CandidateSource::from_items(candidates), context.presenter.clone())
        .with_placeholder("Filter regions")
        .with_actions(context.actions.clone())
}

fn job_run_step(view: &StateView<'_>, job_name: &str, context: &Arc<RunLogsContext>) -> Result<FieldBinding, WizardError> {
    let region: String = view.require(REGION)?;
    let job = job_name.to_string();
    let shared = context.clone();

    let source = CandidateSource::from_fn(move || {
        let service = match shared.services.service_for(&region) {
            Ok(service) => service,
            Err(error) => return failed_source(error),
        };
        list_job_runs(service, shared.status.clone(), job.clone())
            .filter_map(|run| future::ready(run.map(job_run_candidate).transpose()))
            .boxed()
    });

    let step = SelectionStep::new(format!("{job_name}: Select a Job Run"), source, context.presenter.clone())
        .with_actions(context.actions.clone());
    Ok(FieldBinding::prompt(step))
}

fn log_group_step(job_name: &str, context: &RunLogsContext) -> SelectionStep<String> {
    let candidates = JOB_LOG_GROUPS
        .iter()
        .map(|(label, group)| {
            Candidate::new(*label, (*group).to_string())
                .with_detail(*group)
                .with_icon(CandidateIcon::Folder)
        })
        .collect();
    SelectionStep::new(format!("{job_name}: Select Log Group"), CandidateSource::from_items(candidates), context.presenter.clone())
        .with_actions(context.actions.clone())
}

fn log_stream_step(view: &StateView<'_>, job_name: &str, context: &Arc<RunLogsContext>) -> Result<FieldBinding, WizardError> {
    let region: String = view.require(REGION)?;
    let log_group_name: String = view.require(LOG_GROUP_NAME)?;
    let job_run_id: String = view.require(JOB_RUN_ID)?;
    // Every stream of a run is named after the run id; an empty prefix would
    // list the streams of all runs.
    if job_run_id.trim().is_empty() {
        return Err(WizardError::InvalidValue {
            field: LOG_STREAM_NAME.to_string(),
            message: "job run id is empty; cannot select its log streams".into(),
        });
    }
    let shared = context.clone();

    let source = CandidateSource::from_fn(move || {
        let service = match shared.services.service_for(&region) {
            Ok(service) => service,
            Err(error) => return failed_source(error),
        };
        list_log_streams(service, shared.status.clone(), log_group_name.clone(), Some(job_run_id.clone()))
            .filter_map(|stream| future::ready(stream.map(log_stream_candidate).transpose()))
            .boxed()
    });

    let step = SelectionStep::new(format!("{job_name}: Select Log Stream"), source, context.presenter.clone())
        .sorted(SortOrder::Descending)
        .with_actions(context.actions.clone());
    Ok(FieldBinding::prompt(step))
}

fn failed_source<T: Send + 'static>(error: anyhow::Error) -> CandidateStream<T> {
    futures_util::stream::once(future::ready(Err(FetchError::new("CreateClient", error)))).boxed()
}

fn job_run_icon(state: Option<JobRunState>) -> CandidateIcon {
    match state {
        Some(JobRunState::Succeeded) => CandidateIcon::Pass,
        Some(JobRunState::Failed) => CandidateIcon::Error,
        Some(JobRunState::Running) => CandidateIcon::Running,
        Some(JobRunState::Stopped) => CandidateIcon::Stopped,
        _ => CandidateIcon::Folder,
    }
}

/// Runs without an id cannot be selected and are left out.
fn job_run_candidate(run: JobRun) -> Option<Candidate<String>> {
    let Some(id) = run.id.clone() else {
        warn!(job = ?run.job_name, "job run without id");
        return None;
    };

    let started = run.started_at().map(format_local);
    let duration = run.execution_time.filter(|seconds| *seconds > 0).map(format_duration_seconds);
    let detail = match (started, duration) {
        (Some(started), Some(duration)) => Some(format!("{started} ({duration})")),
        (Some(started), None) => Some(started),
        (None, Some(duration)) => Some(duration),
        (None, None) => None,
    };

    let mut candidate = Candidate::new(id.clone(), id).with_icon(job_run_icon(run.job_run_state));
    if let Some(detail) = detail {
        candidate = candidate.with_detail(detail);
    }
    Some(candidate)
}

fn log_stream_candidate(stream: LogStream) -> Option<Candidate<String>> {
    let name = stream.log_stream_name.clone()?;
    let detail = stream
        .last_event_at()
        .map(format_local)
        .unwrap_or_else(|| NO_LOG_EVENTS_FOUND.to_string());

    let mut candidate = Candidate::new(name.clone(), name).with_detail(detail);
    if let Some(timestamp) = stream.last_event_timestamp {
        candidate = candidate.with_sort_key(format!("{:020}", timestamp.max(0)));
    }
    Some(candidate)
}
