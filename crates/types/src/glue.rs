//! Job and job-run payloads of the ETL job service.
//!
//! Field names follow the service's PascalCase JSON protocol. Timestamps are
//! epoch seconds with fractional milliseconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Page, PageToken};

/// A job definition as returned by `GetJobs`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlueJob {
    /// Job name; the service marks it optional even though it keys every job.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_on: Option<f64>,
    #[serde(default)]
    pub last_modified_on: Option<f64>,
    #[serde(default)]
    pub command: Option<JobCommand>,
    #[serde(default)]
    pub glue_version: Option<String>,
    #[serde(default)]
    pub worker_type: Option<String>,
    #[serde(default)]
    pub number_of_workers: Option<u32>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub timeout: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobCommand {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub script_location: Option<String>,
    #[serde(default)]
    pub python_version: Option<String>,
}

/// Lifecycle state of a job run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobRunState {
    Starting,
    Running,
    Stopping,
    Stopped,
    Succeeded,
    Failed,
    Timeout,
    Error,
    Waiting,
    #[serde(other)]
    Unknown,
}

/// A single execution of a job as returned by `GetJobRuns`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobRun {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attempt: Option<u32>,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub started_on: Option<f64>,
    #[serde(default)]
    pub last_modified_on: Option<f64>,
    #[serde(default)]
    pub completed_on: Option<f64>,
    #[serde(default)]
    pub job_run_state: Option<JobRunState>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Execution time in seconds.
    #[serde(default)]
    pub execution_time: Option<u64>,
    #[serde(default)]
    pub log_group_name: Option<String>,
}

impl JobRun {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_on.and_then(epoch_seconds_to_utc)
    }
}

fn epoch_seconds_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetJobsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<PageToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetJobsResponse {
    #[serde(default)]
    pub jobs: Option<Vec<GlueJob>>,
    #[serde(default)]
    pub next_token: Option<PageToken>,
}

impl From<GetJobsResponse> for Page<GlueJob> {
    fn from(response: GetJobsResponse) -> Self {
        Page::new(response.jobs.unwrap_or_default(), response.next_token)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetJobRunsRequest {
    pub job_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<PageToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetJobRunsResponse {
    #[serde(default)]
    pub job_runs: Option<Vec<JobRun>>,
    #[serde(default)]
    pub next_token: Option<PageToken>,
}

impl From<GetJobRunsResponse> for Page<JobRun> {
    fn from(response: GetJobRunsResponse) -> Self {
        Page::new(response.job_runs.unwrap_or_default(), response.next_token)
    }
}
