//! Seam between the engine and the remote listing API.
//!
//! Explorer nodes and wizard steps talk to [`GlueService`] rather than to the
//! HTTP client, so tests can substitute in-memory fakes. The `list_*`
//! functions wrap single-page calls into [`PagedSequence`]s that show the
//! matching loading message while pages are being fetched.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use futures_util::{FutureExt, future::BoxFuture};
use gluetty_api::GlueClient;
use gluetty_types::{GlueJob, JobRun, LogStream, Page, PageToken};
use tracing::debug;

use crate::{error::FetchError, pagination::PagedSequence, status::StatusIndicator};

pub const LOADING_JOBS: &str = "Loading Glue Jobs...";
pub const LOADING_JOB_RUNS: &str = "Loading Glue Job Runs...";
pub const LOADING_LOG_STREAMS: &str = "Loading Log Streams...";

/// Listing calls used by the explorer and the run-log wizard.
#[async_trait::async_trait]
pub trait GlueService: Send + Sync {
    fn region(&self) -> &str;

    async fn get_jobs(&self, next_token: Option<PageToken>) -> Result<Page<GlueJob>, FetchError>;

    async fn get_job_runs(&self, job_name: &str, next_token: Option<PageToken>) -> Result<Page<JobRun>, FetchError>;

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        prefix: Option<&str>,
        next_token: Option<PageToken>,
    ) -> Result<Page<LogStream>, FetchError>;
}

#[async_trait::async_trait]
impl GlueService for GlueClient {
    fn region(&self) -> &str {
        GlueClient::region(self)
    }

    async fn get_jobs(&self, next_token: Option<PageToken>) -> Result<Page<GlueJob>, FetchError> {
        GlueClient::get_jobs(self, next_token)
            .await
            .map_err(|error| FetchError::new("GetJobs", error))
    }

    async fn get_job_runs(&self, job_name: &str, next_token: Option<PageToken>) -> Result<Page<JobRun>, FetchError> {
        GlueClient::get_job_runs(self, job_name, next_token)
            .await
            .map_err(|error| FetchError::new("GetJobRuns", error))
    }

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        prefix: Option<&str>,
        next_token: Option<PageToken>,
    ) -> Result<Page<LogStream>, FetchError> {
        GlueClient::describe_log_streams(self, log_group_name, prefix, next_token)
            .await
            .map_err(|error| FetchError::new("DescribeLogStreams", error))
    }
}

/// Supplies a service bound to a region.
pub trait GlueServiceFactory: Send + Sync {
    fn service_for(&self, region: &str) -> anyhow::Result<Arc<dyn GlueService>>;
}

impl<F> GlueServiceFactory for F
where
    F: Fn(&str) -> anyhow::Result<Arc<dyn GlueService>> + Send + Sync,
{
    fn service_for(&self, region: &str) -> anyhow::Result<Arc<dyn GlueService>> {
        self(region)
    }
}

/// Builds [`GlueClient`]s from the environment, one per region.
#[derive(Default)]
pub struct ClientFactory {
    clients: Mutex<HashMap<String, Arc<GlueClient>>>,
}

impl ClientFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GlueServiceFactory for ClientFactory {
    fn service_for(&self, region: &str) -> anyhow::Result<Arc<dyn GlueService>> {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(region) {
            return Ok(client.clone());
        }
        debug!(%region, "creating client");
        let client = Arc::new(GlueClient::new_from_env(region)?);
        clients.insert(region.to_string(), client.clone());
        Ok(client)
    }
}

pub type PageFuture<T> = BoxFuture<'static, Result<Page<T>, FetchError>>;
pub type PageFetcher<T> = Box<dyn FnMut(Option<PageToken>) -> PageFuture<T> + Send>;

/// A listing whose fetch function is type-erased so it can be named and stored.
pub type Listing<T> = PagedSequence<T, PageFetcher<T>, PageFuture<T>>;

/// Every job definition in the service's region.
pub fn list_jobs(service: Arc<dyn GlueService>, status: Arc<dyn StatusIndicator>) -> Listing<GlueJob> {
    let fetch: PageFetcher<GlueJob> = Box::new(move |token| {
        let service = service.clone();
        async move { service.get_jobs(token).await }.boxed()
    });
    PagedSequence::new(fetch).with_status(status, LOADING_JOBS)
}

/// Every run of `job_name`, in the order the service returns them.
pub fn list_job_runs(service: Arc<dyn GlueService>, status: Arc<dyn StatusIndicator>, job_name: impl Into<String>) -> Listing<JobRun> {
    let job_name = job_name.into();
    let fetch: PageFetcher<JobRun> = Box::new(move |token| {
        let service = service.clone();
        let job_name = job_name.clone();
        async move { service.get_job_runs(&job_name, token).await }.boxed()
    });
    PagedSequence::new(fetch).with_status(status, LOADING_JOB_RUNS)
}

/// Log streams of `log_group_name`, optionally restricted to names starting with `prefix`.
pub fn list_log_streams(
    service: Arc<dyn GlueService>,
    status: Arc<dyn StatusIndicator>,
    log_group_name: impl Into<String>,
    prefix: Option<String>,
) -> Listing<LogStream> {
    let log_group_name = log_group_name.into();
    let fetch: PageFetcher<LogStream> = Box::new(move |token| {
        let service = service.clone();
        let log_group_name = log_group_name.clone();
        let prefix = prefix.clone();
        async move { service.describe_log_streams(&log_group_name, prefix.as_deref(), token).await }.boxed()
    });
    PagedSequence::new(fetch).with_status(status, LOADING_LOG_STREAMS)
}
