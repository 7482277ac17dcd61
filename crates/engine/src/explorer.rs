//! Explorer tree nodes for a region's jobs.
//!
//! [`JobsNode`] owns one [`JobNode`] per job name and refreshes them with
//! [`reconcile`], so a job that still exists keeps its [`NodeId`] (and with it
//! any expansion or selection state a front end keyed to it).

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use futures_util::TryStreamExt;
use gluetty_types::GlueJob;
use indexmap::IndexMap;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    error::ExplorerError,
    reconcile::{ReconcileReport, index_by_key, reconcile},
    service::{GlueService, list_jobs},
    status::StatusIndicator,
};

pub const NO_JOBS_FOUND: &str = "[No Glue Jobs found]";

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A job definition shown in the tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JobNode {
    id: NodeId,
    region: String,
    label: String,
    tooltip: Option<String>,
    configuration: GlueJob,
}

impl JobNode {
    pub fn new(region: impl Into<String>, configuration: GlueJob) -> Self {
        let mut node = Self {
            id: NodeId::next(),
            region: region.into(),
            label: String::new(),
            tooltip: None,
            configuration: GlueJob::default(),
        };
        node.update(configuration);
        node
    }

    /// Replace the configuration and refresh the derived display fields.
    pub fn update(&mut self, configuration: GlueJob) {
        self.label = configuration.name.clone().unwrap_or_default();
        self.tooltip = configuration.name.clone();
        self.configuration = configuration;
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn configuration(&self) -> &GlueJob {
        &self.configuration
    }

    pub fn name(&self) -> Result<&str, ExplorerError> {
        self.configuration.name.as_deref().ok_or(ExplorerError::MissingName)
    }
}

/// What the tree shows under the jobs node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ExplorerChild {
    Job(JobNode),
    Placeholder { label: String },
    Error { message: String },
}

/// Parent node listing every job of one region.
pub struct JobsNode {
    region: String,
    service: Arc<dyn GlueService>,
    status: Arc<dyn StatusIndicator>,
    children: RwLock<IndexMap<String, JobNode>>,
}

impl JobsNode {
    pub fn new(service: Arc<dyn GlueService>, status: Arc<dyn StatusIndicator>) -> Self {
        Self {
            region: service.region().to_string(),
            service,
            status,
            children: RwLock::new(IndexMap::new()),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// List every job and reconcile the children against the listing.
    ///
    /// The listing is fully collected before the collection is locked; the
    /// reconciliation itself runs under the write lock, so concurrent readers
    /// see the children either before or after the refresh.
    pub async fn update_children(&self) -> Result<ReconcileReport<String>, ExplorerError> {
        let jobs: Vec<GlueJob> = list_jobs(self.service.clone(), self.status.clone()).try_collect().await?;
        let incoming = index_by_key(jobs, |job| job.name.clone())?;

        let region = self.region.clone();
        let mut children = self.children.write().await;
        let report = reconcile(&mut *children, incoming, JobNode::update, |_, configuration| {
            JobNode::new(region.clone(), configuration)
        });
        drop(children);

        info!(
            region = %self.region,
            updated = report.updated.len(),
            created = report.created.len(),
            removed = report.removed.len(),
            "refreshed job nodes"
        );
        Ok(report)
    }

    /// Refresh, then return the children to display.
    ///
    /// A failed refresh yields a single error child rather than an `Err`, and
    /// an empty listing yields the [`NO_JOBS_FOUND`] placeholder.
    pub async fn children(&self) -> Vec<ExplorerChild> {
        if let Err(error) = self.update_children().await {
            warn!(region = %self.region, error = %error, "failed to refresh job nodes");
            return vec![ExplorerChild::Error {
                message: error.to_string(),
            }];
        }

        let children = self.snapshot().await;
        if children.is_empty() {
            return vec![ExplorerChild::Placeholder {
                label: NO_JOBS_FOUND.to_string(),
            }];
        }
        children.into_iter().map(ExplorerChild::Job).collect()
    }

    /// Current children without refreshing.
    pub async fn snapshot(&self) -> Vec<JobNode> {
        self.children.read().await.values().cloned().collect()
    }

    pub async fn child(&self, name: &str) -> Option<JobNode> {
        self.children.read().await.get(name).cloned()
    }
}
