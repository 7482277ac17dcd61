//! Shared data model for the gluetty workspace.
//!
//! The types here are consumed by every other crate: the API client decodes
//! remote payloads into them, the engine pages and reconciles them, and the
//! terminal presenter renders [`Candidate`] metadata.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod glue;
pub mod logs;

pub use glue::{GetJobRunsRequest, GetJobRunsResponse, GetJobsRequest, GetJobsResponse, GlueJob, JobCommand, JobRun, JobRunState};
pub use logs::{DescribeLogStreamsRequest, DescribeLogStreamsResponse, LogStream};

/// Opaque continuation marker returned by a paginated listing call.
///
/// A token received with page N must be sent back verbatim to request page N + 1.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a cursor-paginated listing.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    /// Items in the order returned by the remote call.
    pub items: Vec<T>,
    /// Continuation marker; `None` ends the listing.
    pub next_token: Option<PageToken>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<PageToken>) -> Self {
        Self { items, next_token }
    }

    /// A page that terminates the listing.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next_token: None }
    }

    pub fn is_last(&self) -> bool {
        self.next_token.is_none()
    }
}

/// Icon hint attached to a [`Candidate`]. Presenters map these onto glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateIcon {
    Pass,
    Error,
    Running,
    Stopped,
    #[default]
    Folder,
    Region,
}

/// One offerable choice in a selection step.
///
/// The payload is handed back to the caller when the candidate is chosen; the
/// remaining fields are display metadata only.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate<T> {
    /// Primary text shown in the list.
    pub label: String,
    /// Secondary line (timestamps, descriptions).
    pub detail: Option<String>,
    pub icon: Option<CandidateIcon>,
    /// Optional key used when a step asks for sorted presentation.
    pub sort_key: Option<String>,
    pub payload: T,
}

impl<T> Candidate<T> {
    pub fn new(label: impl Into<String>, payload: T) -> Self {
        Self {
            label: label.into(),
            detail: None,
            icon: None,
            sort_key: None,
            payload,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_icon(mut self, icon: CandidateIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }
}

/// Remote services the client talks to.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum ServiceId {
    #[default]
    Glue, // https://glue.{region}.amazonaws.com
    Logs, // https://logs.{region}.amazonaws.com
}

impl ToServiceIdInfo for ServiceId {
    fn env_var(&self) -> &str {
        match self {
            Self::Glue => "GLUETTY_GLUE_API_BASE",
            Self::Logs => "GLUETTY_LOGS_API_BASE",
        }
    }

    fn default_base_url(&self, region: &str) -> String {
        match self {
            Self::Glue => format!("https://glue.{region}.amazonaws.com"),
            Self::Logs => format!("https://logs.{region}.amazonaws.com"),
        }
    }

    fn target_prefix(&self) -> &str {
        match self {
            Self::Glue => "AWSGlue",
            Self::Logs => "Logs_20140328",
        }
    }
}

impl FromStr for ServiceId {
    type Err = ParseServiceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "glue" => Ok(Self::Glue),
            "logs" => Ok(Self::Logs),
            _ => Err(ParseServiceIdError),
        }
    }
}

pub trait ToServiceIdInfo {
    /// Environment variable that overrides the service base URL.
    fn env_var(&self) -> &str;
    fn default_base_url(&self, region: &str) -> String;
    /// Prefix of the `X-Amz-Target` header value.
    fn target_prefix(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseServiceIdError;

impl fmt::Display for ParseServiceIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid service id; expected 'glue' or 'logs'")
    }
}

impl Error for ParseServiceIdError {}

/// A selectable region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
}

const REGION_CATALOG: &[(&str, &str)] = &[
    ("us-east-1", "US East (N. Virginia)"),
    ("us-east-2", "US East (Ohio)"),
    ("us-west-1", "US West (N. California)"),
    ("us-west-2", "US West (Oregon)"),
    ("ca-central-1", "Canada (Central)"),
    ("eu-west-1", "Europe (Ireland)"),
    ("eu-west-2", "Europe (London)"),
    ("eu-central-1", "Europe (Frankfurt)"),
    ("eu-north-1", "Europe (Stockholm)"),
    ("ap-south-1", "Asia Pacific (Mumbai)"),
    ("ap-northeast-1", "Asia Pacific (Tokyo)"),
    ("ap-northeast-2", "Asia Pacific (Seoul)"),
    ("ap-southeast-1", "Asia Pacific (Singapore)"),
    ("ap-southeast-2", "Asia Pacific (Sydney)"),
    ("sa-east-1", "South America (São Paulo)"),
];

/// Region used when neither flags, environment, nor preferences choose one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Regions offered by the region prompt, in display order.
pub fn regions() -> Vec<Region> {
    REGION_CATALOG
        .iter()
        .map(|(id, name)| Region {
            id: (*id).to_string(),
            name: (*name).to_string(),
        })
        .collect()
}

pub fn is_known_region(region: &str) -> bool {
    REGION_CATALOG.iter().any(|(id, _)| *id == region)
}
