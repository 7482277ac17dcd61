//! Log stream payloads of the log service (camelCase JSON protocol).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Page, PageToken};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStream {
    #[serde(default)]
    pub log_stream_name: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub creation_time: Option<i64>,
    #[serde(default)]
    pub first_event_timestamp: Option<i64>,
    #[serde(default)]
    pub last_event_timestamp: Option<i64>,
    #[serde(default)]
    pub last_ingestion_time: Option<i64>,
    #[serde(default)]
    pub stored_bytes: Option<u64>,
}

impl LogStream {
    pub fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.last_event_timestamp.and_then(DateTime::from_timestamp_millis)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeLogStreamsRequest {
    pub log_group_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_stream_name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<PageToken>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeLogStreamsResponse {
    #[serde(default)]
    pub log_streams: Option<Vec<LogStream>>,
    #[serde(default)]
    pub next_token: Option<PageToken>,
}

impl From<DescribeLogStreamsResponse> for Page<LogStream> {
    fn from(response: DescribeLogStreamsResponse) -> Self {
        Page::new(response.log_streams.unwrap_or_default(), response.next_token)
    }
}
