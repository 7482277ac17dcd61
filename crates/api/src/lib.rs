//! Remote listing client for the ETL job and log services.
//!
//! This module provides a lightweight client for the two JSON-RPC style
//! services gluetty reads from. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Discovering an optional bearer token from `GLUETTY_API_TOKEN`
//! - Validating `GLUETTY_GLUE_API_BASE` / `GLUETTY_LOGS_API_BASE` for safety
//! - Issuing `X-Amz-Target` requests and decoding one [`Page`] per call
//!
//! Request signing is expected to happen in a fronting proxy; the client only
//! forwards the bearer token when one is configured.
//!
//! # Example
//!
//! ```ignore
//! use gluetty_api::GlueClient;
//!
//! async fn first_page() -> anyhow::Result<()> {
//!     let client = GlueClient::new_from_env("eu-west-1")?;
//!     let page = client.get_jobs(None).await?;
//!     println!("{} jobs, more: {}", page.items.len(), !page.is_last());
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use gluetty_types::{
    DescribeLogStreamsRequest, DescribeLogStreamsResponse, GetJobRunsRequest, GetJobRunsResponse, GetJobsRequest, GetJobsResponse,
    GlueJob, JobRun, LogStream, Page, PageToken, ServiceId, ToServiceIdInfo,
};
use gluetty_util::{redact_sensitive, truncate_preview};
use reqwest::{Client, RequestBuilder, Url, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

/// Environment variable carrying an optional bearer token.
pub const API_TOKEN_ENV: &str = "GLUETTY_API_TOKEN";

const AMZ_JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const TARGET_HEADER: &str = "x-amz-target";

/// Allowed hostnames or base domains for non-local endpoints. Subdomains of
/// these domains are also allowed.
const ALLOWED_SERVICE_DOMAINS: &[&str] = &["amazonaws.com", "amazonaws.com.cn"];
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Resolved endpoint and credential settings for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub region: String,
    pub glue_base_url: String,
    pub logs_base_url: String,
    pub api_token: Option<String>,
}

impl ClientSettings {
    /// Resolve settings from the environment, falling back to the public
    /// regional endpoints. Every base URL is validated.
    pub fn from_env(region: &str) -> Result<Self> {
        let resolve = |service: ServiceId| env::var(service.env_var()).unwrap_or_else(|_| service.default_base_url(region));
        let settings = Self {
            region: region.to_string(),
            glue_base_url: resolve(ServiceId::Glue),
            logs_base_url: resolve(ServiceId::Logs),
            api_token: env::var(API_TOKEN_ENV).ok().filter(|token| !token.trim().is_empty()),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn base_url(&self, service: ServiceId) -> &str {
        match service {
            ServiceId::Glue => &self.glue_base_url,
            ServiceId::Logs => &self.logs_base_url,
        }
    }

    fn validate(&self) -> Result<()> {
        validate_base_url(ServiceId::Glue, &self.glue_base_url)?;
        validate_base_url(ServiceId::Logs, &self.logs_base_url)
    }
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client`.
///
/// The client pre-configures default headers and builds requests against
/// validated per-service base URLs.
pub struct GlueClient {
    settings: ClientSettings,
    http: Client,
    user_agent: String,
}

impl GlueClient {
    /// Construct a [`GlueClient`] from environment variables for `region`.
    pub fn new_from_env(region: &str) -> Result<Self> {
        Self::new(ClientSettings::from_env(region)?)
    }

    pub fn new(settings: ClientSettings) -> Result<Self> {
        settings.validate()?;

        let mut default_headers = header::HeaderMap::new();
        if let Some(api_token) = &settings.api_token {
            let authorization_header_value = format!("Bearer {}", api_token);
            default_headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&authorization_header_value).context("invalid characters in API token")?,
            );
        }
        default_headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static(AMZ_JSON_CONTENT_TYPE));
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;

        Ok(Self {
            settings,
            http,
            user_agent: format!("gluetty/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    pub fn region(&self) -> &str {
        &self.settings.region
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Build a `reqwest::RequestBuilder` for one service operation.
    pub fn request(&self, service: ServiceId, operation: &str) -> RequestBuilder {
        let url = format!("{}/", self.settings.base_url(service).trim_end_matches('/'));
        let target = target_header_value(service, operation);
        debug!(%url, %target, "building request");

        self.http
            .post(url)
            .header(header::USER_AGENT, &self.user_agent)
            .header(TARGET_HEADER, target)
    }

    /// Send one operation and decode its JSON response.
    pub async fn call<Req, Resp>(&self, service: ServiceId, operation: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .request(service, operation)
            .json(body)
            .send()
            .await
            .with_context(|| format!("{operation}: network error"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("{operation}: failed to read response body"))?;

        if !status.is_success() {
            return Err(anyhow!("{operation} failed with HTTP {}: {}", status.as_u16(), describe_error_body(&text)));
        }

        serde_json::from_str(&text).with_context(|| {
            format!(
                "{operation}: unreadable response body: {}",
                truncate_preview(&redact_sensitive(&text), 200)
            )
        })
    }

    /// One page of job definitions.
    pub async fn get_jobs(&self, next_token: Option<PageToken>) -> Result<Page<GlueJob>> {
        let request = GetJobsRequest {
            next_token,
            max_results: None,
        };
        let response: GetJobsResponse = self.call(ServiceId::Glue, "GetJobs", &request).await?;
        Ok(response.into())
    }

    /// One page of runs for `job_name`, newest first as returned by the service.
    pub async fn get_job_runs(&self, job_name: &str, next_token: Option<PageToken>) -> Result<Page<JobRun>> {
        let request = GetJobRunsRequest {
            job_name: job_name.to_string(),
            next_token,
            max_results: None,
        };
        let response: GetJobRunsResponse = self.call(ServiceId::Glue, "GetJobRuns", &request).await?;
        Ok(response.into())
    }

    /// One page of log streams in `log_group_name` whose names start with `prefix`.
    pub async fn describe_log_streams(
        &self,
        log_group_name: &str,
        prefix: Option<&str>,
        next_token: Option<PageToken>,
    ) -> Result<Page<LogStream>> {
        let request = DescribeLogStreamsRequest {
            log_group_name: log_group_name.to_string(),
            log_stream_name_prefix: prefix.map(str::to_string),
            next_token,
        };
        let response: DescribeLogStreamsResponse = self.call(ServiceId::Logs, "DescribeLogStreams", &request).await?;
        Ok(response.into())
    }
}

/// `X-Amz-Target` value for an operation, e.g. `AWSGlue.GetJobs`.
pub fn target_header_value(service: ServiceId, operation: &str) -> String {
    format!("{}.{}", service.target_prefix(), operation)
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(rename = "__type", default)]
    kind: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

/// Summarize an error response: the service's error type and message when the
/// body is structured, a redacted preview otherwise.
fn describe_error_body(text: &str) -> String {
    if let Ok(ServiceErrorBody { kind, message }) = serde_json::from_str::<ServiceErrorBody>(text) {
        let kind = kind.map(|kind| kind.rsplit('#').next().unwrap_or_default().to_string());
        match (kind, message) {
            (Some(kind), Some(message)) => return format!("{kind}: {}", redact_sensitive(&message)),
            (Some(kind), None) => return kind,
            (None, Some(message)) => return redact_sensitive(&message),
            (None, None) => {}
        }
    }
    truncate_preview(&redact_sensitive(text), 200)
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS, and host must be one of the allowed
///   service domains or a subdomain thereof
fn validate_base_url(service: ServiceId, base: &str) -> Result<()> {
    let env_var = service.env_var();
    let parsed_base_url = Url::parse(base).map_err(|e| anyhow!("Invalid {} URL '{}': {}", env_var, base, e))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| anyhow!("{} must include a host", env_var))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(anyhow!(
            "{} must use https for non-localhost hosts; got '{}://'",
            env_var,
            parsed_base_url.scheme()
        ));
    }

    let is_allowed_domain = ALLOWED_SERVICE_DOMAINS.iter().any(|&allowed_domain| {
        host_name.eq_ignore_ascii_case(allowed_domain) || host_name.ends_with(&format!(".{}", allowed_domain))
    });
    if !is_allowed_domain {
        return Err(anyhow!(
            "{} host '{}' is not allowed; must be one of {:?} or a subdomain, or localhost",
            env_var,
            host_name,
            ALLOWED_SERVICE_DOMAINS
        ));
    }

    Ok(())
}
