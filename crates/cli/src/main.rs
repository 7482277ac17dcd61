mod args;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use futures_util::{StreamExt, TryStreamExt};
use gluetty_engine::{
    ClientFactory, ExplorerChild, GlueServiceFactory, JobsNode, RunLogsContext, RunLogsWizard, StatusIndicator, TracingStatus,
    list_job_runs,
};
use gluetty_tui::{TerminalPresenter, clipboard_action};
use gluetty_types::{is_known_region, regions};
use gluetty_util::UserPreferences;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command, OutputFormat, REGION_ENV, RegionChoice, resolve_region};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let preferences = load_preferences();
    let region = region_for(&args, &preferences);
    if !is_known_region(&region.region) {
        warn!(region = %region.region, "region is not in the region catalog");
    }
    debug!(region = %region.region, source = ?region.source, "resolved region");

    let services: Arc<dyn GlueServiceFactory> = Arc::new(ClientFactory::new());
    let status: Arc<dyn StatusIndicator> = Arc::new(TracingStatus::default());

    match args.command {
        Command::Jobs => {
            let node = JobsNode::new(services.service_for(&region.region)?, status);
            let children = node.children().await;
            if let [ExplorerChild::Error { message }] = children.as_slice() {
                bail!("failed to list jobs in {}: {message}", region.region);
            }
            emit(&children, args.output)
        }
        Command::Runs { job, limit } => {
            let runs = list_job_runs(services.service_for(&region.region)?, status, job.as_str())
                .take(limit.unwrap_or(usize::MAX))
                .try_collect::<Vec<_>>()
                .await
                .with_context(|| format!("failed to list runs of {job}"))?;
            info!(job = %job, count = runs.len(), "listed job runs");
            emit(&runs, args.output)
        }
        Command::RunLogs { job } => {
            let context = RunLogsContext {
                services,
                presenter: Arc::new(TerminalPresenter::new()),
                status,
                actions: vec![clipboard_action("Copy job name", job.clone())],
            };
            let wizard = RunLogsWizard::new(job, context)?;
            let seeded = region.is_explicit().then_some(region.region.as_str());
            match wizard.run(seeded).await? {
                Some(selection) => emit(&selection, args.output),
                None => {
                    eprintln!("cancelled");
                    Ok(())
                }
            }
        }
        Command::Regions { set_default } => {
            if let Some(default) = set_default {
                if !is_known_region(&default) {
                    bail!("unknown region {default}; run `gluetty regions` to list the known ones");
                }
                preferences
                    .set_default_region(Some(default.clone()))
                    .with_context(|| format!("failed to save {}", preferences.path().display()))?;
                info!(region = %default, "saved default region");
            }
            emit(&regions(), args.output)
        }
    }
}

/// Logs go to stderr so the picker and the printed result own stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_preferences() -> UserPreferences {
    UserPreferences::new().unwrap_or_else(|error| {
        warn!(error = %error, "failed to load preferences; continuing without them");
        UserPreferences::ephemeral()
    })
}

fn region_for(args: &Args, preferences: &UserPreferences) -> RegionChoice {
    let environment = std::env::var(REGION_ENV).ok();
    let preference = preferences.default_region();
    resolve_region(args.region.as_deref(), environment.as_deref(), preference.as_deref())
}

fn emit<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered.trim_end()).context("failed to write output")?;
    Ok(())
}
