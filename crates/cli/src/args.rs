use clap::{Parser, Subcommand, ValueEnum};
use gluetty_types::DEFAULT_REGION;

/// Environment variable consulted when `--region` is not given.
pub const REGION_ENV: &str = "GLUETTY_REGION";

/// Browse Glue jobs, their runs, and the log streams of a run.
#[derive(Parser, Debug)]
#[command(name = "gluetty", version, about)]
pub struct Args {
    /// Region to query (falls back to GLUETTY_REGION, then the saved preference)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Output format for listings
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every job in the region
    Jobs,
    /// List the runs of a job, newest first
    Runs {
        job: String,
        /// Stop after this many runs
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Pick a log stream of one of the job's runs
    RunLogs { job: String },
    /// List the regions the region prompt offers
    Regions {
        /// Save this region as the default for later runs
        #[arg(long, value_name = "REGION")]
        set_default: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegionSource {
    Flag,
    Environment,
    Preferences,
    Default,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionChoice {
    pub region: String,
    pub source: RegionSource,
}

impl RegionChoice {
    /// Whether the user picked the region rather than getting the built-in default.
    pub fn is_explicit(&self) -> bool {
        self.source != RegionSource::Default
    }
}

/// Flag, then environment, then preferences, then [`DEFAULT_REGION`]. Blank values are skipped.
pub fn resolve_region(flag: Option<&str>, environment: Option<&str>, preference: Option<&str>) -> RegionChoice {
    let candidates = [
        (flag, RegionSource::Flag),
        (environment, RegionSource::Environment),
        (preference, RegionSource::Preferences),
    ];
    candidates
        .into_iter()
        .find_map(|(value, source)| {
            let value = value?.trim();
            (!value.is_empty()).then(|| RegionChoice {
                region: value.to_string(),
                source,
            })
        })
        .unwrap_or_else(|| RegionChoice {
            region: DEFAULT_REGION.to_string(),
            source: RegionSource::Default,
        })
}
