//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use fc3d_core::{stats::DEFAULT_STATS_WINDOW, DEFAULT_WINDOW};
use fc3d_sources::{HttpSettings, SourceKind};
use fc3d_store::{StoreConfig, DEFAULT_DIR, DEFAULT_LATEST_FILE, DEFAULT_SNAPSHOT_FILE};

#[derive(Parser, Debug)]
#[command(name = "fc3d", version)]
#[command(about = "Fetch, merge and persist Fucai 3D draw results from several sources")]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "FC3D_LOG", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch from every source, merge, and write the snapshot
    Fetch(FetchArgs),
    /// Print the latest persisted draw
    Show,
    /// List persisted draws, newest first
    History {
        /// Only periods containing this text
        #[arg(long, short)]
        search: Option<String>,
        /// Maximum rows to print
        #[arg(long, short, default_value_t = 10)]
        limit: usize,
    },
    /// Digit frequency and type distribution over recent draws
    Stats {
        /// Newest draws to analyse
        #[arg(long, short, default_value_t = DEFAULT_STATS_WINDOW, value_parser = positive())]
        window: usize,
    },
    /// Frequency-weighted 3D and five-code picks from recent draws
    Predict {
        /// Seed for a repeatable pick
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Parser for counts that must be at least 1.
fn positive() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..)
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Directory holding the snapshot documents
    #[arg(long, env = "FC3D_DATA_DIR", default_value = DEFAULT_DIR, global = true)]
    pub data_dir: PathBuf,

    /// File name of the full snapshot
    #[arg(long, env = "FC3D_SNAPSHOT_FILE", default_value = DEFAULT_SNAPSHOT_FILE, global = true)]
    pub snapshot_file: String,

    /// File name of the latest-draw view
    #[arg(long, env = "FC3D_LATEST_FILE", default_value = DEFAULT_LATEST_FILE, global = true)]
    pub latest_file: String,
}

impl StoreArgs {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::in_dir(&self.data_dir, &self.snapshot_file, &self.latest_file)
    }
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Sources in precedence order; the first wins on conflicting periods
    #[arg(
        long,
        env = "FC3D_SOURCES",
        value_delimiter = ',',
        default_values_t = SourceKind::DEFAULT_PRECEDENCE
    )]
    pub sources: Vec<SourceKind>,

    /// Records kept in the snapshot
    #[arg(long, env = "FC3D_WINDOW", default_value_t = DEFAULT_WINDOW, value_parser = positive())]
    pub window: usize,

    /// Budget per source, in seconds
    #[arg(long, env = "FC3D_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Pause between page requests to paginated sources, in milliseconds
    #[arg(long, env = "FC3D_PAGE_DELAY_MS", default_value_t = 500)]
    pub page_delay_ms: u64,

    /// Pages requested from paginated sources
    #[arg(long, env = "FC3D_ZHCW_PAGES", default_value_t = 2)]
    pub zhcw_pages: u32,
}

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sources: Vec<SourceKind>,
    pub window: usize,
    pub source_timeout: Duration,
    pub http: HttpSettings,
}

impl FetchArgs {
    pub fn pipeline_config(&self) -> PipelineConfig {
        let source_timeout = Duration::from_secs(self.timeout_secs.max(1));
        let http = HttpSettings {
            request_timeout: source_timeout,
            page_delay: Duration::from_millis(self.page_delay_ms),
            max_pages: self.zhcw_pages.max(1),
            page_size: self.window.clamp(1, 100),
        };
        PipelineConfig {
            sources: self.sources.clone(),
            window: self.window,
            source_timeout,
            http,
        }
    }
}
