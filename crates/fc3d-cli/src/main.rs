mod config;
mod display;
mod pipeline;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use fc3d_core::stats::{DEFAULT_STATS_WINDOW, PICK_3D, PICK_5_CODE};
use fc3d_sources::{build_adapters, Orchestrator};
use fc3d_store::SnapshotStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use config::{Cli, Command, FetchArgs};
use pipeline::{EXIT_FATAL, EXIT_FRESH};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    ExitCode::from(exit_status(dispatch(cli).await))
}

/// Map a command result to the process exit status. Errors are reported
/// here and always exit [`EXIT_FATAL`].
fn exit_status(result: anyhow::Result<u8>) -> u8 {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            EXIT_FATAL
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<u8> {
    let store = SnapshotStore::new(cli.store.store_config());

    match cli.command {
        Command::Fetch(args) => fetch(&args, &store).await,
        Command::Show => {
            let view = store.load_latest().context("reading latest view")?;
            display::print_latest_card(&mut io::stdout().lock(), &view)?;
            Ok(EXIT_FRESH)
        }
        Command::History { search, limit } => {
            let snapshot = store.load_snapshot().context("reading snapshot")?;
            let rows = display::filter_history(&snapshot, search.as_deref(), limit);
            display::print_history(&mut io::stdout().lock(), &rows)?;
            Ok(EXIT_FRESH)
        }
        Command::Stats { window } => {
            let snapshot = store.load_snapshot().context("reading snapshot")?;
            if snapshot.is_degraded() {
                warn!("snapshot holds only the placeholder record");
            }
            let stats = fc3d_core::analyse(&snapshot.data, window);
            display::print_stats(&mut io::stdout().lock(), &stats)?;
            Ok(EXIT_FRESH)
        }
        Command::Predict { seed } => {
            let snapshot = store.load_snapshot().context("reading snapshot")?;
            if snapshot.is_degraded() {
                warn!("snapshot holds only the placeholder record");
            }
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let pick_3d = fc3d_core::predict(&snapshot.data, PICK_3D, &mut rng);
            let pick_5_code = fc3d_core::predict(&snapshot.data, PICK_5_CODE, &mut rng);
            let draws = fc3d_core::analyse(&snapshot.data, DEFAULT_STATS_WINDOW).draws;
            display::print_prediction(&mut io::stdout().lock(), draws, &pick_3d, &pick_5_code)?;
            Ok(EXIT_FRESH)
        }
    }
}

async fn fetch(args: &FetchArgs, store: &SnapshotStore) -> anyhow::Result<u8> {
    let config = args.pipeline_config();
    tracing::info!(
        "fc3d v{} fetching from {:?}",
        env!("CARGO_PKG_VERSION"),
        config.sources.iter().map(ToString::to_string).collect::<Vec<_>>()
    );

    let adapters = build_adapters(&config.sources, &config.http).context("building HTTP client")?;
    let orchestrator = Orchestrator::new(adapters, config.source_timeout);
    let now = chrono::Local::now().naive_local();

    let outcome = pipeline::run(&orchestrator, store, config.window, now).await?;
    match &outcome {
        pipeline::RunOutcome::Fresh {
            persisted, newest, ..
        } => eprintln!(
            "Saved {persisted} draws (newest {newest}) to {}",
            store.config().snapshot_path.display()
        ),
        pipeline::RunOutcome::Degraded { period } => eprintln!(
            "No source returned data; wrote placeholder {period} to {}",
            store.config().snapshot_path.display()
        ),
    }
    Ok(outcome.code())
}
