//! tickscaled — the tickscale daemon.
//!
//! Single binary that assembles the control loop:
//! - Configuration (tickscale.toml + CLI overrides)
//! - Dispatcher with one controller per function
//! - Periodic tick driver
//! - Stats logging
//! - Optional synthetic workload (request and response sources)
//!
//! # Usage
//!
//! ```text
//! tickscaled run --config tickscale.toml --functions resize,thumbnail --simulate
//! ```

mod workload;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use tickscale_autoscale::{Assignment, Dispatcher, render_prometheus};
use tickscale_core::TickscaleConfig;

use crate::workload::WorkloadConfig;

/// Used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "info,tickscaled=debug,tickscale_autoscale=debug";

#[derive(Parser)]
#[command(name = "tickscaled", about = "tickscale autoscaling daemon", version)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the control loop until Ctrl-C (or for a fixed duration).
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Path to tickscale.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Functions to register (comma separated). Overrides the config file.
    #[arg(long, value_delimiter = ',')]
    functions: Vec<String>,

    /// Tick length in milliseconds.
    #[arg(long)]
    tick_interval_ms: Option<u64>,

    /// Idle time before a container is evicted, in milliseconds.
    #[arg(long)]
    max_idle_ms: Option<u64>,

    /// Execution-time samples in the moving average.
    #[arg(long)]
    window_size: Option<usize>,

    /// Stats logging interval in seconds (0 disables).
    #[arg(long, default_value = "5")]
    stats_interval_secs: u64,

    /// Stop after this many seconds (0 runs until Ctrl-C).
    #[arg(long, default_value = "0")]
    duration_secs: u64,

    /// Drive the loop with a synthetic workload.
    #[arg(long)]
    simulate: bool,

    /// Minimum gap between synthetic requests, in milliseconds.
    #[arg(long, default_value = "400")]
    min_gap_ms: u64,

    /// Maximum gap between synthetic requests, in milliseconds.
    #[arg(long, default_value = "1000")]
    max_gap_ms: u64,

    /// Minimum synthetic execution time, in milliseconds.
    #[arg(long, default_value = "100")]
    min_exec_ms: u64,

    /// Maximum synthetic execution time, in milliseconds.
    #[arg(long, default_value = "200")]
    max_exec_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Run(args) => run(args).await,
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Merge the config file with CLI overrides.
fn load_config(args: &RunArgs) -> anyhow::Result<TickscaleConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let config = TickscaleConfig::from_file(path)?;
            info!(path = ?path, "config loaded");
            config
        }
        None => TickscaleConfig::default(),
    };

    if let Some(ms) = args.tick_interval_ms {
        config.scaler.tick_interval_ms = ms;
    }
    if let Some(ms) = args.max_idle_ms {
        config.scaler.max_idle_ms = ms;
    }
    if let Some(n) = args.window_size {
        config.scaler.execution_time_window_size = n;
    }
    if !args.functions.is_empty() {
        config.functions = args.functions.clone();
    }

    config.scaler.validate()?;
    anyhow::ensure!(
        !config.functions.is_empty(),
        "no functions configured; pass --functions or list them in the config file"
    );
    Ok(config)
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let workload_config = WorkloadConfig {
        request_gap_ms: args.min_gap_ms..=args.max_gap_ms,
        execution_ms: args.min_exec_ms..=args.max_exec_ms,
    };
    if args.simulate {
        workload_config.validate()?;
    }

    info!(
        tick_interval_ms = config.scaler.tick_interval_ms,
        max_idle_ms = config.scaler.max_idle_ms,
        window = config.scaler.execution_time_window_size,
        functions = config.functions.len(),
        "tickscale daemon starting"
    );

    // ── Dispatcher ─────────────────────────────────────────────

    let (assignment_tx, assignment_rx) = mpsc::unbounded_channel::<Assignment>();
    let mut dispatcher = Dispatcher::new(config.scaler.clone());
    if args.simulate {
        dispatcher = dispatcher.with_assignment_callback(Arc::new(move |a: &Assignment| {
            let _ = assignment_tx.send(a.clone());
        }));
    }
    let dispatcher = Arc::new(dispatcher);

    for function_id in &config.functions {
        dispatcher.register_function(function_id).await;
    }

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Start background tasks ─────────────────────────────────

    let ticker = dispatcher.spawn_ticker();

    let mut workload_handles = Vec::new();
    if args.simulate {
        workload_handles.extend(workload::spawn_request_sources(
            dispatcher.clone(),
            &config.functions,
            &workload_config,
            shutdown_rx.clone(),
        ));
        workload_handles.push(workload::spawn_response_source(
            dispatcher.clone(),
            assignment_rx,
            &workload_config,
            shutdown_rx.clone(),
        ));
        info!("synthetic workload started");
    }

    let stats_handle = (args.stats_interval_secs > 0).then(|| {
        let dispatcher = dispatcher.clone();
        let interval = Duration::from_secs(args.stats_interval_secs);
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move { log_stats(dispatcher, interval, shutdown).await })
    });

    // ── Wait for shutdown ──────────────────────────────────────

    if args.duration_secs > 0 {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
            _ = tokio::time::sleep(Duration::from_secs(args.duration_secs)) => {
                info!(secs = args.duration_secs, "run duration elapsed");
            }
        }
    } else {
        tokio::signal::ctrl_c().await?;
        info!("shutdown signal received");
    }

    // Stop producers first so no new requests race the final tick.
    let _ = shutdown_tx.send(true);
    for handle in workload_handles {
        let _ = handle.await;
    }
    ticker.shutdown().await;
    if let Some(handle) = stats_handle {
        let _ = handle.await;
    }

    let stats = dispatcher.stats().await;
    info!(
        stats = %serde_json::to_string(&stats)?,
        "final stats"
    );
    print!("{}", render_prometheus(&stats));

    info!("tickscale daemon stopped");
    Ok(())
}

/// Log per-function stats as JSON until shutdown.
async fn log_stats(
    dispatcher: Arc<Dispatcher>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                for stats in dispatcher.stats().await {
                    match serde_json::to_string(&stats) {
                        Ok(json) => info!(function = %stats.function_id, stats = %json, "function stats"),
                        Err(e) => warn!(error = %e, "failed to serialize stats"),
                    }
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}
