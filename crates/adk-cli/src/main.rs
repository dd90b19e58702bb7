use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use adk_config::RunConfig;
use adk_diag::{DiagSink, JsonlSink, TracingSink};
use adk_engine::{BacktestEngine, BacktestReport};
use adk_feed::SliceAssembler;

#[derive(Parser)]
#[command(name = "adk")]
#[command(about = "AlgoDesk backtest runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest described by a YAML run config
    Backtest {
        /// Run config path
        #[arg(long)]
        config: PathBuf,

        /// Write the full JSON report here (the summary always prints)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List registered algorithms
    Algos,

    /// Print the canonical config hash for a run config
    ConfigHash {
        /// Run config path
        path: PathBuf,
    },
}

/// What `adk backtest` prints; the full report goes to `--report`.
#[derive(Serialize)]
struct RunSummary {
    run_id: String,
    algorithm: String,
    config_hash: String,
    ticks: u64,
    fills: usize,
    rejections: usize,
    unsettled: usize,
    renames_applied: usize,
    universe_revisions: u32,
    final_equity_micros: i64,
}

impl RunSummary {
    fn new(report: &BacktestReport, config_hash: String) -> Self {
        Self {
            run_id: report.run_id.clone(),
            algorithm: report.algorithm.clone(),
            config_hash,
            ticks: report.ticks,
            fills: report.fills.len(),
            rejections: report.rejections.len(),
            unsettled: report.unsettled.len(),
            renames_applied: report.renames_applied.len(),
            universe_revisions: report.universe_revisions,
            final_equity_micros: report.final_equity_micros(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Backtest { config, report } => run_backtest(config, report),
        Commands::Algos => list_algos(),
        Commands::ConfigHash { path } => {
            let config = adk_config::load_run_config(&path)?;
            println!("config_hash={}", adk_config::config_hash(&config)?);
            Ok(())
        }
    }
}

fn list_algos() -> Result<()> {
    let registry = adk_algos::default_registry()?;
    for meta in registry.list() {
        println!("{} {} - {}", meta.name, meta.version, meta.description);
    }
    Ok(())
}

fn assemble_ticks(config: &RunConfig) -> Result<Vec<adk_engine::TickInput>> {
    let mut assembler = SliceAssembler::new();
    let data = &config.data;

    if let Some(path) = &data.bars {
        let bars = adk_feed::load_bars_csv(path)
            .with_context(|| format!("load bars: {}", path.display()))?;
        assembler = assembler.with_bars(bars);
    }
    if let Some(path) = &data.weekly_sentiment {
        let symbol = data.weekly_sentiment_symbol.as_deref();
        let customs = adk_feed::load_weekly_sentiment_csv(path, symbol)
            .with_context(|| format!("load weekly sentiment: {}", path.display()))?;
        assembler = assembler.with_customs(customs);
    }
    if let Some(path) = &data.message_sentiment {
        let customs = adk_feed::load_message_sentiment_csv(path)
            .with_context(|| format!("load message sentiment: {}", path.display()))?;
        assembler = assembler.with_customs(customs);
    }
    if let Some(path) = &data.renames {
        let renames = adk_feed::load_renames_csv(path)
            .with_context(|| format!("load renames: {}", path.display()))?;
        assembler = assembler.with_renames(renames);
    }
    if let Some(path) = &data.universe {
        let universe = adk_feed::load_universe_csv(path)
            .with_context(|| format!("load universe snapshots: {}", path.display()))?;
        assembler = assembler.with_universe(universe);
    }

    assembler.assemble().context("assemble slices")
}

fn run_backtest(config_path: PathBuf, report_path: Option<PathBuf>) -> Result<()> {
    let config = adk_config::load_run_config(&config_path)?;
    let config_hash = adk_config::config_hash(&config)?;

    let registry = adk_algos::default_registry()?;
    let algorithm = registry
        .instantiate(&config.algorithm)
        .with_context(|| format!("unknown algorithm '{}'", config.algorithm))?;

    let ticks = assemble_ticks(&config)?;
    tracing::info!(
        algorithm = %config.algorithm,
        ticks = ticks.len(),
        config_hash = %config_hash,
        "starting backtest"
    );

    let mut engine = BacktestEngine::new(config.engine.to_backtest_config());
    engine.register_algorithm(algorithm)?;

    let sink: Box<dyn DiagSink> = match &config.diagnostics {
        Some(path) => Box::new(
            JsonlSink::new(path)
                .with_context(|| format!("open diagnostics sink: {}", path.display()))?,
        ),
        None => Box::new(TracingSink),
    };
    let report = engine
        .run_with_sink(&ticks, sink.as_ref())
        .context("backtest run failed")?;

    if let Some(path) = &report_path {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        fs::write(path, json).with_context(|| format!("write report: {}", path.display()))?;
        tracing::info!(report = %path.display(), "report written");
    }

    let summary = RunSummary::new(&report, config_hash);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
