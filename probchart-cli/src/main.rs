//! probchart CLI — inspect prediction-market probability payloads.
//!
//! Commands:
//! - `resolve` — step value (or bridge point) of every market at a time
//! - `timeline` — unified timeline across all markets
//! - `top` — markets ranked by value at a time
//! - `export` — aligned step values as CSV
//! - `demo` — synthetic payload for trying the other commands

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use probchart_core::export::export_aligned_csv;
use probchart_core::ingest::{self, IngestOptions, Ingested};
use probchart_core::ranking::rank_series;
use probchart_core::synthetic::{generate, SyntheticParams};
use probchart_core::{
    align_series, build_unified_timeline, interpolate_at, resolve_at, ChartConfig, CursorTime,
    RangeWindow, Series,
};

#[derive(Parser)]
#[command(
    name = "probchart",
    about = "probchart CLI — step-hold probability charts for prediction markets"
)]
struct Cli {
    /// Chart config (TOML). Defaults to $CONFIG_DIR/probchart/config.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PayloadArgs {
    /// Event payload JSON (`-` for stdin).
    payload: PathBuf,

    /// Trailing window: 1h, 6h, 1d, 1w, 1m or all. Defaults to the config.
    #[arg(long)]
    range: Option<RangeWindow>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every market at a time.
    Resolve {
        #[command(flatten)]
        input: PayloadArgs,

        /// Unix timestamp or `latest`.
        #[arg(long, default_value = "latest")]
        at: CursorTime,

        /// Linearly interpolate between samples (bridge points).
        #[arg(long, default_value_t = false)]
        interpolate: bool,
    },
    /// Print the unified timeline.
    Timeline {
        #[command(flatten)]
        input: PayloadArgs,
    },
    /// Rank markets by their value at a time.
    Top {
        #[command(flatten)]
        input: PayloadArgs,

        /// Unix timestamp or `latest`.
        #[arg(long, default_value = "latest")]
        at: CursorTime,

        /// Number of markets to keep. Defaults to the config's top_limit.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Export aligned step values as CSV.
    Export {
        #[command(flatten)]
        input: PayloadArgs,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a synthetic payload.
    Demo {
        #[arg(long, default_value_t = 3)]
        markets: usize,

        #[arg(long, default_value_t = 240)]
        points: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Serialize)]
struct ResolveOutput<'a> {
    at: i64,
    values: Vec<ResolveRow<'a>>,
    /// Markets with no samples in range.
    no_data: Vec<&'a str>,
}

#[derive(Serialize)]
struct ResolveRow<'a> {
    series_id: &'a str,
    name: &'a str,
    value: f64,
    is_interpolated: bool,
}

#[derive(Serialize)]
struct TopRow<'a> {
    rank: usize,
    id: &'a str,
    name: &'a str,
    value: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ChartConfig::load_or_default(cli.config.as_deref())
        .context("failed to load chart config")?;

    match cli.command {
        Commands::Resolve {
            input,
            at,
            interpolate,
        } => run_resolve(&config, &input, at, interpolate),
        Commands::Timeline { input } => run_timeline(&config, &input),
        Commands::Top { input, at, limit } => run_top(&config, &input, at, limit),
        Commands::Export { input, output } => run_export(&config, &input, output.as_deref()),
        Commands::Demo {
            markets,
            points,
            seed,
        } => run_demo(markets, points, seed),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Read, ingest and window the payload.
fn load_series(config: &ChartConfig, input: &PayloadArgs) -> Result<Vec<Series>> {
    let options = IngestOptions::from(config);
    let Ingested { series, report } = if input.payload == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read payload from stdin")?;
        ingest::parse_payload(&text, &options)?
    } else {
        ingest::load_payload(&input.payload, &options)
            .with_context(|| format!("failed to load {}", input.payload.display()))?
    };

    if report.samples_dropped > 0 || report.samples_coerced > 0 || report.markets_skipped > 0 {
        warn!(
            markets_skipped = report.markets_skipped,
            dropped = report.samples_dropped,
            coerced = report.samples_coerced,
            "payload had malformed samples"
        );
    }
    info!(markets = report.markets, samples = report.samples_kept, "payload loaded");

    let window = input.range.unwrap_or(config.default_range);
    Ok(window.apply(&series, config.time_unit))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn run_resolve(
    config: &ChartConfig,
    input: &PayloadArgs,
    at: CursorTime,
    interpolate: bool,
) -> Result<()> {
    let series = load_series(config, input)?;
    let Some(t) = at.resolve(&series) else {
        bail!("no data available: every market is empty");
    };

    let mut values = Vec::new();
    let mut no_data = Vec::new();
    for s in &series {
        if s.is_empty() {
            no_data.push(s.id.as_str());
            continue;
        }
        let resolved = if interpolate {
            interpolate_at(s, t)?
        } else {
            resolve_at(s, t)?
        };
        values.push(ResolveRow {
            series_id: s.id.as_str(),
            name: s.name.as_str(),
            value: resolved.value,
            is_interpolated: resolved.is_interpolated,
        });
    }

    print_json(&ResolveOutput {
        at: t,
        values,
        no_data,
    })
}

fn run_timeline(config: &ChartConfig, input: &PayloadArgs) -> Result<()> {
    let series = load_series(config, input)?;
    print_json(&build_unified_timeline(&series))
}

fn run_top(
    config: &ChartConfig,
    input: &PayloadArgs,
    at: CursorTime,
    limit: Option<usize>,
) -> Result<()> {
    let series = load_series(config, input)?;
    let limit = limit.unwrap_or(config.top_limit);

    let rows: Vec<TopRow<'_>> = rank_series(&series, at)
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, ranked)| TopRow {
            rank: i + 1,
            id: ranked.series.id.as_str(),
            name: ranked.series.name.as_str(),
            value: ranked.value,
        })
        .collect();
    print_json(&rows)
}

fn run_export(config: &ChartConfig, input: &PayloadArgs, output: Option<&Path>) -> Result<()> {
    let series = load_series(config, input)?;
    let timeline = build_unified_timeline(&series);
    let table = align_series(&series, &timeline);
    let csv = export_aligned_csv(&table, config.time_unit)?;

    match output {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} rows to {}", table.len(), path.display());
        }
        None => io::stdout()
            .write_all(csv.as_bytes())
            .context("failed to write CSV to stdout")?,
    }
    Ok(())
}

fn run_demo(markets: usize, points: usize, seed: u64) -> Result<()> {
    if markets == 0 {
        bail!("--markets must be at least 1");
    }
    let series = generate(&SyntheticParams {
        markets,
        points,
        seed,
        ..SyntheticParams::default()
    });
    println!("{}", ingest::to_payload_json(&series)?);
    Ok(())
}
