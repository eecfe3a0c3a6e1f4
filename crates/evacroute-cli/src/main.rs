use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use evacroute_cli::commands::hazards::handle_hazards;
use evacroute_cli::commands::nearest::handle_nearest;
use evacroute_cli::commands::rank::{handle_rank, RankOptions};
use evacroute_cli::output::{render_hazards, render_nearest, render_rank, OutputFormat};
use evacroute_cli::terminal::ColorPalette;
use evacroute_lib::RankingStrategy;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evacuation center lookup and hazard-aware route ranking")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the evacuation center closest to a point.
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// JSON array of evacuation centers.
        #[arg(long)]
        centers: PathBuf,
    },
    /// Rank the routes of a saved directions response against hazard zones.
    Rank {
        /// Saved directions provider response (JSON).
        #[arg(long)]
        directions: PathBuf,
        #[arg(long, value_enum, default_value_t = StrategyArg::RiskThenTime)]
        strategy: StrategyArg,
        /// Treat the flood event as active.
        #[arg(long)]
        flood: bool,
        /// Treat the earthquake event as active.
        #[arg(long)]
        earthquake: bool,
        #[arg(long)]
        flood_hazards: Option<PathBuf>,
        #[arg(long)]
        earthquake_hazards: Option<PathBuf>,
    },
    /// Summarize hazard zone datasets.
    Hazards {
        #[arg(long)]
        flood_hazards: Option<PathBuf>,
        #[arg(long)]
        earthquake_hazards: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    RiskThenTime,
    TimePlusPenalty,
}

impl From<StrategyArg> for RankingStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::RiskThenTime => RankingStrategy::RiskThenTime,
            StrategyArg::TimePlusPenalty => RankingStrategy::TimePlusPenalty,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let palette = ColorPalette::detect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let written = match cli.command {
        Command::Nearest { lat, lng, centers } => {
            let report = handle_nearest(&centers, lat, lng)?;
            render_nearest(&mut out, &report, cli.format, palette)
        }
        Command::Rank {
            directions,
            strategy,
            flood,
            earthquake,
            flood_hazards,
            earthquake_hazards,
        } => {
            let report = handle_rank(&RankOptions {
                directions,
                strategy: strategy.into(),
                flood,
                earthquake,
                flood_hazards,
                earthquake_hazards,
            })?;
            render_rank(&mut out, &report, cli.format, palette)
        }
        Command::Hazards {
            flood_hazards,
            earthquake_hazards,
        } => {
            let summary = handle_hazards(flood_hazards.as_deref(), earthquake_hazards.as_deref())?;
            render_hazards(&mut out, &summary, cli.format, palette)
        }
    };
    written.context("failed to write output")?;

    out.flush().context("failed to write output")
}

/// Logs go to stderr so stdout stays parseable with `--format json`.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
