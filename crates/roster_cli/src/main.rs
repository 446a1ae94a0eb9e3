//! roster CLI
//!
//! CSV → 스쿼드/라인업 선발 → JSON (stdout)
//! 진행 로그는 stderr (RUST_LOG로 조절)

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use roster_core::TossDecision;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Select auction squads and match line-ups from scored CSVs", long_about = None)]
#[command(version)]
struct Cli {
    /// Write the JSON report here instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Budgeted auction squad
    Squad {
        /// Scored + priced rows (name,season,team,nationality,role,keeper,score,cost,outcome)
        #[arg(long)]
        csv: PathBuf,

        /// Selection config (.yaml / .yml / .json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured purse
        #[arg(long)]
        purse: Option<f64>,

        /// Only consider rows from this season
        #[arg(long)]
        season: Option<u16>,
    },

    /// Playing XI (plus impact player) for one team
    Lineup {
        /// Pre-scored rows
        #[arg(long, conflicts_with = "stats", required_unless_present = "stats")]
        csv: Option<PathBuf>,

        /// Raw player stats, scored for the venue and toss
        #[arg(long)]
        stats: Option<PathBuf>,

        /// Current-season stats overriding --stats rows
        #[arg(long, requires = "stats")]
        current_season: Option<PathBuf>,

        /// Directory with a trained model snapshot (falls back to rule-based scoring)
        #[arg(long, requires = "stats")]
        model_dir: Option<PathBuf>,

        /// Team code (e.g. CSK)
        #[arg(long)]
        team: String,

        /// Venue name or alias
        #[arg(long)]
        venue: Option<String>,

        /// Toss result for this team: bat / bowl / unknown
        #[arg(long, default_value = "unknown")]
        toss: TossDecision,

        /// Current squad list (Team,Player)
        #[arg(long)]
        squad_csv: Option<PathBuf>,

        /// Selection config (.yaml / .yml / .json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let report = match cli.command {
        Commands::Squad {
            csv,
            config,
            purse,
            season,
        } => roster_cli::run_squad(&roster_cli::SquadRequest {
            csv,
            config,
            purse,
            season,
        })?,

        Commands::Lineup {
            csv,
            stats,
            current_season,
            model_dir,
            team,
            venue,
            toss,
            squad_csv,
            config,
        } => roster_cli::run_lineup(&roster_cli::LineupRequest {
            csv,
            stats,
            current_season,
            team,
            venue,
            toss,
            squad_csv,
            config,
            model_dir,
        })?,
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    match cli.out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            log::info!("report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("roster CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
