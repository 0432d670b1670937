//! Skirmish CLI - Command-line interface
//!
//! Commands:
//! - battle: Run one battle, narrating each turn
//! - series: Run many seeded battles and report win rates

mod battle_cmd;
mod series_cmd;
mod setup;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Hex-grid tactical battle simulator")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG wins if set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single battle
    Battle(battle_cmd::BattleArgs),
    /// Run a series of seeded battles between the same rosters
    Series(series_cmd::SeriesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Battle(args) => battle_cmd::run(args).await,
        Commands::Series(args) => series_cmd::run(args),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
