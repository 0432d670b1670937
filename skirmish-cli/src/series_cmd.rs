//! Series command - many seeded battles between two rosters
//!
//! - Level 1: run() - orchestration
//! - Level 2: report_results()
//! - Level 3: printing utilities

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use skirmish_arena::{run_series_with_progress, SeriesConfig, SeriesResult};

use crate::setup::{self, Setup, SetupArgs};

#[derive(Args)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Number of battles; battle i uses seed + i
    #[arg(long, default_value = "100")]
    pub battles: usize,

    /// Run battles on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run series command
pub fn run(args: SeriesArgs) -> Result<()> {
    let setup = setup::load(&args.setup)?;
    let config = SeriesConfig {
        battles: args.battles,
        parallel: !args.sequential,
        battle: setup.config.clone(),
    };

    tracing::info!(
        "Starting series: {} vs {} ({} battles from seed {})",
        setup.team_a_name,
        setup.team_b_name,
        config.battles,
        config.battle.seed
    );

    let bar = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(config.battles as u64)
    };
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} battles ({eta})")
            .context("Invalid progress template")?,
    );

    let result = run_series_with_progress(&setup.catalog, &setup.team_a, &setup.team_b, &config, |_| {
        bar.inc(1)
    });
    bar.finish_and_clear();

    report_results(&result, &setup, args.json)
}

fn report_results(result: &SeriesResult, setup: &Setup, json: bool) -> Result<()> {
    if json {
        print_json_results(result, setup)
    } else {
        print_text_results(result, setup);
        Ok(())
    }
}

fn print_json_results(result: &SeriesResult, setup: &Setup) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        team_a: &'a str,
        team_b: &'a str,
        team_a_win_rate: f32,
        team_b_win_rate: f32,
        draw_rate: f32,
        #[serde(flatten)]
        result: &'a SeriesResult,
    }

    let output = JsonOutput {
        team_a: &setup.team_a_name,
        team_b: &setup.team_b_name,
        team_a_win_rate: result.team_a_win_rate(),
        team_b_win_rate: result.team_b_win_rate(),
        draw_rate: result.draw_rate(),
        result,
    };
    let json = serde_json::to_string_pretty(&output).context("Failed to serialize results")?;
    println!("{}", json);
    Ok(())
}

fn print_text_results(result: &SeriesResult, setup: &Setup) {
    println!("\n=== Series Results ===");
    println!("Battles:    {}", result.battles_played);
    println!(
        "{:<11} {} ({:.1}%)",
        format!("{}:", setup.team_a_name),
        result.team_a_wins,
        result.team_a_win_rate() * 100.0
    );
    println!(
        "{:<11} {} ({:.1}%)",
        format!("{}:", setup.team_b_name),
        result.team_b_wins,
        result.team_b_win_rate() * 100.0
    );
    println!("Draws:      {} ({:.1}%)", result.draws, result.draw_rate() * 100.0);
    println!("Avg rounds: {:.1}", result.avg_rounds);
}
