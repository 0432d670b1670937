//! Battle command - run and narrate one battle
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play(), report_result()
//! - Level 3: Narrator::describe() - one line per combat event
//! - Level 4: formatting utilities

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use skirmish_arena::{Battle, BattleResult, Outcome};
use skirmish_core::{AbilityCatalog, ActionKind, Character, CharacterId, CombatEvent, Team};

use crate::setup::{self, Setup, SetupArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BattleArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Pause between turns, in milliseconds
    #[arg(long, default_value = "0")]
    pub pace_ms: u64,

    /// Output the full result as JSON instead of narrating
    #[arg(long)]
    pub json: bool,
}

type Names = BTreeMap<CharacterId, String>;

/// Turns combat events into readable lines
struct Narrator<'a> {
    names: &'a Names,
    catalog: &'a AbilityCatalog,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run battle command
pub async fn run(args: BattleArgs) -> Result<()> {
    let setup = setup::load(&args.setup)?;
    let names = setup.names();

    tracing::info!(
        "Starting battle: {} vs {} (seed={})",
        setup.team_a_name,
        setup.team_b_name,
        setup.config.seed
    );

    let narrator = Narrator { names: &names, catalog: &setup.catalog };
    let result = play(&setup, &narrator, &args).await?;
    report_result(&result, &setup, &names, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

async fn play(setup: &Setup, narrator: &Narrator<'_>, args: &BattleArgs) -> Result<BattleResult> {
    let mut battle = Battle::new(
        &setup.catalog,
        setup.team_a.clone(),
        setup.team_b.clone(),
        setup.config.clone(),
    )
    .context("Failed to start battle")?;

    if !args.json {
        narrator.narrate(battle.log());
    }
    while battle.is_running() {
        let events = battle.play_turn();
        if !args.json {
            narrator.narrate(&events);
        }
        if args.pace_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.pace_ms)).await;
        }
    }
    Ok(battle.finish())
}

fn report_result(result: &BattleResult, setup: &Setup, names: &Names, json: bool) -> Result<()> {
    if json {
        let output = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
        println!("{}", output);
        return Ok(());
    }

    let verdict = match result.outcome {
        Outcome::TeamAVictory => format!("{} win", setup.team_a_name),
        Outcome::TeamBVictory => format!("{} win", setup.team_b_name),
        Outcome::Draw => "Draw".to_string(),
    };
    println!("\n=== Battle Result ===");
    println!("Outcome: {}", verdict);
    println!("Rounds:  {}  Turns: {}  Seed: {}", result.rounds, result.turns, result.seed);

    println!(
        "\n{:<16} {:>4} {:>9} {:>6} {:>6} {:>5} {:>5} {:>4}",
        "Name", "Team", "HP", "Dealt", "Taken", "Heal", "Kills", "XP"
    );
    for (team, members) in [(Team::A, &result.team_a), (Team::B, &result.team_b)] {
        for character in members {
            print_character_row(character, team, result, names);
        }
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

impl Narrator<'_> {
    fn narrate(&self, events: &[CombatEvent]) {
        for event in events {
            if let Some(line) = self.describe(event) {
                println!("{}", line);
            }
        }
    }

    /// One line of narration, or `None` for events not worth printing
    fn describe(&self, event: &CombatEvent) -> Option<String> {
        let name = |id: &CharacterId| name_of(self.names, *id);
        let line = match event {
            CombatEvent::CombatStarted { order } => {
                let order: Vec<String> = order.iter().map(|(id, init)| format!("{} ({})", name(id), init)).collect();
                format!("Initiative: {}", order.join(", "))
            }
            CombatEvent::TurnStarted { round, actor, ap } => {
                format!("\n-- Round {}: {} ({} AP)", round, name(actor), ap)
            }
            CombatEvent::StatusTick { target, condition, damage } => {
                format!("   {} suffers {} from {}", name(target), damage, condition.name())
            }
            CombatEvent::StatusExpired { target, condition } => {
                format!("   {} is no longer {}", name(target), condition.name())
            }
            CombatEvent::Incapacitated { actor } => format!("   {} cannot act", name(actor)),
            CombatEvent::Action(report) => {
                let what = match report.action {
                    ActionKind::BasicAttack => "attacks".to_string(),
                    ActionKind::Ability(id) => format!("uses {}", self.catalog.get(id).name),
                };
                let hits: Vec<String> = report
                    .hits
                    .iter()
                    .map(|hit| {
                        let mut text = if !hit.hit {
                            format!("{} (miss)", name(&hit.target))
                        } else if hit.healing {
                            format!("{} +{}", name(&hit.target), hit.amount)
                        } else {
                            format!("{} -{}", name(&hit.target), hit.amount)
                        };
                        if hit.critical {
                            text.push_str(" critical!");
                        }
                        if hit.saved {
                            text.push_str(" (saved)");
                        }
                        for condition in &hit.inflicted {
                            text.push_str(&format!(" [{}]", condition.name()));
                        }
                        text
                    })
                    .collect();
                format!("   {} {}: {}", name(&report.actor), what, hits.join(", "))
            }
            CombatEvent::Moved { actor, path } => {
                format!("   {} moves {} cells", name(actor), path.len().saturating_sub(1))
            }
            CombatEvent::Defeated { target } => format!("   {} falls!", name(target)),
            CombatEvent::TurnEnded { .. } => return None,
            CombatEvent::CombatEnded { winner, rounds } => match winner {
                Some(team) => format!("\nTeam {:?} is victorious after {} rounds", team, rounds),
                None => format!("\nDraw after {} rounds", rounds),
            },
        };
        Some(line)
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn name_of(names: &Names, id: CharacterId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

fn print_character_row(character: &Character, team: Team, result: &BattleResult, names: &Names) {
    let stats = result.statistics.characters.get(&character.id);
    println!(
        "{:<16} {:>4} {:>9} {:>6} {:>6} {:>5} {:>5} {:>4}",
        name_of(names, character.id),
        format!("{:?}", team),
        format!("{}/{}", character.hp, character.max_hp),
        stats.map_or(0, |s| s.damage_dealt),
        stats.map_or(0, |s| s.damage_taken),
        stats.map_or(0, |s| s.healing_done),
        stats.map_or(0, |s| s.kills),
        character.experience
    );
}
