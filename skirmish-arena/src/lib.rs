//! Skirmish Arena - Running whole battles
//!
//! This crate drives the core turn engine with the decision engine:
//! - Battle orchestration and termination
//! - Per-character and per-team statistics
//! - Seeded series of independent battles
//!
//! ## Architecture
//!
//! - Level 1: run_series (orchestration)
//! - Level 2: simulate_battle, Battle (phases)
//! - Level 3: Battle::play_turn, BattleStatistics::record (steps)
//! - Level 4: configuration

mod battle;
mod config;
mod series;
mod stats;

pub use battle::{simulate_battle, Battle, BattleResult, Outcome};
pub use config::{BattleConfig, SeriesConfig};
pub use series::{run_series, run_series_with_progress, BattleSummary, SeriesResult};
pub use stats::{BattleStatistics, CharacterStats, TeamStats};
