//! Configuration types for battles and series
//!
//! Level 4 - Utilities and configuration

use serde::{Deserialize, Serialize};
use skirmish_core::combat::DEFAULT_VICTORY_EXPERIENCE;
use skirmish_core::Personality;

/// Settings for a single battle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Rounds before the battle is called a draw
    pub max_rounds: u32,
    /// Seed for initiative, dice and AI choices
    pub seed: u64,
    pub battlefield_width: i32,
    pub battlefield_height: i32,
    /// Experience for each surviving winner
    pub victory_experience: u32,
    pub team_a: Personality,
    pub team_b: Personality,
    /// Upper bound on decisions in one turn
    pub max_actions_per_turn: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_rounds: 50,
            seed: 42,
            battlefield_width: 10,
            battlefield_height: 8,
            victory_experience: DEFAULT_VICTORY_EXPERIENCE,
            team_a: Personality::default(),
            team_b: Personality::default(),
            max_actions_per_turn: 32,
        }
    }
}

impl BattleConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_battlefield(mut self, width: i32, height: i32) -> Self {
        self.battlefield_width = width;
        self.battlefield_height = height;
        self
    }

    pub fn with_victory_experience(mut self, experience: u32) -> Self {
        self.victory_experience = experience;
        self
    }

    /// Set both sides' personalities
    pub fn with_personalities(mut self, team_a: Personality, team_b: Personality) -> Self {
        self.team_a = team_a;
        self.team_b = team_b;
        self
    }
}

/// Settings for a series of battles between the same two rosters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Number of battles; battle `i` uses seed `battle.seed + i`
    pub battles: usize,
    /// Whether to run battles in parallel
    pub parallel: bool,
    pub battle: BattleConfig,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            battles: 10,
            parallel: true,
            battle: BattleConfig::default(),
        }
    }
}

impl SeriesConfig {
    pub fn new(battles: usize, battle: BattleConfig) -> Self {
        Self {
            battles,
            battle,
            ..Default::default()
        }
    }

    /// Run battles one after another
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
