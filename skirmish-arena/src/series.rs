//! Series play - many seeded battles between the same two rosters
//!
//! Level 1 - Orchestration

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use skirmish_core::{AbilityCatalog, Character, Team};

use crate::battle::{simulate_battle, BattleResult, Outcome};
use crate::config::SeriesConfig;

/// Compact record of one battle in a series
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BattleSummary {
    pub seed: u64,
    pub outcome: Outcome,
    pub rounds: u32,
    pub turns: u32,
    pub survivors_a: usize,
    pub survivors_b: usize,
}

impl From<&BattleResult> for BattleSummary {
    fn from(result: &BattleResult) -> Self {
        Self {
            seed: result.seed,
            outcome: result.outcome,
            rounds: result.rounds,
            turns: result.turns,
            survivors_a: result.survivors(Team::A),
            survivors_b: result.survivors(Team::B),
        }
    }
}

/// Result of a series
#[derive(Clone, Debug, Default, Serialize)]
pub struct SeriesResult {
    pub team_a_wins: u32,
    pub team_b_wins: u32,
    pub draws: u32,
    /// Average battle length in rounds
    pub avg_rounds: f32,
    pub battles_played: u32,
    /// Battles in seed order
    pub battles: Vec<BattleSummary>,
}

impl SeriesResult {
    /// Create empty result
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_summaries(battles: Vec<BattleSummary>) -> Self {
        let count = |outcome: Outcome| battles.iter().filter(|b| b.outcome == outcome).count() as u32;
        let total_rounds: u32 = battles.iter().map(|b| b.rounds).sum();
        let avg_rounds = if battles.is_empty() {
            0.0
        } else {
            total_rounds as f32 / battles.len() as f32
        };

        Self {
            team_a_wins: count(Outcome::TeamAVictory),
            team_b_wins: count(Outcome::TeamBVictory),
            draws: count(Outcome::Draw),
            avg_rounds,
            battles_played: battles.len() as u32,
            battles,
        }
    }

    fn rate(&self, count: u32) -> f32 {
        if self.battles_played == 0 {
            0.0
        } else {
            count as f32 / self.battles_played as f32
        }
    }

    pub fn team_a_win_rate(&self) -> f32 {
        self.rate(self.team_a_wins)
    }

    pub fn team_b_win_rate(&self) -> f32 {
        self.rate(self.team_b_wins)
    }

    pub fn draw_rate(&self) -> f32 {
        self.rate(self.draws)
    }
}

/// Play `config.battles` battles with consecutive seeds
pub fn run_series(
    catalog: &AbilityCatalog,
    team_a: &[Character],
    team_b: &[Character],
    config: &SeriesConfig,
) -> SeriesResult {
    run_series_with_progress(catalog, team_a, team_b, config, |_| {})
}

/// Like [`run_series`], calling `progress` with the number of finished battles
pub fn run_series_with_progress<F>(
    catalog: &AbilityCatalog,
    team_a: &[Character],
    team_b: &[Character],
    config: &SeriesConfig,
    progress: F,
) -> SeriesResult
where
    F: Fn(usize) + Sync,
{
    if config.battles == 0 {
        return SeriesResult::empty();
    }

    let finished = AtomicUsize::new(0);
    let play = |index: usize| {
        let seed = config.battle.seed.wrapping_add(index as u64);
        let battle = config.battle.clone().with_seed(seed);
        let summary = match simulate_battle(catalog, team_a.to_vec(), team_b.to_vec(), battle) {
            Ok(result) => Some(BattleSummary::from(&result)),
            Err(refusal) => {
                tracing::warn!(seed, %refusal, "battle could not start");
                None
            }
        };
        progress(finished.fetch_add(1, Ordering::Relaxed) + 1);
        summary
    };

    let summaries: Vec<BattleSummary> = if config.parallel {
        (0..config.battles).into_par_iter().filter_map(play).collect()
    } else {
        (0..config.battles).filter_map(play).collect()
    };

    let result = SeriesResult::from_summaries(summaries);
    tracing::info!(
        "Series finished: A {} / B {} / draws {} over {} battles",
        result.team_a_wins,
        result.team_b_wins,
        result.draws,
        result.battles_played
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BattleConfig;
    use skirmish_core::{AbilityId, AbilityTemplate, CharacterId, DiceRoll};

    fn catalog() -> AbilityCatalog {
        AbilityCatalog::new(vec![AbilityTemplate {
            key: "jab".into(),
            ap_cost: 1,
            dice: Some(DiceRoll::new(1, 4, 1)),
            ..Default::default()
        }])
        .unwrap()
    }

    fn team(first_id: u32, hp: i32) -> Vec<Character> {
        (0..2)
            .map(|i| {
                Character::new(CharacterId(first_id + i), format!("F{}", first_id + i))
                    .with_hp(hp, hp)
                    .with_abilities(vec![AbilityId(0)])
            })
            .collect()
    }

    #[test]
    fn test_series_counts_add_up() {
        let catalog = catalog();
        let config = SeriesConfig::new(6, BattleConfig::default().with_seed(100));
        let result = run_series(&catalog, &team(0, 12), &team(10, 12), &config);

        assert_eq!(result.battles_played, 6);
        assert_eq!(result.team_a_wins + result.team_b_wins + result.draws, 6);
        let rates = result.team_a_win_rate() + result.team_b_win_rate() + result.draw_rate();
        assert!((rates - 1.0).abs() < 1e-5);
        let seeds: Vec<u64> = result.battles.iter().map(|b| b.seed).collect();
        assert_eq!(seeds, (100..106).collect::<Vec<u64>>());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let catalog = catalog();
        let config = SeriesConfig::new(4, BattleConfig::default().with_seed(7));
        let parallel = run_series(&catalog, &team(0, 10), &team(10, 10), &config);
        let sequential = run_series(&catalog, &team(0, 10), &team(10, 10), &config.clone().sequential());
        assert_eq!(parallel.battles, sequential.battles);
    }

    #[test]
    fn test_progress_reaches_total() {
        let catalog = catalog();
        let config = SeriesConfig::new(3, BattleConfig::default()).sequential();
        let seen = std::sync::Mutex::new(Vec::new());
        run_series_with_progress(&catalog, &team(0, 8), &team(10, 8), &config, |done| {
            seen.lock().unwrap().push(done);
        });
        assert_eq!(seen.into_inner().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_series() {
        let config = SeriesConfig::new(0, BattleConfig::default());
        let result = run_series(&AbilityCatalog::default(), &[], &[], &config);
        assert_eq!(result.battles_played, 0);
        assert_eq!(result.team_a_win_rate(), 0.0);
    }
}
