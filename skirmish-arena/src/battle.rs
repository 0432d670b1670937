//! Battle orchestration - AI against AI until one side falls
//!
//! Level 2 - Phase-level implementation

use serde::{Deserialize, Serialize};
use skirmish_core::{
    AbilityCatalog, Battlefield, Character, CharacterId, CombatEvent, CombatState, DecisionEngine,
    Refusal, Team, TurnEngine,
};

use crate::config::BattleConfig;
use crate::stats::BattleStatistics;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    TeamAVictory,
    TeamBVictory,
    /// Round cap reached or both sides fell
    Draw,
}

impl Outcome {
    pub fn from_winner(winner: Option<Team>) -> Self {
        match winner {
            Some(Team::A) => Outcome::TeamAVictory,
            Some(Team::B) => Outcome::TeamBVictory,
            None => Outcome::Draw,
        }
    }

    /// Get winner (None for draw)
    pub fn winner(&self) -> Option<Team> {
        match self {
            Outcome::TeamAVictory => Some(Team::A),
            Outcome::TeamBVictory => Some(Team::B),
            Outcome::Draw => None,
        }
    }
}

/// Everything known about a finished battle
#[derive(Clone, Debug, Serialize)]
pub struct BattleResult {
    pub outcome: Outcome,
    pub rounds: u32,
    /// Turns granted, including ones lost to incapacitation
    pub turns: u32,
    pub seed: u64,
    /// Final characters, in roster order
    pub team_a: Vec<Character>,
    pub team_b: Vec<Character>,
    pub statistics: BattleStatistics,
    pub log: Vec<CombatEvent>,
}

impl BattleResult {
    pub fn team_a_wins(&self) -> bool {
        self.outcome == Outcome::TeamAVictory
    }

    pub fn team_b_wins(&self) -> bool {
        self.outcome == Outcome::TeamBVictory
    }

    pub fn is_draw(&self) -> bool {
        self.outcome == Outcome::Draw
    }

    pub fn survivors(&self, team: Team) -> usize {
        let members = match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        };
        members.iter().filter(|c| !c.is_defeated()).count()
    }
}

/// A battle in progress
pub struct Battle<'a> {
    engine: TurnEngine<'a>,
    ai_a: DecisionEngine,
    ai_b: DecisionEngine,
    config: BattleConfig,
    statistics: BattleStatistics,
    log: Vec<CombatEvent>,
}

impl<'a> Battle<'a> {
    /// Register statistics, roll initiative and open the first turn
    pub fn new(
        catalog: &'a AbilityCatalog,
        team_a: Vec<Character>,
        team_b: Vec<Character>,
        config: BattleConfig,
    ) -> Result<Self, Refusal> {
        let battlefield = Battlefield::new(config.battlefield_width, config.battlefield_height);
        let mut engine = TurnEngine::new(catalog, battlefield, config.seed)
            .with_victory_experience(config.victory_experience)
            .with_round_limit(config.max_rounds);

        let mut statistics = BattleStatistics::default();
        statistics.register(&team_a, Team::A);
        statistics.register(&team_b, Team::B);

        tracing::info!(
            "Starting battle: {} vs {} (seed={}, max_rounds={})",
            team_a.len(),
            team_b.len(),
            config.seed,
            config.max_rounds
        );
        engine.start_combat(team_a, team_b)?;

        let mut battle = Self {
            engine,
            ai_a: DecisionEngine::new(config.team_a),
            ai_b: DecisionEngine::new(config.team_b),
            config,
            statistics,
            log: Vec::new(),
        };
        battle.collect_events();
        Ok(battle)
    }

    pub fn engine(&self) -> &TurnEngine<'a> {
        &self.engine
    }

    pub fn statistics(&self) -> &BattleStatistics {
        &self.statistics
    }

    /// Events so far, oldest first
    pub fn log(&self) -> &[CombatEvent] {
        &self.log
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_combat_active() && self.engine.round() <= self.config.max_rounds
    }

    /// Let the active combatant act until it stops, then pass the turn.
    ///
    /// Returns the events produced, starting with the actor's actions and
    /// ending with the next turn's opening. Passing the turn past the last
    /// allowed round ends the battle in a draw without opening another turn.
    pub fn play_turn(&mut self) -> Vec<CombatEvent> {
        let Some(actor) = self.engine.current_id() else {
            return Vec::new();
        };
        let ai = match self.engine.combatant(actor).map(|c| c.team) {
            Some(Team::A) => &self.ai_a,
            _ => &self.ai_b,
        };

        let mut actions = 0;
        while actions < self.config.max_actions_per_turn {
            if ai.make_decision(&mut self.engine, actor).is_none() {
                break;
            }
            actions += 1;
        }
        if actions > 0 && actions == self.config.max_actions_per_turn {
            tracing::warn!(%actor, actions, "action limit reached");
        }

        self.engine.start_next_turn();
        self.collect_events()
    }

    /// Id of the combatant whose turn is open
    pub fn current_actor(&self) -> Option<CharacterId> {
        self.engine.current_id()
    }

    fn collect_events(&mut self) -> Vec<CombatEvent> {
        let events = self.engine.drain_events();
        for event in &events {
            self.statistics.record(event);
        }
        self.log.extend(events.iter().cloned());
        events
    }

    /// Wrap up; an unfinished battle is a draw
    pub fn finish(self) -> BattleResult {
        let outcome = match self.engine.state() {
            CombatState::Ended { winner } => Outcome::from_winner(winner),
            _ => Outcome::Draw,
        };
        let rounds = self.engine.round().min(self.config.max_rounds);
        let turns = self.engine.turns_granted();
        let (team_a, team_b) = self.engine.into_rosters();

        tracing::info!("Battle finished: {:?} after {} rounds ({} turns)", outcome, rounds, turns);

        BattleResult {
            outcome,
            rounds,
            turns,
            seed: self.config.seed,
            team_a,
            team_b,
            statistics: self.statistics,
            log: self.log,
        }
    }
}

/// Run a battle to completion
pub fn simulate_battle(
    catalog: &AbilityCatalog,
    team_a: Vec<Character>,
    team_b: Vec<Character>,
    config: BattleConfig,
) -> Result<BattleResult, Refusal> {
    let mut battle = Battle::new(catalog, team_a, team_b, config)?;
    while battle.is_running() {
        battle.play_turn();
    }
    Ok(battle.finish())
}
