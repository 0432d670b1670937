//! Encounter-scoped wrapper around a character

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ability::AbilityId;
use crate::character::{Attribute, Character, CharacterId};
use crate::hex::Hex;
use crate::status::{Condition, StatusEffect, SHIELD_DEFENSE};

/// Most action points carried into the next turn
pub const BANK_CAP: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn opponent(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

/// Damage dealt by one status at turn start
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusTick {
    pub condition: Condition,
    pub damage: i32,
}

/// What happened when a turn began
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnStartReport {
    pub ticks: Vec<StatusTick>,
    pub expired: Vec<Condition>,
    pub incapacitated: bool,
}

#[derive(Clone, Debug)]
pub struct Combatant {
    pub character: Character,
    pub team: Team,
    pub initiative: i32,
    /// Position in the combined roster (team A first), used for tie-breaks
    pub roster_index: usize,
    ap: u32,
    banked_ap: u32,
    movement_left: u32,
    pub position: Option<Hex>,
    statuses: Vec<StatusEffect>,
    cooldowns: FxHashMap<AbilityId, u32>,
}

impl Combatant {
    pub fn new(character: Character, team: Team, roster_index: usize) -> Self {
        Self {
            character,
            team,
            initiative: 0,
            roster_index,
            ap: 0,
            banked_ap: 0,
            movement_left: 0,
            position: None,
            statuses: Vec::new(),
            cooldowns: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> CharacterId {
        self.character.id
    }

    pub fn name(&self) -> &str {
        &self.character.name
    }

    pub fn is_alive(&self) -> bool {
        !self.character.is_defeated()
    }

    pub fn ap(&self) -> u32 {
        self.ap
    }

    pub fn banked_ap(&self) -> u32 {
        self.banked_ap
    }

    pub fn movement_left(&self) -> u32 {
        self.movement_left
    }

    pub fn statuses(&self) -> &[StatusEffect] {
        &self.statuses
    }

    pub fn has(&self, condition: Condition) -> bool {
        self.statuses.iter().any(|s| s.condition == condition)
    }

    /// Defense including temporary bonuses
    pub fn defense(&self) -> i32 {
        let shield = if self.has(Condition::Shielded) { SHIELD_DEFENSE } else { 0 };
        self.character.defense + shield
    }

    pub fn modifier(&self, attribute: Attribute) -> i32 {
        self.character.modifier(attribute)
    }

    pub fn cooldown(&self, ability: AbilityId) -> u32 {
        self.cooldowns.get(&ability).copied().unwrap_or(0)
    }

    pub fn is_on_cooldown(&self, ability: AbilityId) -> bool {
        self.cooldown(ability) > 0
    }

    pub(crate) fn start_cooldown(&mut self, ability: AbilityId, turns: u32) {
        if turns > 0 {
            self.cooldowns.insert(ability, turns);
        }
    }

    /// Refill AP, tick statuses and cooldowns.
    ///
    /// AP becomes max plus whatever was banked (at most [`BANK_CAP`]). Each
    /// status loses one turn of duration and applies its per-turn damage
    /// before expired entries are dropped. A combatant that starts the turn
    /// stunned or paralyzed gets no AP or movement and keeps its bank for
    /// the next turn.
    pub fn begin_turn<R: Rng>(&mut self, rng: &mut R) -> TurnStartReport {
        let mut report = TurnStartReport {
            incapacitated: self.statuses.iter().any(|s| s.condition.incapacitates()),
            ..Default::default()
        };

        if report.incapacitated {
            self.ap = 0;
            self.movement_left = 0;
        } else {
            self.ap = self.character.max_ap + self.banked_ap.min(BANK_CAP);
            self.banked_ap = 0;
            self.movement_left = self.character.speed;
        }

        for status in &mut self.statuses {
            status.remaining = status.remaining.saturating_sub(1);
            if let Some(dice) = status.condition.tick_damage() {
                let damage = self.character.take_damage(dice.roll(rng).max(0));
                report.ticks.push(StatusTick {
                    condition: status.condition,
                    damage,
                });
            }
        }
        report.expired = self
            .statuses
            .iter()
            .filter(|s| s.remaining == 0)
            .map(|s| s.condition)
            .collect();
        self.statuses.retain(|s| s.remaining > 0);

        self.cooldowns.retain(|_, turns| {
            *turns -= 1;
            *turns > 0
        });

        report
    }

    /// Bank up to [`BANK_CAP`] unspent AP; the rest is lost. Returns the banked amount.
    pub fn end_turn(&mut self) -> u32 {
        self.banked_ap = (self.banked_ap + self.ap).min(BANK_CAP);
        self.ap = 0;
        self.banked_ap
    }

    /// Spend AP if enough is available
    pub fn spend_ap(&mut self, cost: u32) -> bool {
        if self.ap < cost {
            return false;
        }
        self.ap -= cost;
        true
    }

    pub(crate) fn spend_movement(&mut self, steps: u32) {
        self.movement_left = self.movement_left.saturating_sub(steps);
    }

    /// Add or refresh a condition. Zero durations are ignored.
    pub fn add_status(&mut self, condition: Condition, duration: u32) {
        if duration == 0 {
            return;
        }
        match self.statuses.iter_mut().find(|s| s.condition == condition) {
            Some(existing) => existing.remaining = existing.remaining.max(duration),
            None => self.statuses.push(StatusEffect { condition, remaining: duration }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighter(max_ap: u32) -> Combatant {
        Combatant::new(
            Character::new(CharacterId(1), "Fighter").with_max_ap(max_ap),
            Team::A,
            0,
        )
    }

    #[test]
    fn test_banking_without_spending() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for max_ap in [1, 2, 4, 6] {
            let mut c = fighter(max_ap);
            c.begin_turn(&mut rng);
            assert_eq!(c.ap(), max_ap);
            c.end_turn();
            assert_eq!(c.banked_ap(), max_ap.min(2));

            c.begin_turn(&mut rng);
            assert_eq!(c.ap(), max_ap + max_ap.min(2));
            assert!(c.ap() <= max_ap + 2);
            assert_eq!(c.banked_ap(), 0);
        }
    }

    #[test]
    fn test_partial_spend_banks_remainder() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut c = fighter(4);
        c.begin_turn(&mut rng);
        assert!(c.spend_ap(3));
        assert!(!c.spend_ap(2));
        assert_eq!(c.ap(), 1);
        assert_eq!(c.end_turn(), 1);
        c.begin_turn(&mut rng);
        assert_eq!(c.ap(), 5);
    }

    #[test]
    fn test_status_duration_counts_down() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut c = fighter(4);
        c.add_status(Condition::Shielded, 2);
        c.add_status(Condition::Weakened, 0);
        assert!(c.has(Condition::Shielded));
        assert!(!c.has(Condition::Weakened));
        assert_eq!(c.defense(), 12);

        let first = c.begin_turn(&mut rng);
        assert!(first.expired.is_empty());
        let second = c.begin_turn(&mut rng);
        assert_eq!(second.expired, vec![Condition::Shielded]);
        assert!(!c.has(Condition::Shielded));
    }

    #[test]
    fn test_poison_ticks_every_turn_it_persists() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut c = fighter(4);
        c.add_status(Condition::Poisoned, 2);

        let first = c.begin_turn(&mut rng);
        assert_eq!(first.ticks.len(), 1);
        assert!((1..=4).contains(&first.ticks[0].damage));
        let second = c.begin_turn(&mut rng);
        assert_eq!(second.ticks.len(), 1);
        assert_eq!(second.expired, vec![Condition::Poisoned]);

        let third = c.begin_turn(&mut rng);
        assert!(third.ticks.is_empty());
        let lost = first.ticks[0].damage + second.ticks[0].damage;
        assert_eq!(c.character.hp, c.character.max_hp - lost);
    }

    #[test]
    fn test_stun_costs_the_turn() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut c = fighter(4);
        c.add_status(Condition::Stunned, 1);
        let report = c.begin_turn(&mut rng);
        assert!(report.incapacitated);
        assert_eq!(c.ap(), 0);
        assert!(!c.has(Condition::Stunned));

        c.end_turn();
        c.begin_turn(&mut rng);
        assert_eq!(c.ap(), 4);
    }

    #[test]
    fn test_stun_keeps_the_bank() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut c = fighter(4);
        c.begin_turn(&mut rng);
        assert_eq!(c.end_turn(), 2);

        c.add_status(Condition::Paralyzed, 1);
        c.begin_turn(&mut rng);
        assert_eq!(c.ap(), 0);
        assert_eq!(c.banked_ap(), 2);
        assert_eq!(c.end_turn(), 2);

        c.begin_turn(&mut rng);
        assert_eq!(c.ap(), 6);
        assert_eq!(c.banked_ap(), 0);
    }

    #[test]
    fn test_cooldowns_tick() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut c = fighter(4);
        c.start_cooldown(AbilityId(3), 2);
        assert!(c.is_on_cooldown(AbilityId(3)));
        c.begin_turn(&mut rng);
        assert_eq!(c.cooldown(AbilityId(3)), 1);
        c.begin_turn(&mut rng);
        assert!(!c.is_on_cooldown(AbilityId(3)));
    }
}
