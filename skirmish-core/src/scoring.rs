//! Utility scores used by the decision engine
//!
//! Higher is better. Scores are plain `f32` sums; the selector picks the
//! maximum and keeps the first entry on ties.

use serde::{Deserialize, Serialize};

use crate::ability::{AbilityCatalog, AbilityId, AbilityTemplate};
use crate::character::{Attribute, Character};
use crate::combatant::Combatant;
use crate::dice::DiceRoll;

/// Below this health fraction a target counts as nearly finished
pub const LOW_HEALTH: f32 = 0.3;

/// Behaviour knobs for one side, all in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personality {
    /// Reserved; no decision currently reads it
    pub aggression: f32,
    /// Chance to consider an offensive ability before a basic attack
    pub ability_usage_rate: f32,
    /// Chance to pick targets and abilities by score rather than at random
    pub intelligence: f32,
    /// Health fraction below which defensive abilities come first
    pub defensive_threshold: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            aggression: 0.5,
            ability_usage_rate: 0.6,
            intelligence: 0.7,
            defensive_threshold: 0.3,
        }
    }
}

impl Personality {
    pub fn new(aggression: f32, ability_usage_rate: f32, intelligence: f32, defensive_threshold: f32) -> Self {
        Self {
            aggression,
            ability_usage_rate,
            intelligence,
            defensive_threshold,
        }
        .clamped()
    }

    /// Force every knob into `[0, 1]`
    pub fn clamped(self) -> Self {
        Self {
            aggression: self.aggression.clamp(0.0, 1.0),
            ability_usage_rate: self.ability_usage_rate.clamp(0.0, 1.0),
            intelligence: self.intelligence.clamp(0.0, 1.0),
            defensive_threshold: self.defensive_threshold.clamp(0.0, 1.0),
        }
    }
}

/// Best mean damage the character can deal with one action
pub fn estimated_average_damage(character: &Character, catalog: &AbilityCatalog) -> f32 {
    let basic = DiceRoll::d6().average() + character.modifier(Attribute::Strength) as f32;
    character
        .abilities
        .iter()
        .map(|&id| catalog.get(id))
        .filter(|t| !t.is_healing() && t.dice.is_some())
        .map(|t| t.expected_value(character))
        .fold(basic, f32::max)
}

pub fn knows_healing(character: &Character, catalog: &AbilityCatalog) -> bool {
    character.abilities.iter().any(|&id| catalog.get(id).is_healing())
}

/// How attractive `target` is to attack
pub fn target_score(target: &Combatant, catalog: &AbilityCatalog) -> f32 {
    let c = &target.character;
    let mut score = c.hp as f32
        + 2.0 * c.attributes.strength as f32
        + 1.5 * c.attributes.intelligence as f32
        + 10.0 * c.level as f32;
    if c.health_fraction() < LOW_HEALTH {
        score += 50.0;
    }
    score += 2.0 * estimated_average_damage(c, catalog);
    if knows_healing(c, catalog) {
        score += 40.0;
    }
    score
}

/// How attractive `ability` is for `user` right now
pub fn ability_score(
    ability: AbilityId,
    template: &AbilityTemplate,
    user: &Combatant,
    living_enemies: usize,
) -> f32 {
    let mut score = 10.0 * template.expected_value(&user.character) - 5.0 * template.ap_cost as f32
        + 15.0 * template.inflicts.len() as f32;
    if template.is_area() {
        score += 10.0 * living_enemies as f32;
    }
    if user.is_on_cooldown(ability) {
        score -= 20.0;
    }
    score
}

/// Index of the highest score; the first wins ties
pub fn best_index(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
