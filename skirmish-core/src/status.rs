//! Status conditions and their per-turn effects

use serde::{Deserialize, Serialize};

use crate::dice::DiceRoll;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Poisoned,
    Burning,
    Stunned,
    Paralyzed,
    Weakened,
    Shielded,
    Blessed,
}

/// Defense bonus while shielded
pub const SHIELD_DEFENSE: i32 = 2;
/// Attack and save bonus while blessed
pub const BLESS_BONUS: i32 = 2;
/// Basic-attack damage penalty while weakened
pub const WEAKEN_PENALTY: i32 = 2;

impl Condition {
    /// Damage rolled each time the owner's turn starts
    pub fn tick_damage(&self) -> Option<DiceRoll> {
        match self {
            Condition::Poisoned => Some(DiceRoll::new(1, 4, 0)),
            Condition::Burning => Some(DiceRoll::new(1, 6, 0)),
            _ => None,
        }
    }

    /// Owner loses its action points for the turn
    pub fn incapacitates(&self) -> bool {
        matches!(self, Condition::Stunned | Condition::Paralyzed)
    }

    pub fn is_harmful(&self) -> bool {
        !matches!(self, Condition::Shielded | Condition::Blessed)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Condition::Poisoned => "poisoned",
            Condition::Burning => "burning",
            Condition::Stunned => "stunned",
            Condition::Paralyzed => "paralyzed",
            Condition::Weakened => "weakened",
            Condition::Shielded => "shielded",
            Condition::Blessed => "blessed",
        }
    }
}

/// A condition an ability inflicts, as declared in ability data
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusApplication {
    pub condition: Condition,
    pub duration: u32,
}

/// An active condition on a combatant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub condition: Condition,
    pub remaining: u32,
}
