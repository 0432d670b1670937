//! Skirmish Core - Tactical combat engine and AI
//!
//! This crate provides the rules for two-team hex-grid battles:
//! - Grid geometry (axial coordinates, rectangular battlefield)
//! - A* pathfinding and movement reachability
//! - Area-of-effect shapes
//! - Characters, abilities, dice and status conditions
//! - The action-point turn engine
//! - A personality-driven heuristic decision engine

pub mod hex;
pub mod battlefield;
pub mod pathfinding;
pub mod area;
pub mod dice;
pub mod status;
pub mod character;
pub mod ability;
pub mod content;
pub mod combatant;
pub mod combat;
pub mod scoring;
pub mod ai;

// Re-exports for convenient access
pub use hex::{Hex, DIRECTIONS};
pub use battlefield::{Battlefield, PlacementError};
pub use pathfinding::{find_path, reachable_cells};
pub use area::AreaOfEffect;
pub use dice::{DiceRoll, DiceParseError};
pub use status::{Condition, StatusApplication, StatusEffect};
pub use character::{Attribute, Attributes, Character, CharacterId};
pub use ability::{AbilityCatalog, AbilityId, AbilityTemplate, EffectKind};
pub use content::{CharacterSheet, ContentError, Roster};
pub use combatant::{Combatant, Team};
pub use combat::{ActionKind, ActionReport, CombatEvent, CombatState, HitReport, Refusal, TurnEngine, TurnPhase};
pub use scoring::Personality;
pub use ai::DecisionEngine;
