//! Heuristic decision engine
//!
//! Chooses one action per call for the active combatant:
//!
//! 1. Wounded below the defensive threshold: the costliest usable defensive
//!    ability, on itself.
//! 2. With probability `ability_usage_rate`: a usable offensive ability.
//! 3. A basic attack, if at least two AP remain.
//! 4. Nothing.
//!
//! Before striking an enemy farther away than the action's reach (the
//! ability's range, or one cell for a basic attack), the actor walks toward
//! it as far as its remaining movement allows.
//!
//! Targets and abilities are picked by score with probability
//! `intelligence`, otherwise uniformly at random. All randomness comes from
//! the turn engine's generator so a seeded battle replays exactly.

use rand::Rng;

use crate::ability::{AbilityId, AbilityTemplate};
use crate::character::CharacterId;
use crate::combat::{ActionReport, TurnEngine, BASIC_ATTACK_COST};
use crate::hex::Hex;
use crate::scoring::{ability_score, best_index, target_score, Personality};

/// Reach of a basic attack, in cells
pub const MELEE_REACH: u32 = 1;

#[derive(Clone, Debug, Default)]
pub struct DecisionEngine {
    personality: Personality,
}

impl DecisionEngine {
    pub fn new(personality: Personality) -> Self {
        Self {
            personality: personality.clamped(),
        }
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    /// Perform one action for `actor`. `None` means it chose (or could) do nothing.
    pub fn make_decision(&self, engine: &mut TurnEngine<'_>, actor: CharacterId) -> Option<ActionReport> {
        let me = engine.current_combatant()?;
        if me.id() != actor || me.ap() == 0 {
            return None;
        }
        let health = me.character.health_fraction();
        let ap = me.ap();

        if health < self.personality.defensive_threshold {
            let defensive = usable(engine, actor, AbilityTemplate::is_defensive);
            let costs: Vec<f32> = defensive
                .iter()
                .map(|&id| engine.catalog().get(id).ap_cost as f32)
                .collect();
            if let Some(i) = best_index(&costs) {
                tracing::debug!(%actor, health, "falling back to defence");
                if let Ok(report) = engine.use_ability(defensive[i], actor, actor) {
                    return Some(report);
                }
            }
        }

        let enemies = engine.living_enemies(actor);
        if enemies.is_empty() {
            return None;
        }

        let roll: f32 = engine.rng_mut().gen();
        if roll < self.personality.ability_usage_rate {
            let offensive = usable(engine, actor, AbilityTemplate::is_offensive);
            if !offensive.is_empty() {
                let ability = self.select_ability(engine, actor, &offensive, enemies.len());
                // Area abilities centre on a random enemy
                let target = if engine.catalog().get(ability).is_area() {
                    enemies[engine.rng_mut().gen_range(0..enemies.len())]
                } else {
                    self.select_target(engine, &enemies)
                };
                let template = engine.catalog().get(ability);
                tracing::debug!(%actor, %target, ability = %template.key, "using ability");
                approach(engine, actor, target, template.range.max(MELEE_REACH));
                if let Ok(report) = engine.use_ability(ability, actor, target) {
                    return Some(report);
                }
            }
        }

        if ap >= BASIC_ATTACK_COST {
            let target = self.select_target(engine, &enemies);
            tracing::debug!(%actor, %target, "basic attack");
            approach(engine, actor, target, MELEE_REACH);
            return engine.perform_basic_attack(actor, target).ok();
        }

        None
    }

    /// Highest scoring enemy, or a random one. `enemies` must not be empty.
    fn select_target(&self, engine: &mut TurnEngine<'_>, enemies: &[CharacterId]) -> CharacterId {
        let roll: f32 = engine.rng_mut().gen();
        if roll < self.personality.intelligence {
            let catalog = engine.catalog();
            let scores: Vec<f32> = enemies
                .iter()
                .map(|&id| engine.combatant(id).map_or(f32::MIN, |c| target_score(c, catalog)))
                .collect();
            if let Some(i) = best_index(&scores) {
                return enemies[i];
            }
        }
        enemies[engine.rng_mut().gen_range(0..enemies.len())]
    }

    /// Highest scoring ability, or a random one. `options` must not be empty.
    fn select_ability(
        &self,
        engine: &mut TurnEngine<'_>,
        actor: CharacterId,
        options: &[AbilityId],
        living_enemies: usize,
    ) -> AbilityId {
        let roll: f32 = engine.rng_mut().gen();
        if roll < self.personality.intelligence {
            if let Some(user) = engine.combatant(actor) {
                let catalog = engine.catalog();
                let scores: Vec<f32> = options
                    .iter()
                    .map(|&id| ability_score(id, catalog.get(id), user, living_enemies))
                    .collect();
                if let Some(i) = best_index(&scores) {
                    return options[i];
                }
            }
        }
        options[engine.rng_mut().gen_range(0..options.len())]
    }
}

/// Walk toward `target` when it is beyond `reach`.
///
/// Picks the reachable cell nearest to being within reach, preferring the
/// shortest walk; stays put when no cell gets closer.
fn approach(engine: &mut TurnEngine<'_>, actor: CharacterId, target: CharacterId, reach: u32) {
    let (Some(from), Some(goal)) = (position(engine, actor), position(engine, target)) else {
        return;
    };
    let gap = |cell: Hex| cell.distance_to(goal).max(reach);
    let current = gap(from);
    if from.distance_to(goal) <= reach {
        return;
    }

    let Some(dest) = engine
        .reachable_cells(actor)
        .into_iter()
        .min_by_key(|&cell| gap(cell))
        .filter(|&cell| gap(cell) < current)
    else {
        return;
    };
    match engine.move_combatant(actor, dest) {
        Ok(path) => tracing::debug!(%actor, steps = path.len() - 1, "closing in"),
        Err(refusal) => tracing::debug!(%actor, %refusal, "could not close in"),
    }
}

fn position(engine: &TurnEngine<'_>, id: CharacterId) -> Option<Hex> {
    engine.combatant(id).and_then(|c| c.position)
}

/// Known abilities the actor may use now that match `wanted`
fn usable(engine: &TurnEngine<'_>, actor: CharacterId, wanted: fn(&AbilityTemplate) -> bool) -> Vec<AbilityId> {
    let Some(me) = engine.combatant(actor) else {
        return Vec::new();
    };
    me.character
        .abilities
        .iter()
        .copied()
        .filter(|&id| engine.check_ability(id, actor).is_ok() && wanted(engine.catalog().get(id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityCatalog, EffectKind};
    use crate::area::AreaOfEffect;
    use crate::battlefield::Battlefield;
    use crate::character::{Attributes, Character};
    use crate::combat::{ActionKind, CombatEvent};
    use crate::dice::DiceRoll;
    use crate::status::{Condition, StatusApplication};

    fn catalog() -> AbilityCatalog {
        AbilityCatalog::new(vec![
            AbilityTemplate {
                key: "mend".into(),
                ap_cost: 2,
                dice: Some(DiceRoll::flat(5)),
                effect: EffectKind::Healing,
                ..Default::default()
            },
            AbilityTemplate {
                key: "ward".into(),
                ap_cost: 3,
                area: AreaOfEffect::SelfOnly,
                inflicts: vec![StatusApplication { condition: Condition::Shielded, duration: 2 }],
                ..Default::default()
            },
            AbilityTemplate {
                key: "zap".into(),
                ap_cost: 1,
                dice: Some(DiceRoll::flat(1)),
                ..Default::default()
            },
            AbilityTemplate {
                key: "lance".into(),
                ap_cost: 2,
                dice: Some(DiceRoll::new(3, 6, 0)),
                ..Default::default()
            },
            AbilityTemplate {
                key: "nova".into(),
                ap_cost: 2,
                area: AreaOfEffect::Radius(1),
                dice: Some(DiceRoll::flat(1)),
                ..Default::default()
            },
        ])
        .unwrap()
    }

    fn hero(id: u32, abilities: &[u32]) -> Character {
        Character::new(CharacterId(id), format!("Hero{id}"))
            .with_attributes(Attributes { dexterity: 100, ..Default::default() })
            .with_abilities(abilities.iter().map(|&i| AbilityId(i)).collect())
    }

    fn sturdy(id: u32) -> Character {
        Character::new(CharacterId(id), format!("Foe{id}")).with_hp(200, 200)
    }

    fn always_smart() -> DecisionEngine {
        DecisionEngine::new(Personality::new(0.5, 1.0, 1.0, 0.0))
    }

    #[test]
    fn test_wounded_actor_uses_costliest_defence_on_itself() {
        let catalog = catalog();
        let mut engine = TurnEngine::new(&catalog, Battlefield::new(6, 6), 1);
        let medic = hero(0, &[0, 1]).with_hp(4, 20);
        engine.start_combat(vec![medic], vec![sturdy(1)]).unwrap();

        let ai = DecisionEngine::new(Personality::default());
        let report = ai.make_decision(&mut engine, CharacterId(0)).unwrap();
        assert_eq!(report.action, ActionKind::Ability(AbilityId(1)));
        assert_eq!(report.hits[0].target, CharacterId(0));
        assert!(engine.combatant(CharacterId(0)).unwrap().has(Condition::Shielded));

        // One AP left: nothing affordable
        assert_eq!(ai.make_decision(&mut engine, CharacterId(0)), None);
    }

    #[test]
    fn test_smart_actor_targets_highest_score() {
        let catalog = catalog();
        let mut engine = TurnEngine::new(&catalog, Battlefield::new(6, 6), 2);
        let brute = sturdy(2).with_attributes(Attributes { strength: 30, ..Default::default() });
        engine.start_combat(vec![hero(0, &[2])], vec![sturdy(1), brute]).unwrap();

        let report = always_smart().make_decision(&mut engine, CharacterId(0)).unwrap();
        assert_eq!(report.action, ActionKind::Ability(AbilityId(2)));
        assert_eq!(report.hits[0].target, CharacterId(2));
    }

    #[test]
    fn test_smart_actor_prefers_stronger_ability() {
        let catalog = catalog();
        let mut engine = TurnEngine::new(&catalog, Battlefield::new(6, 6), 3);
        engine.start_combat(vec![hero(0, &[2, 3])], vec![sturdy(1)]).unwrap();

        let report = always_smart().make_decision(&mut engine, CharacterId(0)).unwrap();
        assert_eq!(report.action, ActionKind::Ability(AbilityId(3)));
    }

    #[test]
    fn test_area_ability_anchors_on_an_enemy() {
        let catalog = catalog();
        let mut engine = TurnEngine::new(&catalog, Battlefield::new(6, 6), 4);
        engine.start_combat(vec![hero(0, &[4])], vec![sturdy(1), sturdy(2)]).unwrap();

        let report = always_smart().make_decision(&mut engine, CharacterId(0)).unwrap();
        assert_eq!(report.action, ActionKind::Ability(AbilityId(4)));
        assert!(report.hits.iter().all(|h| h.target != CharacterId(0)));
        assert!(!report.hits.is_empty());
    }

    #[test]
    fn test_falls_back_to_basic_attack() {
        let catalog = catalog();
        let mut engine = TurnEngine::new(&catalog, Battlefield::new(6, 6), 5);
        engine.start_combat(vec![hero(0, &[2])], vec![sturdy(1)]).unwrap();

        let never_casts = DecisionEngine::new(Personality::new(0.5, 0.0, 1.0, 0.0));
        let report = never_casts.make_decision(&mut engine, CharacterId(0)).unwrap();
        assert_eq!(report.action, ActionKind::BasicAttack);
        assert_eq!(engine.combatant(CharacterId(0)).unwrap().ap(), 2);
    }

    #[test]
    fn test_no_action_without_ap_or_turn() {
        let catalog = catalog();
        let mut engine = TurnEngine::new(&catalog, Battlefield::new(6, 6), 6);
        let weakling = hero(0, &[]).with_max_ap(1);
        engine.start_combat(vec![weakling], vec![sturdy(1)]).unwrap();

        let ai = DecisionEngine::default();
        assert_eq!(ai.make_decision(&mut engine, CharacterId(1)), None);
        assert_eq!(ai.make_decision(&mut engine, CharacterId(0)), None);
    }

    #[test]
    fn test_closes_in_before_striking() {
        let catalog = catalog();
        let mut engine = TurnEngine::new(&catalog, Battlefield::new(8, 6), 8);
        engine.start_combat(vec![hero(0, &[])], vec![sturdy(1)]).unwrap();
        let start = engine.combatant(CharacterId(0)).unwrap().position.unwrap();
        let foe = engine.combatant(CharacterId(1)).unwrap().position.unwrap();
        let before = start.distance_to(foe);
        assert!(before > 3);

        let report = always_smart().make_decision(&mut engine, CharacterId(0)).unwrap();
        assert_eq!(report.action, ActionKind::BasicAttack);

        let end = engine.combatant(CharacterId(0)).unwrap().position.unwrap();
        let after = end.distance_to(foe);
        assert!(after < before && after + 3 >= before);
        assert_eq!(engine.battlefield().occupant(end), Some(CharacterId(0)));
        assert!(engine
            .events()
            .iter()
            .any(|e| matches!(e, CombatEvent::Moved { actor: CharacterId(0), .. })));

        // Movement is spent; the next strike happens from where it stands
        ai_strikes_in_place(&mut engine, end);
    }

    fn ai_strikes_in_place(engine: &mut TurnEngine<'_>, at: Hex) {
        let left = engine.combatant(CharacterId(0)).unwrap().movement_left();
        always_smart().make_decision(engine, CharacterId(0));
        assert_eq!(engine.combatant(CharacterId(0)).unwrap().position, Some(at));
        assert_eq!(engine.combatant(CharacterId(0)).unwrap().movement_left(), left);
    }

    #[test]
    fn test_stays_put_within_reach() {
        let ranged = AbilityTemplate {
            key: "bolt".into(),
            ap_cost: 2,
            range: 20,
            dice: Some(DiceRoll::flat(1)),
            ..Default::default()
        };
        let catalog = AbilityCatalog::new(vec![ranged]).unwrap();
        let mut engine = TurnEngine::new(&catalog, Battlefield::new(8, 6), 9);
        engine.start_combat(vec![hero(0, &[0])], vec![sturdy(1)]).unwrap();
        let start = engine.combatant(CharacterId(0)).unwrap().position;

        let report = always_smart().make_decision(&mut engine, CharacterId(0)).unwrap();
        assert_eq!(report.action, ActionKind::Ability(AbilityId(0)));
        assert_eq!(engine.combatant(CharacterId(0)).unwrap().position, start);
        assert!(!engine.events().iter().any(|e| matches!(e, CombatEvent::Moved { .. })));
    }

    #[test]
    fn test_repeated_decisions_exhaust_ap() {
        let catalog = catalog();
        let mut engine = TurnEngine::new(&catalog, Battlefield::new(6, 6), 7);
        engine.start_combat(vec![hero(0, &[2, 3])], vec![sturdy(1)]).unwrap();

        let ai = DecisionEngine::default();
        let mut actions = 0;
        while ai.make_decision(&mut engine, CharacterId(0)).is_some() {
            actions += 1;
            assert!(actions <= 4);
        }
        assert!(actions >= 1);
        assert!(engine.combatant(CharacterId(0)).unwrap().ap() < 2);
    }
}
