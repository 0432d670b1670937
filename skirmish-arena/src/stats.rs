//! Battle statistics gathered from the combat event log
//!
//! Level 3 - Step-level implementation

use std::collections::BTreeMap;

use serde::Serialize;
use skirmish_core::{ActionKind, Character, CharacterId, CombatEvent, Team};

/// What one character did and suffered
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CharacterStats {
    pub name: String,
    pub team: Option<Team>,
    pub turns: u32,
    /// Turns that started stunned or paralyzed
    pub turns_lost: u32,
    pub abilities_used: u32,
    pub basic_attacks: u32,
    pub hits: u32,
    pub misses: u32,
    pub criticals: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    /// Part of `damage_taken` caused by status ticks
    pub status_damage_taken: u32,
    pub healing_done: u32,
    pub kills: u32,
    pub cells_moved: u32,
    pub defeated: bool,
}

/// Sums over one team
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TeamStats {
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub healing_done: u32,
    pub actions: u32,
    pub kills: u32,
    pub losses: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BattleStatistics {
    /// Keyed by character id
    pub characters: BTreeMap<CharacterId, CharacterStats>,
    pub total_actions: u32,
}

impl BattleStatistics {
    /// Create an entry for each member of a team
    pub fn register(&mut self, members: &[Character], team: Team) {
        for member in members {
            self.characters.insert(
                member.id,
                CharacterStats {
                    name: member.name.clone(),
                    team: Some(team),
                    defeated: member.is_defeated(),
                    ..Default::default()
                },
            );
        }
    }

    /// Look up a character's stats by name
    pub fn by_name(&self, name: &str) -> Option<&CharacterStats> {
        self.characters.values().find(|s| s.name == name)
    }

    fn entry(&mut self, id: CharacterId) -> &mut CharacterStats {
        self.characters.entry(id).or_default()
    }

    pub fn record(&mut self, event: &CombatEvent) {
        match event {
            CombatEvent::TurnStarted { actor, .. } => self.entry(*actor).turns += 1,
            CombatEvent::Incapacitated { actor } => self.entry(*actor).turns_lost += 1,
            CombatEvent::StatusTick { target, damage, .. } => {
                let stats = self.entry(*target);
                stats.damage_taken += *damage as u32;
                stats.status_damage_taken += *damage as u32;
            }
            CombatEvent::Moved { actor, path } => {
                self.entry(*actor).cells_moved += path.len().saturating_sub(1) as u32;
            }
            CombatEvent::Defeated { target } => self.entry(*target).defeated = true,
            CombatEvent::Action(report) => {
                self.total_actions += 1;
                let basic = report.action == ActionKind::BasicAttack;
                {
                    let actor = self.entry(report.actor);
                    if basic {
                        actor.basic_attacks += 1;
                    } else {
                        actor.abilities_used += 1;
                    }
                }
                for hit in &report.hits {
                    let amount = hit.amount.max(0) as u32;
                    let actor = self.entry(report.actor);
                    if hit.healing {
                        actor.healing_done += amount;
                        continue;
                    }
                    actor.damage_dealt += amount;
                    if basic {
                        if hit.hit {
                            actor.hits += 1;
                        } else {
                            actor.misses += 1;
                        }
                        if hit.critical {
                            actor.criticals += 1;
                        }
                    }
                    if hit.defeated {
                        actor.kills += 1;
                    }
                    self.entry(hit.target).damage_taken += amount;
                }
            }
            CombatEvent::CombatStarted { .. }
            | CombatEvent::StatusExpired { .. }
            | CombatEvent::TurnEnded { .. }
            | CombatEvent::CombatEnded { .. } => {}
        }
    }

    pub fn team(&self, team: Team) -> TeamStats {
        self.characters
            .values()
            .filter(|s| s.team == Some(team))
            .fold(TeamStats::default(), |mut t, s| {
                t.damage_dealt += s.damage_dealt;
                t.damage_taken += s.damage_taken;
                t.healing_done += s.healing_done;
                t.actions += s.abilities_used + s.basic_attacks;
                t.kills += s.kills;
                t.losses += u32::from(s.defeated);
                t
            })
    }
}
