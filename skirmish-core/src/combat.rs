//! Turn engine: initiative, turn cycling, action points and action resolution

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;

use crate::ability::{AbilityCatalog, AbilityId, AbilityTemplate};
use crate::area::AreaOfEffect;
use crate::battlefield::{Battlefield, PlacementError};
use crate::character::{Attribute, Character, CharacterId};
use crate::combatant::{Combatant, Team};
use crate::dice::DiceRoll;
use crate::hex::Hex;
use crate::pathfinding;
use crate::status::{Condition, BLESS_BONUS, WEAKEN_PENALTY};

// ============================================================================
// CONSTANTS
// ============================================================================

/// AP cost of a basic attack
pub const BASIC_ATTACK_COST: u32 = 2;

/// Experience granted to each surviving member of the winning team
pub const DEFAULT_VICTORY_EXPERIENCE: u32 = 100;

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Where the active combatant is within its turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TurnPhase {
    TurnStart,
    ActionsPending,
    /// Between turns; the next combatant may be granted a turn
    TurnEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CombatState {
    NotStarted,
    InProgress(TurnPhase),
    Ended { winner: Option<Team> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Begin,
    GrantTurn,
    OpenActions,
    CloseTurn,
    Terminate(Option<Team>),
}

impl CombatState {
    /// Transition table. `None` means the transition is not allowed from here.
    pub fn next(self, transition: Transition) -> Option<CombatState> {
        use CombatState::*;
        use TurnPhase::*;

        match (self, transition) {
            (NotStarted, Transition::Begin) => Some(InProgress(TurnEnd)),
            (InProgress(TurnEnd), Transition::GrantTurn) => Some(InProgress(TurnStart)),
            (InProgress(TurnStart), Transition::OpenActions) => Some(InProgress(ActionsPending)),
            (InProgress(TurnStart | ActionsPending), Transition::CloseTurn) => Some(InProgress(TurnEnd)),
            (InProgress(TurnEnd), Transition::Terminate(winner)) => Some(Ended { winner }),
            _ => None,
        }
    }
}

// ============================================================================
// REFUSALS, REPORTS, EVENTS
// ============================================================================

/// Why the engine declined a request. Nothing is mutated on refusal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("combat has already started")]
    AlreadyStarted,
    #[error("combat is not accepting actions")]
    NotAccepting,
    #[error("{0} is not in this encounter")]
    UnknownCombatant(CharacterId),
    #[error("{0} is not the active combatant")]
    NotActive(CharacterId),
    #[error("{0} is defeated")]
    Defeated(CharacterId),
    #[error("need {needed} AP, have {available}")]
    InsufficientAp { needed: u32, available: u32 },
    #[error("{user} does not know that ability")]
    AbilityNotKnown { user: CharacterId },
    #[error("requires level {required}, has {actual}")]
    LevelTooLow { required: u32, actual: u32 },
    #[error("requires {tree} rank {rank}")]
    TechLocked { tree: String, rank: u32 },
    #[error("{0} is not on the battlefield")]
    Unplaced(CharacterId),
    #[error("{dest:?} is not reachable within {budget} steps")]
    Unreachable { dest: Hex, budget: u32 },
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    Ability(AbilityId),
    BasicAttack,
}

/// Effect of an action on one combatant
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HitReport {
    pub target: CharacterId,
    /// HP actually lost (or restored, when `healing`)
    pub amount: i32,
    pub healing: bool,
    pub hit: bool,
    pub saved: bool,
    pub critical: bool,
    pub inflicted: Vec<Condition>,
    pub defeated: bool,
}

impl HitReport {
    fn new(target: CharacterId) -> Self {
        Self {
            target,
            amount: 0,
            healing: false,
            hit: true,
            saved: false,
            critical: false,
            inflicted: Vec::new(),
            defeated: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub actor: CharacterId,
    pub action: ActionKind,
    pub ap_spent: u32,
    pub hits: Vec<HitReport>,
}

/// Everything that changes combat state, in order
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    CombatStarted { order: Vec<(CharacterId, i32)> },
    TurnStarted { round: u32, actor: CharacterId, ap: u32 },
    StatusTick { target: CharacterId, condition: Condition, damage: i32 },
    StatusExpired { target: CharacterId, condition: Condition },
    Incapacitated { actor: CharacterId },
    Action(ActionReport),
    Moved { actor: CharacterId, path: Vec<Hex> },
    Defeated { target: CharacterId },
    TurnEnded { actor: CharacterId, banked: u32 },
    CombatEnded { winner: Option<Team>, rounds: u32 },
}

/// Outcome of a basic attack roll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackRoll {
    pub natural: i32,
    pub total: i32,
    pub hit: bool,
    pub critical: bool,
}

impl AttackRoll {
    /// Meet-or-exceed against defense; a natural 20 always hits and crits
    pub fn new(natural: i32, bonus: i32, defense: i32) -> Self {
        let total = natural + bonus;
        let critical = natural == 20;
        Self {
            natural,
            total,
            hit: critical || total >= defense,
            critical,
        }
    }

    /// Damage for this roll; doubled on a critical
    pub fn damage(&self, die: i32, bonus: i32) -> i32 {
        if !self.hit {
            return 0;
        }
        let base = (die + bonus).max(0);
        if self.critical {
            base * 2
        } else {
            base
        }
    }
}

// ============================================================================
// TURN ENGINE
// ============================================================================

/// Owns every combatant and the battlefield for one encounter
pub struct TurnEngine<'a> {
    catalog: &'a AbilityCatalog,
    battlefield: Battlefield,
    /// Initiative order
    combatants: Vec<Combatant>,
    current: Option<usize>,
    round: u32,
    /// Last round that may be played; wrapping past it ends in a draw
    round_limit: u32,
    turns_granted: u32,
    state: CombatState,
    rng: ChaCha8Rng,
    victory_experience: u32,
    events: Vec<CombatEvent>,
}

impl<'a> TurnEngine<'a> {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(catalog: &'a AbilityCatalog, battlefield: Battlefield, seed: u64) -> Self {
        Self {
            catalog,
            battlefield,
            combatants: Vec::new(),
            current: None,
            round: 0,
            round_limit: u32::MAX,
            turns_granted: 0,
            state: CombatState::NotStarted,
            rng: ChaCha8Rng::seed_from_u64(seed),
            victory_experience: DEFAULT_VICTORY_EXPERIENCE,
            events: Vec::new(),
        }
    }

    pub fn with_victory_experience(mut self, experience: u32) -> Self {
        self.victory_experience = experience;
        self
    }

    pub fn with_round_limit(mut self, rounds: u32) -> Self {
        self.round_limit = rounds;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn is_combat_active(&self) -> bool {
        matches!(self.state, CombatState::InProgress(_))
    }

    pub fn winner(&self) -> Option<Team> {
        match self.state {
            CombatState::Ended { winner } => winner,
            _ => None,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turns_granted(&self) -> u32 {
        self.turns_granted
    }

    pub fn catalog(&self) -> &'a AbilityCatalog {
        self.catalog
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: CharacterId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id() == id)
    }

    fn index_of(&self, id: CharacterId) -> Option<usize> {
        self.combatants.iter().position(|c| c.id() == id)
    }

    /// Combatant whose turn it is, if a turn is open
    pub fn current_combatant(&self) -> Option<&Combatant> {
        match self.state {
            CombatState::InProgress(TurnPhase::TurnStart | TurnPhase::ActionsPending) => {
                self.current.map(|i| &self.combatants[i])
            }
            _ => None,
        }
    }

    pub fn current_id(&self) -> Option<CharacterId> {
        self.current_combatant().map(|c| c.id())
    }

    /// Living enemies of `id`, in initiative order
    pub fn living_enemies(&self, id: CharacterId) -> Vec<CharacterId> {
        let Some(me) = self.combatant(id) else {
            return Vec::new();
        };
        self.combatants
            .iter()
            .filter(|c| c.team != me.team && c.is_alive())
            .map(|c| c.id())
            .collect()
    }

    /// Living teammates of `id`, excluding `id`
    pub fn living_allies(&self, id: CharacterId) -> Vec<CharacterId> {
        let Some(me) = self.combatant(id) else {
            return Vec::new();
        };
        self.combatants
            .iter()
            .filter(|c| c.team == me.team && c.id() != id && c.is_alive())
            .map(|c| c.id())
            .collect()
    }

    /// The encounter's random source
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Roll initiative, deploy both teams and open the first turn.
    ///
    /// Returns the first combatant to act, or `None` when one side has no
    /// living members and the encounter ended on the spot.
    pub fn start_combat(
        &mut self,
        team_a: Vec<Character>,
        team_b: Vec<Character>,
    ) -> Result<Option<CharacterId>, Refusal> {
        if self.state != CombatState::NotStarted {
            return Err(Refusal::AlreadyStarted);
        }

        self.battlefield.clear();
        let mut combatants: Vec<Combatant> = team_a
            .into_iter()
            .map(|c| (c, Team::A))
            .chain(team_b.into_iter().map(|c| (c, Team::B)))
            .enumerate()
            .map(|(i, (character, team))| Combatant::new(character, team, i))
            .collect();

        for combatant in &mut combatants {
            combatant.initiative =
                DiceRoll::d20().roll(&mut self.rng) + combatant.modifier(Attribute::Dexterity);
        }
        // Stable sort: equal initiative keeps roster order, team A first
        combatants.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        self.combatants = combatants;

        self.deploy();
        self.round = 1;
        self.transition(Transition::Begin);

        let order = self.combatants.iter().map(|c| (c.id(), c.initiative)).collect();
        self.emit(CombatEvent::CombatStarted { order });

        Ok(self.advance())
    }

    /// Team A fills columns from the left edge, team B from the right
    fn deploy(&mut self) {
        let mut order: Vec<usize> = (0..self.combatants.len()).collect();
        order.sort_by_key(|&i| self.combatants[i].roster_index);

        for i in order {
            if !self.combatants[i].is_alive() {
                continue;
            }
            let from_right = self.combatants[i].team == Team::B;
            let Some(cell) = self.battlefield.first_free_cell(from_right) else {
                continue;
            };
            if self.battlefield.place(self.combatants[i].id(), cell).is_ok() {
                self.combatants[i].position = Some(cell);
            }
        }
    }

    /// Close the open turn (if any) and grant the next one
    pub fn start_next_turn(&mut self) -> Option<CharacterId> {
        match self.state {
            CombatState::InProgress(TurnPhase::TurnEnd) => self.advance(),
            CombatState::InProgress(_) => {
                self.end_current_turn();
                self.advance()
            }
            _ => None,
        }
    }

    /// Bank up to two unspent AP and close the active turn
    pub fn end_current_turn(&mut self) {
        if !matches!(
            self.state,
            CombatState::InProgress(TurnPhase::TurnStart | TurnPhase::ActionsPending)
        ) {
            return;
        }
        if let Some(idx) = self.current {
            let banked = self.combatants[idx].end_turn();
            let actor = self.combatants[idx].id();
            self.emit(CombatEvent::TurnEnded { actor, banked });
        }
        self.transition(Transition::CloseTurn);
    }

    /// Grant turns until someone can act or the encounter is decided
    fn advance(&mut self) -> Option<CharacterId> {
        loop {
            if let Some(winner) = self.termination() {
                self.finish(winner);
                return None;
            }
            let (idx, wraps) = self.next_living_index()?;
            if wraps {
                if self.round >= self.round_limit {
                    self.finish(None);
                    return None;
                }
                self.round += 1;
            }
            self.current = Some(idx);
            self.turns_granted += 1;
            self.transition(Transition::GrantTurn);

            let report = self.combatants[idx].begin_turn(&mut self.rng);
            let actor = self.combatants[idx].id();
            let ap = self.combatants[idx].ap();
            self.emit(CombatEvent::TurnStarted { round: self.round, actor, ap });
            for tick in report.ticks {
                self.emit(CombatEvent::StatusTick {
                    target: actor,
                    condition: tick.condition,
                    damage: tick.damage,
                });
            }
            for condition in report.expired {
                self.emit(CombatEvent::StatusExpired { target: actor, condition });
            }
            if report.incapacitated {
                self.emit(CombatEvent::Incapacitated { actor });
            }

            if !self.combatants[idx].is_alive() {
                self.on_defeat(idx);
                self.end_current_turn();
                continue;
            }

            self.transition(Transition::OpenActions);
            return Some(actor);
        }
    }

    /// Next living combatant after the current one, and whether reaching it
    /// wraps into a new round
    fn next_living_index(&self) -> Option<(usize, bool)> {
        let len = self.combatants.len();
        let start = self.current.map_or(0, |i| i + 1);
        (start..start + len)
            .map(|i| (i % len, i >= len))
            .find(|&(idx, _)| self.combatants[idx].is_alive())
    }

    /// `Some(winner)` once a side has no living members
    fn termination(&self) -> Option<Option<Team>> {
        let alive = |team: Team| self.combatants.iter().any(|c| c.team == team && c.is_alive());
        match (alive(Team::A), alive(Team::B)) {
            (true, true) => None,
            (true, false) => Some(Some(Team::A)),
            (false, true) => Some(Some(Team::B)),
            (false, false) => Some(None),
        }
    }

    fn finish(&mut self, winner: Option<Team>) {
        self.transition(Transition::Terminate(winner));
        self.current = None;
        if let Some(team) = winner {
            for c in self.combatants.iter_mut().filter(|c| c.team == team && c.is_alive()) {
                c.character.grant_experience(self.victory_experience);
            }
        }
        tracing::debug!(?winner, rounds = self.round, "combat ended");
        self.emit(CombatEvent::CombatEnded { winner, rounds: self.round });
    }

    fn on_defeat(&mut self, idx: usize) {
        if let Some(pos) = self.combatants[idx].position.take() {
            self.battlefield.remove(pos);
        }
        let target = self.combatants[idx].id();
        self.emit(CombatEvent::Defeated { target });
    }

    /// Final characters in roster order, split by team
    pub fn into_rosters(mut self) -> (Vec<Character>, Vec<Character>) {
        self.combatants.sort_by_key(|c| c.roster_index);
        let (a, b): (Vec<Combatant>, Vec<Combatant>) =
            self.combatants.into_iter().partition(|c| c.team == Team::A);
        (
            a.into_iter().map(|c| c.character).collect(),
            b.into_iter().map(|c| c.character).collect(),
        )
    }

    fn transition(&mut self, transition: Transition) {
        match self.state.next(transition) {
            Some(next) => self.state = next,
            None => tracing::warn!(state = ?self.state, ?transition, "rejected combat transition"),
        }
    }

    fn emit(&mut self, event: CombatEvent) {
        tracing::trace!(?event);
        self.events.push(event);
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    fn acting_index(&self, user: CharacterId) -> Result<usize, Refusal> {
        if self.state != CombatState::InProgress(TurnPhase::ActionsPending) {
            return Err(Refusal::NotAccepting);
        }
        let idx = self.index_of(user).ok_or(Refusal::UnknownCombatant(user))?;
        if self.current != Some(idx) {
            return Err(Refusal::NotActive(user));
        }
        Ok(idx)
    }

    fn living_index(&self, id: CharacterId) -> Result<usize, Refusal> {
        let idx = self.index_of(id).ok_or(Refusal::UnknownCombatant(id))?;
        if !self.combatants[idx].is_alive() {
            return Err(Refusal::Defeated(id));
        }
        Ok(idx)
    }

    /// Whether `user` could use `ability` right now (AP and gating)
    pub fn check_ability(&self, ability: AbilityId, user: CharacterId) -> Result<(), Refusal> {
        let idx = self.acting_index(user)?;
        let combatant = &self.combatants[idx];
        if !combatant.character.knows(ability) {
            return Err(Refusal::AbilityNotKnown { user });
        }
        let template = self.catalog.get(ability);
        if combatant.character.level < template.min_level {
            return Err(Refusal::LevelTooLow {
                required: template.min_level,
                actual: combatant.character.level,
            });
        }
        if let Some(req) = &template.requirement {
            if !combatant.character.meets(req) {
                return Err(Refusal::TechLocked {
                    tree: req.tree.clone(),
                    rank: req.rank,
                });
            }
        }
        if combatant.ap() < template.ap_cost {
            return Err(Refusal::InsufficientAp {
                needed: template.ap_cost,
                available: combatant.ap(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    /// Use an ability on `target`.
    ///
    /// Area abilities centre on the target's cell and also catch every other
    /// living enemy (allies, for healing) inside the area. The amount is
    /// rolled once; each recipient with a save rolls it separately, halving
    /// the amount and shrugging off every inflicted status on success.
    pub fn use_ability(
        &mut self,
        ability: AbilityId,
        user: CharacterId,
        target: CharacterId,
    ) -> Result<ActionReport, Refusal> {
        self.check_ability(ability, user)?;
        let target_idx = self.living_index(target)?;
        let user_idx = self.acting_index(user)?;
        let catalog = self.catalog;
        let template = catalog.get(ability);

        let caster = &mut self.combatants[user_idx];
        caster.spend_ap(template.ap_cost);
        caster.start_cooldown(ability, template.cooldown);
        let bonus = template.attribute_bonus(&caster.character);
        let dc = template.save_dc(&caster.character);

        let recipients = self.recipients(template, user_idx, target_idx);
        let rolled = template.dice.map_or(0, |d| d.roll(&mut self.rng));
        let amount = (rolled + bonus).max(0);

        let mut hits = Vec::with_capacity(recipients.len());
        for idx in recipients {
            let saved = match template.save {
                Some(attribute) => {
                    let recipient = &self.combatants[idx];
                    let save_bonus = recipient.modifier(attribute)
                        + if recipient.has(Condition::Blessed) { BLESS_BONUS } else { 0 };
                    DiceRoll::d20().roll(&mut self.rng) + save_bonus >= dc
                }
                None => false,
            };
            let value = if saved { amount / 2 } else { amount };

            let recipient = &mut self.combatants[idx];
            let mut hit = HitReport::new(recipient.id());
            hit.saved = saved;
            hit.healing = template.is_healing();
            if template.dice.is_some() {
                hit.amount = if hit.healing {
                    recipient.character.heal(value)
                } else {
                    recipient.character.take_damage(value)
                };
            }
            if !saved {
                for status in template.inflicts.iter().filter(|s| s.duration > 0) {
                    recipient.add_status(status.condition, status.duration);
                    hit.inflicted.push(status.condition);
                }
            }
            if !recipient.is_alive() {
                hit.defeated = true;
                self.on_defeat(idx);
            }
            hits.push(hit);
        }

        let report = ActionReport {
            actor: user,
            action: ActionKind::Ability(ability),
            ap_spent: template.ap_cost,
            hits,
        };
        tracing::debug!(actor = %user, ability = %template.key, "ability used");
        self.emit(CombatEvent::Action(report.clone()));
        Ok(report)
    }

    /// Indices affected by `template`, the named target first
    fn recipients(&self, template: &AbilityTemplate, user_idx: usize, target_idx: usize) -> Vec<usize> {
        match template.area {
            AreaOfEffect::SelfOnly => vec![user_idx],
            AreaOfEffect::Single => vec![target_idx],
            area => {
                let Some(anchor) = self.combatants[target_idx].position else {
                    return vec![target_idx];
                };
                let facing = self.combatants[user_idx]
                    .position
                    .map(|from| (anchor.q - from.q, anchor.r - from.r));
                let user_team = self.combatants[user_idx].team;
                let side = if template.is_healing() { user_team } else { user_team.opponent() };

                let mut recipients = vec![target_idx];
                for cell in area.resolve(anchor, facing) {
                    let Some(idx) = self.battlefield.occupant(cell).and_then(|id| self.index_of(id)) else {
                        continue;
                    };
                    let c = &self.combatants[idx];
                    if c.team == side && c.is_alive() && !recipients.contains(&idx) {
                        recipients.push(idx);
                    }
                }
                recipients
            }
        }
    }

    /// Two-AP weapon attack: d20 + STR against defense, d6 + STR damage
    pub fn perform_basic_attack(
        &mut self,
        attacker: CharacterId,
        target: CharacterId,
    ) -> Result<ActionReport, Refusal> {
        let idx = self.acting_index(attacker)?;
        let target_idx = self.living_index(target)?;
        if !self.combatants[idx].spend_ap(BASIC_ATTACK_COST) {
            return Err(Refusal::InsufficientAp {
                needed: BASIC_ATTACK_COST,
                available: self.combatants[idx].ap(),
            });
        }

        let striker = &self.combatants[idx];
        let strength = striker.modifier(Attribute::Strength);
        let attack_bonus = strength + if striker.has(Condition::Blessed) { BLESS_BONUS } else { 0 };
        let damage_bonus = strength - if striker.has(Condition::Weakened) { WEAKEN_PENALTY } else { 0 };
        let defense = self.combatants[target_idx].defense();

        let roll = AttackRoll::new(DiceRoll::d20().roll(&mut self.rng), attack_bonus, defense);
        let damage = if roll.hit {
            roll.damage(DiceRoll::d6().roll(&mut self.rng), damage_bonus)
        } else {
            0
        };

        let victim = &mut self.combatants[target_idx];
        let mut hit = HitReport::new(victim.id());
        hit.hit = roll.hit;
        hit.critical = roll.critical;
        hit.amount = victim.character.take_damage(damage);
        if !victim.is_alive() {
            hit.defeated = true;
            self.on_defeat(target_idx);
        }

        let report = ActionReport {
            actor: attacker,
            action: ActionKind::BasicAttack,
            ap_spent: BASIC_ATTACK_COST,
            hits: vec![hit],
        };
        tracing::debug!(actor = %attacker, %target, natural = roll.natural, damage, "basic attack");
        self.emit(CombatEvent::Action(report.clone()));
        Ok(report)
    }

    /// Walk the active combatant to `dest` within its remaining movement
    pub fn move_combatant(&mut self, id: CharacterId, dest: Hex) -> Result<Vec<Hex>, Refusal> {
        let idx = self.acting_index(id)?;
        let from = self.combatants[idx].position.ok_or(Refusal::Unplaced(id))?;
        if from == dest {
            return Ok(vec![from]);
        }
        self.battlefield.check_free(dest)?;

        let budget = self.combatants[idx].movement_left();
        let path = pathfinding::find_path(&self.battlefield, from, dest, budget, false)
            .ok_or(Refusal::Unreachable { dest, budget })?;
        self.battlefield.move_occupant(from, dest)?;

        let mover = &mut self.combatants[idx];
        mover.position = Some(dest);
        mover.spend_movement(path.len() as u32 - 1);
        self.emit(CombatEvent::Moved { actor: id, path: path.clone() });
        Ok(path)
    }

    /// Cells the combatant could still walk to this turn
    pub fn reachable_cells(&self, id: CharacterId) -> Vec<Hex> {
        match self.combatant(id) {
            Some(c) => match c.position {
                Some(pos) => pathfinding::reachable_cells(&self.battlefield, pos, c.movement_left()),
                None => Vec::new(),
            },
            None => Vec::new(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
