use crate::battle::action::{Action, Side};
use crate::battle::ai::{AiLevel, ScoringAi};
use crate::battle::order::{self, OrderEntry, OrderMode};
use crate::battle::rewards::{self, BattleOutcome, SyncPayload};
use crate::battle::rng::BattleRng;
use crate::battle::state::{
    BattleEvent, BattleKind, BattlePhase, BattleState, EventBus, SideState,
};
use crate::battle::taming;
use crate::combatant::Combatant;
use crate::conditions::{ActGate, PrimaryCondition};
use crate::damage;
use crate::errors::{ActionError, ActionResult, BattleResult, StateError};
use crate::field::{FieldExpiry, FieldState};
use crate::items::{BattleUse, CureScope, ItemId};
use crate::moves::{EffectTarget, MoveCatalog, MoveData, MoveEffect, TargetMode};
use crate::stats::exp_on_defeat;

/// Immutable game data injected into every battle.
#[derive(Debug, Clone)]
pub struct GameData {
    pub moves: MoveCatalog,
}

impl GameData {
    pub fn standard() -> Self {
        Self {
            moves: MoveCatalog::standard(),
        }
    }
}

/// Per-battle configuration.
#[derive(Debug, Clone)]
pub struct BattleConfig {
    pub kind: BattleKind,
    pub order_mode: OrderMode,
    /// Fixed seed for replayable battles; None draws from OS entropy.
    pub seed: Option<u64>,
    pub field: FieldState,
    pub enemy_ai: AiLevel,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            kind: BattleKind::Wild,
            order_mode: OrderMode::Standard,
            seed: None,
            field: FieldState::new(),
            enemy_ai: AiLevel::Feral,
        }
    }
}

/// The battle engine: drives a BattleState through the phase machine.
/// Rosters are cloned at construction; the caller's combatants are only
/// updated through the outcome's sync payload.
#[derive(Debug)]
pub struct Battle<'a> {
    game: &'a GameData,
    pub state: BattleState,
    ai: ScoringAi,
}

impl<'a> Battle<'a> {
    pub fn new(
        game: &'a GameData,
        player_name: &str,
        player_roster: &[Combatant],
        enemy_name: &str,
        enemy_roster: &[Combatant],
        config: BattleConfig,
    ) -> BattleResult<Self> {
        if player_roster.is_empty() {
            return Err(StateError::EmptySide(Side::Player).into());
        }
        if enemy_roster.is_empty() {
            return Err(StateError::EmptySide(Side::Enemy).into());
        }
        if player_roster.iter().all(|m| m.is_fainted()) {
            return Err(StateError::NoConsciousCombatant(Side::Player).into());
        }
        if enemy_roster.iter().all(|m| m.is_fainted()) {
            return Err(StateError::NoConsciousCombatant(Side::Enemy).into());
        }

        let rng = match config.seed {
            Some(seed) => BattleRng::seeded(seed),
            None => BattleRng::from_entropy(),
        };

        let state = BattleState {
            kind: config.kind,
            sides: [
                SideState::new(player_name.to_string(), player_roster.to_vec()),
                SideState::new(enemy_name.to_string(), enemy_roster.to_vec()),
            ],
            phase: BattlePhase::Start,
            resume: BattlePhase::Start,
            pending_actions: [None, None],
            turn: 1,
            field: config.field,
            order_mode: config.order_mode,
            rng,
            bus: EventBus::new(),
            winner: None,
            captured: None,
            fled: false,
        };

        Ok(Self {
            game,
            state,
            ai: ScoringAi::new(config.enemy_ai),
        })
    }

    /// Resume a battle from a serialized state, e.g. after a save/load.
    pub fn from_state(game: &'a GameData, state: BattleState, enemy_ai: AiLevel) -> Self {
        Self {
            game,
            state,
            ai: ScoringAi::new(enemy_ai),
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.state.phase
    }

    pub fn events(&self) -> &[BattleEvent] {
        self.state.bus.events()
    }

    /// Open the battle: reset battle-local state, log the intro, and
    /// suspend for the intro messages.
    pub fn start(&mut self) -> BattleResult<()> {
        self.state.expect_phase(BattlePhase::Start)?;
        for side in &mut self.state.sides {
            for member in &mut side.members {
                member.reset_battle_state();
            }
        }
        let player = self.state.side(Side::Player).active().name.clone();
        let enemy = self.state.side(Side::Enemy).active().name.clone();
        self.state
            .bus
            .push(BattleEvent::BattleStarted { player, enemy });
        self.state.bus.push(BattleEvent::TurnStarted {
            turn: self.state.turn,
        });
        self.state.suspend_for_messages(BattlePhase::Input);
        Ok(())
    }

    /// Drain pending log lines. In the Message phase this also resumes the
    /// machine at the stored phase.
    pub fn drain_messages(&mut self) -> Vec<String> {
        let lines = self.state.bus.drain();
        if self.state.phase == BattlePhase::Message {
            self.state.phase = self.state.resume;
        }
        lines
    }

    /// Queue one action for its side. Invalid actions leave the state
    /// untouched; the caller re-prompts.
    pub fn submit_action(&mut self, action: Action) -> BattleResult<()> {
        self.state.expect_phase(BattlePhase::Input)?;
        self.validate_action(&action)?;
        self.state.pending_actions[action.side().index()] = Some(action);
        Ok(())
    }

    fn validate_action(&self, action: &Action) -> ActionResult<()> {
        let side = action.side();
        if self.state.pending_actions[side.index()].is_some() {
            return Err(ActionError::ActionAlreadyQueued(side));
        }
        let side_state = self.state.side(side);
        if side_state.active().is_fainted() {
            return Err(ActionError::NoActor(side));
        }
        match action {
            Action::Attack { move_slot, .. } => {
                let active = side_state.active();
                let instance = active
                    .moves
                    .get(*move_slot)
                    .ok_or(ActionError::InvalidMoveSlot(*move_slot))?;
                if instance.disabled {
                    return Err(ActionError::MoveDisabled(instance.id));
                }
                if instance.uses == 0 {
                    return Err(ActionError::NoUsesRemaining(instance.id));
                }
            }
            Action::Switch { bench_index, .. } => {
                let target = side_state
                    .members
                    .get(*bench_index)
                    .ok_or(ActionError::InvalidSwitchTarget(*bench_index))?;
                if *bench_index == side_state.active {
                    return Err(ActionError::SwitchTargetActive(*bench_index));
                }
                if target.is_fainted() {
                    return Err(ActionError::SwitchTargetFainted(*bench_index));
                }
            }
            Action::UseItem { item, .. } => {
                if matches!(item.battle_use(), BattleUse::Bait(_)) {
                    // Bait only works through a capture attempt.
                    return Err(ActionError::ItemNotUsable(*item));
                }
            }
            Action::Flee { side } => {
                if self.state.kind != BattleKind::Wild || *side != Side::Player {
                    return Err(ActionError::FleeNotAllowed);
                }
            }
            Action::Capture { side, bait } => {
                if self.state.kind != BattleKind::Wild || *side != Side::Player {
                    return Err(ActionError::CaptureNotAllowed);
                }
                if let Some(item) = bait {
                    if item.taming_bonus().is_none() {
                        return Err(ActionError::ItemNotUsable(*item));
                    }
                }
            }
            Action::Pass { .. } => {}
        }
        Ok(())
    }

    /// Resolve the queued turn: let the AI fill the enemy slot, order the
    /// actions, execute them, and run the aftermath tick.
    pub fn resolve_turn(&mut self) -> BattleResult<()> {
        self.state.expect_phase(BattlePhase::Input)?;
        if self.state.pending_actions[Side::Player.index()].is_none() {
            return Err(StateError::InconsistentState(
                "resolve_turn called with no player action queued".to_string(),
            )
            .into());
        }
        if self.state.pending_actions[Side::Enemy.index()].is_none() {
            let action = {
                let BattleState { sides, rng, .. } = &mut self.state;
                let [player, enemy] = sides;
                self.ai
                    .choose(Side::Enemy, enemy, player, &self.game.moves, rng)
            };
            self.state.pending_actions[Side::Enemy.index()] = Some(action);
        }

        self.state.phase = BattlePhase::Order;
        let ordered = self.order_actions()?;
        self.state.pending_actions = [None, None];

        self.state.phase = BattlePhase::Resolve;
        for action in ordered {
            if self.state.phase != BattlePhase::Resolve {
                break;
            }
            self.execute(action);
            self.check_win_condition();
        }

        if self.state.phase == BattlePhase::Resolve {
            self.state.phase = BattlePhase::Aftermath;
            self.run_aftermath();
        }
        Ok(())
    }

    fn order_actions(&mut self) -> BattleResult<Vec<Action>> {
        let mut entries = Vec::with_capacity(2);
        for side in [Side::Player, Side::Enemy] {
            let Some(action) = self.state.pending_actions[side.index()] else {
                continue;
            };
            let priority = match action {
                Action::Attack { move_slot, .. } => {
                    let id = self.state.side(side).active().moves[move_slot].id;
                    self.game.moves.get(id)?.priority
                }
                other => other.base_priority(),
            };
            entries.push(OrderEntry {
                action,
                priority,
                speed: self.state.side(side).active().effective_speed(),
            });
        }
        let distortion = self.state.field.distortion_active();
        Ok(order::resolve(
            entries,
            self.state.order_mode,
            distortion,
            &mut self.state.rng,
        ))
    }

    fn execute(&mut self, action: Action) {
        let side = action.side();
        if self.state.side(side).active().is_fainted() {
            // Downed mid-turn before its action came up.
            let name = self.state.side(side).active().name.clone();
            self.state.bus.push(BattleEvent::ActionSkipped { name });
            return;
        }
        match action {
            Action::Attack { move_slot, .. } => self.execute_attack(side, move_slot),
            Action::Switch { bench_index, .. } => self.execute_switch(side, bench_index),
            Action::UseItem { item, .. } => self.execute_item(side, item),
            Action::Flee { .. } => self.execute_flee(side),
            Action::Capture { bait, .. } => self.execute_capture(side, bait),
            Action::Pass { .. } => {}
        }
    }

    fn execute_attack(&mut self, side: Side, move_slot: usize) {
        let BattleState {
            sides,
            rng,
            bus,
            field,
            ..
        } = &mut self.state;
        let [player, enemy] = sides;
        let (actor_side, other_side) = match side {
            Side::Player => (player, enemy),
            Side::Enemy => (enemy, player),
        };

        let actor_name = actor_side.active().name.clone();
        match actor_side.active_mut().conditions.check_can_act(rng) {
            ActGate::Blocked(reason) => {
                bus.push(BattleEvent::ActionBlocked {
                    name: actor_name,
                    reason,
                });
                return;
            }
            ActGate::Cured(condition) => {
                bus.push(BattleEvent::StatusCured {
                    name: actor_name.clone(),
                    condition,
                });
            }
            ActGate::Free => {}
        }

        let Some(instance) = actor_side.active_mut().moves.get_mut(move_slot) else {
            bus.push(BattleEvent::ActionFailed {
                name: actor_name,
                detail: format!("move slot {} out of range", move_slot),
            });
            return;
        };
        let move_id = instance.id;
        if !instance.use_move() {
            bus.push(BattleEvent::ActionFailed {
                name: actor_name,
                detail: "no uses remaining".to_string(),
            });
            return;
        }
        let move_data = match self.game.moves.get(move_id) {
            Ok(data) => data,
            Err(err) => {
                bus.push(BattleEvent::ActionFailed {
                    name: actor_name,
                    detail: err.to_string(),
                });
                return;
            }
        };

        bus.push(BattleEvent::MoveUsed {
            name: actor_name.clone(),
            move_id,
        });

        let (attacker_side, defender_side) = match move_data.target {
            TargetMode::Enemy => (&mut *actor_side, &mut *other_side),
            TargetMode::User => {
                // Self-targeting moves skip the damage pipeline and go
                // straight to their effects.
                Self::apply_effects(actor_side, None, move_data, rng, bus);
                return;
            }
        };

        let result = damage::compute_attack(
            attacker_side.active(),
            defender_side.active(),
            move_data,
            field,
            rng,
        );

        if result.missed {
            bus.push(BattleEvent::MoveMissed { name: actor_name });
            return;
        }
        if result.blocked {
            bus.push(BattleEvent::MoveHadNoEffect {
                name: defender_side.active().name.clone(),
            });
            return;
        }

        if result.damage > 0 {
            let defender_name = defender_side.active().name.clone();
            defender_side.active_mut().take_damage(result.damage);
            bus.push(BattleEvent::DamageDealt {
                name: defender_name.clone(),
                amount: result.damage,
                hits: result.hits,
            });
            if result.crit_tier.is_crit() {
                bus.push(BattleEvent::CriticalHit {
                    tier: result.crit_tier,
                });
            }
            if let Some(&label) = result
                .modifiers
                .iter()
                .find(|m| matches!(**m, "double" | "quad" | "half" | "quarter"))
            {
                bus.push(BattleEvent::EffectivenessNoted {
                    label: label.to_string(),
                });
            }
            if defender_side.active().is_fainted() {
                bus.push(BattleEvent::Fainted {
                    name: defender_name,
                });
            }
        }

        if !defender_side.active().is_fainted() {
            Self::apply_effects(attacker_side, Some(defender_side), move_data, rng, bus);
        }

        // Exp flows only when the player's active downs an enemy.
        if side == Side::Player && other_side.active().is_fainted() {
            let trainer = self.state.kind == BattleKind::Trainer;
            self.award_knockout_exp(trainer);
        }
    }

    fn apply_effects(
        user_side: &mut SideState,
        mut target_side: Option<&mut SideState>,
        move_data: &MoveData,
        rng: &mut BattleRng,
        bus: &mut EventBus,
    ) {
        for effect in &move_data.effects {
            if !rng.chance(effect.chance()) {
                continue;
            }
            match effect {
                MoveEffect::InflictStatus { condition, .. } => {
                    let Some(target) = target_side.as_deref_mut() else {
                        continue;
                    };
                    let target = target.active_mut();
                    if condition
                        .immune_elements()
                        .iter()
                        .any(|e| target.elements.contains(e))
                    {
                        bus.push(BattleEvent::StatusResisted {
                            name: target.name.clone(),
                            condition: *condition,
                        });
                    } else if target.conditions.set_primary(*condition) {
                        bus.push(BattleEvent::StatusInflicted {
                            name: target.name.clone(),
                            condition: *condition,
                        });
                    }
                }
                MoveEffect::InflictVolatile {
                    condition, turns, ..
                } => {
                    let Some(target) = target_side.as_deref_mut() else {
                        continue;
                    };
                    let target = target.active_mut();
                    if !target.conditions.has_volatile(*condition) {
                        target.conditions.add_volatile(*condition, *turns);
                        bus.push(BattleEvent::VolatileInflicted {
                            name: target.name.clone(),
                            condition: *condition,
                        });
                    }
                }
                MoveEffect::ModifyStage {
                    target: who,
                    stat,
                    delta,
                    ..
                } => {
                    let recipient = match who {
                        EffectTarget::User => user_side.active_mut(),
                        EffectTarget::Target => match target_side.as_deref_mut() {
                            Some(t) => t.active_mut(),
                            None => continue,
                        },
                    };
                    let name = recipient.name.clone();
                    let (old, new) = recipient.stages.modify(*stat, *delta);
                    if old == new {
                        bus.push(BattleEvent::StageAtLimit {
                            name,
                            stat: *stat,
                            raised: *delta > 0,
                        });
                    } else {
                        bus.push(BattleEvent::StageChanged {
                            name,
                            stat: *stat,
                            delta: *delta,
                        });
                    }
                }
                MoveEffect::HealFraction {
                    numerator,
                    denominator,
                    ..
                } => {
                    let user = user_side.active_mut();
                    let amount =
                        (user.max_hp() as u32 * *numerator as u32 / (*denominator).max(1) as u32)
                            as u16;
                    let healed = user.heal(amount);
                    if healed > 0 {
                        bus.push(BattleEvent::Healed {
                            name: user.name.clone(),
                            amount: healed,
                        });
                    }
                }
            }
        }
    }

    fn execute_switch(&mut self, side: Side, bench_index: usize) {
        let side_state = self.state.side_mut(side);
        if bench_index >= side_state.members.len()
            || bench_index == side_state.active
            || side_state.members[bench_index].is_fainted()
        {
            return;
        }
        let outgoing = side_state.active().name.clone();
        side_state.active_mut().reset_battle_state();
        side_state.active = bench_index;
        let incoming = side_state.active().name.clone();
        self.state.bus.push(BattleEvent::Recalled {
            side,
            name: outgoing,
        });
        self.state.bus.push(BattleEvent::SentOut {
            side,
            name: incoming,
        });
    }

    fn execute_item(&mut self, side: Side, item: ItemId) {
        self.state.bus.push(BattleEvent::ItemUsed { side, item });
        let side_state = self.state.side_mut(side);
        let active = side_state.active_mut();
        let name = active.name.clone();
        match item.battle_use() {
            BattleUse::Heal(amount) => {
                let healed = active.heal(amount);
                if healed > 0 {
                    self.state.bus.push(BattleEvent::Healed {
                        name,
                        amount: healed,
                    });
                }
            }
            BattleUse::Cure(scope) => {
                let curable = match (scope, active.conditions.primary()) {
                    (CureScope::Any, Some(_)) => true,
                    (CureScope::Poison, Some(c)) => matches!(
                        c,
                        PrimaryCondition::Poison | PrimaryCondition::BadPoison
                    ),
                    (_, None) => false,
                };
                if curable {
                    if let Some(condition) = active.conditions.cure_primary() {
                        self.state
                            .bus
                            .push(BattleEvent::StatusCured { name, condition });
                    }
                }
            }
            BattleUse::Bait(_) => {}
        }
    }

    fn execute_flee(&mut self, side: Side) {
        let BattleState { sides, rng, bus, .. } = &mut self.state;
        let [player, enemy] = sides;
        let (actor, foe) = match side {
            Side::Player => (&mut *player, &*enemy),
            Side::Enemy => (&mut *enemy, &*player),
        };
        actor.flee_attempts += 1;

        // Classic escape odds from the speed ratio plus an attempt bonus.
        let own = actor.active().effective_speed() as u32;
        let foe_speed = foe.active().effective_speed() as u32;
        let blocker = ((foe_speed / 4) % 256).max(1);
        let odds = (own * 32 / blocker + 30 * actor.flee_attempts as u32).min(256);
        if (rng.index(256) as u32) < odds {
            bus.push(BattleEvent::FleeSucceeded);
            self.state.fled = true;
            self.state.phase = BattlePhase::End;
        } else {
            bus.push(BattleEvent::FleeFailed);
        }
    }

    fn execute_capture(&mut self, side: Side, bait: Option<ItemId>) {
        if let Some(item) = bait {
            self.state.bus.push(BattleEvent::ItemUsed { side, item });
        }
        let BattleState { sides, rng, bus, .. } = &mut self.state;
        let [player, enemy] = sides;

        let outcome = taming::attempt(
            enemy.active(),
            &player.members,
            bait,
            player.irritation,
            rng,
        );
        let target_name = enemy.active().name.clone();
        bus.push(BattleEvent::TameAttempted {
            name: target_name.clone(),
            chance: outcome.breakdown.chance,
        });

        if outcome.success {
            bus.push(BattleEvent::TameSucceeded { name: target_name });
            let mut captured = enemy.active().clone();
            captured.reset_battle_state();
            self.state.captured = Some(captured);
            self.state.phase = BattlePhase::End;
        } else {
            bus.push(BattleEvent::TameShake {
                name: target_name,
                shakes: outcome.shakes,
            });
            player.irritation =
                (player.irritation + taming::IRRITATION_STEP).min(taming::IRRITATION_CAP);
        }
    }

    fn award_knockout_exp(&mut self, trainer: bool) {
        let BattleState { sides, bus, .. } = &mut self.state;
        let [player, enemy] = sides;
        let victor = player.active_mut();
        if victor.is_fainted() {
            return;
        }
        let defeated = enemy.active();
        let amount = exp_on_defeat(defeated.exp_yield, defeated.level, victor.level, trainer);
        let name = victor.name.clone();
        bus.push(BattleEvent::ExpGained {
            name: name.clone(),
            amount,
        });
        for report in victor.gain_exp(amount) {
            bus.push(BattleEvent::LeveledUp {
                name: name.clone(),
                level: report.level,
            });
            for move_id in report.learned {
                if victor.moves.iter().any(|m| m.id == move_id) {
                    bus.push(BattleEvent::MoveLearned {
                        name: name.clone(),
                        move_id,
                    });
                } else {
                    bus.push(BattleEvent::MoveWantsLearning {
                        name: name.clone(),
                        move_id,
                    });
                }
            }
        }
    }

    fn run_aftermath(&mut self) {
        for side in [Side::Player, Side::Enemy] {
            if self.state.phase != BattlePhase::Aftermath {
                return;
            }
            let side_state = self.state.side_mut(side);
            if side_state.active().is_fainted() {
                continue;
            }
            let max_hp = side_state.active().max_hp();
            let report = side_state.active_mut().conditions.end_of_turn(max_hp);
            let name = side_state.active().name.clone();
            for (source, amount) in report.damage {
                let fainted = {
                    let side_state = self.state.side_mut(side);
                    side_state.active_mut().take_damage(amount);
                    side_state.active().is_fainted()
                };
                self.state.bus.push(BattleEvent::StatusDamage {
                    name: name.clone(),
                    source,
                    amount,
                });
                if fainted {
                    self.state
                        .bus
                        .push(BattleEvent::Fainted { name: name.clone() });
                    break;
                }
            }
            for condition in report.expired {
                self.state.bus.push(BattleEvent::VolatileExpired {
                    name: name.clone(),
                    condition,
                });
            }
            self.check_win_condition();
        }
        if self.state.phase != BattlePhase::Aftermath {
            return;
        }

        for expiry in self.state.field.tick() {
            let what = match expiry {
                FieldExpiry::Weather(w) => w.name().to_string(),
                FieldExpiry::Terrain(t) => t.name().to_string(),
                FieldExpiry::Distortion => "distortion".to_string(),
            };
            self.state.bus.push(BattleEvent::FieldFaded { what });
        }

        // A downed active with reserves forces a replacement before the
        // next round of input.
        for side in [Side::Player, Side::Enemy] {
            let side_state = self.state.side(side);
            if side_state.active().is_fainted() && side_state.has_reserves() {
                self.state.suspend_for_messages(BattlePhase::Switch(side));
                return;
            }
        }

        self.state.turn += 1;
        self.state.bus.push(BattleEvent::TurnStarted {
            turn: self.state.turn,
        });
        self.state.suspend_for_messages(BattlePhase::Input);
    }

    /// Send out a replacement during the forced Switch phase. The enemy
    /// side picks for itself via the AI when asked to switch.
    pub fn submit_switch(&mut self, side: Side, bench_index: usize) -> BattleResult<()> {
        self.state.expect_phase(BattlePhase::Switch(side))?;
        let side_state = self.state.side(side);
        let target = side_state
            .members
            .get(bench_index)
            .ok_or(ActionError::InvalidSwitchTarget(bench_index))?;
        if bench_index == side_state.active {
            return Err(ActionError::SwitchTargetActive(bench_index).into());
        }
        if target.is_fainted() {
            return Err(ActionError::SwitchTargetFainted(bench_index).into());
        }

        let side_state = self.state.side_mut(side);
        side_state.active = bench_index;
        side_state.active_mut().reset_battle_state();
        let name = side_state.active().name.clone();
        self.state.bus.push(BattleEvent::SentOut { side, name });

        // The other side may also be waiting on a replacement.
        let other = side.opponent();
        let other_state = self.state.side(other);
        if other_state.active().is_fainted() && other_state.has_reserves() {
            self.state.phase = BattlePhase::Switch(other);
            return Ok(());
        }

        self.state.turn += 1;
        self.state.bus.push(BattleEvent::TurnStarted {
            turn: self.state.turn,
        });
        self.state.suspend_for_messages(BattlePhase::Input);
        Ok(())
    }

    /// Pick a forced-switch replacement for the enemy side automatically.
    pub fn auto_enemy_switch(&mut self) -> BattleResult<()> {
        self.state.expect_phase(BattlePhase::Switch(Side::Enemy))?;
        let candidates = self.state.side(Side::Enemy).switch_candidates();
        let Some(&best) = candidates.first() else {
            return Err(StateError::NoConsciousCombatant(Side::Enemy).into());
        };
        self.submit_switch(Side::Enemy, best)
    }

    fn check_win_condition(&mut self) {
        if self.state.phase == BattlePhase::End || self.state.phase == BattlePhase::Complete {
            return;
        }
        if self.state.side(Side::Enemy).is_defeated() {
            self.state.winner = Some(Side::Player);
            self.state.bus.push(BattleEvent::BattleWon);
            self.state.phase = BattlePhase::End;
        } else if self.state.side(Side::Player).is_defeated() {
            self.state.winner = Some(Side::Enemy);
            self.state.bus.push(BattleEvent::BattleLost);
            self.state.phase = BattlePhase::End;
        }
    }

    /// Close out the battle: distribute rewards and produce the immutable
    /// outcome with the player-side sync payload.
    pub fn finish(&mut self) -> BattleResult<BattleOutcome> {
        self.state.expect_phase(BattlePhase::End)?;
        self.state.phase = BattlePhase::Reward;

        let mut money = 0;
        let mut drops = Vec::new();
        if self.state.winner == Some(Side::Player) {
            money = rewards::money_reward(self.state.kind, self.state.side(Side::Enemy));
            drops = rewards::item_drops(self.state.kind, &mut self.state.rng);
            self.state
                .bus
                .push(BattleEvent::MoneyEarned { amount: money });
        }

        let sync = self
            .state
            .side(Side::Player)
            .members
            .iter()
            .map(SyncPayload::from_combatant)
            .collect();

        self.state.phase = BattlePhase::Complete;
        Ok(BattleOutcome {
            winner: self.state.winner,
            turns: self.state.turn,
            money,
            item_drops: drops,
            captured: self.state.captured.take(),
            fled: self.state.fled,
            sync,
        })
    }
}
