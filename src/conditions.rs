use crate::battle::rng::BattleRng;
use crate::elements::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primary status conditions. A combatant holds at most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryCondition {
    Burn,
    Poison,
    /// Escalating poison; the tick counter lives in the ConditionManager.
    BadPoison,
    /// Turns of sleep remaining.
    Sleep(u8),
    Freeze,
    Paralysis,
}

impl PrimaryCondition {
    /// Combatants of these elements shrug the condition off entirely.
    pub fn immune_elements(&self) -> &'static [Element] {
        match self {
            PrimaryCondition::Burn => &[Element::Flame],
            PrimaryCondition::Poison | PrimaryCondition::BadPoison => &[Element::Venom],
            PrimaryCondition::Freeze => &[Element::Frost],
            PrimaryCondition::Paralysis => &[Element::Storm],
            PrimaryCondition::Sleep(_) => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimaryCondition::Burn => "burn",
            PrimaryCondition::Poison => "poison",
            PrimaryCondition::BadPoison => "creeping poison",
            PrimaryCondition::Sleep(_) => "sleep",
            PrimaryCondition::Freeze => "freeze",
            PrimaryCondition::Paralysis => "paralysis",
        }
    }
}

/// Battle-local volatile conditions. Any number may coexist, each with a
/// remaining duration in turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VolatileCondition {
    Confused,
    Flinched,
    Trapped,
    Cursed,
}

impl VolatileCondition {
    pub fn name(&self) -> &'static str {
        match self {
            VolatileCondition::Confused => "confusion",
            VolatileCondition::Flinched => "flinching",
            VolatileCondition::Trapped => "trapping",
            VolatileCondition::Cursed => "curse",
        }
    }
}

/// Why an actor could not act this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    Asleep,
    Frozen,
    FullyParalyzed,
    Flinched,
}

/// Outcome of the pre-action condition gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActGate {
    Free,
    /// The condition wore off just now; the actor still acts.
    Cured(PrimaryCondition),
    Blocked(BlockReason),
}

/// Source tag for end-of-turn condition damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickSource {
    Burn,
    Poison,
    BadPoison,
    Trapped,
    Cursed,
}

impl TickSource {
    pub fn name(&self) -> &'static str {
        match self {
            TickSource::Burn => "burn",
            TickSource::Poison => "poison",
            TickSource::BadPoison => "creeping poison",
            TickSource::Trapped => "trapping",
            TickSource::Cursed => "curse",
        }
    }
}

/// End-of-turn tick results, applied by the engine in order.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub damage: Vec<(TickSource, u16)>,
    pub expired: Vec<VolatileCondition>,
}

/// Per-combatant condition bookkeeping: one optional primary condition and a
/// duration-tracked set of volatiles. Owned 1:1 by a Combatant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionManager {
    primary: Option<PrimaryCondition>,
    volatiles: BTreeMap<VolatileCondition, u8>,
    poison_counter: u8,
}

const BAD_POISON_CAP: u8 = 8;

impl ConditionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&self) -> Option<PrimaryCondition> {
        self.primary
    }

    /// Apply a primary condition. Fails (returns false) when one is already
    /// present; at most one primary condition may be held.
    pub fn set_primary(&mut self, condition: PrimaryCondition) -> bool {
        if self.primary.is_some() {
            return false;
        }
        if matches!(condition, PrimaryCondition::BadPoison) {
            self.poison_counter = 0;
        }
        self.primary = Some(condition);
        true
    }

    pub fn cure_primary(&mut self) -> Option<PrimaryCondition> {
        self.poison_counter = 0;
        self.primary.take()
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub fn is_paralyzed(&self) -> bool {
        matches!(self.primary, Some(PrimaryCondition::Paralysis))
    }

    pub fn is_burned(&self) -> bool {
        matches!(self.primary, Some(PrimaryCondition::Burn))
    }

    pub fn is_incapacitated(&self) -> bool {
        matches!(
            self.primary,
            Some(PrimaryCondition::Sleep(_)) | Some(PrimaryCondition::Freeze)
        )
    }

    pub fn poison_counter(&self) -> u8 {
        self.poison_counter
    }

    pub fn has_volatile(&self, condition: VolatileCondition) -> bool {
        self.volatiles.contains_key(&condition)
    }

    pub fn add_volatile(&mut self, condition: VolatileCondition, turns: u8) {
        self.volatiles.insert(condition, turns.max(1));
    }

    pub fn remove_volatile(&mut self, condition: VolatileCondition) -> bool {
        self.volatiles.remove(&condition).is_some()
    }

    pub fn volatiles(&self) -> impl Iterator<Item = (VolatileCondition, u8)> + '_ {
        self.volatiles.iter().map(|(&c, &t)| (c, t))
    }

    pub fn clear_volatiles(&mut self) {
        self.volatiles.clear();
    }

    /// Pre-action gate: decides whether the owner may act this turn.
    /// Consumes exactly one RNG draw per probabilistic check (freeze thaw,
    /// paralysis stop) and mutates durations as a side effect.
    pub fn check_can_act(&mut self, rng: &mut BattleRng) -> ActGate {
        match self.primary {
            Some(PrimaryCondition::Sleep(turns)) => {
                if turns == 0 {
                    let cured = self.cure_primary().unwrap_or(PrimaryCondition::Sleep(0));
                    return ActGate::Cured(cured);
                }
                self.primary = Some(PrimaryCondition::Sleep(turns - 1));
                return ActGate::Blocked(BlockReason::Asleep);
            }
            Some(PrimaryCondition::Freeze) => {
                if rng.chance(20) {
                    self.cure_primary();
                    return ActGate::Cured(PrimaryCondition::Freeze);
                }
                return ActGate::Blocked(BlockReason::Frozen);
            }
            Some(PrimaryCondition::Paralysis) => {
                if rng.chance(25) {
                    return ActGate::Blocked(BlockReason::FullyParalyzed);
                }
            }
            _ => {}
        }
        if self.volatiles.remove(&VolatileCondition::Flinched).is_some() {
            return ActGate::Blocked(BlockReason::Flinched);
        }
        ActGate::Free
    }

    /// End-of-turn processing: condition damage and volatile expiry.
    /// Damage entries are ordered primary-first, then volatiles in their
    /// fixed (BTreeMap) order, keeping replay deterministic.
    pub fn end_of_turn(&mut self, max_hp: u16) -> TickReport {
        let mut report = TickReport::default();
        let eighth = (max_hp / 8).max(1);

        match self.primary {
            Some(PrimaryCondition::Burn) => report.damage.push((TickSource::Burn, eighth)),
            Some(PrimaryCondition::Poison) => report.damage.push((TickSource::Poison, eighth)),
            Some(PrimaryCondition::BadPoison) => {
                if self.poison_counter < BAD_POISON_CAP {
                    self.poison_counter += 1;
                }
                let sixteenth = (max_hp / 16).max(1);
                report
                    .damage
                    .push((TickSource::BadPoison, sixteenth * self.poison_counter as u16));
            }
            _ => {}
        }

        let mut expired = Vec::new();
        for (&condition, turns) in self.volatiles.iter_mut() {
            match condition {
                VolatileCondition::Trapped => {
                    report.damage.push((TickSource::Trapped, eighth));
                }
                VolatileCondition::Cursed => {
                    report.damage.push((TickSource::Cursed, (max_hp / 4).max(1)));
                }
                _ => {}
            }
            *turns = turns.saturating_sub(1);
            if *turns == 0 {
                expired.push(condition);
            }
        }
        for condition in &expired {
            self.volatiles.remove(condition);
        }
        report.expired = expired;
        report
    }
}
