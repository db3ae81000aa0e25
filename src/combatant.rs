use crate::conditions::{ConditionManager, PrimaryCondition};
use crate::elements::Element;
use crate::errors::{BattleResult, DataError};
use crate::moves::{MoveCatalog, MoveCategory, MoveId, MoveInstance};
use crate::stats::{staged_stat, BaseStats, GrowthCurve, StageSet, StatKind};
use serde::{Deserialize, Serialize};

/// Wild-rank of a combatant; scales the taming chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    G,
    F,
    E,
    D,
    C,
    B,
    A,
    S,
}

impl Rank {
    pub fn taming_multiplier(&self) -> f64 {
        match self {
            Rank::G => 1.25,
            Rank::F => 1.15,
            Rank::E => 1.05,
            Rank::D => 1.0,
            Rank::C => 0.9,
            Rank::B => 0.75,
            Rank::A => 0.6,
            Rank::S => 0.4,
        }
    }
}

/// Taming-relevant species data carried by every combatant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TamingProfile {
    /// Base capture rate in [0, 1].
    pub base_rate: f64,
    pub rank: Rank,
}

/// Construction-time description of a combatant. `Combatant::from_spec`
/// validates it; invalid states are unrepresentable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSpec {
    pub name: String,
    pub elements: Vec<Element>,
    pub level: u8,
    /// Base stats at the given level.
    pub base_stats: BaseStats,
    /// Per-level stat gains applied on level up.
    pub stat_growth: BaseStats,
    pub growth: GrowthCurve,
    pub exp_yield: u16,
    pub taming: TamingProfile,
    /// (level, move) pairs learned on reaching that level.
    pub learnset: Vec<(u8, MoveId)>,
    pub moves: Vec<MoveId>,
    /// Explicit override; defaults to full HP.
    pub current_hp: Option<u16>,
    /// Explicit override; defaults to no condition.
    pub status: Option<PrimaryCondition>,
}

/// A move learned on level up that could not be auto-slotted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUpReport {
    pub level: u8,
    pub learned: Vec<MoveId>,
}

/// One battle participant. Battle-local copies are cloned from externally
/// supplied rosters; mutations flow back only through the end-of-battle
/// sync payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub elements: Vec<Element>,
    pub level: u8,
    pub exp: u32,
    pub growth: GrowthCurve,
    pub base_stats: BaseStats,
    pub stat_growth: BaseStats,
    current_hp: u16,
    pub stages: StageSet,
    pub moves: Vec<MoveInstance>,
    pub conditions: ConditionManager,
    pub exp_yield: u16,
    pub taming: TamingProfile,
    pub learnset: Vec<(u8, MoveId)>,
    /// Moves learned this battle that did not fit the four slots.
    pub pending_moves: Vec<MoveId>,
}

pub const MAX_MOVES: usize = 4;

impl Combatant {
    pub fn from_spec(spec: CombatantSpec, catalog: &MoveCatalog) -> BattleResult<Self> {
        if spec.name.is_empty() {
            return Err(DataError::InvalidCombatant("empty name".to_string()).into());
        }
        if spec.elements.is_empty() || spec.elements.len() > 2 {
            return Err(DataError::InvalidCombatant(format!(
                "{}: must have one or two elements",
                spec.name
            ))
            .into());
        }
        if spec.level == 0 || spec.level > 100 {
            return Err(DataError::InvalidCombatant(format!(
                "{}: level {} out of range",
                spec.name, spec.level
            ))
            .into());
        }
        if spec.base_stats.hp == 0 {
            return Err(
                DataError::InvalidCombatant(format!("{}: zero max HP", spec.name)).into(),
            );
        }
        if spec.moves.len() > MAX_MOVES {
            return Err(DataError::InvalidCombatant(format!(
                "{}: more than {} moves",
                spec.name, MAX_MOVES
            ))
            .into());
        }
        if !(0.0..=1.0).contains(&spec.taming.base_rate) {
            return Err(DataError::InvalidCombatant(format!(
                "{}: taming base rate out of range",
                spec.name
            ))
            .into());
        }

        let mut moves = Vec::with_capacity(spec.moves.len());
        for id in &spec.moves {
            moves.push(MoveInstance::new(*id, catalog)?);
        }

        let current_hp = match spec.current_hp {
            Some(hp) if hp > spec.base_stats.hp => {
                return Err(DataError::InvalidCombatant(format!(
                    "{}: current HP {} above max {}",
                    spec.name, hp, spec.base_stats.hp
                ))
                .into());
            }
            Some(hp) => hp,
            None => spec.base_stats.hp,
        };

        let mut conditions = ConditionManager::new();
        if let Some(status) = spec.status {
            if status
                .immune_elements()
                .iter()
                .any(|e| spec.elements.contains(e))
            {
                return Err(DataError::InvalidCombatant(format!(
                    "{}: element-immune to {}",
                    spec.name,
                    status.name()
                ))
                .into());
            }
            conditions.set_primary(status);
        }

        Ok(Self {
            exp: spec.growth.exp_for_level(spec.level),
            name: spec.name,
            elements: spec.elements,
            level: spec.level,
            growth: spec.growth,
            base_stats: spec.base_stats,
            stat_growth: spec.stat_growth,
            current_hp,
            stages: StageSet::default(),
            moves,
            conditions,
            exp_yield: spec.exp_yield,
            taming: spec.taming,
            learnset: spec.learnset,
            pending_moves: Vec::new(),
        })
    }

    pub fn max_hp(&self) -> u16 {
        self.base_stats.hp
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn hp_fraction(&self) -> f64 {
        self.current_hp as f64 / self.max_hp() as f64
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Apply damage, clamped at 0. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restore HP, clamped at max. Returns the HP actually recovered.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let healed = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += healed;
        healed
    }

    /// Set HP directly; used only by the explicit end-of-battle sync.
    pub fn set_current_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp());
    }

    /// Offensive stat for a move category, stages applied.
    pub fn effective_attack(&self, category: MoveCategory) -> u16 {
        let (base, stage) = match category {
            MoveCategory::Physical => (self.base_stats.attack, self.stages.attack),
            MoveCategory::Magical => (self.base_stats.magic, self.stages.magic),
            MoveCategory::Support => return 0,
        };
        staged_stat(base, stage).max(1)
    }

    /// Defensive stat for an incoming move category, stages applied.
    pub fn effective_defense(&self, category: MoveCategory) -> u16 {
        let (base, stage) = match category {
            MoveCategory::Physical => (self.base_stats.defense, self.stages.defense),
            MoveCategory::Magical => (self.base_stats.resist, self.stages.resist),
            MoveCategory::Support => return 0,
        };
        staged_stat(base, stage).max(1)
    }

    /// Offensive stat for a critical hit: stages that would hurt the
    /// attacker are ignored.
    pub fn crit_attack(&self, category: MoveCategory) -> u16 {
        let (base, stage) = match category {
            MoveCategory::Physical => (self.base_stats.attack, self.stages.attack.max(0)),
            MoveCategory::Magical => (self.base_stats.magic, self.stages.magic.max(0)),
            MoveCategory::Support => return 0,
        };
        staged_stat(base, stage).max(1)
    }

    /// Defensive stat for a critical hit: stages that would help the
    /// defender are ignored.
    pub fn crit_defense(&self, category: MoveCategory) -> u16 {
        let (base, stage) = match category {
            MoveCategory::Physical => (self.base_stats.defense, self.stages.defense.min(0)),
            MoveCategory::Magical => (self.base_stats.resist, self.stages.resist.min(0)),
            MoveCategory::Support => return 0,
        };
        staged_stat(base, stage).max(1)
    }

    /// Effective speed for turn ordering: stages applied, halved under
    /// paralysis, floored at 1.
    pub fn effective_speed(&self) -> u16 {
        let mut speed = staged_stat(self.base_stats.speed, self.stages.speed);
        if self.conditions.is_paralyzed() {
            speed /= 2;
        }
        speed.max(1)
    }

    pub fn accuracy_stage(&self) -> i8 {
        self.stages.accuracy
    }

    pub fn evasion_stage(&self) -> i8 {
        self.stages.evasion
    }

    pub fn has_element(&self, element: Element) -> bool {
        self.elements.contains(&element)
    }

    /// Indices of moves that can currently be used.
    pub fn usable_move_slots(&self) -> Vec<usize> {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, m)| m.can_use())
            .map(|(i, _)| i)
            .collect()
    }

    /// Award experience; applies any level-ups immediately (stat growth,
    /// HP gain, learnset moves) and reports them for logging.
    pub fn gain_exp(&mut self, amount: u32) -> Vec<LevelUpReport> {
        self.exp = self.exp.saturating_add(amount);
        let mut reports = Vec::new();
        while self.level < 100 && self.growth.exp_for_level(self.level + 1) <= self.exp {
            self.level += 1;
            self.apply_level_growth();
            let learned: Vec<MoveId> = self
                .learnset
                .iter()
                .filter(|(lvl, _)| *lvl == self.level)
                .map(|(_, id)| *id)
                .collect();
            for &id in &learned {
                if self.moves.len() < MAX_MOVES {
                    // Uses counters for mid-battle learning start full; the
                    // sync payload carries the final values either way.
                    self.moves.push(MoveInstance {
                        id,
                        uses: 10,
                        disabled: false,
                    });
                } else {
                    self.pending_moves.push(id);
                }
            }
            reports.push(LevelUpReport {
                level: self.level,
                learned,
            });
        }
        reports
    }

    fn apply_level_growth(&mut self) {
        let hp_gain = self.stat_growth.hp;
        self.base_stats.hp = self.base_stats.hp.saturating_add(hp_gain);
        self.base_stats.attack = self.base_stats.attack.saturating_add(self.stat_growth.attack);
        self.base_stats.defense = self
            .base_stats
            .defense
            .saturating_add(self.stat_growth.defense);
        self.base_stats.magic = self.base_stats.magic.saturating_add(self.stat_growth.magic);
        self.base_stats.resist = self.base_stats.resist.saturating_add(self.stat_growth.resist);
        self.base_stats.speed = self.base_stats.speed.saturating_add(self.stat_growth.speed);
        // Max HP growth carries into current HP, but never revives.
        if self.current_hp > 0 {
            self.current_hp = (self.current_hp + hp_gain).min(self.base_stats.hp);
        }
    }

    /// Reset battle-start state: stages cleared, volatiles dropped.
    pub fn reset_battle_state(&mut self) {
        self.stages.clear();
        self.conditions.clear_volatiles();
    }

    pub fn stage(&self, kind: StatKind) -> i8 {
        self.stages.get(kind)
    }
}
