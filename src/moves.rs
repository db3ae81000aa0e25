use crate::conditions::{PrimaryCondition, VolatileCondition};
use crate::elements::Element;
use crate::errors::{BattleResult, DataError};
use crate::stats::StatKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveId {
    // Neutral
    Claw,
    Bite,
    ViciousSlash,
    FuryRake,
    WarCry,
    Harden,
    Sharpen,
    Mend,
    // Flame
    FlameBreath,
    CinderBurst,
    // Aqua
    TidalCrush,
    // Frost
    FrostBolt,
    // Storm
    ThunderJolt,
    GaleSlash,
    Shockwave,
    // Terra
    BoulderToss,
    DustVeil,
    // Venom
    VenomSting,
    ToxicCloud,
    // Spirit
    ShadowGrasp,
    Nightmare,
}

impl MoveId {
    pub fn display_name(&self) -> &'static str {
        match self {
            MoveId::Claw => "Claw",
            MoveId::Bite => "Bite",
            MoveId::ViciousSlash => "Vicious Slash",
            MoveId::FuryRake => "Fury Rake",
            MoveId::WarCry => "War Cry",
            MoveId::Harden => "Harden",
            MoveId::Sharpen => "Sharpen",
            MoveId::Mend => "Mend",
            MoveId::FlameBreath => "Flame Breath",
            MoveId::CinderBurst => "Cinder Burst",
            MoveId::TidalCrush => "Tidal Crush",
            MoveId::FrostBolt => "Frost Bolt",
            MoveId::ThunderJolt => "Thunder Jolt",
            MoveId::GaleSlash => "Gale Slash",
            MoveId::Shockwave => "Shockwave",
            MoveId::BoulderToss => "Boulder Toss",
            MoveId::DustVeil => "Dust Veil",
            MoveId::VenomSting => "Venom Sting",
            MoveId::ToxicCloud => "Toxic Cloud",
            MoveId::ShadowGrasp => "Shadow Grasp",
            MoveId::Nightmare => "Nightmare",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Magical,
    Support,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    Enemy,
    User,
}

/// Critical-hit profile of a move; raises or fixes the crit tier roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CritProfile {
    Normal,
    Improved,
    Guaranteed,
}

/// Which combatant a secondary effect lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    User,
    Target,
}

/// Secondary move effects, each rolling its own independent percent chance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    InflictStatus {
        condition: PrimaryCondition,
        chance: u8,
    },
    InflictVolatile {
        condition: VolatileCondition,
        turns: u8,
        chance: u8,
    },
    ModifyStage {
        target: EffectTarget,
        stat: StatKind,
        delta: i8,
        chance: u8,
    },
    /// Heal the user for max_hp * numerator / denominator.
    HealFraction {
        numerator: u16,
        denominator: u16,
        chance: u8,
    },
}

impl MoveEffect {
    pub fn chance(&self) -> u8 {
        match self {
            MoveEffect::InflictStatus { chance, .. }
            | MoveEffect::InflictVolatile { chance, .. }
            | MoveEffect::ModifyStage { chance, .. }
            | MoveEffect::HealFraction { chance, .. } => *chance,
        }
    }
}

/// Immutable move definition. Loaded into a catalog once; per-combatant
/// state (remaining uses) lives in MoveInstance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: MoveId,
    pub element: Element,
    pub category: MoveCategory,
    pub power: u16,
    /// None means the move never misses.
    pub accuracy: Option<u8>,
    pub priority: i8,
    pub max_uses: u8,
    pub target: TargetMode,
    pub crit: CritProfile,
    pub multi_hit: bool,
    pub effects: Vec<MoveEffect>,
}

impl MoveData {
    fn validate(&self) -> Result<(), String> {
        if let Some(accuracy) = self.accuracy {
            if accuracy == 0 || accuracy > 100 {
                return Err(format!("accuracy {} out of range", accuracy));
            }
        }
        if self.max_uses == 0 {
            return Err("max_uses must be at least 1".to_string());
        }
        if self.category != MoveCategory::Support && self.power == 0 {
            return Err("damaging move with zero power".to_string());
        }
        if self.category == MoveCategory::Support && self.power != 0 {
            return Err("support move with nonzero power".to_string());
        }
        if self.power > 255 {
            return Err(format!("power {} out of range", self.power));
        }
        for effect in &self.effects {
            let chance = effect.chance();
            if chance == 0 || chance > 100 {
                return Err(format!("effect chance {} out of range", chance));
            }
        }
        Ok(())
    }
}

/// Validated, immutable move catalog. Explicitly constructed and injected
/// into battles; there is no global registry.
#[derive(Debug, Clone)]
pub struct MoveCatalog {
    moves: HashMap<MoveId, MoveData>,
}

impl MoveCatalog {
    pub fn new(definitions: Vec<MoveData>) -> BattleResult<Self> {
        let mut moves = HashMap::new();
        for data in definitions {
            data.validate()
                .map_err(|details| DataError::InvalidMove(data.id, details))?;
            if moves.insert(data.id, data.clone()).is_some() {
                return Err(
                    DataError::InvalidMove(data.id, "duplicate definition".to_string()).into(),
                );
            }
        }
        Ok(Self { moves })
    }

    pub fn get(&self, id: MoveId) -> BattleResult<&MoveData> {
        self.moves
            .get(&id)
            .ok_or_else(|| DataError::MoveNotFound(id).into())
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The stock catalog used by the standard game data and test fixtures.
    pub fn standard() -> Self {
        use Element::*;
        use MoveCategory::*;
        let defs = vec![
            MoveData {
                id: MoveId::Claw,
                element: Neutral,
                category: Physical,
                power: 40,
                accuracy: Some(100),
                priority: 0,
                max_uses: 35,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![],
            },
            MoveData {
                id: MoveId::Bite,
                element: Neutral,
                category: Physical,
                power: 60,
                accuracy: Some(100),
                priority: 0,
                max_uses: 25,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::InflictVolatile {
                    condition: VolatileCondition::Flinched,
                    turns: 1,
                    chance: 10,
                }],
            },
            MoveData {
                id: MoveId::ViciousSlash,
                element: Neutral,
                category: Physical,
                power: 70,
                accuracy: Some(100),
                priority: 0,
                max_uses: 20,
                target: TargetMode::Enemy,
                crit: CritProfile::Improved,
                multi_hit: false,
                effects: vec![],
            },
            MoveData {
                id: MoveId::FuryRake,
                element: Neutral,
                category: Physical,
                power: 18,
                accuracy: Some(85),
                priority: 0,
                max_uses: 20,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: true,
                effects: vec![],
            },
            MoveData {
                id: MoveId::WarCry,
                element: Neutral,
                category: Support,
                power: 0,
                accuracy: Some(100),
                priority: 0,
                max_uses: 30,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::ModifyStage {
                    target: EffectTarget::Target,
                    stat: StatKind::Attack,
                    delta: -1,
                    chance: 100,
                }],
            },
            MoveData {
                id: MoveId::Harden,
                element: Neutral,
                category: Support,
                power: 0,
                accuracy: None,
                priority: 0,
                max_uses: 30,
                target: TargetMode::User,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::ModifyStage {
                    target: EffectTarget::User,
                    stat: StatKind::Defense,
                    delta: 1,
                    chance: 100,
                }],
            },
            MoveData {
                id: MoveId::Sharpen,
                element: Neutral,
                category: Support,
                power: 0,
                accuracy: None,
                priority: 0,
                max_uses: 30,
                target: TargetMode::User,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::ModifyStage {
                    target: EffectTarget::User,
                    stat: StatKind::Attack,
                    delta: 1,
                    chance: 100,
                }],
            },
            MoveData {
                id: MoveId::Mend,
                element: Neutral,
                category: Support,
                power: 0,
                accuracy: None,
                priority: 0,
                max_uses: 10,
                target: TargetMode::User,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::HealFraction {
                    numerator: 1,
                    denominator: 2,
                    chance: 100,
                }],
            },
            MoveData {
                id: MoveId::FlameBreath,
                element: Flame,
                category: Magical,
                power: 65,
                accuracy: Some(100),
                priority: 0,
                max_uses: 15,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::InflictStatus {
                    condition: PrimaryCondition::Burn,
                    chance: 10,
                }],
            },
            MoveData {
                id: MoveId::CinderBurst,
                element: Flame,
                category: Magical,
                power: 90,
                accuracy: Some(85),
                priority: 0,
                max_uses: 10,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::InflictStatus {
                    condition: PrimaryCondition::Burn,
                    chance: 20,
                }],
            },
            MoveData {
                id: MoveId::TidalCrush,
                element: Aqua,
                category: Physical,
                power: 75,
                accuracy: Some(95),
                priority: 0,
                max_uses: 15,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![],
            },
            MoveData {
                id: MoveId::FrostBolt,
                element: Frost,
                category: Magical,
                power: 70,
                accuracy: Some(95),
                priority: 0,
                max_uses: 15,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::InflictStatus {
                    condition: PrimaryCondition::Freeze,
                    chance: 10,
                }],
            },
            MoveData {
                id: MoveId::ThunderJolt,
                element: Storm,
                category: Magical,
                power: 65,
                accuracy: Some(100),
                priority: 0,
                max_uses: 15,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::InflictStatus {
                    condition: PrimaryCondition::Paralysis,
                    chance: 20,
                }],
            },
            MoveData {
                id: MoveId::GaleSlash,
                element: Storm,
                category: Physical,
                power: 45,
                accuracy: Some(100),
                priority: 1,
                max_uses: 25,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![],
            },
            MoveData {
                id: MoveId::Shockwave,
                element: Storm,
                category: Magical,
                power: 55,
                accuracy: None,
                priority: 0,
                max_uses: 20,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![],
            },
            MoveData {
                id: MoveId::BoulderToss,
                element: Terra,
                category: Physical,
                power: 80,
                accuracy: Some(90),
                priority: 0,
                max_uses: 10,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![],
            },
            MoveData {
                id: MoveId::DustVeil,
                element: Terra,
                category: Support,
                power: 0,
                accuracy: Some(100),
                priority: 0,
                max_uses: 20,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::ModifyStage {
                    target: EffectTarget::Target,
                    stat: StatKind::Accuracy,
                    delta: -1,
                    chance: 100,
                }],
            },
            MoveData {
                id: MoveId::VenomSting,
                element: Venom,
                category: Physical,
                power: 50,
                accuracy: Some(100),
                priority: 0,
                max_uses: 25,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::InflictStatus {
                    condition: PrimaryCondition::Poison,
                    chance: 20,
                }],
            },
            MoveData {
                id: MoveId::ToxicCloud,
                element: Venom,
                category: Support,
                power: 0,
                accuracy: Some(90),
                priority: 0,
                max_uses: 10,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::InflictStatus {
                    condition: PrimaryCondition::BadPoison,
                    chance: 100,
                }],
            },
            MoveData {
                id: MoveId::ShadowGrasp,
                element: Spirit,
                category: Magical,
                power: 60,
                accuracy: Some(100),
                priority: 0,
                max_uses: 15,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::InflictVolatile {
                    condition: VolatileCondition::Trapped,
                    turns: 3,
                    chance: 30,
                }],
            },
            MoveData {
                id: MoveId::Nightmare,
                element: Spirit,
                category: Support,
                power: 0,
                accuracy: Some(75),
                priority: 0,
                max_uses: 10,
                target: TargetMode::Enemy,
                crit: CritProfile::Normal,
                multi_hit: false,
                effects: vec![MoveEffect::InflictStatus {
                    condition: PrimaryCondition::Sleep(2),
                    chance: 100,
                }],
            },
        ];
        Self::new(defs).expect("standard catalog must validate")
    }
}

/// A move as known by one combatant: the definition id plus mutable
/// remaining-uses state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub id: MoveId,
    pub uses: u8,
    pub disabled: bool,
}

impl MoveInstance {
    pub fn new(id: MoveId, catalog: &MoveCatalog) -> BattleResult<Self> {
        let data = catalog.get(id)?;
        Ok(Self {
            id,
            uses: data.max_uses,
            disabled: false,
        })
    }

    pub fn can_use(&self) -> bool {
        self.uses > 0 && !self.disabled
    }

    /// Spend one use. Fails when none remain.
    pub fn use_move(&mut self) -> bool {
        if self.uses == 0 {
            return false;
        }
        self.uses -= 1;
        true
    }
}
