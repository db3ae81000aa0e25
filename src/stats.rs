use serde::{Deserialize, Serialize};

/// Stats a stage modifier can apply to. Hp has no stage; accuracy and
/// evasion use their own multiplier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Hp,
    Attack,
    Defense,
    Magic,
    Resist,
    Speed,
    Accuracy,
    Evasion,
}

impl StatKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatKind::Hp => "HP",
            StatKind::Attack => "attack",
            StatKind::Defense => "defense",
            StatKind::Magic => "magic",
            StatKind::Resist => "resistance",
            StatKind::Speed => "speed",
            StatKind::Accuracy => "accuracy",
            StatKind::Evasion => "evasion",
        }
    }
}

/// Base stats of a combatant at its current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub magic: u16,
    pub resist: u16,
    pub speed: u16,
}

/// Per-combatant stage vector, each entry clamped to [-6, 6].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageSet {
    pub attack: i8,
    pub defense: i8,
    pub magic: i8,
    pub resist: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StageSet {
    pub fn get(&self, kind: StatKind) -> i8 {
        match kind {
            StatKind::Hp => 0,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Magic => self.magic,
            StatKind::Resist => self.resist,
            StatKind::Speed => self.speed,
            StatKind::Accuracy => self.accuracy,
            StatKind::Evasion => self.evasion,
        }
    }

    /// Apply a delta, clamping to [-6, 6]. Returns (old, new); equal values
    /// mean the change was blocked at the cap.
    pub fn modify(&mut self, kind: StatKind, delta: i8) -> (i8, i8) {
        let old = self.get(kind);
        let new = (old + delta).clamp(-6, 6);
        let slot = match kind {
            StatKind::Hp => return (0, 0),
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Magic => &mut self.magic,
            StatKind::Resist => &mut self.resist,
            StatKind::Speed => &mut self.speed,
            StatKind::Accuracy => &mut self.accuracy,
            StatKind::Evasion => &mut self.evasion,
        };
        *slot = new;
        (old, new)
    }

    pub fn clear(&mut self) {
        *self = StageSet::default();
    }
}

/// Stage multiplier for combat stats (attack/defense/magic/resist/speed).
/// Fixed lookup, 0.25x at -6 up to 4.0x at +6.
pub fn stage_multiplier(stage: i8) -> f64 {
    match stage.clamp(-6, 6) {
        -6 => 2.0 / 8.0,
        -5 => 2.0 / 7.0,
        -4 => 2.0 / 6.0,
        -3 => 2.0 / 5.0,
        -2 => 2.0 / 4.0,
        -1 => 2.0 / 3.0,
        0 => 1.0,
        1 => 3.0 / 2.0,
        2 => 4.0 / 2.0,
        3 => 5.0 / 2.0,
        4 => 6.0 / 2.0,
        5 => 7.0 / 2.0,
        _ => 8.0 / 2.0,
    }
}

/// Stage multiplier for accuracy and evasion. Shallower curve than the
/// combat table: 0.33x at -6 up to 3.0x at +6.
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    match stage.clamp(-6, 6) {
        -6 => 3.0 / 9.0,
        -5 => 3.0 / 8.0,
        -4 => 3.0 / 7.0,
        -3 => 3.0 / 6.0,
        -2 => 3.0 / 5.0,
        -1 => 3.0 / 4.0,
        0 => 1.0,
        1 => 4.0 / 3.0,
        2 => 5.0 / 3.0,
        3 => 6.0 / 3.0,
        4 => 7.0 / 3.0,
        5 => 8.0 / 3.0,
        _ => 9.0 / 3.0,
    }
}

/// Effective stat value after applying a stage: floor(base * multiplier).
pub fn staged_stat(base: u16, stage: i8) -> u16 {
    ((base as f64) * stage_multiplier(stage)).floor() as u16
}

/// Experience growth curves giving cumulative exp required per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthCurve {
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
}

impl GrowthCurve {
    /// Total experience required to reach the given level.
    pub fn exp_for_level(self, level: u8) -> u32 {
        let n = level as i64;
        let exp = match self {
            GrowthCurve::Fast => 4 * n * n * n / 5,
            GrowthCurve::MediumFast => n * n * n,
            GrowthCurve::MediumSlow => 6 * n * n * n / 5 - 15 * n * n + 100 * n - 140,
            GrowthCurve::Slow => 5 * n * n * n / 4,
        };
        exp.max(0) as u32
    }

    /// Level reached with the given total experience, capped at 100.
    pub fn level_for_exp(self, exp: u32) -> u8 {
        let mut level = 1;
        while level < 100 && self.exp_for_level(level + 1) <= exp {
            level += 1;
        }
        level
    }
}

/// Experience awarded for defeating a combatant.
///
/// `base_yield * defeated_level / 5`, x1.5 for trainer-owned targets, scaled
/// by a level-difference adjustment clamped to [0.25, 1.5], floored at 1.
pub fn exp_on_defeat(base_yield: u16, defeated_level: u8, victor_level: u8, trainer: bool) -> u32 {
    let trainer_mult = if trainer { 1.5 } else { 1.0 };
    let adjustment =
        (defeated_level as f64 / victor_level.max(1) as f64).clamp(0.25, 1.5);
    let exp = base_yield as f64 * defeated_level as f64 / 5.0 * trainer_mult * adjustment;
    (exp.floor() as u32).max(1)
}
