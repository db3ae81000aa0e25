use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemId {
    Herb,
    StrongHerb,
    Antidote,
    Remedy,
    PlainMeat,
    GoldenMeat,
}

/// Which primary conditions a cure item removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CureScope {
    Poison,
    Any,
}

/// What an item does when used during battle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BattleUse {
    Heal(u16),
    Cure(CureScope),
    /// Taming bait; the value feeds the capture calculator's item bonus.
    Bait(f64),
}

impl ItemId {
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemId::Herb => "Herb",
            ItemId::StrongHerb => "Strong Herb",
            ItemId::Antidote => "Antidote",
            ItemId::Remedy => "Remedy",
            ItemId::PlainMeat => "Plain Meat",
            ItemId::GoldenMeat => "Golden Meat",
        }
    }

    pub fn battle_use(&self) -> BattleUse {
        match self {
            ItemId::Herb => BattleUse::Heal(30),
            ItemId::StrongHerb => BattleUse::Heal(80),
            ItemId::Antidote => BattleUse::Cure(CureScope::Poison),
            ItemId::Remedy => BattleUse::Cure(CureScope::Any),
            ItemId::PlainMeat => BattleUse::Bait(0.10),
            ItemId::GoldenMeat => BattleUse::Bait(0.30),
        }
    }

    /// Capture-calculator bonus, None for non-bait items.
    pub fn taming_bonus(&self) -> Option<f64> {
        match self.battle_use() {
            BattleUse::Bait(bonus) => Some(bonus),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bait_bonuses() {
        assert_eq!(ItemId::GoldenMeat.taming_bonus(), Some(0.30));
        assert_eq!(ItemId::PlainMeat.taming_bonus(), Some(0.10));
        assert_eq!(ItemId::Herb.taming_bonus(), None);
    }
}
