use crate::battle::action::Side;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleKind, SideState};
use crate::combatant::Combatant;
use crate::conditions::PrimaryCondition;
use crate::items::ItemId;
use crate::moves::MoveId;
use serde::{Deserialize, Serialize};

/// Per-combatant state handed back to the external party system after the
/// battle. Applied verbatim; the engine never mutates the caller's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    pub name: String,
    pub hp: u16,
    pub status: Option<PrimaryCondition>,
    pub level: u8,
    pub exp: u32,
    pub move_uses: Vec<(MoveId, u8)>,
    /// Moves learned this battle that did not fit the four slots; the
    /// party UI decides what to forget.
    pub pending_moves: Vec<MoveId>,
}

impl SyncPayload {
    pub fn from_combatant(combatant: &Combatant) -> Self {
        Self {
            name: combatant.name.clone(),
            hp: combatant.current_hp(),
            status: combatant.conditions.primary(),
            level: combatant.level,
            exp: combatant.exp,
            move_uses: combatant.moves.iter().map(|m| (m.id, m.uses)).collect(),
            pending_moves: combatant.pending_moves.clone(),
        }
    }
}

/// Immutable summary of a finished battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// None when the battle ended without a victor (flee, capture).
    pub winner: Option<Side>,
    pub turns: u32,
    pub money: u32,
    pub item_drops: Vec<ItemId>,
    /// The tamed combatant, when a capture ended the battle.
    pub captured: Option<Combatant>,
    pub fled: bool,
    /// Player-side roster state for the external party system.
    pub sync: Vec<SyncPayload>,
}

/// Coins earned from a won battle. Trainers pay a bounty per roster slot;
/// wild encounters yield a small scavenge amount.
pub fn money_reward(kind: BattleKind, enemy: &SideState) -> u32 {
    let per_level: u32 = match kind {
        BattleKind::Trainer => 20,
        BattleKind::Wild => 5,
    };
    enemy
        .members
        .iter()
        .map(|m| m.level as u32 * per_level)
        .sum()
}

/// Item drops from a defeated wild encounter. Trainer battles never drop.
pub fn item_drops(kind: BattleKind, rng: &mut BattleRng) -> Vec<ItemId> {
    if kind == BattleKind::Trainer {
        return Vec::new();
    }
    let mut drops = Vec::new();
    if rng.chance(20) {
        drops.push(ItemId::PlainMeat);
    }
    if rng.chance(5) {
        drops.push(ItemId::GoldenMeat);
    }
    drops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{CombatantSpec, Rank, TamingProfile};
    use crate::elements::Element;
    use crate::moves::MoveCatalog;
    use crate::stats::{BaseStats, GrowthCurve};
    use pretty_assertions::assert_eq;

    fn combatant(level: u8) -> Combatant {
        let catalog = MoveCatalog::standard();
        Combatant::from_spec(
            CombatantSpec {
                name: "Grublin".to_string(),
                elements: vec![Element::Neutral],
                level,
                base_stats: BaseStats {
                    hp: 50,
                    attack: 50,
                    defense: 50,
                    magic: 40,
                    resist: 40,
                    speed: 50,
                },
                stat_growth: BaseStats {
                    hp: 2,
                    attack: 1,
                    defense: 1,
                    magic: 1,
                    resist: 1,
                    speed: 1,
                },
                growth: GrowthCurve::MediumFast,
                exp_yield: 60,
                taming: TamingProfile {
                    base_rate: 0.2,
                    rank: Rank::D,
                },
                learnset: vec![],
                moves: vec![MoveId::Claw],
                current_hp: None,
                status: None,
            },
            &catalog,
        )
        .unwrap()
    }

    #[test]
    fn test_money_scales_with_kind_and_levels() {
        let enemy = SideState::new(
            "Rival".to_string(),
            vec![combatant(10), combatant(12)],
        );
        assert_eq!(money_reward(BattleKind::Trainer, &enemy), 440);
        assert_eq!(money_reward(BattleKind::Wild, &enemy), 110);
    }

    #[test]
    fn test_trainers_never_drop_items() {
        for seed in 0..50 {
            let mut rng = BattleRng::seeded(seed);
            assert!(item_drops(BattleKind::Trainer, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_sync_payload_reflects_battle_state() {
        let mut c = combatant(8);
        c.take_damage(13);
        c.conditions.set_primary(PrimaryCondition::Poison);
        c.moves[0].use_move();
        let payload = SyncPayload::from_combatant(&c);
        assert_eq!(payload.hp, 37);
        assert_eq!(payload.status, Some(PrimaryCondition::Poison));
        assert_eq!(payload.move_uses, vec![(MoveId::Claw, 34)]);
        assert!(payload.pending_moves.is_empty());
    }
}
