//! Shared fixtures for the battle scenario tests.

use crate::battle::action::Side;
use crate::battle::ai::AiLevel;
use crate::battle::engine::{Battle, BattleConfig, GameData};
use crate::battle::order::OrderMode;
use crate::battle::state::BattleKind;
use crate::combatant::{Combatant, CombatantSpec, Rank, TamingProfile};
use crate::elements::Element;
use crate::moves::{MoveCatalog, MoveId};
use crate::stats::{BaseStats, GrowthCurve};

pub fn make(
    name: &str,
    elements: Vec<Element>,
    level: u8,
    speed: u16,
    moves: Vec<MoveId>,
) -> Combatant {
    make_with_hp(name, elements, level, speed, moves, None)
}

pub fn make_with_hp(
    name: &str,
    elements: Vec<Element>,
    level: u8,
    speed: u16,
    moves: Vec<MoveId>,
    current_hp: Option<u16>,
) -> Combatant {
    let catalog = MoveCatalog::standard();
    Combatant::from_spec(
        CombatantSpec {
            name: name.to_string(),
            elements,
            level,
            base_stats: BaseStats {
                hp: 60,
                attack: 50,
                defense: 50,
                magic: 50,
                resist: 50,
                speed,
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
            moves,
            current_hp,
            status: None,
        },
        &catalog,
    )
    .unwrap()
}

pub fn config(kind: BattleKind, seed: u64) -> BattleConfig {
    BattleConfig {
        kind,
        order_mode: OrderMode::Legacy,
        seed: Some(seed),
        enemy_ai: AiLevel::Feral,
        ..BattleConfig::default()
    }
}

/// Build a wild battle and advance it through the intro to Input.
pub fn wild_battle<'a>(
    game: &'a GameData,
    player: Vec<Combatant>,
    enemy: Vec<Combatant>,
    seed: u64,
) -> Battle<'a> {
    battle_with_config(game, player, enemy, config(BattleKind::Wild, seed))
}

pub fn battle_with_config<'a>(
    game: &'a GameData,
    player: Vec<Combatant>,
    enemy: Vec<Combatant>,
    config: BattleConfig,
) -> Battle<'a> {
    let mut battle = Battle::new(game, "Tamer", &player, "Wilds", &enemy, config).unwrap();
    battle.start().unwrap();
    battle.drain_messages();
    battle
}

/// Submit the player's attack and resolve the turn.
pub fn player_attacks(battle: &mut Battle<'_>, move_slot: usize) {
    battle
        .submit_action(crate::battle::action::Action::Attack {
            side: Side::Player,
            move_slot,
        })
        .unwrap();
    battle.resolve_turn().unwrap();
}
