//! Non-mutating damage preview for UI hints.
//!
//! Runs the real pipeline over freshly seeded throwaway rngs so the
//! battle's own random stream is never consumed.

use crate::battle::rng::BattleRng;
use crate::combatant::Combatant;
use crate::field::FieldState;
use crate::moves::MoveData;

/// Seed base for preview trials. Previews must be deterministic for a
/// given matchup without touching the battle rng.
const PREVIEW_SEED: u64 = 0x5EED_1234;

const TRIALS: u64 = 24;

/// Damage envelope over a set of preview trials. Misses and blocked hits
/// count as zero-damage outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamagePreview {
    pub min: u16,
    pub max: u16,
    pub average: f64,
    /// Fraction of trials that connected for any damage.
    pub hit_rate: f64,
}

impl DamagePreview {
    /// Expected fraction of the defender's maximum HP removed per use.
    pub fn expected_fraction(&self, defender_max_hp: u16) -> f64 {
        if defender_max_hp == 0 {
            return 0.0;
        }
        self.average / defender_max_hp as f64
    }
}

/// Sample the damage pipeline without mutating anything.
pub fn preview(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    field: &FieldState,
) -> DamagePreview {
    let mut min = u16::MAX;
    let mut max = 0u16;
    let mut total = 0u64;
    let mut hits = 0u64;

    for trial in 0..TRIALS {
        let mut rng = BattleRng::seeded(PREVIEW_SEED.wrapping_add(trial));
        let result = super::compute_attack(attacker, defender, move_data, field, &mut rng);
        min = min.min(result.damage);
        max = max.max(result.damage);
        total += result.damage as u64;
        if result.damage > 0 {
            hits += 1;
        }
    }

    DamagePreview {
        min,
        max,
        average: total as f64 / TRIALS as f64,
        hit_rate: hits as f64 / TRIALS as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{CombatantSpec, Rank, TamingProfile};
    use crate::elements::Element;
    use crate::moves::{MoveCatalog, MoveId};
    use crate::stats::{BaseStats, GrowthCurve};

    fn combatant(elements: Vec<Element>) -> Combatant {
        let catalog = MoveCatalog::standard();
        Combatant::from_spec(
            CombatantSpec {
                name: "Preview".to_string(),
                elements,
                level: 20,
                base_stats: BaseStats {
                    hp: 70,
                    attack: 60,
                    defense: 60,
                    magic: 60,
                    resist: 60,
                    speed: 60,
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
                exp_yield: 80,
                taming: TamingProfile {
                    base_rate: 0.2,
                    rank: Rank::C,
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
    fn test_preview_is_deterministic_and_bounded() {
        let catalog = MoveCatalog::standard();
        let attacker = combatant(vec![Element::Neutral]);
        let defender = combatant(vec![Element::Terra]);
        let claw = catalog.get(MoveId::Claw).unwrap();
        let field = FieldState::new();

        let first = preview(&attacker, &defender, claw, &field);
        let second = preview(&attacker, &defender, claw, &field);
        assert_eq!(first, second);
        assert!(first.min <= first.max);
        assert!(first.average <= first.max as f64);
        assert!(first.hit_rate > 0.0);
        let fraction = first.expected_fraction(defender.max_hp());
        assert!(fraction > 0.0 && fraction < 1.0);
    }

    #[test]
    fn test_preview_does_not_touch_battle_rng() {
        let catalog = MoveCatalog::standard();
        let attacker = combatant(vec![Element::Neutral]);
        let defender = combatant(vec![Element::Terra]);
        let claw = catalog.get(MoveId::Claw).unwrap();
        let field = FieldState::new();

        let mut rng = BattleRng::seeded(99);
        let before: Vec<u8> = (0..8).map(|_| rng.percent()).collect();
        let _ = preview(&attacker, &defender, claw, &field);
        let mut rng = BattleRng::seeded(99);
        let after: Vec<u8> = (0..8).map(|_| rng.percent()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_immune_preview_is_zero() {
        let catalog = MoveCatalog::standard();
        let attacker = combatant(vec![Element::Neutral]);
        let defender = combatant(vec![Element::Spirit]);
        let claw = catalog.get(MoveId::Claw).unwrap();
        let field = FieldState::new();
        let p = preview(&attacker, &defender, claw, &field);
        assert_eq!(p.max, 0);
        assert_eq!(p.hit_rate, 0.0);
    }
}
