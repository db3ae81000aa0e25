use crate::battle::action::{Action, Side};
use crate::battle::rng::BattleRng;
use crate::battle::state::SideState;
use crate::elements::effectiveness;
use crate::moves::{MoveCatalog, MoveCategory, MoveData, MoveEffect};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// AI difficulty tiers, from random flailing to strict best-move play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiLevel {
    /// Picks uniformly among usable moves. Wild encounters.
    Feral,
    #[default]
    Basic,
    Skilled,
    Expert,
}

/// Signals above this threshold trigger a switch, when the bench allows.
const SWITCH_THRESHOLD: f64 = 0.7;

/// Move-scoring AI. Stateless; every probabilistic choice draws from the
/// battle's rng so a seeded battle replays identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringAi {
    pub level: AiLevel,
}

impl ScoringAi {
    pub fn new(level: AiLevel) -> Self {
        Self { level }
    }

    /// Pick this turn's action for `side`. Falls back to Pass when nothing
    /// is usable.
    pub fn choose(
        &self,
        side: Side,
        actor: &SideState,
        foe: &SideState,
        catalog: &MoveCatalog,
        rng: &mut BattleRng,
    ) -> Action {
        if self.level != AiLevel::Feral && self.should_switch(actor, foe) {
            if let Some(bench_index) = self.best_switch(actor, foe) {
                return Action::Switch { side, bench_index };
            }
        }

        let slots = actor.active().usable_move_slots();
        if slots.is_empty() {
            return Action::Pass { side };
        }

        if self.level == AiLevel::Feral {
            let move_slot = slots[rng.index(slots.len())];
            return Action::Attack { side, move_slot };
        }

        let mut scored: Vec<(usize, OrderedFloat<f64>)> = slots
            .iter()
            .filter_map(|&slot| {
                let data = catalog.get(actor.active().moves[slot].id).ok()?;
                let mut score = self.score_move(data, actor, foe);
                if self.level != AiLevel::Expert {
                    score *= rng.factor(0.8, 1.2);
                }
                Some((slot, OrderedFloat(score)))
            })
            .collect();
        if scored.is_empty() {
            return Action::Pass { side };
        }
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let take_best_pct = match self.level {
            AiLevel::Basic => 80,
            AiLevel::Skilled => 90,
            AiLevel::Expert => 100,
            AiLevel::Feral => unreachable!(),
        };
        let move_slot = if rng.chance(take_best_pct) {
            scored[0].0
        } else {
            let top = scored.len().min(3);
            scored[rng.index(top)].0
        };
        Action::Attack { side, move_slot }
    }

    fn score_move(&self, data: &MoveData, actor: &SideState, foe: &SideState) -> f64 {
        let me = actor.active();
        let target = foe.active();
        let mut score = data.power as f64;

        if data.category != MoveCategory::Support {
            let eff = effectiveness(data.element, &target.elements);
            if eff == 0.0 {
                return -100.0;
            }
            if eff < 1.0 {
                // A resisted pick costs more than a boosted one gains.
                score -= (1.0 - eff) * 60.0;
            } else if eff > 1.0 {
                score += (eff - 1.0) * 30.0;
            }
            if me.has_element(data.element) {
                score += 10.0;
            }
            if target.hp_fraction() < 0.25 {
                score += 25.0;
            }
            if target.conditions.is_incapacitated() {
                score += 20.0;
            }
        }

        for effect in &data.effects {
            match effect {
                MoveEffect::InflictStatus { .. } if !target.conditions.has_primary() => {
                    score += 10.0;
                }
                MoveEffect::HealFraction { .. } if me.hp_fraction() < 0.35 => {
                    score += 45.0;
                }
                MoveEffect::ModifyStage { .. } => {
                    score += 5.0;
                }
                _ => {}
            }
        }

        if data.priority > 0 && me.effective_speed() < target.effective_speed() {
            score += 15.0;
        }

        if let Some(acc) = data.accuracy {
            score *= acc as f64 / 100.0;
        }

        // Higher tiers hold scarce moves in reserve.
        if matches!(self.level, AiLevel::Skilled | AiLevel::Expert) {
            if let Some(instance) = me.moves.iter().find(|m| m.id == data.id) {
                if instance.uses <= 3 {
                    score -= 8.0;
                }
            }
        }

        score
    }

    /// Sum the stay-in-is-bad signals for the active combatant.
    fn should_switch(&self, actor: &SideState, foe: &SideState) -> bool {
        if actor.switch_candidates().is_empty() {
            return false;
        }
        let me = actor.active();
        let mut pressure = 0.0;

        let worst_incoming = foe
            .active()
            .elements
            .iter()
            .map(|&e| OrderedFloat(effectiveness(e, &me.elements)))
            .max()
            .map(|f| f.0)
            .unwrap_or(1.0);
        if worst_incoming >= 2.0 {
            pressure += 0.4;
        }
        if me.hp_fraction() < 0.3 {
            pressure += 0.25;
        }
        if me.conditions.has_primary() {
            pressure += 0.15;
        }
        pressure > SWITCH_THRESHOLD
    }

    /// Best bench candidate: healthiest member with the best type matchup
    /// against the opposing active.
    fn best_switch(&self, actor: &SideState, foe: &SideState) -> Option<usize> {
        actor
            .switch_candidates()
            .into_iter()
            .max_by_key(|&i| {
                let member = &actor.members[i];
                let matchup: f64 = member
                    .elements
                    .iter()
                    .map(|&e| effectiveness(e, &foe.active().elements))
                    .sum();
                OrderedFloat(matchup + member.hp_fraction())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{Combatant, CombatantSpec, Rank, TamingProfile};
    use crate::conditions::PrimaryCondition;
    use crate::elements::Element;
    use crate::moves::MoveId;
    use crate::stats::{BaseStats, GrowthCurve};

    fn combatant(name: &str, elements: Vec<Element>, moves: Vec<MoveId>) -> Combatant {
        let catalog = MoveCatalog::standard();
        Combatant::from_spec(
            CombatantSpec {
                name: name.to_string(),
                elements,
                level: 15,
                base_stats: BaseStats {
                    hp: 60,
                    attack: 55,
                    defense: 50,
                    magic: 55,
                    resist: 50,
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
                moves,
                current_hp: None,
                status: None,
            },
            &catalog,
        )
        .unwrap()
    }

    fn side(members: Vec<Combatant>) -> SideState {
        SideState::new("AI".to_string(), members)
    }

    #[test]
    fn test_expert_prefers_super_effective_move() {
        let catalog = MoveCatalog::standard();
        let actor = side(vec![combatant(
            "Sparkfin",
            vec![Element::Storm],
            vec![MoveId::Claw, MoveId::ThunderJolt],
        )]);
        let foe = side(vec![combatant("Ripple", vec![Element::Aqua], vec![MoveId::Claw])]);
        let ai = ScoringAi::new(AiLevel::Expert);
        let mut rng = BattleRng::seeded(1);
        let action = ai.choose(Side::Enemy, &actor, &foe, &catalog, &mut rng);
        assert_eq!(
            action,
            Action::Attack {
                side: Side::Enemy,
                move_slot: 1
            }
        );
    }

    #[test]
    fn test_never_picks_immune_move_at_higher_tiers() {
        let catalog = MoveCatalog::standard();
        let actor = side(vec![combatant(
            "Wisp",
            vec![Element::Spirit],
            vec![MoveId::Claw, MoveId::ShadowGrasp],
        )]);
        // Spirit foe is immune to Neutral; Claw scores negative.
        let foe = side(vec![combatant(
            "Phantom",
            vec![Element::Spirit],
            vec![MoveId::Claw],
        )]);
        let ai = ScoringAi::new(AiLevel::Expert);
        for seed in 0..50 {
            let mut rng = BattleRng::seeded(seed);
            let action = ai.choose(Side::Enemy, &actor, &foe, &catalog, &mut rng);
            assert_eq!(
                action,
                Action::Attack {
                    side: Side::Enemy,
                    move_slot: 1
                }
            );
        }
    }

    #[test]
    fn test_feral_spreads_across_moves() {
        let catalog = MoveCatalog::standard();
        let actor = side(vec![combatant(
            "Grublin",
            vec![Element::Neutral],
            vec![MoveId::Claw, MoveId::Bite, MoveId::Harden],
        )]);
        let foe = side(vec![combatant("Ripple", vec![Element::Aqua], vec![MoveId::Claw])]);
        let ai = ScoringAi::new(AiLevel::Feral);
        let mut seen = [false; 3];
        for seed in 0..100 {
            let mut rng = BattleRng::seeded(seed);
            if let Action::Attack { move_slot, .. } =
                ai.choose(Side::Enemy, &actor, &foe, &catalog, &mut rng)
            {
                seen[move_slot] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_passes_with_no_usable_moves() {
        let catalog = MoveCatalog::standard();
        let mut c = combatant("Grublin", vec![Element::Neutral], vec![MoveId::Claw]);
        c.moves[0].uses = 0;
        let actor = side(vec![c]);
        let foe = side(vec![combatant("Ripple", vec![Element::Aqua], vec![MoveId::Claw])]);
        let ai = ScoringAi::new(AiLevel::Expert);
        let mut rng = BattleRng::seeded(1);
        let action = ai.choose(Side::Enemy, &actor, &foe, &catalog, &mut rng);
        assert_eq!(action, Action::Pass { side: Side::Enemy });
    }

    #[test]
    fn test_switches_out_of_a_losing_matchup() {
        let catalog = MoveCatalog::standard();
        // Frost active vs Flame foe at low HP with a status: three signals.
        let mut frosty = combatant("Glacier", vec![Element::Frost], vec![MoveId::FrostBolt]);
        frosty.take_damage(50);
        frosty.conditions.set_primary(PrimaryCondition::Burn);
        let bench = combatant("Ripple", vec![Element::Aqua], vec![MoveId::TidalCrush]);
        let actor = side(vec![frosty, bench]);
        let foe = side(vec![combatant(
            "Embercub",
            vec![Element::Flame],
            vec![MoveId::FlameBreath],
        )]);
        let ai = ScoringAi::new(AiLevel::Skilled);
        let mut rng = BattleRng::seeded(1);
        let action = ai.choose(Side::Enemy, &actor, &foe, &catalog, &mut rng);
        assert_eq!(
            action,
            Action::Switch {
                side: Side::Enemy,
                bench_index: 1
            }
        );
    }
}
