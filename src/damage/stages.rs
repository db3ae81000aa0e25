use crate::battle::rng::BattleRng;
use crate::damage::context::DamageContext;
use crate::damage::CritTier;
use crate::elements::{effectiveness, effectiveness_label};
use crate::moves::{CritProfile, MoveCategory};
use crate::stats::accuracy_stage_multiplier;

/// Stage 1: accuracy. Combines the attacker's accuracy stage with the
/// defender's evasion stage into a multiplier on the move's accuracy.
/// Always-hit moves skip the stage entirely.
pub fn accuracy(ctx: &mut DamageContext, rng: &mut BattleRng) {
    let Some(base_accuracy) = ctx.move_data.accuracy else {
        return;
    };

    let stage = (ctx.attacker.accuracy_stage() - ctx.defender.evasion_stage()).clamp(-6, 6);
    let mut chance = base_accuracy as f64 * accuracy_stage_multiplier(stage);
    if ctx.attacker.conditions.is_paralyzed() {
        chance *= 0.75;
    }
    let chance = chance.clamp(1.0, 100.0);

    if (rng.percent() as f64) >= chance {
        ctx.missed = true;
    }
}

/// Stage 2: base damage from the level/power/attack/defense formula.
/// Support moves short-circuit to zero.
pub fn base_damage(ctx: &mut DamageContext) {
    ctx.damage = raw_damage(
        ctx.attacker.level,
        ctx.move_data.power,
        ctx.attacker.effective_attack(ctx.move_data.category),
        ctx.defender.effective_defense(ctx.move_data.category),
        ctx.move_data.category,
    ) as f64;
}

fn raw_damage(level: u8, power: u16, attack: u16, defense: u16, category: MoveCategory) -> u32 {
    if category == MoveCategory::Support || power == 0 {
        return 0;
    }
    let base = 2 * level as u32 / 5 + 2;
    base * power as u32 * attack as u32 / defense.max(1) as u32 / 50 + 2
}

/// Stage 3: critical tier roll. On a crit the base damage is recomputed
/// with stages hostile to the attacker (or friendly to the defender)
/// ignored, then scaled by the tier multiplier.
pub fn critical(ctx: &mut DamageContext, rng: &mut BattleRng) {
    if ctx.damage <= 0.0 {
        return;
    }
    let tier = match ctx.move_data.crit {
        CritProfile::Guaranteed => CritTier::Guaranteed,
        CritProfile::Improved => {
            if rng.one_in(8) {
                CritTier::Improved
            } else {
                return;
            }
        }
        CritProfile::Normal => {
            if rng.one_in(16) {
                CritTier::Normal
            } else {
                return;
            }
        }
    };
    // A sliver of crits land devastatingly hard.
    let tier = if rng.one_in(16) {
        CritTier::Devastating
    } else {
        tier
    };

    let raw = raw_damage(
        ctx.attacker.level,
        ctx.move_data.power,
        ctx.attacker.crit_attack(ctx.move_data.category),
        ctx.defender.crit_defense(ctx.move_data.category),
        ctx.move_data.category,
    );
    ctx.crit_tier = tier;
    ctx.damage = raw as f64 * tier.multiplier();
    ctx.modifiers.push("critical");
}

/// Stage 4: same-element attack bonus.
pub fn stab(ctx: &mut DamageContext) {
    if ctx.damage > 0.0 && ctx.attacker.has_element(ctx.move_data.element) {
        ctx.damage *= 1.2;
        ctx.modifiers.push("stab");
    }
}

/// Stage 5: type effectiveness chart lookup, recorded as text.
pub fn type_effectiveness(ctx: &mut DamageContext) {
    let multiplier = effectiveness(ctx.move_data.element, &ctx.defender.elements);
    ctx.effectiveness = multiplier;
    if ctx.move_data.category == MoveCategory::Support {
        return;
    }
    ctx.modifiers.push(effectiveness_label(multiplier));
    if multiplier == 0.0 {
        ctx.blocked = true;
        ctx.damage = 0.0;
    } else {
        ctx.damage *= multiplier;
    }
}

/// Stage 6: weather and terrain multipliers keyed by move element.
pub fn field_modifiers(ctx: &mut DamageContext) {
    if ctx.damage <= 0.0 {
        return;
    }
    for (multiplier, label) in ctx.field.damage_modifiers(ctx.move_data.element) {
        ctx.damage *= multiplier;
        ctx.modifiers.push(label);
    }
}

/// Stage 7: attacker status. Burn halves physical damage.
pub fn status_modifiers(ctx: &mut DamageContext) {
    if ctx.damage > 0.0
        && ctx.move_data.category == MoveCategory::Physical
        && ctx.attacker.conditions.is_burned()
    {
        ctx.damage *= 0.5;
        ctx.modifiers.push("burn");
    }
}

/// Stage 8: random spread, uniform [0.85, 1.0).
pub fn random_spread(ctx: &mut DamageContext, rng: &mut BattleRng) {
    if ctx.damage > 0.0 {
        ctx.damage *= rng.spread();
    }
}

/// Stage 9: floor and clamp. Any hit that connected against a non-immune
/// target with a non-zero pipeline value deals at least 1.
pub fn finalize(ctx: &mut DamageContext) {
    let floored = ctx.damage.floor() as u16;
    ctx.final_damage = if !ctx.missed && !ctx.blocked && ctx.effectiveness > 0.0 && ctx.damage > 0.0
    {
        floored.max(1)
    } else {
        floored
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_damage_formula() {
        // ((2*5/5 + 2) * 40 * 50 / 50) / 50 + 2 = 160/50 + 2 = 3 + 2 = 5
        assert_eq!(raw_damage(5, 40, 50, 50, MoveCategory::Physical), 5);
        // Formula floor never drops below the +2 constant.
        assert_eq!(raw_damage(1, 1, 1, 999, MoveCategory::Physical), 2);
        // Support and zero power deal nothing.
        assert_eq!(raw_damage(50, 0, 100, 100, MoveCategory::Physical), 0);
        assert_eq!(raw_damage(50, 80, 100, 100, MoveCategory::Support), 0);
    }
}
