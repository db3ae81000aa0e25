use crate::combatant::Combatant;
use crate::damage::{CritTier, DamageResult};
use crate::field::FieldState;
use crate::moves::MoveData;

/// Shared mutable context the pipeline stages operate over. Any stage may
/// set `missed` or `blocked` to short-circuit the rest.
#[derive(Debug)]
pub struct DamageContext<'a> {
    pub attacker: &'a Combatant,
    pub defender: &'a Combatant,
    pub move_data: &'a MoveData,
    pub field: &'a FieldState,
    /// Working damage value; floored only at finalize.
    pub damage: f64,
    pub missed: bool,
    pub blocked: bool,
    pub crit_tier: CritTier,
    pub effectiveness: f64,
    pub modifiers: Vec<&'static str>,
    /// Final damage after the finalize stage.
    pub final_damage: u16,
}

impl<'a> DamageContext<'a> {
    pub fn new(
        attacker: &'a Combatant,
        defender: &'a Combatant,
        move_data: &'a MoveData,
        field: &'a FieldState,
    ) -> Self {
        Self {
            attacker,
            defender,
            move_data,
            field,
            damage: 0.0,
            missed: false,
            blocked: false,
            crit_tier: CritTier::None,
            effectiveness: 1.0,
            modifiers: Vec::new(),
            final_damage: 0,
        }
    }

    pub fn into_result(self, hits: u8) -> DamageResult {
        DamageResult {
            damage: self.final_damage,
            crit_tier: self.crit_tier,
            effectiveness: self.effectiveness,
            missed: self.missed,
            blocked: self.blocked,
            modifiers: self.modifiers,
            hits,
        }
    }
}
