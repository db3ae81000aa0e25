use serde::{Deserialize, Serialize};

/// Elemental affinities carried by combatants and moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Neutral,
    Flame,
    Aqua,
    Frost,
    Storm,
    Terra,
    Venom,
    Spirit,
}

/// Effectiveness multiplier of one attacking element against one defending element.
pub fn pair_effectiveness(attack: Element, defend: Element) -> f64 {
    use Element::*;
    match (attack, defend) {
        // Neutral hits everything evenly but cannot touch spirits.
        (Neutral, Spirit) => 0.0,

        (Flame, Frost) => 2.0,
        (Flame, Terra) => 2.0,
        (Flame, Flame) => 0.5,
        (Flame, Aqua) => 0.5,

        (Aqua, Flame) => 2.0,
        (Aqua, Aqua) => 0.5,
        (Aqua, Terra) => 0.5,

        (Frost, Terra) => 2.0,
        (Frost, Storm) => 2.0,
        (Frost, Frost) => 0.5,
        (Frost, Flame) => 0.5,

        (Storm, Aqua) => 2.0,
        (Storm, Terra) => 0.0,
        (Storm, Storm) => 0.5,

        (Terra, Storm) => 2.0,
        (Terra, Flame) => 0.5,
        (Terra, Aqua) => 2.0,
        (Terra, Terra) => 0.5,

        (Venom, Terra) => 2.0,
        (Venom, Venom) => 0.5,
        (Venom, Spirit) => 0.0,

        (Spirit, Spirit) => 2.0,
        (Spirit, Neutral) => 0.0,

        _ => 1.0,
    }
}

/// Combined effectiveness against a (possibly dual-element) defender.
/// The product of the per-element multipliers, so a dual weakness yields 4x
/// and a single immunity zeroes the whole attack.
pub fn effectiveness(attack: Element, defender_elements: &[Element]) -> f64 {
    defender_elements
        .iter()
        .map(|&defend| pair_effectiveness(attack, defend))
        .product()
}

/// Text label recorded in damage results and battle logs.
pub fn effectiveness_label(multiplier: f64) -> &'static str {
    if multiplier == 0.0 {
        "immune"
    } else if multiplier <= 0.25 {
        "quarter"
    } else if multiplier < 1.0 {
        "half"
    } else if multiplier >= 4.0 {
        "quad"
    } else if multiplier > 1.0 {
        "double"
    } else {
        "neutral"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dual_element_stacking() {
        // Flame is strong against both Frost and Terra, so the pair is a quad weakness.
        assert_eq!(
            effectiveness(Element::Flame, &[Element::Frost, Element::Terra]),
            4.0
        );
        // An immunity zeroes everything else out.
        assert_eq!(
            effectiveness(Element::Storm, &[Element::Aqua, Element::Terra]),
            0.0
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(effectiveness_label(0.0), "immune");
        assert_eq!(effectiveness_label(0.25), "quarter");
        assert_eq!(effectiveness_label(0.5), "half");
        assert_eq!(effectiveness_label(1.0), "neutral");
        assert_eq!(effectiveness_label(2.0), "double");
        assert_eq!(effectiveness_label(4.0), "quad");
    }

    #[test]
    fn test_neutral_vs_spirit_is_mutual_immunity() {
        assert_eq!(pair_effectiveness(Element::Neutral, Element::Spirit), 0.0);
        assert_eq!(pair_effectiveness(Element::Spirit, Element::Neutral), 0.0);
    }
}
