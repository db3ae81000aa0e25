use crate::elements::Element;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Scorch,
    Downpour,
    Sandstorm,
}

impl Weather {
    pub fn name(&self) -> &'static str {
        match self {
            Weather::Scorch => "scorching sun",
            Weather::Downpour => "downpour",
            Weather::Sandstorm => "sandstorm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    StaticField,
    Hallowed,
}

impl Terrain {
    pub fn name(&self) -> &'static str {
        match self {
            Terrain::StaticField => "static field",
            Terrain::Hallowed => "hallowed ground",
        }
    }
}

/// A field effect that expired during the aftermath tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldExpiry {
    Weather(Weather),
    Terrain(Terrain),
    Distortion,
}

/// Battle-wide field modifiers supplied by the external field-effects
/// collaborator: weather, terrain, and the speed-inverting distortion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    weather: Option<(Weather, u8)>,
    terrain: Option<(Terrain, u8)>,
    distortion_turns: u8,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weather(mut self, weather: Weather, turns: u8) -> Self {
        self.weather = Some((weather, turns.max(1)));
        self
    }

    pub fn with_terrain(mut self, terrain: Terrain, turns: u8) -> Self {
        self.terrain = Some((terrain, turns.max(1)));
        self
    }

    pub fn with_distortion(mut self, turns: u8) -> Self {
        self.distortion_turns = turns;
        self
    }

    pub fn weather(&self) -> Option<Weather> {
        self.weather.map(|(w, _)| w)
    }

    pub fn terrain(&self) -> Option<Terrain> {
        self.terrain.map(|(t, _)| t)
    }

    /// While active, speed comparisons within a priority group are inverted.
    pub fn distortion_active(&self) -> bool {
        self.distortion_turns > 0
    }

    /// Damage multipliers keyed by (field condition, move element).
    /// Weather and terrain stack multiplicatively; labels are recorded in
    /// the damage result.
    pub fn damage_modifiers(&self, element: Element) -> Vec<(f64, &'static str)> {
        let mut modifiers = Vec::new();
        match self.weather() {
            Some(Weather::Scorch) => match element {
                Element::Flame => modifiers.push((1.5, "scorch-boost")),
                Element::Aqua | Element::Frost => modifiers.push((0.5, "scorch-dampen")),
                _ => {}
            },
            Some(Weather::Downpour) => match element {
                Element::Aqua => modifiers.push((1.5, "downpour-boost")),
                Element::Flame => modifiers.push((0.5, "downpour-dampen")),
                _ => {}
            },
            Some(Weather::Sandstorm) => {
                if element == Element::Terra {
                    modifiers.push((1.5, "sandstorm-boost"));
                }
            }
            None => {}
        }
        match self.terrain() {
            Some(Terrain::StaticField) => {
                if element == Element::Storm {
                    modifiers.push((1.5, "static-boost"));
                }
            }
            Some(Terrain::Hallowed) => {
                if element == Element::Spirit {
                    modifiers.push((0.5, "hallowed-dampen"));
                }
            }
            None => {}
        }
        modifiers
    }

    /// Decrement all field-effect durations once per resolved turn.
    pub fn tick(&mut self) -> Vec<FieldExpiry> {
        let mut expired = Vec::new();
        if let Some((weather, turns)) = self.weather {
            if turns <= 1 {
                self.weather = None;
                expired.push(FieldExpiry::Weather(weather));
            } else {
                self.weather = Some((weather, turns - 1));
            }
        }
        if let Some((terrain, turns)) = self.terrain {
            if turns <= 1 {
                self.terrain = None;
                expired.push(FieldExpiry::Terrain(terrain));
            } else {
                self.terrain = Some((terrain, turns - 1));
            }
        }
        if self.distortion_turns > 0 {
            self.distortion_turns -= 1;
            if self.distortion_turns == 0 {
                expired.push(FieldExpiry::Distortion);
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_weather_modifiers() {
        let field = FieldState::new().with_weather(Weather::Scorch, 5);
        assert_eq!(
            field.damage_modifiers(Element::Flame),
            vec![(1.5, "scorch-boost")]
        );
        assert_eq!(
            field.damage_modifiers(Element::Aqua),
            vec![(0.5, "scorch-dampen")]
        );
        assert!(field.damage_modifiers(Element::Neutral).is_empty());
    }

    #[test]
    fn test_weather_and_terrain_stack() {
        let field = FieldState::new()
            .with_weather(Weather::Sandstorm, 5)
            .with_terrain(Terrain::StaticField, 5);
        assert_eq!(field.damage_modifiers(Element::Storm).len(), 1);
        assert_eq!(field.damage_modifiers(Element::Terra).len(), 1);
    }

    #[test]
    fn test_distortion_ticks_down() {
        let mut field = FieldState::new().with_distortion(2);
        assert!(field.distortion_active());
        assert!(field.tick().is_empty());
        assert!(field.distortion_active());
        assert_eq!(field.tick(), vec![FieldExpiry::Distortion]);
        assert!(!field.distortion_active());
    }

    #[test]
    fn test_weather_expiry() {
        let mut field = FieldState::new().with_weather(Weather::Downpour, 1);
        assert_eq!(field.tick(), vec![FieldExpiry::Weather(Weather::Downpour)]);
        assert_eq!(field.weather(), None);
    }
}
