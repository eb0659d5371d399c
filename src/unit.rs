// src/unit.rs - Unit label for reported values
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// "C" selects Celsius; anything else is Fahrenheit.
    pub fn from_param(param: &str) -> Self {
        if param == "C" {
            TemperatureUnit::Celsius
        } else {
            TemperatureUnit::Fahrenheit
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Boiling point of water, the default upper clamp bound.
    pub fn boiling_point(&self) -> f64 {
        match self {
            TemperatureUnit::Celsius => 100.0,
            TemperatureUnit::Fahrenheit => 212.0,
        }
    }
}

/// Unit label for a configured unit parameter.
pub fn get_unit(param: &str) -> &'static str {
    TemperatureUnit::from_param(param).label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_labels() {
        assert_eq!(get_unit("C"), "°C");
        assert_eq!(get_unit("F"), "°F");
        assert_eq!(get_unit("K"), "°F");
    }

    #[test]
    fn test_boiling_points() {
        assert_eq!(TemperatureUnit::Celsius.boiling_point(), 100.0);
        assert_eq!(TemperatureUnit::Fahrenheit.boiling_point(), 212.0);
    }
}
