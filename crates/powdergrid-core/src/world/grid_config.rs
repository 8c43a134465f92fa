//! Grid and rule configuration
//!
//! Serializable to RON so hosts can keep presets next to their property
//! tables. Every field falls back to its default when omitted.

use serde::{Deserialize, Serialize};

/// Dimensions and environment of a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells per row (must be positive)
    pub width: u32,
    /// Rows, `y = 0` is the floor (must be positive)
    pub height: u32,
    /// Temperature particles drift toward
    pub ambient_temperature: i32,
    pub rules: RuleConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 120,
            ambient_temperature: 20,
            rules: RuleConfig::default(),
        }
    }
}

impl GridConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

/// Tunables for the material rule engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Let idle particles drop out of the schedule
    pub sleep_enabled: bool,
    /// Unmoved ticks before a particle falls asleep
    pub sleep_threshold: u32,

    /// Heat added to each flammable neighbor of a heat source per tick
    pub heat_increment: i32,
    /// Degrees moved toward ambient per tick
    pub cooling_step: i32,
    /// A heat source cools while fewer cardinal neighbors than this also spread heat
    pub cooling_neighbor_threshold: usize,

    /// Per-neighbor, per-tick chance acid dissolves a solid or powder
    pub acid_conversion_chance: f32,
    /// Dissolved particles get the acid lifetime divided by this
    pub acid_lifetime_divisor: u32,

    /// Chance cooling steam condenses to water instead of vanishing
    pub steam_condense_chance: f32,
    /// Degrees lost when molten material solidifies
    pub solidify_temperature_penalty: i32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            sleep_enabled: true,
            sleep_threshold: 50,
            heat_increment: 5,
            cooling_step: 1,
            cooling_neighbor_threshold: 2,
            acid_conversion_chance: 0.02,
            acid_lifetime_divisor: 3,
            steam_condense_chance: 0.5,
            solidify_temperature_penalty: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: GridConfig =
            ron::from_str("(width: 32, rules: (sleep_enabled: false))").unwrap();

        assert_eq!(config.width, 32);
        assert_eq!(config.height, GridConfig::default().height);
        assert!(!config.rules.sleep_enabled);
        assert_eq!(config.rules.sleep_threshold, 50);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = GridConfig::new(8, 4);
        let text = ron::to_string(&config).unwrap();
        let parsed: GridConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
