//! Rule and per-vehicle configuration.
//!
//! Two layers, both plain data built with `with_*` methods:
//!
//! - [`RuleConfig`]: world-wide rules (movement algorithm, speed game rule,
//!   powered rail boost). Shared by every cart in a world.
//! - [`VehicleConfig`]: per-cart overrides (speed cap, friction).
//!
//! The movement algorithm is chosen here and bound once when a cart is
//! built; motion code never reads a global flag.
//!
//! # Example
//!
//! ```rust
//! use railcart::config::{Config, MovementMode, RuleConfig, VehicleConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.rules.movement, MovementMode::Continuous);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_rules(RuleConfig::default().with_max_speed_blocks_per_sec(16))
//!     .with_vehicle(VehicleConfig::default().with_slow_when_empty(false));
//! assert_eq!(config.rules.max_speed_blocks_per_sec, 16);
//! ```

/// Lowest accepted value of the speed game rule, in blocks per second.
pub const MIN_SPEED_RULE: u32 = 1;

/// Highest accepted value of the speed game rule, in blocks per second.
pub const MAX_SPEED_RULE: u32 = 1000;

// ============================================================================
// Main Config
// ============================================================================

/// Complete motion configuration for one cart.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// World rules
    pub rules: RuleConfig,
    /// Per-vehicle overrides
    pub vehicle: VehicleConfig,
}

impl Config {
    /// Set rule configuration
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Set vehicle configuration
    pub fn with_vehicle(mut self, vehicle: VehicleConfig) -> Self {
        self.vehicle = vehicle;
        self
    }

    /// Shortcut for `rules.movement`.
    pub fn with_movement(mut self, movement: MovementMode) -> Self {
        self.rules.movement = movement;
        self
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Which per-tick algorithm drives carts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MovementMode {
    /// Single-pass chord projection with fixed-count client lerp.
    Legacy,
    /// Multi-pass track iteration with weighted step interpolation.
    #[default]
    Continuous,
}

impl MovementMode {
    /// Returns the mode as a lowercase string.
    pub const fn as_str(self) -> &'static str {
        match self {
            MovementMode::Legacy => "legacy",
            MovementMode::Continuous => "continuous",
        }
    }
}

/// World-wide movement rules
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleConfig {
    /// Movement algorithm
    pub movement: MovementMode,
    /// Speed game rule in blocks per second (continuous mode)
    pub max_speed_blocks_per_sec: u32,
    /// Speed added per tick by an active powered rail
    pub powered_rail_boost: f64,
    /// Legacy top speed on land, blocks per tick
    pub legacy_max_speed: f64,
    /// Legacy top speed in water, blocks per tick
    pub legacy_water_max_speed: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            movement: MovementMode::Continuous,
            max_speed_blocks_per_sec: 8,
            powered_rail_boost: 0.06,
            legacy_max_speed: 0.4,
            legacy_water_max_speed: 0.2,
        }
    }
}

impl RuleConfig {
    /// Set the movement algorithm
    pub fn with_movement(mut self, movement: MovementMode) -> Self {
        self.movement = movement;
        self
    }

    /// Set the speed game rule (clamped to 1..=1000)
    pub fn with_max_speed_blocks_per_sec(mut self, blocks: u32) -> Self {
        self.max_speed_blocks_per_sec = blocks.clamp(MIN_SPEED_RULE, MAX_SPEED_RULE);
        self
    }

    /// Set the powered rail boost
    pub fn with_powered_rail_boost(mut self, boost: f64) -> Self {
        self.powered_rail_boost = boost.max(0.0);
        self
    }

    /// Set the legacy land and water speed caps
    pub fn with_legacy_max_speed(mut self, land: f64, water: f64) -> Self {
        self.legacy_max_speed = land.max(0.0);
        self.legacy_water_max_speed = water.max(0.0);
        self
    }

    /// Speed game rule converted to blocks per tick.
    pub fn rule_speed_per_tick(&self) -> f64 {
        self.max_speed_blocks_per_sec.clamp(MIN_SPEED_RULE, MAX_SPEED_RULE) as f64 / 20.0
    }
}

// ============================================================================
// Vehicle
// ============================================================================

/// Whether a cart loses speed to friction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FrictionMode {
    /// Normal slowdown.
    #[default]
    Normal,
    /// No slowdown at all (factor 1.0, water drag included).
    Disabled,
}

/// Per-cart overrides
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleConfig {
    /// Fixed top speed in blocks per tick, replacing the rule value
    pub max_speed_override: Option<f64>,
    /// Empty carts slow down faster than occupied ones
    pub slow_when_empty: bool,
    /// Friction handling
    pub friction: FrictionMode,
    /// Let a riding player steer while the cart is off the rails
    pub steer_off_rail: bool,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_speed_override: None,
            slow_when_empty: true,
            friction: FrictionMode::Normal,
            steer_off_rail: false,
        }
    }
}

impl VehicleConfig {
    /// Set a fixed top speed (negative values are treated as zero)
    pub fn with_max_speed_override(mut self, speed: f64) -> Self {
        self.max_speed_override = Some(speed.max(0.0));
        self
    }

    /// Set whether empty carts slow down faster
    pub fn with_slow_when_empty(mut self, slow: bool) -> Self {
        self.slow_when_empty = slow;
        self
    }

    /// Set friction handling
    pub fn with_friction(mut self, friction: FrictionMode) -> Self {
        self.friction = friction;
        self
    }

    /// Set off-rail steering
    pub fn with_steer_off_rail(mut self, steer: bool) -> Self {
        self.steer_off_rail = steer;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.rules.movement, MovementMode::Continuous);
        assert_eq!(config.rules.max_speed_blocks_per_sec, 8);
        assert_eq!(config.rules.powered_rail_boost, 0.06);
        assert!(config.vehicle.slow_when_empty);
        assert_eq!(config.vehicle.friction, FrictionMode::Normal);
        assert!(config.vehicle.max_speed_override.is_none());
    }

    #[test]
    fn speed_rule_clamped() {
        let rules = RuleConfig::default().with_max_speed_blocks_per_sec(0);
        assert_eq!(rules.max_speed_blocks_per_sec, MIN_SPEED_RULE);

        let rules = RuleConfig::default().with_max_speed_blocks_per_sec(5000);
        assert_eq!(rules.max_speed_blocks_per_sec, MAX_SPEED_RULE);
    }

    #[test]
    fn rule_speed_per_tick() {
        assert!((RuleConfig::default().rule_speed_per_tick() - 0.4).abs() < 1e-12);

        // Out-of-range values written directly are still clamped on use
        let rules = RuleConfig {
            max_speed_blocks_per_sec: 0,
            ..RuleConfig::default()
        };
        assert!((rules.rule_speed_per_tick() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_movement(MovementMode::Legacy)
            .with_vehicle(
                VehicleConfig::default()
                    .with_max_speed_override(0.2)
                    .with_friction(FrictionMode::Disabled)
                    .with_steer_off_rail(true),
            );

        assert_eq!(config.rules.movement, MovementMode::Legacy);
        assert_eq!(config.vehicle.max_speed_override, Some(0.2));
        assert_eq!(config.vehicle.friction, FrictionMode::Disabled);
        assert!(config.vehicle.steer_off_rail);
    }

    #[test]
    fn negative_values_rejected() {
        let vehicle = VehicleConfig::default().with_max_speed_override(-1.0);
        assert_eq!(vehicle.max_speed_override, Some(0.0));

        let rules = RuleConfig::default()
            .with_powered_rail_boost(-0.5)
            .with_legacy_max_speed(-1.0, 0.1);
        assert_eq!(rules.powered_rail_boost, 0.0);
        assert_eq!(rules.legacy_max_speed, 0.0);
        assert_eq!(rules.legacy_water_max_speed, 0.1);
    }

    #[test]
    fn movement_mode_names() {
        assert_eq!(MovementMode::Legacy.as_str(), "legacy");
        assert_eq!(MovementMode::Continuous.as_str(), "continuous");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_json_shape() {
        let config = Config::default().with_movement(MovementMode::Legacy);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"movement\":\"legacy\""));

        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
