use crate::error::{LoxoError, Result};
use crate::models::{DistanceUnit, SelfPairMode, StatsOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default ceiling on collection size for the O(n²) statistics
pub const DEFAULT_MAX_FEATURES: usize = 50_000;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via command-line override
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for Loxo
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub self_pairs: ConfigValue<SelfPairMode>,
    pub distance_unit: ConfigValue<DistanceUnit>,
    pub max_features: ConfigValue<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            self_pairs: ConfigValue::new(SelfPairMode::Include, ConfigSource::Default),
            distance_unit: ConfigValue::new(DistanceUnit::Meters, ConfigSource::Default),
            max_features: ConfigValue::new(DEFAULT_MAX_FEATURES, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| LoxoError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| LoxoError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(self_pairs) = file_config.self_pairs {
            self.self_pairs.update(self_pairs, ConfigSource::File);
        }

        if let Some(distance_unit) = file_config.distance_unit {
            self.distance_unit.update(distance_unit, ConfigSource::File);
        }

        if let Some(max_features) = file_config.max_features {
            self.max_features.update(max_features, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // LOXO_SELF_PAIRS
        if let Ok(mode_str) = env::var("LOXO_SELF_PAIRS") {
            match parse_self_pair_mode(&mode_str) {
                Ok(mode) => self.self_pairs.update(mode, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LOXO_SELF_PAIRS value '{}': expected include or exclude",
                    mode_str
                ),
            }
        }

        // LOXO_DISTANCE_UNIT
        if let Ok(unit_str) = env::var("LOXO_DISTANCE_UNIT") {
            match parse_distance_unit(&unit_str) {
                Ok(unit) => self.distance_unit.update(unit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LOXO_DISTANCE_UNIT value '{}': expected meters, kilometers, miles, or feet",
                    unit_str
                ),
            }
        }

        // LOXO_MAX_FEATURES
        if let Ok(max_str) = env::var("LOXO_MAX_FEATURES") {
            match max_str.parse::<usize>() {
                Ok(max) if max > 0 => self.max_features.update(max, ConfigSource::Environment),
                _ => tracing::warn!(
                    "Invalid LOXO_MAX_FEATURES value '{}': expected a positive integer",
                    max_str
                ),
            }
        }

        self
    }

    /// Apply explicit overrides
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(self_pairs) = overrides.self_pairs {
            self.self_pairs.update(self_pairs, ConfigSource::Cli);
        }

        if let Some(distance_unit) = overrides.distance_unit {
            self.distance_unit.update(distance_unit, ConfigSource::Cli);
        }

        if let Some(max_features) = overrides.max_features {
            self.max_features.update(max_features, ConfigSource::Cli);
        }
    }

    /// Options handed to the statistics engine
    pub fn stats_options(&self) -> StatsOptions {
        StatsOptions::with_self_pairs(self.self_pairs.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "self_pairs".to_string(),
            (format!("{:?}", self.self_pairs.value), self.self_pairs.source),
        );

        map.insert(
            "distance_unit".to_string(),
            (format!("{:?}", self.distance_unit.value), self.distance_unit.source),
        );

        map.insert(
            "max_features".to_string(),
            (self.max_features.value.to_string(), self.max_features.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    self_pairs: Option<SelfPairMode>,
    distance_unit: Option<DistanceUnit>,
    max_features: Option<usize>,
}

/// Explicit configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub self_pairs: Option<SelfPairMode>,
    pub distance_unit: Option<DistanceUnit>,
    pub max_features: Option<usize>,
}

/// Parse distance unit from string
pub fn parse_distance_unit(s: &str) -> Result<DistanceUnit> {
    match s.to_lowercase().as_str() {
        "meters" | "m" => Ok(DistanceUnit::Meters),
        "kilometers" | "km" => Ok(DistanceUnit::Kilometers),
        "miles" | "mi" => Ok(DistanceUnit::Miles),
        "feet" | "ft" => Ok(DistanceUnit::Feet),
        _ => Err(LoxoError::ConfigInvalid {
            key: "distance_unit".to_string(),
            reason: format!("Invalid distance unit: {}. Use meters, kilometers, miles, or feet", s),
        }),
    }
}

/// Parse self-pair mode from string
pub fn parse_self_pair_mode(s: &str) -> Result<SelfPairMode> {
    match s.to_lowercase().as_str() {
        "include" => Ok(SelfPairMode::Include),
        "exclude" => Ok(SelfPairMode::Exclude),
        _ => Err(LoxoError::ConfigInvalid {
            key: "self_pairs".to_string(),
            reason: format!("Invalid self-pair mode: {}. Use include or exclude", s),
        }),
    }
}
