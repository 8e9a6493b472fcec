//! Engine configuration: weight tables, thresholds and scenario registry.
//!
//! Everything the scorer, merger, overlap detector and scenario transformer
//! would otherwise hard-code lives here, so alternate weighting schemes can be
//! swapped in without touching the algorithms.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ImpactLevel, WindowType};

const DEFAULT_BUCKET_MINUTES: i64 = 60;
const DEFAULT_MIN_WINDOW_MINUTES: i64 = 120;
const DEFAULT_MAX_EXPLANATION_DRIVERS: usize = 3;
const DEFAULT_COMPRESSION_FACTOR: f64 = 0.7;
const DEFAULT_STALE_AFTER_HOURS: f64 = 24.0;

/// Per-impact weights summed into bucket scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImpactWeights {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            low: 1,
            medium: 2,
            high: 3,
        }
    }
}

impl ImpactWeights {
    pub fn weight(&self, impact: ImpactLevel) -> u32 {
        match impact {
            ImpactLevel::Low => self.low,
            ImpactLevel::Medium => self.medium,
            ImpactLevel::High => self.high,
        }
    }
}

/// Score thresholds for window classification (inclusive upper bounds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowThresholds {
    pub safer_max_score: u32,
    pub caution_max_score: u32,
}

impl Default for WindowThresholds {
    fn default() -> Self {
        Self {
            safer_max_score: 1,
            caution_max_score: 2,
        }
    }
}

impl WindowThresholds {
    pub fn classify(&self, score: u32) -> WindowType {
        if score <= self.safer_max_score {
            WindowType::Safer
        } else if score <= self.caution_max_score {
            WindowType::Caution
        } else {
            WindowType::HighDisruption
        }
    }
}

/// Summed-weight cutoffs for an overlap's combined impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombinedImpactRule {
    pub high_min_weight: u32,
    pub medium_min_weight: u32,
}

impl Default for CombinedImpactRule {
    fn default() -> Self {
        Self {
            high_min_weight: 5,
            medium_min_weight: 3,
        }
    }
}

impl CombinedImpactRule {
    pub fn level(&self, combined_weight: u32) -> ImpactLevel {
        if combined_weight >= self.high_min_weight {
            ImpactLevel::High
        } else if combined_weight >= self.medium_min_weight {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }
}

/// A named speculative adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    pub label: String,
    pub compression_factor: f64,
}

fn default_scenarios() -> BTreeMap<String, ScenarioDefinition> {
    let mut scenarios = BTreeMap::new();
    scenarios.insert(
        "olympics".to_string(),
        ScenarioDefinition {
            label: "Olympics".to_string(),
            compression_factor: DEFAULT_COMPRESSION_FACTOR,
        },
    );
    scenarios
}

/// Engine configuration.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub impact_weights: ImpactWeights,
    pub thresholds: WindowThresholds,
    pub combined_impact: CombinedImpactRule,
    pub bucket_minutes: i64,
    pub min_window_minutes: i64,
    pub max_explanation_drivers: usize,
    pub default_compression_factor: f64,
    pub scenarios: BTreeMap<String, ScenarioDefinition>,
    pub stale_after_hours: f64,
    /// IANA timezone used only for human-readable labels.
    pub timezone: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            impact_weights: ImpactWeights::default(),
            thresholds: WindowThresholds::default(),
            combined_impact: CombinedImpactRule::default(),
            bucket_minutes: DEFAULT_BUCKET_MINUTES,
            min_window_minutes: DEFAULT_MIN_WINDOW_MINUTES,
            max_explanation_drivers: DEFAULT_MAX_EXPLANATION_DRIVERS,
            default_compression_factor: DEFAULT_COMPRESSION_FACTOR,
            scenarios: default_scenarios(),
            stale_after_hours: DEFAULT_STALE_AFTER_HOURS,
            timezone: "UTC".to_string(),
        }
    }
}

impl EngineConfig {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket_minutes <= 0 {
            return Err(ConfigError::Invalid {
                field: "bucketMinutes",
                reason: format!("must be positive, got {}", self.bucket_minutes),
            });
        }
        if self.min_window_minutes < 0 {
            return Err(ConfigError::Invalid {
                field: "minWindowMinutes",
                reason: format!("must not be negative, got {}", self.min_window_minutes),
            });
        }
        if self.max_explanation_drivers == 0 {
            return Err(ConfigError::Invalid {
                field: "maxExplanationDrivers",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.thresholds.safer_max_score > self.thresholds.caution_max_score {
            return Err(ConfigError::Invalid {
                field: "thresholds",
                reason: format!(
                    "saferMaxScore ({}) exceeds cautionMaxScore ({})",
                    self.thresholds.safer_max_score, self.thresholds.caution_max_score
                ),
            });
        }
        if self.combined_impact.medium_min_weight > self.combined_impact.high_min_weight {
            return Err(ConfigError::Invalid {
                field: "combinedImpact",
                reason: "mediumMinWeight exceeds highMinWeight".to_string(),
            });
        }
        if !valid_factor(self.default_compression_factor) {
            return Err(ConfigError::Invalid {
                field: "defaultCompressionFactor",
                reason: format!("must be in (0, 1], got {}", self.default_compression_factor),
            });
        }
        for (key, scenario) in &self.scenarios {
            if !valid_factor(scenario.compression_factor) {
                return Err(ConfigError::Invalid {
                    field: "scenarios",
                    reason: format!(
                        "{} compressionFactor must be in (0, 1], got {}",
                        key, scenario.compression_factor
                    ),
                });
            }
        }
        if self.stale_after_hours < 0.0 {
            return Err(ConfigError::Invalid {
                field: "staleAfterHours",
                reason: "must not be negative".to_string(),
            });
        }
        self.tz()?;
        Ok(())
    }

    /// Parse the configured display timezone.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))
    }
}

fn valid_factor(factor: f64) -> bool {
    factor > 0.0 && factor <= 1.0
}

/// Default config location: `~/.outreach-timing/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".outreach-timing").join("config.json"))
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let config: EngineConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;

    log::debug!("Loaded engine config from {}", path.display());
    Ok(config)
}

/// Load an explicit config, or the default path if present, or built-in defaults.
pub fn load_config_or_default(explicit: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => Ok(EngineConfig::default()),
    }
}
