//! Configuration for imprimatur-core
//!
//! Screening thresholds, the decision quorum and the default deadlines.

use serde::{Deserialize, Serialize};

use crate::review::MAX_REVIEWERS;
use crate::screening::ScreeningRules;

/// System-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorialConfig {
    /// Screening thresholds
    pub screening: ScreeningRules,
    /// Peer review settings
    pub review: ReviewConfig,
    /// Editorial decision settings
    pub decision: DecisionConfig,
}

/// Peer review configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Completed reviews required before a decision
    pub quorum: u32,
    /// Review due date when an invitation names none, in days
    pub default_due_days: u32,
    /// Hide the author from reviewers by default
    pub blind_by_default: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            quorum: 1,
            default_due_days: 21,
            blind_by_default: true,
        }
    }
}

/// Editorial decision configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Revision deadline for minor revisions, in days
    pub minor_revision_days: u32,
    /// Revision deadline for major revisions, in days
    pub major_revision_days: u32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            minor_revision_days: 14,
            major_revision_days: 30,
        }
    }
}

impl EditorialConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Same configuration with a different quorum
    pub fn with_quorum(mut self, quorum: u32) -> Self {
        self.review.quorum = quorum;
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let screening = &self.screening;
        if !(0.0..=100.0).contains(&screening.min_originality) {
            return Err(ConfigError::OutOfRange(
                "min_originality must be between 0 and 100".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&screening.max_matches) {
            return Err(ConfigError::OutOfRange(
                "max_matches must be between 0 and 100".to_string(),
            ));
        }

        // A quorum above the reviewer cap could never be reached
        if self.review.quorum == 0 || self.review.quorum as usize > MAX_REVIEWERS {
            return Err(ConfigError::OutOfRange(format!(
                "quorum must be between 1 and {}",
                MAX_REVIEWERS
            )));
        }

        if self.review.default_due_days == 0 {
            return Err(ConfigError::OutOfRange(
                "default_due_days must be positive".to_string(),
            ));
        }

        if self.decision.minor_revision_days == 0 || self.decision.major_revision_days == 0 {
            return Err(ConfigError::OutOfRange(
                "revision deadlines must be positive".to_string(),
            ));
        }

        if self.decision.minor_revision_days > self.decision.major_revision_days {
            return Err(ConfigError::InvalidThresholds(
                "minor_revision_days must not exceed major_revision_days".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Values are invalid relative to each other
    InvalidThresholds(String),
    /// Value is out of valid range
    OutOfRange(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidThresholds(msg) => write!(f, "Invalid thresholds: {}", msg),
            ConfigError::OutOfRange(msg) => write!(f, "Value out of range: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
