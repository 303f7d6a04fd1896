//! Configuration for palette extraction.
//!
//! All fields are caller-supplied: the algorithms apply no internal
//! defaults, and invalid values fail fast at the start of every
//! `quantize()` call rather than producing degenerate output.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed directly:
//!
//! ```no_run
//! use palette_quant::ExtractionConfig;
//! use std::path::Path;
//!
//! let config = ExtractionConfig::from_json_file(Path::new("config.json"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};

/// Parameters controlling a single palette extraction.
///
/// Can be serialized to/from JSON for reproducible experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Number of palette colors to extract (≥ 1)
    pub target_color_count: usize,

    /// Upper bound on intermediate candidate palettes (≥ target_color_count).
    /// The hybrid fusion stage caps its merged candidate list at this size.
    pub max_color_count: usize,

    /// Minimum acceptable palette quality score in [0, 1].
    /// Informational: exposed through
    /// [`ExtractionResult::meets_quality_threshold`](crate::ExtractionResult::meets_quality_threshold),
    /// never enforced as a hard failure.
    pub quality_threshold: f64,

    /// Euclidean RGB distance below which two colors are treated as
    /// duplicates during hybrid fusion
    pub color_distance_threshold: f64,

    /// Working-set memory limit in MB. Checked up front against the
    /// estimated footprint for the given input; exceeding it fails the
    /// call with [`ExtractionError::MemoryLimitExceeded`].
    pub memory_limit_mb: u64,
}

impl ExtractionConfig {
    /// Validate all fields, failing fast on programming errors.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidParameter`] naming the first
    /// offending field.
    pub fn validate(&self) -> Result<()> {
        if self.target_color_count < 1 {
            return Err(ExtractionError::invalid_parameter(
                "target_color_count",
                self.target_color_count,
            ));
        }
        if self.max_color_count < self.target_color_count {
            return Err(ExtractionError::invalid_parameter(
                "max_color_count",
                self.max_color_count,
            ));
        }
        if !(0.0..=1.0).contains(&self.quality_threshold) {
            return Err(ExtractionError::invalid_parameter(
                "quality_threshold",
                self.quality_threshold,
            ));
        }
        if !self.color_distance_threshold.is_finite() || self.color_distance_threshold < 0.0 {
            return Err(ExtractionError::invalid_parameter(
                "color_distance_threshold",
                self.color_distance_threshold,
            ));
        }
        if self.memory_limit_mb == 0 {
            return Err(ExtractionError::invalid_parameter(
                "memory_limit_mb",
                self.memory_limit_mb,
            ));
        }
        Ok(())
    }

    /// Memory limit in bytes
    pub fn memory_limit_bytes(&self) -> u64 {
        self.memory_limit_mb * 1024 * 1024
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &std::path::Path) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &std::path::Path) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ExtractionConfig {
        ExtractionConfig {
            target_color_count: 8,
            max_color_count: 16,
            quality_threshold: 0.5,
            color_distance_threshold: 20.0,
            memory_limit_mb: 100,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_zero_target_rejected() {
        let mut config = valid_config();
        config.target_color_count = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InvalidParameter { ref parameter, .. } if parameter == "target_color_count"
        ));
    }

    #[test]
    fn test_max_below_target_rejected() {
        let mut config = valid_config();
        config.max_color_count = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quality_threshold_out_of_range() {
        let mut config = valid_config();
        config.quality_threshold = 1.5;
        assert!(config.validate().is_err());

        config.quality_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_distance_threshold_rejected() {
        let mut config = valid_config();
        config.color_distance_threshold = -1.0;
        assert!(config.validate().is_err());

        config.color_distance_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = valid_config();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ExtractionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
