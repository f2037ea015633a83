//! Configuration structures for the extraction pipeline.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::models::invoice::Category;

/// Main configuration for the folio pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Validation settings.
    pub extraction: ExtractionConfig,

    /// Line classifier training settings.
    pub classifier: ClassifierConfig,

    /// Output settings used by drivers.
    pub output: OutputConfig,
}

/// Extraction and validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Absolute difference under which two amounts are considered equal.
    pub tolerance: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
        }
    }
}

/// A labeled phrase the line classifier learns from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub category: Category,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

/// Line classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Labeled examples, one canonical phrase per category by default.
    pub examples: Vec<TrainingExample>,

    /// Number of full-batch gradient descent passes.
    pub epochs: usize,

    /// Gradient descent step size.
    pub learning_rate: f64,

    /// L2 penalty on the weights (not applied to the bias).
    pub regularization: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            examples: vec![
                TrainingExample::new("Room Service - Breakfast", Category::Service),
                TrainingExample::new("Mini Bar - Soda", Category::Minibar),
                TrainingExample::new("Laundry Service", Category::Laundry),
                TrainingExample::new("Food & Beverage", Category::Food),
            ],
            epochs: 1000,
            learning_rate: 0.25,
            regularization: 1.0,
        }
    }
}

/// Output format for extraction results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Driver output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when none is given on the command line.
    pub default_format: OutputFormat,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl FolioConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the pipeline cannot work with.
    pub fn check(&self) -> Result<()> {
        if self.extraction.tolerance.is_sign_negative() {
            return Err(FolioError::Config(format!(
                "extraction.tolerance must not be negative, got {}",
                self.extraction.tolerance
            )));
        }
        if self.classifier.examples.is_empty() {
            return Err(FolioError::Config(
                "classifier.examples must contain at least one example".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_training_set_covers_every_category() {
        let config = ClassifierConfig::default();
        for category in Category::ALL {
            assert!(config.examples.iter().any(|e| e.category == category));
        }
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: FolioConfig =
            serde_json::from_str(r#"{"extraction": {"tolerance": "0.05"}}"#).unwrap();

        assert_eq!(config.extraction.tolerance, Decimal::new(5, 2));
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert_eq!(config.output.default_format, OutputFormat::Json);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FolioConfig::default();
        config.output.pretty = true;
        config.save(&path).unwrap();

        let loaded = FolioConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let mut config = FolioConfig::default();
        config.extraction.tolerance = Decimal::new(-1, 2);
        assert!(matches!(config.check(), Err(FolioError::Config(_))));
    }
}
