//! Extraction pipeline: header fields, line items, and validation for one document.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::classifier::LineClassifier;
use crate::error::Result;
use crate::models::config::FolioConfig;
use crate::models::invoice::{HeaderFields, LineItems, ValidationWarning};
use crate::ocr::{recognized_text, TextSource};

use super::items::LineItemParser;
use super::rules::extract_fields;
use super::validator::{ValidationReport, Validator};

/// Result of processing one invoice transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Header fields found in the text.
    pub fields: HeaderFields,
    /// Line items in order of appearance.
    pub items: LineItems,
    /// Validation outcome; serialized as its warning list.
    #[serde(rename = "warnings")]
    pub report: ValidationReport,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Warnings to display for this document.
    pub fn warnings(&self) -> Vec<ValidationWarning> {
        self.report.warnings()
    }

    /// True when the declared amounts agree with each other and the items.
    pub fn is_consistent(&self) -> bool {
        self.report.is_consistent()
    }
}

/// Runs field extraction, item parsing and validation over raw text.
///
/// The classifier is trained once in [`InvoicePipeline::new`]; afterwards the
/// pipeline is read-only and can be shared between threads.
#[derive(Debug, Clone)]
pub struct InvoicePipeline {
    parser: LineItemParser,
    validator: Validator,
}

impl InvoicePipeline {
    /// Build a pipeline from configuration, training the line classifier.
    pub fn new(config: &FolioConfig) -> Result<Self> {
        let classifier = LineClassifier::train(&config.classifier)?;
        Ok(Self::with_parts(
            LineItemParser::new(classifier),
            Validator::new().with_tolerance(config.extraction.tolerance),
        ))
    }

    /// Build a pipeline with the default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&FolioConfig::default())
    }

    pub fn with_parts(parser: LineItemParser, validator: Validator) -> Self {
        Self { parser, validator }
    }

    pub fn parser(&self) -> &LineItemParser {
        &self.parser
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Process one transcript.
    pub fn process(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        info!("Processing invoice from {} characters of text", text.len());

        let fields = extract_fields(text);
        let items = self.parser.parse(text);
        let report = self.validator.validate(&fields, &items);

        debug!(
            "Extracted {} header fields and {} line items; {} warnings",
            fields.len(),
            items.len(),
            report.warnings().len()
        );

        ExtractionResult {
            fields,
            items,
            report,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Recognize text from a source and process it. A failing source is
    /// treated as empty text.
    pub fn process_source<S: TextSource + ?Sized>(&self, source: &S) -> ExtractionResult {
        let text = recognized_text(source);
        self.process(&text)
    }
}
