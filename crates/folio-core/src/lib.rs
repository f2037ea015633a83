//! Core library for hotel invoice extraction.
//!
//! This crate provides:
//! - Header field extraction (invoice number, date, tax registration, amounts)
//! - Line item parsing with a small trained category classifier
//! - Arithmetic validation of subtotal, tax and total
//!
//! Image preprocessing and OCR are external; recognized text enters through
//! [`ocr::TextSource`].

pub mod classifier;
pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;

pub use classifier::LineClassifier;
pub use error::{ClassifierError, FolioError, OcrError, Result, ValidationError};
pub use invoice::{
    extract_fields, ExtractionResult, InvoicePipeline, LineItemParser, ValidationReport,
    Validator,
};
pub use models::config::{ClassifierConfig, FolioConfig, TrainingExample};
pub use models::invoice::{Category, HeaderField, HeaderFields, LineItem, LineItems, ValidationWarning};
pub use ocr::{recognized_text, TextSource, TranscriptFile};
