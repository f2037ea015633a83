//! Error types for the folio-core library.

use thiserror::Error;

/// Main error type for the folio library.
#[derive(Error, Debug)]
pub enum FolioError {
    /// Line classifier could not be trained.
    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Text source (OCR collaborator) failed.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while training the line classifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// No labeled examples were supplied.
    #[error("training set is empty")]
    EmptyTrainingSet,

    /// None of the examples produced a usable token.
    #[error("training set produced an empty vocabulary")]
    EmptyVocabulary,

    /// Training hyperparameters are out of range.
    #[error("invalid training parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Errors reported by a text source.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The underlying input could not be read.
    #[error("failed to read input: {0}")]
    Read(#[from] std::io::Error),

    /// Recognition ran but did not produce text.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Internal failures inside the validator.
///
/// These never escape [`crate::invoice::Validator::validate`]; they are carried
/// in a [`crate::invoice::ValidationReport::Failed`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Decimal arithmetic overflowed.
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

/// Result type for the folio library.
pub type Result<T> = std::result::Result<T, FolioError>;
