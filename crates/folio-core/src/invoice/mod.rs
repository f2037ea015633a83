//! Invoice field extraction, line item parsing, and validation.

mod items;
mod pipeline;
pub mod rules;
mod validator;

pub use items::{split_priced_line, LineItemParser};
pub use pipeline::{ExtractionResult, InvoicePipeline};
pub use rules::{extract_fields, FieldExtractor, FieldRule, FIELD_RULES};
pub use validator::{ValidationReport, Validator};
