//! Rule-based header field extraction.
//!
//! Each header field has exactly one [`FieldRule`]: a labeled pattern whose
//! first capture group holds the value. The rules live in [`FIELD_RULES`] as
//! plain data, so a rule can be tested on its own and the table extended
//! without touching [`extract_fields`].

pub mod amounts;
pub mod dates;
pub mod patterns;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::models::invoice::{HeaderField, HeaderFields};

pub use amounts::{amount_or_zero, parse_amount};
pub use dates::parse_dmy_date;
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A labeled pattern producing one header field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Field this rule fills.
    pub field: HeaderField,
    /// Pattern whose first group is the value.
    pub pattern: &'static Regex,
}

impl FieldRule {
    pub const fn new(field: HeaderField, pattern: &'static Regex) -> Self {
        Self { field, pattern }
    }
}

impl FieldExtractor for FieldRule {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }
}

lazy_static! {
    /// One rule per header field, in extraction order.
    pub static ref FIELD_RULES: [FieldRule; 6] = [
        FieldRule::new(HeaderField::InvoiceNo, &INVOICE_NO),
        FieldRule::new(HeaderField::Date, &INVOICE_DATE),
        FieldRule::new(HeaderField::TaxReg, &TAX_REG),
        FieldRule::new(HeaderField::Subtotal, &SUBTOTAL),
        FieldRule::new(HeaderField::Tax, &TAX_AMOUNT),
        FieldRule::new(HeaderField::Total, &GRAND_TOTAL),
    ];
}

/// Look up the rule for a field.
pub fn rule_for(field: HeaderField) -> Option<&'static FieldRule> {
    FIELD_RULES.iter().find(|rule| rule.field == field)
}

/// Extract header fields from raw text using a rule table.
///
/// A field is present in the output only when its rule matched; the value is
/// the first match's group, trimmed.
pub fn extract_with(rules: &[FieldRule], text: &str) -> HeaderFields {
    let mut fields = HeaderFields::new();

    for rule in rules {
        match rule.extract(text) {
            Some(value) => fields.insert(rule.field, value),
            None => trace!("no match for {}", rule.field),
        }
    }

    fields
}

/// Extract header fields from raw text using [`FIELD_RULES`].
pub fn extract_fields(text: &str) -> HeaderFields {
    extract_with(FIELD_RULES.as_slice(), text)
}
