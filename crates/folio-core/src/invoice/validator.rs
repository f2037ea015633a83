//! Cross-field arithmetic validation.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::models::invoice::{HeaderField, HeaderFields, LineItems, ValidationWarning};

use super::rules::amount_or_zero;

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReport {
    /// All checks ran; zero or more inconsistencies were found.
    Completed { warnings: Vec<ValidationWarning> },

    /// A check could not be carried out.
    Failed { error: ValidationError },
}

impl ValidationReport {
    /// Warnings to show the user. A failed validation yields a single
    /// [`ValidationWarning::Internal`].
    pub fn warnings(&self) -> Vec<ValidationWarning> {
        match self {
            ValidationReport::Completed { warnings } => warnings.clone(),
            ValidationReport::Failed { error } => {
                vec![ValidationWarning::Internal(error.to_string())]
            }
        }
    }

    /// True when every check ran and none failed.
    pub fn is_consistent(&self) -> bool {
        matches!(self, ValidationReport::Completed { warnings } if warnings.is_empty())
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationReport::Failed { error } => Some(error),
            ValidationReport::Completed { .. } => None,
        }
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.warnings().serialize(serializer)
    }
}

/// Checks declared subtotal, tax and total against each other and the items.
#[derive(Debug, Clone)]
pub struct Validator {
    tolerance: Decimal,
}

impl Validator {
    /// Validator with the default 0.01 tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
        }
    }

    /// Set the absolute tolerance for amount comparisons.
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Run both checks. Never fails: internal errors come back as
    /// [`ValidationReport::Failed`].
    pub fn validate(&self, fields: &HeaderFields, items: &LineItems) -> ValidationReport {
        match self.check(fields, items) {
            Ok(warnings) => {
                debug!("Validation finished with {} warnings", warnings.len());
                ValidationReport::Completed { warnings }
            }
            Err(error) => {
                warn!("Validation could not complete: {}", error);
                ValidationReport::Failed { error }
            }
        }
    }

    fn check(
        &self,
        fields: &HeaderFields,
        items: &LineItems,
    ) -> Result<Vec<ValidationWarning>, ValidationError> {
        let mut warnings = Vec::new();

        let subtotal = amount_or_zero(fields.get(HeaderField::Subtotal));
        let tax = amount_or_zero(fields.get(HeaderField::Tax));
        let total = amount_or_zero(fields.get(HeaderField::Total));

        let calculated = items
            .total()
            .ok_or(ValidationError::Overflow("line item sum"))?;

        let subtotal_diff = calculated
            .checked_sub(subtotal)
            .ok_or(ValidationError::Overflow("subtotal difference"))?;
        if subtotal_diff.abs() > self.tolerance {
            warnings.push(ValidationWarning::SubtotalMismatch {
                declared: subtotal,
                calculated,
            });
        }

        let computed = subtotal
            .checked_add(tax)
            .ok_or(ValidationError::Overflow("subtotal plus tax"))?;
        let total_diff = computed
            .checked_sub(total)
            .ok_or(ValidationError::Overflow("total difference"))?;
        if total_diff.abs() > self.tolerance {
            warnings.push(ValidationWarning::TotalMismatch {
                computed,
                declared: total,
            });
        }

        Ok(warnings)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{Category, LineItem};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn items(prices: &[&str]) -> LineItems {
        prices
            .iter()
            .map(|p| LineItem {
                description: "Room Service".to_string(),
                category: Category::Service,
                price: dec(p),
            })
            .collect()
    }

    fn fields(pairs: &[(HeaderField, &str)]) -> HeaderFields {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_subtotal_matches() {
        let report = Validator::new().validate(
            &fields(&[(HeaderField::Subtotal, "125.50"), (HeaderField::Total, "125.50")]),
            &items(&["100.00", "25.50"]),
        );
        assert!(report.is_consistent());
    }

    #[test]
    fn test_subtotal_mismatch() {
        let report = Validator::new().validate(
            &fields(&[(HeaderField::Subtotal, "100.00"), (HeaderField::Total, "100.00")]),
            &items(&["100.00", "25.50"]),
        );

        let warnings = report.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "Subtotal mismatch: OCR 100.0 vs calculated 125.50"
        );
    }

    #[test]
    fn test_total_matches() {
        let report = Validator::new().validate(
            &fields(&[
                (HeaderField::Subtotal, "100.00"),
                (HeaderField::Tax, "10.00"),
                (HeaderField::Total, "110.00"),
            ]),
            &items(&["100.00"]),
        );
        assert_eq!(report.warnings(), Vec::new());
    }

    #[test]
    fn test_total_mismatch() {
        let report = Validator::new().validate(
            &fields(&[
                (HeaderField::Subtotal, "100.00"),
                (HeaderField::Tax, "10.00"),
                (HeaderField::Total, "120.00"),
            ]),
            &items(&["100.00"]),
        );

        let warnings = report.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0],
            ValidationWarning::TotalMismatch {
                computed: dec("110.00"),
                declared: dec("120.00"),
            }
        );
        assert_eq!(
            warnings[0].to_string(),
            "Total mismatch: subtotal+tax 110.00 vs total 120.0"
        );
    }

    #[test]
    fn test_both_mismatches_are_reported_separately() {
        let report = Validator::new().validate(
            &fields(&[(HeaderField::Subtotal, "1,000.00"), (HeaderField::Total, "900")]),
            &items(&["10.00"]),
        );

        let warnings = report.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], ValidationWarning::SubtotalMismatch { .. }));
        assert!(matches!(warnings[1], ValidationWarning::TotalMismatch { .. }));
    }

    #[test]
    fn test_tolerance_boundary() {
        let v = Validator::new();
        let within = v.validate(&fields(&[(HeaderField::Subtotal, "100.01")]), &items(&["100.00"]));
        assert!(!within
            .warnings()
            .iter()
            .any(|w| matches!(w, ValidationWarning::SubtotalMismatch { .. })));

        let outside = v.validate(&fields(&[(HeaderField::Subtotal, "100.02")]), &items(&["100.00"]));
        assert!(outside
            .warnings()
            .iter()
            .any(|w| matches!(w, ValidationWarning::SubtotalMismatch { .. })));
    }

    #[test]
    fn test_missing_and_unparsable_fields_read_as_zero() {
        let report = Validator::new().validate(
            &fields(&[(HeaderField::Subtotal, ","), (HeaderField::Tax, "abc")]),
            &LineItems::default(),
        );
        assert!(report.is_consistent());
    }

    #[test]
    fn test_empty_document() {
        let report = Validator::new().validate(&HeaderFields::new(), &LineItems::default());
        assert_eq!(report, ValidationReport::Completed { warnings: Vec::new() });
    }

    #[test]
    fn test_overflow_becomes_failed_report() {
        let huge = Decimal::MAX.to_string();
        let report = Validator::new().validate(
            &HeaderFields::new(),
            &items(&[huge.as_str(), huge.as_str()]),
        );

        assert_eq!(
            report.error(),
            Some(&ValidationError::Overflow("line item sum"))
        );
        let warnings = report.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "Validation error: arithmetic overflow while computing line item sum"
        );
    }

    #[test]
    fn test_custom_tolerance() {
        let report = Validator::new()
            .with_tolerance(dec("1.00"))
            .validate(
                &fields(&[(HeaderField::Subtotal, "99.50"), (HeaderField::Total, "100.00")]),
                &items(&["100.00"]),
            );
        assert!(report.is_consistent());
    }
}
