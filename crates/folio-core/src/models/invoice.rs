//! Invoice data models: header fields, line items, and validation warnings.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::invoice::rules::{amounts::parse_amount, dates::parse_dmy_date};

/// Document-level fields recovered by the field extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    /// Invoice number.
    InvoiceNo,
    /// Invoice date, D/M/Y as printed.
    Date,
    /// Tax registration number of the issuer.
    TaxReg,
    /// Declared subtotal.
    Subtotal,
    /// Declared tax (GST) amount.
    Tax,
    /// Declared grand total.
    Total,
}

impl HeaderField {
    /// Every header field, in extraction order.
    pub const ALL: [HeaderField; 6] = [
        HeaderField::InvoiceNo,
        HeaderField::Date,
        HeaderField::TaxReg,
        HeaderField::Subtotal,
        HeaderField::Tax,
        HeaderField::Total,
    ];

    /// Key used in serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            HeaderField::InvoiceNo => "invoice_no",
            HeaderField::Date => "date",
            HeaderField::TaxReg => "tax_reg",
            HeaderField::Subtotal => "subtotal",
            HeaderField::Tax => "tax",
            HeaderField::Total => "total",
        }
    }

    /// Whether the field holds a monetary amount.
    pub fn is_amount(&self) -> bool {
        matches!(self, HeaderField::Subtotal | HeaderField::Tax | HeaderField::Total)
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Header fields keyed by [`HeaderField`].
///
/// A key is present only when its rule matched. Values keep the text exactly as
/// captured (thousands separators included); use [`HeaderFields::amount`] for
/// the numeric reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderFields(BTreeMap<HeaderField, String>);

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a captured value, replacing any earlier one.
    pub fn insert(&mut self, field: HeaderField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    /// Raw captured value for a field.
    pub fn get(&self, field: HeaderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: HeaderField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HeaderField, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Numeric reading of a field, with thousands separators removed.
    ///
    /// Returns `None` when the field is absent or does not parse.
    pub fn amount(&self, field: HeaderField) -> Option<Decimal> {
        self.get(field).and_then(parse_amount)
    }

    /// The `date` field read as day/month/year.
    pub fn issue_date(&self) -> Option<NaiveDate> {
        self.get(HeaderField::Date).and_then(parse_dmy_date)
    }

    /// Fields that were not found in the text.
    pub fn missing(&self) -> Vec<HeaderField> {
        HeaderField::ALL
            .into_iter()
            .filter(|f| !self.contains(*f))
            .collect()
    }
}

impl FromIterator<(HeaderField, String)> for HeaderFields {
    fn from_iter<I: IntoIterator<Item = (HeaderField, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Category assigned to a line item by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Room service and other hotel services.
    Service,
    /// Mini bar consumption.
    Minibar,
    /// Laundry.
    Laundry,
    /// Food and beverage.
    Food,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Service,
        Category::Minibar,
        Category::Laundry,
        Category::Food,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Service => "service",
            Category::Minibar => "minibar",
            Category::Laundry => "laundry",
            Category::Food => "food",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "service" => Ok(Category::Service),
            "minibar" => Ok(Category::Minibar),
            "laundry" => Ok(Category::Laundry),
            "food" => Ok(Category::Food),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// A single billed charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Charge description, never empty.
    pub description: String,

    /// Category predicted from the description.
    pub category: Category,

    /// Price taken from the trailing number of the line.
    pub price: Decimal,
}

/// Line items in order of appearance.
///
/// The sequence cannot be modified once built; consumers only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItems(Vec<LineItem>);

impl LineItems {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[LineItem] {
        &self.0
    }

    /// Sum of all prices, or `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        self.0
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.price))
    }
}

impl From<Vec<LineItem>> for LineItems {
    fn from(items: Vec<LineItem>) -> Self {
        Self(items)
    }
}

impl FromIterator<LineItem> for LineItems {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LineItems {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One inconsistency found by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Sum of line items disagrees with the declared subtotal.
    SubtotalMismatch { declared: Decimal, calculated: Decimal },

    /// Declared subtotal plus tax disagrees with the declared total.
    TotalMismatch { computed: Decimal, declared: Decimal },

    /// Validation itself failed; carries the failure description.
    Internal(String),
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::SubtotalMismatch { declared, calculated } => write!(
                f,
                "Subtotal mismatch: OCR {} vs calculated {:.2}",
                display_declared(*declared),
                calculated
            ),
            ValidationWarning::TotalMismatch { computed, declared } => write!(
                f,
                "Total mismatch: subtotal+tax {:.2} vs total {}",
                computed,
                display_declared(*declared)
            ),
            ValidationWarning::Internal(reason) => write!(f, "Validation error: {}", reason),
        }
    }
}

impl Serialize for ValidationWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Shortest rendering of a declared amount, keeping at least one fractional
/// digit (`100.00` becomes `100.0`, `125.50` becomes `125.5`).
fn display_declared(value: Decimal) -> String {
    let value = value.normalize();
    if value.scale() == 0 {
        format!("{}.0", value)
    } else {
        value.to_string()
    }
}
