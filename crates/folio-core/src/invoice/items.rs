//! Line item segmentation.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::classifier::LineClassifier;
use crate::models::invoice::{LineItem, LineItems};

use super::rules::{parse_amount, TRAILING_PRICE};

/// Splits raw text into priced line items.
///
/// A line is an item when it ends in a number: that trailing number is the
/// price, and the text before it (minus a trailing integer quantity column)
/// is the description. Numbers earlier in the line never become the price.
#[derive(Debug, Clone)]
pub struct LineItemParser {
    classifier: LineClassifier,
}

impl LineItemParser {
    pub fn new(classifier: LineClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Parse all items in order of appearance.
    pub fn parse(&self, text: &str) -> LineItems {
        let items: LineItems = text
            .lines()
            .filter_map(|line| self.parse_line(line))
            .collect();

        debug!("Parsed {} line items", items.len());
        items
    }

    /// Parse a single line, or `None` when it is not an item.
    pub fn parse_line(&self, line: &str) -> Option<LineItem> {
        let (description, price) = split_priced_line(line)?;
        let category = self.classifier.classify(&description);

        Some(LineItem {
            description,
            category,
            price,
        })
    }
}

/// Split a line into its description and trailing price.
///
/// Returns `None` for blank lines, lines without a trailing number, numbers
/// that do not parse, and lines with nothing left to describe the charge.
pub fn split_priced_line(line: &str) -> Option<(String, Decimal)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let token = TRAILING_PRICE.find(line)?;
    let Some(price) = parse_amount(token.as_str()) else {
        trace!("Skipping line with malformed price {:?}", token.as_str());
        return None;
    };

    let mut parts: Vec<&str> = line[..token.start()].split_whitespace().collect();
    if parts.last().is_some_and(|p| is_quantity(p)) {
        parts.pop();
    }

    if parts.is_empty() {
        trace!("Skipping price without description: {:?}", line);
        return None;
    }

    Some((parts.join(" "), price))
}

/// A bare unsigned integer, read as a quantity column.
fn is_quantity(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::Category;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn parser() -> LineItemParser {
        LineItemParser::new(LineClassifier::with_defaults().unwrap())
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_quantity_column_is_dropped() {
        let items = parser().parse("Room Service 2 100.00");

        assert_eq!(items.len(), 1);
        let item = &items.as_slice()[0];
        assert_eq!(item.description, "Room Service");
        assert_eq!(item.price, dec("100.00"));
        assert_eq!(item.category, Category::Service);
    }

    #[test]
    fn test_simple_item() {
        let items = parser().parse("Mini Bar 25.50");

        assert_eq!(items.len(), 1);
        let item = &items.as_slice()[0];
        assert_eq!(item.description, "Mini Bar");
        assert_eq!(item.price, dec("25.50"));
        assert_eq!(item.category, Category::Minibar);
    }

    #[test]
    fn test_line_without_price() {
        assert!(parser().parse("Thank you for staying with us").is_empty());
    }

    #[test]
    fn test_items_keep_input_order() {
        let text = "\n  Laundry 3 45.00\nThank you\nMini Bar 25.50\n\nRoom Service 2 100.00\nLaundry 3 45.00\n";
        let items = parser().parse(text);

        let descriptions: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["Laundry", "Mini Bar", "Room Service", "Laundry"]
        );
        assert_eq!(items.total(), Some(dec("215.50")));
    }

    #[test]
    fn test_thousands_separator() {
        let (description, price) = split_priced_line("Suite upgrade 1,250.00").unwrap();
        assert_eq!(description, "Suite upgrade");
        assert_eq!(price, dec("1250.00"));
    }

    #[test]
    fn test_only_last_integer_is_a_quantity() {
        let (description, price) = split_priced_line("Room 101 2 3 80").unwrap();
        assert_eq!(description, "Room 101 2");
        assert_eq!(price, dec("80"));

        let (description, _) = split_priced_line("Item 12.5 9.99").unwrap();
        assert_eq!(description, "Item 12.5");
    }

    #[test]
    fn test_price_without_description() {
        assert_eq!(split_priced_line("100.00"), None);
        assert_eq!(split_priced_line("2 100.00"), None);
        assert_eq!(split_priced_line("   "), None);
    }

    #[test]
    fn test_malformed_price_is_skipped() {
        assert_eq!(split_priced_line("Dear guest,"), None);
    }

    #[test]
    fn test_number_glued_to_text() {
        let (description, price) = split_priced_line("Voucher ABC123").unwrap();
        assert_eq!(description, "Voucher ABC");
        assert_eq!(price, dec("123"));
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let text = "Room Service 2 100.00\nMini Bar 25.50\nFood & Beverage 1 12.00";
        let p = parser();
        assert_eq!(p.parse(text), p.parse(text));
    }

    #[test]
    fn test_empty_text() {
        assert!(parser().parse("").is_empty());
    }
}
