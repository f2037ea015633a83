//! End-to-end tests over realistic hotel invoice transcripts.

use std::str::FromStr;

use folio_core::{
    Category, ClassifierConfig, FolioConfig, HeaderField, InvoicePipeline, TrainingExample,
    TranscriptFile, ValidationWarning,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

const FOLIO: &str = r#"
SEASIDE RESORT & SPA
Tax Registered No: 300045678
Invoice No: 10482
Date: 05/11/2024

Description              Qty    Amount
Room Service - Breakfast   2    60.00
Mini Bar - Soda            3    15.00
Laundry Service                 22.50
Food & Beverage            1    1,025.00

Thank you for staying with us
"#;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_folio_items_and_categories() {
    let pipeline = InvoicePipeline::with_defaults().unwrap();
    let result = pipeline.process(FOLIO);

    let items: Vec<(&str, Category, Decimal)> = result
        .items
        .iter()
        .map(|i| (i.description.as_str(), i.category, i.price))
        .collect();

    assert_eq!(
        items,
        vec![
            ("Tax Registered No:", Category::Food, dec("300045678")),
            ("Invoice No:", Category::Food, dec("10482")),
            ("Date: 05/11/", Category::Food, dec("2024")),
            ("Room Service - Breakfast", Category::Service, dec("60.00")),
            ("Mini Bar - Soda", Category::Minibar, dec("15.00")),
            ("Laundry Service", Category::Laundry, dec("22.50")),
            ("Food & Beverage", Category::Food, dec("1025.00")),
        ]
    );
}

#[test]
fn test_folio_header_fields() {
    let pipeline = InvoicePipeline::with_defaults().unwrap();
    let result = pipeline.process(FOLIO);

    assert_eq!(result.fields.get(HeaderField::InvoiceNo), Some("10482"));
    assert_eq!(result.fields.get(HeaderField::Date), Some("05/11/2024"));
    assert_eq!(result.fields.get(HeaderField::TaxReg), Some("300045678"));
    assert_eq!(result.fields.get(HeaderField::Subtotal), None);
    assert_eq!(result.fields.missing().len(), 3);
}

#[test]
fn test_consistent_totals_section() {
    let text = "\
Room Service 2 100.00
Mini Bar 25.50
";
    let pipeline = InvoicePipeline::with_defaults().unwrap();

    let mut result = pipeline.process(text);
    assert_eq!(result.items.total(), Some(dec("125.50")));
    assert!(!result.is_consistent());

    // Declared amounts on the same transcript, checked with the pipeline's validator.
    result.fields.insert(HeaderField::Subtotal, "125.50");
    result.fields.insert(HeaderField::Tax, "12.55");
    result.fields.insert(HeaderField::Total, "138.05");
    let report = pipeline.validator().validate(&result.fields, &result.items);
    assert!(report.is_consistent());
}

#[test]
fn test_mismatches_name_both_values() {
    let text = "\
Room Service 2 100.00
Mini Bar 25.50
";
    let pipeline = InvoicePipeline::with_defaults().unwrap();
    let mut result = pipeline.process(text);

    result.fields.insert(HeaderField::Subtotal, "100.00");
    result.fields.insert(HeaderField::Tax, "10.00");
    result.fields.insert(HeaderField::Total, "120.00");

    let warnings: Vec<String> = pipeline
        .validator()
        .validate(&result.fields, &result.items)
        .warnings()
        .iter()
        .map(ValidationWarning::to_string)
        .collect();

    assert_eq!(
        warnings,
        vec![
            "Subtotal mismatch: OCR 100.0 vs calculated 125.50".to_string(),
            "Total mismatch: subtotal+tax 110.00 vs total 120.0".to_string(),
        ]
    );
}

#[test]
fn test_processing_is_idempotent() {
    let pipeline = InvoicePipeline::with_defaults().unwrap();
    let first = pipeline.process(FOLIO);
    let second = pipeline.process(FOLIO);

    assert_eq!(first.fields, second.fields);
    assert_eq!(first.items, second.items);
    assert_eq!(first.report, second.report);
}

#[test]
fn test_independent_pipelines_agree() {
    let a = InvoicePipeline::with_defaults().unwrap();
    let b = InvoicePipeline::with_defaults().unwrap();

    assert_eq!(a.process(FOLIO).items, b.process(FOLIO).items);
}

#[test]
fn test_custom_configuration() {
    let mut config = FolioConfig::default();
    config.extraction.tolerance = dec("5");
    config.classifier = ClassifierConfig {
        examples: vec![
            TrainingExample::new("Spa treatment", Category::Service),
            TrainingExample::new("Dinner buffet", Category::Food),
        ],
        ..ClassifierConfig::default()
    };

    let pipeline = InvoicePipeline::new(&config).unwrap();
    let result = pipeline.process("Dinner buffet 2 80.00\nSub Total 83.00");

    assert_eq!(result.items.as_slice()[0].category, Category::Food);
    assert_eq!(pipeline.validator().tolerance(), dec("5"));
}

#[test]
fn test_transcript_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.txt");
    std::fs::write(&path, FOLIO).unwrap();

    let pipeline = InvoicePipeline::with_defaults().unwrap();
    let from_file = pipeline.process_source(&TranscriptFile::new(&path));
    let missing = pipeline.process_source(&TranscriptFile::new(dir.path().join("nope.txt")));

    assert_eq!(from_file.items, pipeline.process(FOLIO).items);
    assert!(missing.items.is_empty());
    assert!(missing.warnings().is_empty());
}
