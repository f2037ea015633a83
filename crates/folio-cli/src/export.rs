//! Rendering and on-disk export of extraction results.

use std::fs;
use std::path::Path;

use folio_core::models::config::OutputFormat;
use folio_core::{ExtractionResult, HeaderField, LineItem};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};

/// File holding the header fields of one document.
pub const SUMMARY_FILE: &str = "summary.json";

/// File holding the line items of one document.
pub const LINE_ITEMS_FILE: &str = "line_items.csv";

/// Spreadsheet copy of [`LINE_ITEMS_FILE`].
pub const LINE_ITEMS_XLSX_FILE: &str = "line_items.xlsx";

const LINE_ITEM_COLUMNS: [&str; 3] = ["description", "category", "price"];

/// Render a result in the requested format.
pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => line_items_csv(result.items.as_slice()),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// Line items as CSV with a header row.
pub fn line_items_csv(items: &[LineItem]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(LINE_ITEM_COLUMNS)?;
    for item in items {
        let price = item.price.to_string();
        wtr.write_record([
            item.description.as_str(),
            item.category.as_str(),
            price.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Write line items to an Excel workbook with a header row.
///
/// Prices are numeric cells so the sheet can sum them.
pub fn write_line_items_xlsx(path: &Path, items: &[LineItem]) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Line items")?;

    let header_format = Format::new().set_bold();
    let price_format = Format::new()
        .set_num_format("#,##0.00")
        .set_align(FormatAlign::Right);

    for (col, header) in LINE_ITEM_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, item) in items.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, item.description.as_str())?;
        worksheet.write_string(row, 1, item.category.as_str())?;
        match item.price.to_f64() {
            Some(price) => worksheet.write_number_with_format(row, 2, price, &price_format)?,
            None => worksheet.write_string(row, 2, item.price.to_string())?,
        };
    }

    worksheet.set_freeze_panes(1, 0)?;
    workbook.save(path)?;
    Ok(())
}

/// Write `summary.json`, `line_items.csv` and `line_items.xlsx` for one
/// document into `dir`.
pub fn write_export(dir: &Path, result: &ExtractionResult) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;

    let summary = serde_json::to_string_pretty(&result.fields)?;
    fs::write(dir.join(SUMMARY_FILE), summary)?;
    fs::write(dir.join(LINE_ITEMS_FILE), line_items_csv(result.items.as_slice())?)?;
    write_line_items_xlsx(&dir.join(LINE_ITEMS_XLSX_FILE), result.items.as_slice())?;

    Ok(())
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    for field in HeaderField::ALL {
        let label = match field {
            HeaderField::InvoiceNo => "Invoice No",
            HeaderField::Date => "Date",
            HeaderField::TaxReg => "Tax Registered No",
            HeaderField::Subtotal => "Sub Total",
            HeaderField::Tax => "Tax",
            HeaderField::Total => "Total",
        };
        let value = result.fields.get(field).unwrap_or("-");
        output.push_str(&format!("{:<18} {}\n", format!("{}:", label), value));
    }

    if let Some(date) = result.fields.issue_date() {
        output.push_str(&format!("{:<18} {}\n", "Issue date:", date));
    }

    output.push('\n');
    output.push_str(&format!("Line items ({}):\n", result.items.len()));
    for item in &result.items {
        output.push_str(&format!(
            "  {:<40} {:<8} {:>10}\n",
            item.description, item.category, item.price
        ));
    }

    if let Some(total) = result.items.total() {
        output.push_str(&format!("\nCalculated subtotal: {:.2}\n", total));
    }

    let warnings = result.warnings();
    if warnings.is_empty() {
        output.push_str("Validation passed\n");
    } else {
        output.push_str("Validation warnings:\n");
        for warning in warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
