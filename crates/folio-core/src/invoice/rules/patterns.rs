//! Common regex patterns for hotel invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Header labels. `[:\s]*` lets the value sit after a colon or on the next line.
    pub static ref INVOICE_NO: Regex = Regex::new(
        r"(?im)Invoice\s+No[:\s]*\s*(\d+)"
    ).unwrap();

    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"(?im)Date[:\s]*\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})"
    ).unwrap();

    pub static ref TAX_REG: Regex = Regex::new(
        r"(?im)Tax\s+Registered\s*No[:\s]*\s*(\d+)"
    ).unwrap();

    // Amounts: digits with optional thousands commas and up to two decimals
    pub static ref SUBTOTAL: Regex = Regex::new(
        r"(?im)Sub\s*[Tt]otal[:\s]*\s*([\d,]+\.?\d{0,2})"
    ).unwrap();

    pub static ref TAX_AMOUNT: Regex = Regex::new(
        r"(?im)(?:GST|Tax)[:\s]*\s*([\d,]+\.?\d{0,2})"
    ).unwrap();

    pub static ref GRAND_TOTAL: Regex = Regex::new(
        r"(?im)(?:Grand\s+)?Total[:\s]*\s*([\d,]+\.?\d{0,2})"
    ).unwrap();

    // Price at the very end of a trimmed line
    pub static ref TRAILING_PRICE: Regex = Regex::new(
        r"([\d,]+\.?\d{0,2})$"
    ).unwrap();

    // Day/month/year with `/` or `-`
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})$"
    ).unwrap();

    // Classifier tokens: two or more word characters
    pub static ref WORD_TOKEN: Regex = Regex::new(
        r"\b\w\w+\b"
    ).unwrap();
}
