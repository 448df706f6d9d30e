//! Common regex patterns for GST invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // GSTIN: state code, PAN (5 letters, 4 digits, 1 letter), entity code, 'Z', check character
    pub static ref GSTIN_PATTERN: Regex = Regex::new(
        r"(?i)(\d{2}[A-Z]{5}\d{4}[A-Z][A-Z\d]Z[A-Z\d])"
    ).unwrap();

    pub static ref GSTIN_EXACT: Regex = Regex::new(
        r"^\d{2}[A-Z]{5}\d{4}[A-Z][A-Z\d]Z[A-Z\d]$"
    ).unwrap();

    // GSTIN labels, including common OCR misreads (G5TIN, GST1N)
    pub static ref GSTIN_LABEL: Regex = Regex::new(
        r"(?i)\b(?:G[S5]T[I1]N|GST\s*(?:NO|NUMBER)|UIN)\b"
    ).unwrap();

    // Dates: 01/06/2024, 01-06-2024, 01.06.24
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    // ISO dates: 2024-06-01
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})\b"
    ).unwrap();

    // 12-JAN-2025, 12 Jan 2025, 12/January/25
    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(\d{1,2})[\s./\-]*(JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)[A-Z]*[\s./,\-]*(\d{4}|\d{2})\b"
    ).unwrap();

    // Labels that name the invoice date specifically
    pub static ref INVOICE_DATE_LABEL: Regex = Regex::new(
        r"(?i)\b(?:invoice\s*date|inv\.?\s*date|bill\s*date|date\s+of\s+invoice)\b"
    ).unwrap();

    // Any date label
    pub static ref DATE_LABEL: Regex = Regex::new(
        r"(?i)\b(?:date|dt)\b"
    ).unwrap();

    // Amounts with two fraction digits, comma thousands separators (1,18,000.00 or 1,180.00)
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(\d[\d,]*\.\d{2})\b"
    ).unwrap();

    pub static ref AMOUNT_WITH_CURRENCY: Regex = Regex::new(
        r"(?i)(?:₹|\bRs\.?|\bINR)\s*(\d[\d,]*\.\d{2})\b"
    ).unwrap();

    // Totals: label, up to 30 characters of noise (": ₹", "(incl. tax)"), then the amount
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?is)\b(?:grand\s*total|net\s*payable|total|amount)\b.{0,30}?(\d[\d,]*\.\d{2})\b"
    ).unwrap();
}
