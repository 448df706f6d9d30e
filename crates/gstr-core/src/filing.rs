//! GSTR-1 filing record assembly and CSV export.

use crate::error::Result;
use crate::models::invoice::{ExtractedFields, FilingRecord, TaxBreakdown, ValidationResult};

/// Placeholder for a field the extractor could not locate.
pub const NOT_FOUND: &str = "Not Found";

/// Placeholder place of supply when the GSTIN is missing or malformed.
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Reverse charge flag. Reverse-charge supplies are not detected.
pub const REVERSE_CHARGE: &str = "N";

/// Invoice type. Credit and debit notes are not distinguished.
pub const INVOICE_TYPE: &str = "Regular";

/// CSV header in GSTR-1 column order.
pub const CSV_HEADER: [&str; 6] = [
    "GSTIN/UIN of Recipient",
    "Invoice Date",
    "Invoice Value",
    "Place of Supply",
    "Reverse Charge",
    "Invoice Type",
];

/// Build the GSTR-1 row for one invoice.
///
/// Never fails: missing upstream values become placeholders. The invoice
/// value is the tax-inclusive total; when a breakdown is available its
/// reconciled gross is used, which equals the extracted total to the paisa.
pub fn build(
    extracted: &ExtractedFields,
    validation: &ValidationResult,
    breakdown: Option<&TaxBreakdown>,
) -> FilingRecord {
    let invoice_value = breakdown
        .map(TaxBreakdown::gross)
        .or(extracted.total_amount)
        .map(|value| format!("{:.2}", value))
        .unwrap_or_else(|| NOT_FOUND.to_string());

    FilingRecord {
        recipient_gstin: extracted
            .tax_id
            .clone()
            .unwrap_or_else(|| NOT_FOUND.to_string()),
        invoice_date: extracted
            .invoice_date_string()
            .unwrap_or_else(|| NOT_FOUND.to_string()),
        invoice_value,
        place_of_supply: validation
            .jurisdiction_code
            .clone()
            .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        reverse_charge: REVERSE_CHARGE.to_string(),
        invoice_type: INVOICE_TYPE.to_string(),
    }
}

impl FilingRecord {
    /// Serialize as a single-row CSV with the GSTR-1 header.
    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(self)?;
        wtr.flush()?;

        let data = wtr
            .into_inner()
            .map_err(|e| crate::error::GstrError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    /// Download file name, `GSTR-1_<gstin>_<date>.csv`.
    pub fn file_name(&self) -> String {
        let gstin = if self.recipient_gstin == NOT_FOUND {
            "invoice"
        } else {
            &self.recipient_gstin
        };
        let date = if self.invoice_date == NOT_FOUND {
            "date"
        } else {
            &self.invoice_date
        };
        format!("GSTR-1_{}_{}.csv", gstin, date)
    }

    /// Check whether every extracted column was found.
    pub fn is_complete(&self) -> bool {
        self.recipient_gstin != NOT_FOUND
            && self.invoice_date != NOT_FOUND
            && self.invoice_value != NOT_FOUND
            && self.place_of_supply != UNKNOWN_PLACE
    }
}
