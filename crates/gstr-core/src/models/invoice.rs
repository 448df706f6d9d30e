//! Invoice data models for GST extraction and GSTR-1 filing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical output format for invoice dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields pulled out of raw OCR text.
///
/// Every field is independently optional: `None` means the extractor could
/// not locate the value, never that the value is zero or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Recipient GSTIN, uppercase.
    pub tax_id: Option<String>,

    /// Invoice date.
    pub invoice_date: Option<NaiveDate>,

    /// Invoice total including tax.
    pub total_amount: Option<Decimal>,
}

impl ExtractedFields {
    /// Invoice date in the canonical `YYYY-MM-DD` form.
    pub fn invoice_date_string(&self) -> Option<String> {
        self.invoice_date
            .map(|d| d.format(DATE_FORMAT).to_string())
    }

    /// Names of the fields that could not be extracted.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.tax_id.is_none() {
            missing.push("tax_id");
        }
        if self.invoice_date.is_none() {
            missing.push("invoice_date");
        }
        if self.total_amount.is_none() {
            missing.push("total_amount");
        }
        missing
    }
}

/// Structural validation of a GSTIN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the GSTIN is well-formed.
    pub is_valid: bool,

    /// Two-digit state code embedded in a well-formed GSTIN.
    pub jurisdiction_code: Option<String>,
}

impl ValidationResult {
    /// Result for an absent or malformed GSTIN.
    pub fn invalid() -> Self {
        Self::default()
    }
}

/// Which GST components apply to an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Supplier and recipient in the same state: CGST + SGST.
    IntraState,
    /// Different states: IGST.
    InterState,
}

/// Tax split of an invoice total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Value before tax.
    pub taxable_value: Decimal,

    /// Central GST (intra-state only).
    pub cgst: Decimal,

    /// State GST (intra-state only).
    pub sgst: Decimal,

    /// Integrated GST (inter-state only).
    pub igst: Decimal,

    /// Sum of the tax components.
    pub total_tax: Decimal,
}

impl TaxBreakdown {
    /// Gross invoice value, `taxable_value + total_tax`.
    pub fn gross(&self) -> Decimal {
        self.taxable_value + self.total_tax
    }

    /// Regime implied by the components.
    pub fn regime(&self) -> TaxRegime {
        if self.igst.is_zero() && !self.total_tax.is_zero() {
            TaxRegime::IntraState
        } else {
            TaxRegime::InterState
        }
    }
}

/// One GSTR-1 row.
///
/// Field names double as the CSV header, in filing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRecord {
    #[serde(rename = "GSTIN/UIN of Recipient")]
    pub recipient_gstin: String,

    #[serde(rename = "Invoice Date")]
    pub invoice_date: String,

    #[serde(rename = "Invoice Value")]
    pub invoice_value: String,

    #[serde(rename = "Place of Supply")]
    pub place_of_supply: String,

    #[serde(rename = "Reverse Charge")]
    pub reverse_charge: String,

    #[serde(rename = "Invoice Type")]
    pub invoice_type: String,
}
