//! Rule-based extractor combining the per-field matchers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::invoice::ExtractedFields;
use crate::ocr::RawText;

use super::rules::{
    amounts::extract_total_amount, dates::extract_invoice_date, ExtractionMatch, FieldExtractor,
    GstinExtractor,
};
use super::InvoiceExtractor;

/// Winning candidate per field, with confidence and source text.
#[derive(Debug, Clone, Default)]
pub struct FieldMatches {
    pub tax_id: Option<ExtractionMatch<String>>,
    pub invoice_date: Option<ExtractionMatch<NaiveDate>>,
    pub total_amount: Option<ExtractionMatch<Decimal>>,
}

impl FieldMatches {
    /// Drop the match details, keeping only the values.
    pub fn into_fields(self) -> ExtractedFields {
        ExtractedFields {
            tax_id: self.tax_id.map(|m| m.value),
            invoice_date: self.invoice_date.map(|m| m.value),
            total_amount: self.total_amount.map(|m| m.value),
        }
    }
}

/// Extractor for GSTIN, invoice date and total.
pub struct RuleBasedExtractor {
    /// Repair OCR confusions in GSTINs.
    ocr_correction: bool,
    /// Amounts at or below this are ignored.
    min_amount: Decimal,
    /// Fragments below this confidence are dropped.
    min_fragment_confidence: f32,
    /// Maximum distance between a date label and its value.
    label_window: usize,
}

impl RuleBasedExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            ocr_correction: config.ocr_correction,
            min_amount: config.min_amount,
            min_fragment_confidence: config.min_fragment_confidence,
            label_window: config.label_window,
        }
    }

    /// Set GSTIN OCR correction.
    pub fn with_ocr_correction(mut self, correct: bool) -> Self {
        self.ocr_correction = correct;
        self
    }

    /// Set the minimum amount considered an invoice total.
    pub fn with_min_amount(mut self, min_amount: Decimal) -> Self {
        self.min_amount = min_amount;
        self
    }

    /// Run every field matcher and keep the winning candidates.
    pub fn extract_matches(&self, raw: &RawText) -> FieldMatches {
        let text = raw.filter_confidence(self.min_fragment_confidence).text();

        let matches = FieldMatches {
            tax_id: GstinExtractor::new()
                .with_ocr_correction(self.ocr_correction)
                .extract(&text),
            invoice_date: extract_invoice_date(&text, self.label_window),
            total_amount: extract_total_amount(&text, self.min_amount),
        };

        debug!(
            "Extracted from {} chars: tax_id={:?} date={:?} total={:?}",
            text.len(),
            matches.tax_id.as_ref().map(|m| (&m.value, m.confidence)),
            matches.invoice_date.as_ref().map(|m| (m.value, m.confidence)),
            matches.total_amount.as_ref().map(|m| (m.value, m.confidence)),
        );

        matches
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for RuleBasedExtractor {
    fn extract(&self, raw: &RawText) -> ExtractedFields {
        self.extract_matches(raw).into_fields()
    }
}
