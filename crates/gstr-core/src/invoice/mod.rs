//! Invoice field extraction module.

mod extractor;
pub mod rules;

pub use extractor::{FieldMatches, RuleBasedExtractor};

use crate::models::invoice::ExtractedFields;
use crate::ocr::RawText;

/// Trait for invoice field extractors.
///
/// Extraction never fails: a field that cannot be located is `None`.
pub trait InvoiceExtractor {
    /// Extract invoice fields from OCR output.
    fn extract(&self, raw: &RawText) -> ExtractedFields;

    /// Extract invoice fields from plain text.
    fn extract_from_text(&self, text: &str) -> ExtractedFields {
        self.extract(&RawText::from_text(text))
    }
}
