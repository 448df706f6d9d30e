//! End-to-end processing: OCR text -> fields -> validation -> tax split -> GSTR-1 row.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::filing;
use crate::invoice::RuleBasedExtractor;
use crate::models::config::GstrConfig;
use crate::models::invoice::{
    ExtractedFields, FilingRecord, TaxBreakdown, TaxRegime, ValidationResult,
};
use crate::models::state::state_name;
use crate::ocr::RawText;
use crate::tax::{self, TaxCalculator};

/// Everything produced for one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedInvoice {
    /// OCR text the fields were extracted from.
    pub raw_text: String,

    /// Extracted fields.
    pub extracted: ExtractedFields,

    /// GSTIN validation result.
    pub validation: ValidationResult,

    /// State or union territory of the recipient, when the code is known.
    pub state: Option<String>,

    /// Regime the tax was split under.
    pub regime: TaxRegime,

    /// Tax split, absent when the calculation rejected its input.
    pub breakdown: Option<TaxBreakdown>,

    /// Why the tax split could not be computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_error: Option<String>,

    /// GSTR-1 row.
    pub filing_record: FilingRecord,

    /// Issues the user should review before filing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ProcessedInvoice {
    /// Whether the invoice can be filed without manual correction.
    pub fn is_fileable(&self) -> bool {
        self.validation.is_valid && self.breakdown.is_some() && self.filing_record.is_complete()
    }
}

/// Runs extraction, validation, calculation and record building in order.
pub struct Pipeline {
    extractor: RuleBasedExtractor,
    calculator: TaxCalculator,
}

impl Pipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &GstrConfig) -> Self {
        Self {
            extractor: RuleBasedExtractor::from_config(&config.extraction),
            calculator: TaxCalculator::new(config.tax.clone()),
        }
    }

    /// Process OCR output for one invoice.
    ///
    /// Never fails. A calculation error is recorded on the result and the
    /// filing record is still built from whatever was extracted.
    pub fn process(&self, raw: &RawText) -> ProcessedInvoice {
        let mut warnings = Vec::new();

        let matches = self.extractor.extract_matches(raw);
        let extracted = matches.into_fields();
        for field in extracted.missing_fields() {
            warnings.push(format!("Could not extract {}", field.replace('_', " ")));
        }

        let validation = tax::validate(extracted.tax_id.as_deref());
        if extracted.tax_id.is_some() && !validation.is_valid {
            warnings.push("GSTIN is malformed".to_string());
        }

        let jurisdiction = validation.jurisdiction_code.as_deref();
        let state = jurisdiction.and_then(state_name).map(str::to_string);
        if let (Some(code), None) = (jurisdiction, &state) {
            warnings.push(format!("Unknown state code {}", code));
        }

        let regime = self.calculator.regime(jurisdiction);
        let (breakdown, calculation_error) =
            match self.calculator.compute(extracted.total_amount, jurisdiction) {
                Ok(breakdown) => (Some(breakdown), None),
                Err(e) => {
                    warn!("Tax calculation failed: {}", e);
                    warnings.push(format!("Tax calculation failed: {}", e));
                    (None, Some(e.to_string()))
                }
            };

        let filing_record = filing::build(&extracted, &validation, breakdown.as_ref());

        info!(
            "Processed invoice: gstin valid={} place_of_supply={} value={} ({} warnings)",
            validation.is_valid,
            filing_record.place_of_supply,
            filing_record.invoice_value,
            warnings.len()
        );

        ProcessedInvoice {
            raw_text: raw.text(),
            extracted,
            validation,
            state,
            regime,
            breakdown,
            calculation_error,
            filing_record,
            warnings,
        }
    }

    /// Process one block of text.
    pub fn process_text(&self, text: &str) -> ProcessedInvoice {
        self.process(&RawText::from_text(text))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&GstrConfig::default())
    }
}
