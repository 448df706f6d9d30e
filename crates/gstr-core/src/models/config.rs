//! Configuration structures for the GST pipeline.

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{GstrError, Result};

/// Main configuration for the gstr pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GstrConfig {
    /// Tax rate and regime configuration.
    pub tax: TaxConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// External OCR engine configuration.
    pub ocr: OcrConfig,
}

/// Tax calculation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Standard GST rate as a fraction (0.18 = 18%).
    pub standard_rate: Decimal,

    /// State code of the seller. A recipient in this state is taxed
    /// intra-state (CGST + SGST), everyone else inter-state (IGST).
    pub intra_state_code: String,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            standard_rate: Decimal::new(18, 2),
            intra_state_code: "37".to_string(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Try to repair common OCR confusions (O/0, I/1, S/5, ...) in GSTINs
    /// when no strict match is found.
    pub ocr_correction: bool,

    /// Amounts at or below this value are not considered invoice totals.
    pub min_amount: Decimal,

    /// OCR fragments with a lower confidence are dropped before extraction.
    pub min_fragment_confidence: f32,

    /// Maximum number of characters between a date label and its value.
    pub label_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_correction: true,
            min_amount: Decimal::TEN,
            min_fragment_confidence: 0.0,
            label_window: 40,
        }
    }
}

/// External OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers emitted by the recognizer.
    pub keep_unk: bool,

    /// Upper bound for a single OCR run, in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            timeout_secs: 60,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }

    /// Check whether detection and recognition models are present.
    pub fn models_present(&self) -> bool {
        self.model_path(&self.detection_model).exists()
            && self.model_path(&self.recognition_model).exists()
    }
}

impl GstrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde cannot constrain.
    pub fn validate(&self) -> Result<()> {
        let rate = self.tax.standard_rate;
        if rate.is_sign_negative() || rate > Decimal::ONE {
            return Err(GstrError::Config(format!(
                "tax.standard_rate must be between 0 and 1, got {}",
                rate
            )));
        }

        let code = &self.tax.intra_state_code;
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(GstrError::Config(format!(
                "tax.intra_state_code must be two digits, got {:?}",
                code
            )));
        }

        if self.extraction.min_amount.is_sign_negative() {
            return Err(GstrError::Config(
                "extraction.min_amount must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

impl FromStr for GstrConfig {
    type Err = GstrError;

    fn from_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
