//! Error types for the gstr-core library.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the gstr library.
#[derive(Error, Debug)]
pub enum GstrError {
    /// Tax calculation rejected its input.
    #[error("tax calculation error: {0}")]
    Tax(#[from] TaxError),

    /// OCR adapter error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Failed to write the GSTR-1 CSV row.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Input errors raised by the tax calculator.
///
/// A missing or non-positive amount makes the tax split meaningless, so the
/// calculation step refuses to produce a breakdown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxError {
    /// No total amount was extracted from the invoice.
    #[error("total amount is missing")]
    MissingAmount,

    /// The total amount is zero or negative.
    #[error("total amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

/// Errors related to the external OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Uploaded file is not a JPEG or PNG image.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// The crate was built without an OCR engine.
    #[error("OCR engine not available: {0}")]
    Unavailable(String),
}

/// Result type for the gstr library.
pub type Result<T> = std::result::Result<T, GstrError>;
