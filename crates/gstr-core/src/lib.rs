//! Core library for GST invoice processing.
//!
//! This crate provides:
//! - OCR text intake and an optional native OCR engine
//! - GST invoice field extraction (GSTIN, invoice date, total amount)
//! - GSTIN validation and CGST/SGST/IGST split calculation
//! - GSTR-1 filing record assembly and CSV export

pub mod error;
pub mod filing;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod tax;

pub use error::{GstrError, OcrError, Result, TaxError};
pub use invoice::{InvoiceExtractor, RuleBasedExtractor};
pub use models::config::GstrConfig;
pub use models::invoice::{ExtractedFields, FilingRecord, TaxBreakdown, TaxRegime, ValidationResult};
pub use ocr::{load_invoice_image, RawText, TextFragment};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pipeline::{Pipeline, ProcessedInvoice};
pub use tax::{validate, TaxCalculator};
