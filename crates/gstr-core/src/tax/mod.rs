//! GSTIN validation and GST split calculation.

mod calculator;
mod validator;

pub use calculator::{round_currency, TaxCalculator};
pub use validator::{validate, validate_gstin};
