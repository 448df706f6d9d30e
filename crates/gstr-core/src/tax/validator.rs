//! GSTIN structural validation.

use crate::invoice::rules::patterns::GSTIN_EXACT;
use crate::models::invoice::ValidationResult;

/// Validate a GSTIN and derive its jurisdiction code.
///
/// Only the structure is checked (15 characters: state code, PAN, entity
/// code, `Z`, check character). The check character itself is not verified.
pub fn validate(tax_id: Option<&str>) -> ValidationResult {
    let Some(tax_id) = tax_id else {
        return ValidationResult::invalid();
    };

    let normalized = tax_id.trim().to_ascii_uppercase();
    if !validate_gstin(&normalized) {
        return ValidationResult::invalid();
    }

    ValidationResult {
        is_valid: true,
        jurisdiction_code: Some(normalized[..2].to_string()),
    }
}

/// Check whether a string is a structurally valid GSTIN.
pub fn validate_gstin(gstin: &str) -> bool {
    gstin.len() == 15 && GSTIN_EXACT.is_match(gstin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid() {
        for gstin in ["37AAAPL1234C1ZV", "27AABCB1234D1Z5", "29AAACR5055K1Z5", "07AAACI1681G1ZM"] {
            let result = validate(Some(gstin));
            assert!(result.is_valid, "{gstin} should be valid");
            assert_eq!(result.jurisdiction_code.as_deref(), Some(&gstin[..2]));
        }
    }

    #[test]
    fn test_validate_lowercase() {
        let result = validate(Some(" 37aaapl1234c1zv "));
        assert!(result.is_valid);
        assert_eq!(result.jurisdiction_code.as_deref(), Some("37"));
    }

    #[test]
    fn test_validate_invalid() {
        let malformed = [
            "",
            "37AAAPL1234C1Z",   // too short
            "37AAAPL1234C1ZVX", // too long
            "3AAAAPL1234C1ZV",  // letter in state code
            "37AAAP11234C1ZV",  // digit in PAN letters
            "37AAAPL12A4C1ZV",  // letter in PAN digits
            "37AAAPL12341C1Z",  // digit where PAN ends with a letter
            "37AAAPL1234C1XV",  // no 'Z' at position 14
            "37AAAPL1234C-ZV",  // punctuation
        ];
        for gstin in malformed {
            assert_eq!(validate(Some(gstin)), ValidationResult::invalid(), "{gstin:?}");
        }
    }

    #[test]
    fn test_validate_absent() {
        let result = validate(None);
        assert!(!result.is_valid);
        assert!(result.jurisdiction_code.is_none());
    }

    #[test]
    fn test_validate_gstin() {
        assert!(validate_gstin("37AAAPL1234C1ZV"));
        assert!(!validate_gstin("37aaapl1234c1zv"));
    }
}
