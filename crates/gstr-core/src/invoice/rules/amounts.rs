//! Amount extraction for GST invoices.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;

use super::patterns::{AMOUNT_PATTERN, AMOUNT_WITH_CURRENCY, TOTAL_AMOUNT};
use super::{ExtractionMatch, FieldExtractor};

/// Amount field extractor.
///
/// Collects every two-fraction-digit number, tagging each with how it was
/// found: after a total label (0.9), after a currency marker (0.85), or bare
/// (0.5).
pub struct AmountExtractor {
    min_amount: Decimal,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self {
            min_amount: Decimal::TEN,
        }
    }

    /// Ignore amounts at or below `min_amount`.
    pub fn with_min_amount(mut self, min_amount: Decimal) -> Self {
        self.min_amount = min_amount;
        self
    }

    /// Amounts following a total label or a currency marker.
    pub fn marked(&self, text: &str) -> Vec<ExtractionMatch<Decimal>> {
        let mut results = self.scan(&TOTAL_AMOUNT, text, 0.9);
        results.extend(self.scan(&AMOUNT_WITH_CURRENCY, text, 0.85));
        results.sort_by_key(|m| m.start());
        results
    }

    /// Every amount in the text, marked or not.
    pub fn bare(&self, text: &str) -> Vec<ExtractionMatch<Decimal>> {
        self.scan(&AMOUNT_PATTERN, text, 0.5)
    }

    fn scan(&self, pattern: &Regex, text: &str, confidence: f32) -> Vec<ExtractionMatch<Decimal>> {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter(|m| is_standalone(text, m.start(), m.end()))
            .filter_map(|m| {
                let amount = parse_amount(m.as_str())?;
                (amount > self.min_amount).then(|| {
                    ExtractionMatch::new(amount, confidence, m.as_str())
                        .with_position(m.start(), m.end())
                })
            })
            .collect()
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    /// Largest marked amount, else the largest bare amount.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        largest(self.marked(text)).or_else(|| largest(self.bare(text)))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.bare(text)
    }
}

/// Extract the invoice total from text.
pub fn extract_total_amount(text: &str, min_amount: Decimal) -> Option<ExtractionMatch<Decimal>> {
    AmountExtractor::new().with_min_amount(min_amount).extract(text)
}

/// Parse an amount such as "1,18,000.00" or "₹ 1180.00".
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    Decimal::from_str(&cleaned).ok()
}

/// Largest value wins; on ties the earlier candidate is kept.
fn largest(candidates: Vec<ExtractionMatch<Decimal>>) -> Option<ExtractionMatch<Decimal>> {
    candidates.into_iter().reduce(|best, next| {
        if next.value > best.value { next } else { best }
    })
}

/// Reject numbers that are part of a longer dotted token, like "14.12" in "14.12.2024".
fn is_standalone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let mut after = text[end..].chars();

    let glued_before = before.is_some_and(|c| c.is_ascii_digit() || c == '.');
    let glued_after = match (after.next(), after.next()) {
        (Some('.'), Some(c)) => c.is_ascii_digit(),
        (Some(c), _) => c.is_ascii_digit(),
        _ => false,
    };

    !glued_before && !glued_after
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1180.00"), Some(dec("1180.00")));
        assert_eq!(parse_amount("1,180.00"), Some(dec("1180.00")));
        assert_eq!(parse_amount("1,18,000.50"), Some(dec("118000.50")));
        assert_eq!(parse_amount("₹ 12,000.50"), Some(dec("12000.50")));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_labeled_total() {
        let found = extract_total_amount("Total: ₹1180.00", Decimal::TEN).unwrap();
        assert_eq!(found.value, dec("1180.00"));
        assert_eq!(found.value.scale(), 2);
    }

    #[test]
    fn test_largest_marked_amount_wins() {
        let text = "Sub Total 1,000.00\nCGST 90.00\nSGST 90.00\nGrand Total: Rs 1,180.00";
        let found = extract_total_amount(text, Decimal::TEN).unwrap();
        assert_eq!(found.value, dec("1180.00"));
    }

    #[test]
    fn test_marked_beats_larger_bare_number() {
        let text = "Item code 99999.00\nAMOUNT: RS 12000.50";
        let found = extract_total_amount(text, Decimal::TEN).unwrap();
        assert_eq!(found.value, dec("12000.50"));
        assert!(found.confidence >= 0.85);
    }

    #[test]
    fn test_bare_fallback_takes_largest() {
        let text = "Rice 5kg 450.00\nOil 1L 180.00\n630.00";
        let found = extract_total_amount(text, Decimal::TEN).unwrap();
        assert_eq!(found.value, dec("630.00"));
        assert_eq!(found.confidence, 0.5);
    }

    #[test]
    fn test_total_on_next_fragment() {
        let text = "TOTAL\n1500.00";
        assert_eq!(extract_total_amount(text, Decimal::TEN).unwrap().value, dec("1500.00"));
    }

    #[test]
    fn test_dates_are_not_amounts() {
        let text = "DATE 14.12.2024 TOTAL 500.00";
        let extractor = AmountExtractor::new();
        let all = extractor.extract_all(text);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].value, dec("500.00"));
    }

    #[test]
    fn test_min_amount_filter() {
        assert!(extract_total_amount("Total 9.99", Decimal::TEN).is_none());
        assert!(extract_total_amount("Total 10.00", Decimal::TEN).is_none());
        assert!(extract_total_amount("Total 9.99", Decimal::ZERO).is_some());
    }

    #[test]
    fn test_no_amount() {
        assert!(extract_total_amount("GSTIN 37AAAPL1234C1ZV Invoice Date 01/06/2024", Decimal::TEN).is_none());
    }
}
