//! Date extraction for GST invoices.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{DATE_DMY, DATE_LABEL, DATE_MONTH_NAME, DATE_YMD, INVOICE_DATE_LABEL};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// Yields every calendar-valid date in reading order.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // DD/MM/YYYY, DD-MM-YYYY, DD.MM.YY
        for caps in DATE_DMY.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);

            if let (Some(date), Some(full_match)) =
                (NaiveDate::from_ymd_opt(year, month, day), caps.get(0))
            {
                results.push(
                    ExtractionMatch::new(date, 0.9, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // YYYY-MM-DD
        for caps in DATE_YMD.captures_iter(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);

            if let (Some(date), Some(full_match)) =
                (NaiveDate::from_ymd_opt(year, month, day), caps.get(0))
            {
                results.push(
                    ExtractionMatch::new(date, 0.95, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // 12-JAN-2025
        for caps in DATE_MONTH_NAME.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month = month_to_number(&caps[2]);
            let year = parse_year(&caps[3]);

            if let (Some(date), Some(full_match)) =
                (NaiveDate::from_ymd_opt(year, month, day), caps.get(0))
            {
                results.push(
                    ExtractionMatch::new(date, 0.95, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results.sort_by_key(|m| m.start());
        results
    }
}

/// Pick the invoice date from text.
///
/// A date that follows an invoice-date label ("Invoice Date", "Bill Date")
/// within `label_window` characters wins; failing that, one following any
/// "Date"/"Dt" label; failing that, the first date in the text.
pub fn extract_invoice_date(text: &str, label_window: usize) -> Option<ExtractionMatch<NaiveDate>> {
    let candidates = DateExtractor::new().extract_all(text);
    if candidates.is_empty() {
        return None;
    }

    for (label, confidence) in [(&*INVOICE_DATE_LABEL, 0.95), (&*DATE_LABEL, 0.9)] {
        if let Some(found) = nearest_after_label(label, text, &candidates, label_window) {
            let mut found = found.clone();
            found.confidence = confidence;
            return Some(found);
        }
    }

    candidates.into_iter().next()
}

/// Candidate with the smallest gap after the end of any label match.
fn nearest_after_label<'a>(
    label: &Regex,
    text: &str,
    candidates: &'a [ExtractionMatch<NaiveDate>],
    window: usize,
) -> Option<&'a ExtractionMatch<NaiveDate>> {
    label
        .find_iter(text)
        .filter_map(|label_match| {
            candidates
                .iter()
                .filter_map(|c| {
                    let (start, _) = c.position?;
                    let gap = start.checked_sub(label_match.end())?;
                    (text[label_match.end()..start].chars().count() <= window).then_some((gap, c))
                })
                .min_by_key(|(gap, _)| *gap)
        })
        .min_by_key(|(gap, c)| (*gap, c.start()))
        .map(|(_, c)| c)
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if s.len() == 2 { 2000 + year } else { year }
}

fn month_to_number(month: &str) -> u32 {
    match month.to_ascii_uppercase().as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => 0,
    }
}
