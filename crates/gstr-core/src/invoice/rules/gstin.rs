//! GSTIN (Indian GST identification number) extraction.

use super::patterns::{GSTIN_LABEL, GSTIN_PATTERN};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::state::is_known_range;

/// Words OCR output often contains at a PAN-shaped position.
const PAN_STOPWORDS: &[&str] = &["PHONE", "EMAIL", "TOTAL", "GRAND", "STATE", "INDIA"];

/// Characters after a GSTIN label searched by the corrective matcher.
const LABEL_WINDOW: usize = 40;

/// Characters OCR produces in place of the fixed `Z` at position 14.
const Z_LOOKALIKES: &str = "Z25SO0I1";

/// GSTIN field extractor.
///
/// Matchers run in order: a strict case-insensitive pattern over the text as
/// written, then (when enabled) a corrective scan of the text following a
/// GSTIN label, with separators removed and common OCR character confusions
/// repaired.
pub struct GstinExtractor {
    correct_ocr: bool,
}

impl GstinExtractor {
    /// Create a new GSTIN extractor.
    pub fn new() -> Self {
        Self { correct_ocr: true }
    }

    /// Set whether to attempt OCR error correction.
    pub fn with_ocr_correction(mut self, correct: bool) -> Self {
        self.correct_ocr = correct;
        self
    }

    fn strict_matches(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        GSTIN_PATTERN
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_uppercase(), 0.95, m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }

    fn corrected_matches(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        let mut results: Vec<ExtractionMatch<String>> = Vec::new();

        for label in GSTIN_LABEL.find_iter(text) {
            let cleaned: Vec<char> = text[label.end()..]
                .chars()
                .take(LABEL_WINDOW)
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_uppercase())
                .collect();

            // Full-length windows first, then 14-character windows where the 'Z' was lost
            let repaired = [(15, 0.6), (14, 0.4)].into_iter().find_map(|(len, confidence)| {
                cleaned.windows(len).find_map(|window| {
                    repair_window(window).map(|gstin| {
                        let source: String = window.iter().collect();
                        ExtractionMatch::new(gstin, confidence, source)
                    })
                })
            });

            if let Some(found) = repaired {
                if !results.iter().any(|r| r.value == found.value) {
                    results.push(found);
                }
            }
        }

        results
    }
}

impl Default for GstinExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for GstinExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let strict = self.strict_matches(text);
        if !strict.is_empty() || !self.correct_ocr {
            return strict;
        }
        self.corrected_matches(text)
    }
}

/// Extract the first GSTIN from text (strict matching only).
pub fn extract_gstin(text: &str) -> Option<String> {
    GstinExtractor::new()
        .with_ocr_correction(false)
        .extract(text)
        .map(|m| m.value)
}

fn to_digit(c: char) -> char {
    match c {
        'O' => '0',
        'I' => '1',
        'S' => '5',
        'Z' => '2',
        'B' => '8',
        'G' => '6',
        'T' => '7',
        other => other,
    }
}

fn to_letter(c: char) -> char {
    match c {
        '0' => 'O',
        '1' => 'I',
        '5' => 'S',
        '8' => 'B',
        '2' => 'Z',
        '6' => 'G',
        '7' => 'T',
        other => other,
    }
}

/// Repair a 15- or 14-character window into a well-formed GSTIN.
fn repair_window(window: &[char]) -> Option<String> {
    let state: String = window[0..2].iter().map(|&c| to_digit(c)).collect();
    if !state.chars().all(|c| c.is_ascii_digit()) || !is_known_range(&state) {
        return None;
    }

    let pan_letters: String = window[2..7].iter().map(|&c| to_letter(c)).collect();
    if !pan_letters.chars().all(|c| c.is_ascii_uppercase())
        || PAN_STOPWORDS.contains(&pan_letters.as_str())
    {
        return None;
    }

    let pan_digits: String = window[7..11].iter().map(|&c| to_digit(c)).collect();
    if !pan_digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let pan_last = to_letter(window[11]);
    if !pan_last.is_ascii_uppercase() {
        return None;
    }

    let entity = match window[12] {
        'I' => '1',
        'O' => '0',
        other => other,
    };

    let checksum = if window.len() == 15 {
        if !Z_LOOKALIKES.contains(window[13]) {
            return None;
        }
        window[14]
    } else {
        window[13]
    };

    Some(format!(
        "{}{}{}{}{}Z{}",
        state, pan_letters, pan_digits, pan_last, entity, checksum
    ))
}
