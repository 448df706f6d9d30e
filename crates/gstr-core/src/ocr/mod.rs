//! Adapter for the external OCR collaborator.
//!
//! The pipeline never runs recognition itself. It consumes [`RawText`], an
//! ordered list of fragments as returned by an OCR engine, or one block of
//! text. With the `native` feature, [`PureOcrEngine`] produces it from an
//! image using `pure-onnx-ocr`.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A piece of recognized text in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0), when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// OCR output accepted by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawText {
    /// Fragments in reading order.
    pub fragments: Vec<TextFragment>,
}

/// Shapes of OCR output we accept as JSON.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTextJson {
    Block(String),
    Lines(Vec<String>),
    Fragments(Vec<TextFragment>),
    Wrapped { fragments: Vec<TextFragment> },
}

impl RawText {
    /// Wrap one block of text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            fragments: vec![TextFragment::new(text)],
        }
    }

    /// Wrap fragments already in reading order.
    pub fn from_fragments(fragments: Vec<TextFragment>) -> Self {
        Self { fragments }
    }

    /// Parse OCR output serialized as JSON.
    ///
    /// Accepts a string, a list of strings, a list of
    /// `{"text": ..., "confidence": ...}` objects, or an object with a
    /// `fragments` list.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: RawTextJson = serde_json::from_str(json)?;
        Ok(match parsed {
            RawTextJson::Block(text) => Self::from_text(text),
            RawTextJson::Lines(lines) => {
                Self::from_fragments(lines.into_iter().map(TextFragment::new).collect())
            }
            RawTextJson::Fragments(fragments) | RawTextJson::Wrapped { fragments } => {
                Self::from_fragments(fragments)
            }
        })
    }

    /// Drop fragments whose reported confidence is below `min_confidence`.
    ///
    /// Fragments without a score are kept.
    pub fn filter_confidence(&self, min_confidence: f32) -> Self {
        Self {
            fragments: self
                .fragments
                .iter()
                .filter(|f| f.confidence.is_none_or(|c| c >= min_confidence))
                .cloned()
                .collect(),
        }
    }

    /// Full text, fragments joined with newlines.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check whether there is any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.fragments.iter().all(|f| f.text.trim().is_empty())
    }
}

impl From<&str> for RawText {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for RawText {
    fn from(text: String) -> Self {
        Self::from_text(text)
    }
}

/// Decode an uploaded invoice image. Only JPEG and PNG are accepted.
pub fn load_invoice_image(bytes: &[u8]) -> Result<DynamicImage, OcrError> {
    let format = image::guess_format(bytes)
        .map_err(|e| OcrError::UnsupportedImage(format!("unrecognized image data: {}", e)))?;

    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(OcrError::UnsupportedImage(format!(
            "{:?} is not supported, please upload JPG or PNG",
            format
        )));
    }

    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| OcrError::UnsupportedImage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_text_joins_fragments() {
        let raw = RawText::from_fragments(vec![
            TextFragment::new("GSTIN: 37AAAPL1234C1ZV"),
            TextFragment::new("Total: 1180.00"),
        ]);
        assert_eq!(raw.text(), "GSTIN: 37AAAPL1234C1ZV\nTotal: 1180.00");
    }

    #[test]
    fn test_from_json_shapes() {
        let block = RawText::from_json(r#""TOTAL 500.00""#).unwrap();
        assert_eq!(block.fragments.len(), 1);

        let lines = RawText::from_json(r#"["DATE: 12-JAN-2025", "TOTAL 1500.00"]"#).unwrap();
        assert_eq!(lines.fragments.len(), 2);
        assert_eq!(lines.fragments[1].confidence, None);

        let scored =
            RawText::from_json(r#"[{"text": "TOTAL 1500.00", "confidence": 0.93}]"#).unwrap();
        assert_eq!(scored.fragments[0].confidence, Some(0.93));

        let wrapped = RawText::from_json(r#"{"fragments": [{"text": "a"}]}"#).unwrap();
        assert_eq!(wrapped.fragments[0].text, "a");

        assert!(RawText::from_json("42").is_err());
    }

    #[test]
    fn test_filter_confidence() {
        let raw = RawText::from_fragments(vec![
            TextFragment::new("keep").with_confidence(0.9),
            TextFragment::new("drop").with_confidence(0.2),
            TextFragment::new("unscored"),
        ]);
        let filtered = raw.filter_confidence(0.5);
        assert_eq!(filtered.text(), "keep\nunscored");
    }

    #[test]
    fn test_is_blank() {
        assert!(RawText::default().is_blank());
        assert!(RawText::from_text("  \n ").is_blank());
        assert!(!RawText::from_text("x").is_blank());
    }

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(4, 4);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_load_invoice_image_accepts_png() {
        let img = load_invoice_image(&encode(ImageFormat::Png)).unwrap();
        assert_eq!(img.width(), 4);
    }

    #[test]
    fn test_load_invoice_image_rejects_other_formats() {
        let bmp = encode(ImageFormat::Bmp);
        assert!(matches!(
            load_invoice_image(&bmp),
            Err(OcrError::UnsupportedImage(_))
        ));
        assert!(load_invoice_image(b"not an image").is_err());
    }
}
