//! OCR engine wrapper using `pure-onnx-ocr`.

use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{RawText, TextFragment};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

/// A recognized region with its top-left corner, used for ordering.
struct PositionedFragment {
    x: f32,
    y: f32,
    fragment: TextFragment,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in `config`.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine,
            keep_unk: config.keep_unk,
        })
    }

    /// Recognize text in an invoice image.
    ///
    /// Fragments come back in reading order: rows of roughly 20px from top
    /// to bottom, left to right within a row.
    pub fn recognize(&self, image: &DynamicImage) -> Result<RawText, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        info!("Recognizing image: {}x{}", width, height);

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut positioned: Vec<PositionedFragment> = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                PositionedFragment {
                    x,
                    y,
                    fragment: TextFragment::new(text).with_confidence(r.confidence),
                }
            })
            .collect();

        positioned.sort_by(|a, b| {
            let row_a = (a.y / 20.0) as i32;
            let row_b = (b.y / 20.0) as i32;
            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let raw = RawText::from_fragments(positioned.into_iter().map(|p| p.fragment).collect());

        info!(
            "OCR complete: {} fragments in {}ms",
            raw.fragments.len(),
            start.elapsed().as_millis()
        );

        Ok(raw)
    }
}

/// Minimum x and y over the first four exterior points of a region polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}
