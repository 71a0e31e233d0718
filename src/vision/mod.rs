//! Vision/OCR Layer
//!
//! Extracts text regions from decoded images. The PaddleOCR engine is loaded
//! lazily behind [`OcrAdapter`]; callers depend on the [`TextRecognizer`]
//! trait so tests can substitute their own recognizer.

pub mod detection;
pub mod models;
pub mod ocr;
pub mod preprocess;
pub mod recognition;

use image::RgbImage;
use parking_lot::Mutex;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::OcrSettings;
use crate::error::EngineError;

pub use ocr::OcrEngine;

/// One recognized text region
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Corners clockwise from top-left, in image pixels
    pub polygon: [(f32, f32); 4],
    /// Recognized text
    pub text: String,
    /// Recognition confidence (0.0 - 1.0)
    pub confidence: f32,
}

/// Anything that can find and read text in an image
pub trait TextRecognizer: Send + Sync {
    /// Detect text regions in reading order
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, EngineError>;
}

/// Join detection texts with single spaces, in engine order
pub fn full_text(detections: &[Detection]) -> String {
    detections
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Production recognizer: one shared engine, built on first use
pub struct OcrAdapter {
    settings: OcrSettings,
    engine: Mutex<Option<OcrEngine>>,
}

impl OcrAdapter {
    /// Cheap; no models are touched until the first `detect`
    pub fn new(settings: OcrSettings) -> Self {
        Self {
            settings,
            engine: Mutex::new(None),
        }
    }
}

impl TextRecognizer for OcrAdapter {
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, EngineError> {
        let mut guard = self.engine.lock();

        let engine = match guard.as_mut() {
            Some(engine) => engine,
            None => {
                info!("Initializing OCR engine");
                let start = Instant::now();
                let engine = OcrEngine::load(&self.settings).map_err(|e| {
                    warn!("OCR engine unavailable: {:#}", e);
                    EngineError::Unavailable(format!("{:#}", e))
                })?;
                info!("OCR engine initialized in {:?}", start.elapsed());
                guard.insert(engine)
            }
        };

        let detections = engine
            .detect(image)
            .map_err(|e| EngineError::Inference(format!("{:#}", e)))?;
        debug!("{} text regions in {}x{} image", detections.len(), image.width(), image.height());

        Ok(detections)
    }
}

/// Convert polygon points to bounding box (x, y, width, height)
pub fn polygon_to_bounds(polygon: &[(f32, f32)]) -> (u32, u32, u32, u32) {
    if polygon.is_empty() {
        return (0, 0, 0, 0);
    }

    let min_x = polygon.iter().map(|p| p.0).fold(f32::INFINITY, f32::min).max(0.0);
    let min_y = polygon.iter().map(|p| p.1).fold(f32::INFINITY, f32::min).max(0.0);
    let max_x = polygon.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max).max(min_x);
    let max_y = polygon.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max).max(min_y);

    (
        min_x as u32,
        min_y as u32,
        (max_x - min_x) as u32,
        (max_y - min_y) as u32,
    )
}
