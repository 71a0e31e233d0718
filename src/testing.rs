//! Test doubles for the OCR and translation adapters

use image::RgbImage;
use parking_lot::Mutex;

use crate::error::{EngineError, TranslationError};
use crate::translate::{TargetLanguage, Translator};
use crate::vision::{Detection, TextRecognizer};

/// Returns fixed detections and counts calls
pub struct StubRecognizer {
    detections: Vec<Detection>,
    calls: Mutex<usize>,
    fail: bool,
}

impl StubRecognizer {
    /// One 80x20 box per line, stacked 30 px apart from (10, 10)
    pub fn lines(lines: &[&str]) -> Self {
        let detections = lines
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let y = 10.0 + i as f32 * 30.0;
                Detection {
                    polygon: [(10.0, y), (90.0, y), (90.0, y + 20.0), (10.0, y + 20.0)],
                    text: text.to_string(),
                    confidence: 0.95,
                }
            })
            .collect();
        Self { detections, calls: Mutex::new(0), fail: false }
    }

    pub fn failing() -> Self {
        Self { detections: Vec::new(), calls: Mutex::new(0), fail: true }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

impl TextRecognizer for StubRecognizer {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<Detection>, EngineError> {
        *self.calls.lock() += 1;
        if self.fail {
            return Err(EngineError::Unavailable("models missing".to_string()));
        }
        Ok(self.detections.clone())
    }
}

/// Tags the text with the target code, or fails on demand
pub struct StubTranslator {
    fail: Mutex<bool>,
    calls: Mutex<usize>,
}

impl StubTranslator {
    pub fn new() -> Self {
        Self { fail: Mutex::new(false), calls: Mutex::new(0) }
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock() = fail;
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

impl Translator for StubTranslator {
    fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        *self.calls.lock() += 1;
        if TargetLanguage::from_code(target_code).is_none() {
            return Err(TranslationError::UnsupportedLanguage(target_code.to_string()));
        }
        if *self.fail.lock() {
            return Err(TranslationError::Network("connection reset".to_string()));
        }
        Ok(format!("[{}] {}", target_code, text))
    }

    fn name(&self) -> &str {
        "stub"
    }
}
