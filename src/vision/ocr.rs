//! PaddleOCR pipeline: detection, then per-script recognition

use anyhow::{Context, Result};
use image::RgbImage;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::detection::{DetectionParams, TextDetector};
use super::models::{self, ModelManager, ModelType, Script};
use super::recognition::{self, ScriptRecognizer};
use super::{preprocess, Detection};
use crate::config::OcrSettings;

/// Loaded OCR models for a fixed set of languages
pub struct OcrEngine {
    detector: TextDetector,
    recognizers: Vec<ScriptRecognizer>,
    min_confidence: f32,
}

impl OcrEngine {
    /// Resolve, download if needed, and load every model the settings require
    pub fn load(settings: &OcrSettings) -> Result<Self> {
        let scripts = scripts_for(&settings.languages)?;

        let models_dir = match &settings.models_dir {
            Some(dir) => dir.clone(),
            None => crate::storage::get_models_dir()?,
        };
        let manager = ModelManager::with_dir(models_dir, settings.offline)?;
        manager.ensure_all(&scripts)?;

        let det_session = models::open_session(
            &manager.model_path(ModelType::Detection),
            settings.intra_threads,
        )?;
        let detector = TextDetector::new(det_session, DetectionParams::from(settings));

        let mut recognizers = Vec::with_capacity(scripts.len());
        for script in scripts {
            let session = models::open_session(
                &manager.model_path(ModelType::Recognition(script)),
                settings.intra_threads,
            )?;
            let charset = recognition::load_charset(&manager.model_path(ModelType::Dictionary(script)))?;
            debug!("{:?} charset has {} symbols", script, charset.len());
            recognizers.push(ScriptRecognizer::new(script, session, charset));
        }

        info!("OCR engine ready for languages {:?}", settings.languages);
        Ok(Self {
            detector,
            recognizers,
            min_confidence: settings.min_text_confidence,
        })
    }

    /// Detect and read every text region in the image
    pub fn detect(&mut self, image: &RgbImage) -> Result<Vec<Detection>> {
        let start = Instant::now();
        let boxes = self.detector.detect(image)?;

        let mut detections = Vec::with_capacity(boxes.len());
        for text_box in boxes {
            let Some(crop) = preprocess::crop_polygon(image, &text_box.polygon) else {
                continue;
            };

            let mut readings = Vec::with_capacity(self.recognizers.len());
            for recognizer in &mut self.recognizers {
                let reading = recognizer
                    .recognize(&crop)
                    .with_context(|| format!("Failed to read region {:?}", text_box.polygon))?;
                readings.push(reading);
            }

            if let Some((text, confidence)) = pick_reading(readings, self.min_confidence) {
                detections.push(Detection {
                    polygon: text_box.polygon,
                    text,
                    confidence,
                });
            }
        }

        debug!("OCR produced {} detections in {:?}", detections.len(), start.elapsed());
        Ok(detections)
    }
}

/// Best non-empty reading across scripts, if it clears `min_confidence`
fn pick_reading(
    readings: impl IntoIterator<Item = (String, f32)>,
    min_confidence: f32,
) -> Option<(String, f32)> {
    let mut best: Option<(String, f32)> = None;
    for (text, confidence) in readings {
        if text.is_empty() {
            continue;
        }
        if best.as_ref().map_or(true, |(_, c)| confidence > *c) {
            best = Some((text, confidence));
        }
    }

    match best {
        Some((text, confidence)) if confidence < min_confidence => {
            debug!("Dropping low-confidence reading {:?} ({:.2})", text, confidence);
            None
        }
        best => best,
    }
}

/// Distinct scripts needed for the configured languages, in first-seen order
fn scripts_for(languages: &[String]) -> Result<Vec<Script>> {
    let mut scripts = Vec::new();
    for code in languages {
        match Script::for_language(code) {
            Some(script) if !scripts.contains(&script) => scripts.push(script),
            Some(_) => {}
            None => warn!("No recognition model for language {:?}, skipping", code),
        }
    }
    if scripts.is_empty() {
        anyhow::bail!("No usable OCR language in {:?}", languages);
    }
    Ok(scripts)
}
