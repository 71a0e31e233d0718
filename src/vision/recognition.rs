//! Text line recognition (CRNN + CTC)

use anyhow::{Context, Result};
use image::RgbImage;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;

use super::models::Script;
use super::preprocess;

/// Load a recognition charset from a dictionary file
///
/// Index 0 is the CTC blank; the dictionary follows one symbol per line, and a
/// space symbol closes the table.
pub fn load_charset(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dictionary {:?}", path))?;
    Ok(charset_from_dictionary(&content))
}

pub fn charset_from_dictionary(content: &str) -> Vec<String> {
    let mut charset = vec![String::new()];
    charset.extend(
        content
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    );
    charset.push(" ".to_string());
    charset
}

/// Greedy CTC decoding of a `[steps, classes]` probability matrix
///
/// Repeated symbols collapse and blanks are dropped. The confidence is the
/// mean probability of the kept symbols; an empty reading has confidence 0.
pub fn ctc_greedy_decode(probs: &[f32], steps: usize, classes: usize, charset: &[String]) -> (String, f32) {
    let mut text = String::new();
    let mut confidence_sum = 0.0f32;
    let mut kept = 0usize;
    let mut previous = 0usize;

    for step in probs.chunks(classes.max(1)).take(steps) {
        let (best, best_prob) = step
            .iter()
            .enumerate()
            .fold((0usize, f32::MIN), |acc, (i, &p)| if p > acc.1 { (i, p) } else { acc });

        if best != 0 && best != previous {
            if let Some(symbol) = charset.get(best) {
                text.push_str(symbol);
                confidence_sum += best_prob;
                kept += 1;
            }
        }
        previous = best;
    }

    if kept == 0 {
        return (String::new(), 0.0);
    }
    (text.trim().to_string(), confidence_sum / kept as f32)
}

/// Recognition model and charset for one writing system
pub struct ScriptRecognizer {
    script: Script,
    session: Session,
    charset: Vec<String>,
}

impl ScriptRecognizer {
    pub fn new(script: Script, session: Session, charset: Vec<String>) -> Self {
        Self { script, session, charset }
    }

    /// Read one cropped text line
    pub fn recognize(&mut self, crop: &RgbImage) -> Result<(String, f32)> {
        let input = preprocess::recognition_input(crop);
        let tensor = TensorRef::from_array_view(input.view())
            .context("Failed to build recognition input")?;
        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .with_context(|| format!("{:?} recognition inference failed", self.script))?;

        let (shape, probs) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Unexpected recognition output")?;

        // [1, steps, classes]
        if shape.len() != 3 {
            anyhow::bail!("Unexpected recognition output shape {:?}", shape);
        }
        let steps = shape[1].max(0) as usize;
        let classes = shape[2].max(0) as usize;

        Ok(ctc_greedy_decode(probs, steps, classes, &self.charset))
    }
}
