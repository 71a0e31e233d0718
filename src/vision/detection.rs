//! Text region detection
//!
//! Runs a DB (differentiable binarization) model over the whole image and
//! turns its probability map into ordered text boxes.

use anyhow::{Context, Result};
use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;
use imageproc::region_labelling::{connected_components, Connectivity};
use ort::session::Session;
use ort::value::TensorRef;
use std::collections::BTreeMap;
use tracing::debug;

use super::preprocess::{self, DetectionScale};
use crate::config::OcrSettings;

/// Boxes whose top edges differ by less than this share a row
const ROW_TOLERANCE: f32 = 10.0;
/// Components narrower or shorter than this (in map pixels) are noise
const MIN_BOX_SIDE: u32 = 3;

/// Detection post-processing parameters
#[derive(Debug, Clone, Copy)]
pub struct DetectionParams {
    pub limit_side_len: u32,
    pub binary_threshold: f32,
    pub box_score_threshold: f32,
    pub unclip_ratio: f32,
}

impl From<&OcrSettings> for DetectionParams {
    fn from(settings: &OcrSettings) -> Self {
        Self {
            limit_side_len: settings.limit_side_len,
            binary_threshold: settings.binary_threshold,
            box_score_threshold: settings.box_score_threshold,
            unclip_ratio: settings.unclip_ratio,
        }
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self::from(&OcrSettings::default())
    }
}

/// A detected text box in source image coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    /// Corners clockwise from top-left
    pub polygon: [(f32, f32); 4],
    /// Mean text probability of the region
    pub score: f32,
}

/// Per-component accumulator
#[derive(Debug, Clone, Copy)]
struct Component {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    prob_sum: f32,
    pixels: u32,
}

impl Component {
    fn new(x: u32, y: u32) -> Self {
        Self { min_x: x, min_y: y, max_x: x, max_y: y, prob_sum: 0.0, pixels: 0 }
    }

    fn add(&mut self, x: u32, y: u32, prob: f32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.prob_sum += prob;
        self.pixels += 1;
    }
}

/// Extract text boxes from a probability map
///
/// `prob` is row-major `map_w * map_h`. Pixels above the binary threshold are
/// text; a one pixel dilation joins nearby fragments into one component. Each
/// component's text pixels define its box and score.
pub fn boxes_from_probability_map(
    prob: &[f32],
    map_w: u32,
    map_h: u32,
    scale: DetectionScale,
    image_size: (u32, u32),
    params: &DetectionParams,
) -> Vec<TextBox> {
    if map_w == 0 || map_h == 0 || prob.len() < (map_w * map_h) as usize {
        return Vec::new();
    }

    let at = |x: u32, y: u32| prob[(y * map_w + x) as usize];
    let mask = GrayImage::from_fn(map_w, map_h, |x, y| {
        if at(x, y) > params.binary_threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });
    let joined = dilate(&mask, Norm::LInf, 1);
    let labels = connected_components(&joined, Connectivity::Eight, Luma([0u8]));

    let mut components: BTreeMap<u32, Component> = BTreeMap::new();
    for (x, y, text) in mask.enumerate_pixels() {
        if text.0[0] == 0 {
            continue;
        }
        let label = labels.get_pixel(x, y).0[0];
        components
            .entry(label)
            .or_insert_with(|| Component::new(x, y))
            .add(x, y, at(x, y));
    }

    let (img_w, img_h) = image_size;
    let max_x = img_w.saturating_sub(1) as f32;
    let max_y = img_h.saturating_sub(1) as f32;

    let mut boxes: Vec<TextBox> = components
        .values()
        .filter_map(|c| {
            let w = c.max_x - c.min_x + 1;
            let h = c.max_y - c.min_y + 1;
            if w < MIN_BOX_SIDE || h < MIN_BOX_SIDE {
                return None;
            }

            let score = c.prob_sum / c.pixels.max(1) as f32;
            if score < params.box_score_threshold {
                return None;
            }

            // Unclip: grow by area * ratio / perimeter on every side
            let (w, h) = (w as f32, h as f32);
            let distance = w * h * params.unclip_ratio / (2.0 * (w + h));
            let x0 = (c.min_x as f32 - distance) / scale.ratio_w;
            let y0 = (c.min_y as f32 - distance) / scale.ratio_h;
            let x1 = ((c.max_x + 1) as f32 + distance) / scale.ratio_w;
            let y1 = ((c.max_y + 1) as f32 + distance) / scale.ratio_h;

            let x0 = x0.round().clamp(0.0, max_x);
            let y0 = y0.round().clamp(0.0, max_y);
            let x1 = x1.round().clamp(0.0, max_x);
            let y1 = y1.round().clamp(0.0, max_y);

            if x1 <= x0 || y1 <= y0 {
                return None;
            }

            Some(TextBox {
                polygon: [(x0, y0), (x1, y0), (x1, y1), (x0, y1)],
                score,
            })
        })
        .collect();

    sort_reading_order(&mut boxes);
    boxes
}

/// Order boxes top-to-bottom, then left-to-right within a row
pub fn sort_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        let (ax, ay) = a.polygon[0];
        let (bx, by) = b.polygon[0];
        ay.total_cmp(&by).then(ax.total_cmp(&bx))
    });

    // Bubble boxes of the same row into left-to-right order
    for i in 0..boxes.len().saturating_sub(1) {
        for j in (0..=i).rev() {
            let (x_next, y_next) = boxes[j + 1].polygon[0];
            let (x_cur, y_cur) = boxes[j].polygon[0];
            if (y_next - y_cur).abs() < ROW_TOLERANCE && x_next < x_cur {
                boxes.swap(j, j + 1);
            } else {
                break;
            }
        }
    }
}

/// DB text detector backed by an ONNX session
pub struct TextDetector {
    session: Session,
    params: DetectionParams,
}

impl TextDetector {
    pub fn new(session: Session, params: DetectionParams) -> Self {
        Self { session, params }
    }

    /// Detect text boxes in an image
    pub fn detect(&mut self, image: &RgbImage) -> Result<Vec<TextBox>> {
        let (input, scale) = preprocess::detection_input(image, self.params.limit_side_len);
        let (_, _, in_h, in_w) = input.dim();

        let tensor = TensorRef::from_array_view(input.view())
            .context("Failed to build detection input")?;
        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .context("Detection inference failed")?;

        let (shape, prob) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Unexpected detection output")?;

        // [1, 1, H, W]; fall back to the input size if dims are dynamic
        let map_h = shape.get(2).copied().filter(|&d| d > 0).unwrap_or(in_h as i64) as u32;
        let map_w = shape.get(3).copied().filter(|&d| d > 0).unwrap_or(in_w as i64) as u32;

        let boxes =
            boxes_from_probability_map(prob, map_w, map_h, scale, image.dimensions(), &self.params);
        debug!("Detected {} text boxes ({}x{} map)", boxes.len(), map_w, map_h);

        Ok(boxes)
    }
}
