//! Image preprocessing for OCR models
//!
//! Handles resizing, normalization, and tensor conversion for the PaddleOCR
//! detection and recognition models.

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::{Array3, Array4};

/// Recognition input height
pub const REC_HEIGHT: u32 = 48;
/// Recognition input width; narrower crops are right-padded
pub const REC_WIDTH: u32 = 320;

/// Scale factors from a detection input back to the source image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionScale {
    /// Resized height / original height
    pub ratio_h: f32,
    /// Resized width / original width
    pub ratio_w: f32,
}

/// Convert an RGB image to an HWC array with values in [-1, 1]
pub fn normalized_hwc(image: &RgbImage) -> Array3<f32> {
    let (w, h) = image.dimensions();
    Array3::<f32>::from_shape_fn((h as usize, w as usize, 3), |(y, x, c)| {
        let p = image.get_pixel(x as u32, y as u32).0[c] as f32;
        // (p / 255 - 0.5) / 0.5
        p / 127.5 - 1.0
    })
}

/// Convert HWC image to NCHW tensor (batch size 1)
pub fn hwc_to_nchw(image: &Array3<f32>) -> Array4<f32> {
    let (h, w, c) = image.dim();
    let mut tensor = Array4::<f32>::zeros((1, c, h, w));

    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                tensor[[0, ch, y, x]] = image[[y, x, ch]];
            }
        }
    }

    tensor
}

/// Target size for the detection model
///
/// The longer side is capped at `limit_side_len`, then both sides are rounded
/// to a multiple of 32 (never below 32).
pub fn detection_size(width: u32, height: u32, limit_side_len: u32) -> (u32, u32) {
    let longest = width.max(height).max(1) as f32;
    let ratio = if longest > limit_side_len as f32 {
        limit_side_len as f32 / longest
    } else {
        1.0
    };

    let round32 = |v: f32| (((v / 32.0).round() as u32) * 32).max(32);
    (round32(width as f32 * ratio), round32(height as f32 * ratio))
}

/// Build the detection input tensor
pub fn detection_input(image: &RgbImage, limit_side_len: u32) -> (Array4<f32>, DetectionScale) {
    let (w, h) = image.dimensions();
    let (new_w, new_h) = detection_size(w, h, limit_side_len);

    let resized = imageops::resize(image, new_w, new_h, FilterType::Triangle);
    let scale = DetectionScale {
        ratio_h: new_h as f32 / h.max(1) as f32,
        ratio_w: new_w as f32 / w.max(1) as f32,
    };

    (hwc_to_nchw(&normalized_hwc(&resized)), scale)
}

/// Build the recognition input tensor for one cropped text line
///
/// The crop is resized to `REC_HEIGHT` keeping its aspect ratio (width capped
/// at `REC_WIDTH`); the remainder of the tensor stays zero.
pub fn recognition_input(crop: &RgbImage) -> Array4<f32> {
    let (w, h) = crop.dimensions();
    let aspect = w as f32 / h.max(1) as f32;
    let new_w = ((REC_HEIGHT as f32 * aspect).ceil() as u32).clamp(1, REC_WIDTH);

    let resized = imageops::resize(crop, new_w, REC_HEIGHT, FilterType::Triangle);
    let normalized = normalized_hwc(&resized);

    let mut tensor = Array4::<f32>::zeros((1, 3, REC_HEIGHT as usize, REC_WIDTH as usize));
    for y in 0..REC_HEIGHT as usize {
        for x in 0..new_w as usize {
            for c in 0..3 {
                tensor[[0, c, y, x]] = normalized[[y, x, c]];
            }
        }
    }

    tensor
}

/// Crop the axis-aligned bounds of a polygon, clamped to the image
///
/// Corners are pixel indices, so the far row and column are included.
/// Returns None when the clamped region is empty.
pub fn crop_polygon(image: &RgbImage, polygon: &[(f32, f32); 4]) -> Option<RgbImage> {
    let (x, y, w, h) = super::polygon_to_bounds(polygon);
    let (img_w, img_h) = image.dimensions();

    let x = x.min(img_w);
    let y = y.min(img_h);
    let w = (w + 1).min(img_w - x);
    let h = (h + 1).min(img_h - y);

    if w == 0 || h == 0 {
        return None;
    }

    Some(imageops::crop_imm(image, x, y, w, h).to_image())
}
