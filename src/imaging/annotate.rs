//! Annotation of OCR detections on a copy of the source image
//!
//! Every detection gets a rectangle spanning its first and third polygon
//! corners. Its text is written at a fixed column, one line further down per
//! detection. The stacking is a plain running offset, not a layout pass: with
//! more than roughly `(height - label_start_y) / label_step` detections the
//! labels run past the bottom edge, and long texts can overlap the boxes.

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, warn};

use crate::config::AnnotationSettings;
use crate::vision::Detection;

/// One rectangle and its label, in image coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    /// Top-left corner of the rectangle
    pub top_left: (i32, i32),
    /// Bottom-right corner of the rectangle (inclusive)
    pub bottom_right: (i32, i32),
    /// Text drawn for this detection
    pub label: String,
    /// Baseline-left position of the label
    pub label_origin: (i32, i32),
}

/// Compute where each detection's rectangle and label go
pub fn layout(detections: &[Detection], style: &AnnotationSettings) -> Vec<Mark> {
    let mut baseline = style.label_start_y;

    detections
        .iter()
        .map(|detection| {
            let (ax, ay) = coerce(detection.polygon[0]);
            let (bx, by) = coerce(detection.polygon[2]);

            let mark = Mark {
                top_left: (ax.min(bx), ay.min(by)),
                bottom_right: (ax.max(bx), ay.max(by)),
                label: detection.text.clone(),
                label_origin: (style.label_x, baseline),
            };
            baseline += style.label_step;
            mark
        })
        .collect()
}

/// Draw all detections onto a copy of `image`
pub fn annotate(image: &RgbImage, detections: &[Detection], style: &AnnotationSettings) -> RgbImage {
    let mut canvas = image.clone();
    let marks = layout(detections, style);
    let color = Rgb(style.color);

    let font = match FontRef::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("Label font unavailable, drawing rectangles only: {}", e);
            None
        }
    };
    let scale = PxScale::from(style.font_px);

    for mark in &marks {
        draw_thick_rect(&mut canvas, mark, style.stroke_width, color);

        if let Some(ref font) = font {
            if !mark.label.is_empty() {
                let (x, baseline) = mark.label_origin;
                let top = baseline - style.font_px.round() as i32;
                draw_text_mut(&mut canvas, color, x, top, scale, font, &mark.label);
            }
        }
    }

    debug!("Annotated {} detections on {}x{} image", marks.len(), canvas.width(), canvas.height());
    canvas
}

/// Truncate a float coordinate toward zero
fn coerce(point: (f32, f32)) -> (i32, i32) {
    (point.0.trunc() as i32, point.1.trunc() as i32)
}

/// Outline centered on the mark's edges, `stroke` pixels wide
fn draw_thick_rect(canvas: &mut RgbImage, mark: &Mark, stroke: u32, color: Rgb<u8>) {
    let (x0, y0) = mark.top_left;
    let (x1, y1) = mark.bottom_right;
    let stroke = stroke.max(1) as i32;
    let half = stroke / 2;

    for i in 0..stroke {
        let grow = half - i;
        let width = x1 - x0 + 1 + 2 * grow;
        let height = y1 - y0 + 1 + 2 * grow;
        if width <= 0 || height <= 0 {
            continue;
        }
        let rect = Rect::at(x0 - grow, y0 - grow).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}
