//! Image display backed by a cached texture

use egui::{ColorImage, RichText, TextureOptions};
use image::RgbImage;
use std::sync::Arc;

use crate::dashboard::state::CachedTexture;
use crate::dashboard::theme::ThemeColors;

/// Upload `image` to the GPU unless the cached texture already shows it
pub fn ensure_texture(
    ctx: &egui::Context,
    slot: &mut Option<CachedTexture>,
    name: &str,
    image: &Arc<RgbImage>,
) {
    if slot.as_ref().is_some_and(|cached| Arc::ptr_eq(&cached.source, image)) {
        return;
    }

    let size = [image.width() as usize, image.height() as usize];
    let color_image = ColorImage::from_rgb(size, image.as_raw());
    let texture = ctx.load_texture(name, color_image, TextureOptions::LINEAR);

    *slot = Some(CachedTexture {
        source: Arc::clone(image),
        texture,
    });
}

/// Show a cached texture scaled to the available width, with a caption
pub fn render_image(ui: &mut egui::Ui, cached: &CachedTexture, caption: &str) {
    let max_width = ui.available_width();
    ui.add(
        egui::Image::new(&cached.texture)
            .max_width(max_width)
            .maintain_aspect_ratio(true)
            .shrink_to_fit(),
    );
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(caption).size(13.0).color(ThemeColors::TEXT_MUTED));
    });
}
