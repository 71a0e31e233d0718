//! Annotated image section

use egui::RichText;

use crate::dashboard::components::{ensure_texture, render_image};
use crate::dashboard::state::DashboardState;
use crate::dashboard::theme::ThemeColors;
use crate::session::Session;

pub fn render_annotated_view(ui: &mut egui::Ui, session: &Session, state: &mut DashboardState) {
    let Some(extraction) = session.extraction() else {
        return;
    };

    ui.add_space(12.0);
    ui.separator();
    ui.label(
        RichText::new("Annotated Image")
            .size(20.0)
            .color(ThemeColors::ACCENT_PRIMARY)
            .strong(),
    );
    ui.add_space(6.0);

    ensure_texture(
        ui.ctx(),
        &mut state.annotated_texture,
        "annotated_image",
        &extraction.annotated,
    );

    if let Some(cached) = &state.annotated_texture {
        render_image(ui, cached, "Annotated Image");
    }
}
