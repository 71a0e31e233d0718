//! Original image beside the extract button and extracted text

use crate::controller::UserEvent;
use crate::dashboard::components::{ensure_texture, render_image, TextCard};
use crate::dashboard::state::DashboardState;
use crate::session::Session;

/// Render the original image and extraction controls
pub fn render_extraction_view(ui: &mut egui::Ui, session: &Session, state: &mut DashboardState) {
    let Some(upload) = session.upload() else {
        return;
    };

    ensure_texture(
        ui.ctx(),
        &mut state.original_texture,
        "original_image",
        &upload.image,
    );

    ui.columns(2, |columns| {
        if let Some(cached) = &state.original_texture {
            render_image(&mut columns[0], cached, "Uploaded Image");
        }

        let ui = &mut columns[1];
        let label = if session.extraction().is_some() {
            "Extract Again"
        } else {
            "Extract Text"
        };
        if ui.add_enabled(!state.is_busy(), egui::Button::new(label)).clicked() {
            state.queue(UserEvent::Extract);
        }

        if let Some(extraction) = session.extraction() {
            ui.add_space(12.0);
            TextCard::new("Extracted Text", &extraction.full_text).show(ui);
        }
    });
}
