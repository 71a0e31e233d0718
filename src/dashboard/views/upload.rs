//! Upload row: title, path input, and current file

use egui::RichText;
use std::path::Path;

use crate::controller::Notice;
use crate::dashboard::state::DashboardState;
use crate::dashboard::theme::ThemeColors;
use crate::session::Session;

/// Render the page header and upload controls
pub fn render_upload_view(ui: &mut egui::Ui, session: &Session, state: &mut DashboardState) {
    ui.heading(
        RichText::new("Text Extraction and Translation")
            .color(ThemeColors::ACCENT_PRIMARY)
            .strong(),
    );
    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(RichText::new("Upload Image").size(18.0).strong());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        let input_width = (ui.available_width() - 90.0).max(120.0);
        let input = ui.add(
            egui::TextEdit::singleline(&mut state.path_input)
                .hint_text("Path to a jpg, jpeg or png file")
                .desired_width(input_width),
        );
        let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let load = ui.add_enabled(!state.is_busy(), egui::Button::new("Load"));
        if (load.clicked() || submitted) && !state.path_input.trim().is_empty() {
            let path = state.path_input.trim().to_string();
            match crate::app::read_upload(Path::new(&path)) {
                Ok(event) => state.queue(event),
                Err(e) => state.notice = Some(Notice::Error(format!("{:#}", e))),
            }
        }
    });

    ui.label(
        RichText::new("or drop an image onto the window")
            .size(13.0)
            .color(ThemeColors::TEXT_MUTED),
    );

    if let Some(upload) = session.upload() {
        ui.add_space(8.0);
        egui::Frame::none()
            .fill(ThemeColors::BG_WIDGET)
            .rounding(egui::Rounding::same(5.0))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(format!("Uploaded: {}", upload.name));
            });
    }
}
