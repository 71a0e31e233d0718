//! Inline success / info / error message

use egui::{Color32, RichText, Rounding};

use crate::controller::Notice;
use crate::dashboard::theme::{color_with_alpha, ThemeColors};

fn notice_color(notice: &Notice) -> Color32 {
    match notice {
        Notice::Info(_) => ThemeColors::ACCENT_INFO,
        Notice::Success(_) => ThemeColors::ACCENT_SUCCESS,
        Notice::Error(_) => ThemeColors::ACCENT_ERROR,
    }
}

/// Render a notice as a tinted banner
pub fn render_notice(ui: &mut egui::Ui, notice: &Notice) {
    let color = notice_color(notice);

    egui::Frame::none()
        .fill(color_with_alpha(color, 30))
        .rounding(Rounding::same(5.0))
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(notice.message()).color(color));
        });
}

/// Render a spinner with a label while an action runs
pub fn render_busy(ui: &mut egui::Ui, label: &str) {
    ui.horizontal(|ui| {
        ui.add(egui::Spinner::new().color(ThemeColors::ACCENT_PRIMARY));
        ui.label(RichText::new(label).color(ThemeColors::TEXT_SECONDARY));
    });
}
