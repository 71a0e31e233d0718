//! White card holding a block of text

use egui::{RichText, Rounding, Stroke};

use crate::dashboard::theme::ThemeColors;

/// A titled card showing selectable text
pub struct TextCard<'a> {
    pub title: &'a str,
    pub text: &'a str,
}

impl<'a> TextCard<'a> {
    pub fn new(title: &'a str, text: &'a str) -> Self {
        Self { title, text }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new(self.title)
                .size(18.0)
                .color(ThemeColors::ACCENT_PRIMARY)
                .strong(),
        );
        ui.add_space(6.0);

        egui::Frame::none()
            .fill(ThemeColors::BG_CARD)
            .stroke(Stroke::new(1.0, ThemeColors::BORDER))
            .rounding(Rounding::same(5.0))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                if self.text.is_empty() {
                    ui.label(RichText::new("No text found").italics().color(ThemeColors::TEXT_MUTED));
                } else {
                    ui.add(
                        egui::Label::new(RichText::new(self.text).color(ThemeColors::TEXT_PRIMARY))
                            .selectable(true)
                            .wrap(),
                    );
                }
            });
    }
}
