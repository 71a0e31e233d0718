//! Dashboard theme and styling
//!
//! Light theme with a navy accent for the dashboard UI.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

/// Light color palette
pub struct ThemeColors;

impl ThemeColors {
    // Background colors
    pub const BG_PAGE: Color32 = Color32::from_rgb(240, 242, 246);
    pub const BG_CARD: Color32 = Color32::from_rgb(255, 255, 255);
    pub const BG_WIDGET: Color32 = Color32::from_rgb(228, 232, 240);
    pub const BG_HOVER: Color32 = Color32::from_rgb(214, 220, 232);

    // Accent colors
    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(30, 58, 138);
    pub const ACCENT_SUCCESS: Color32 = Color32::from_rgb(22, 130, 70);
    pub const ACCENT_INFO: Color32 = Color32::from_rgb(37, 99, 235);
    pub const ACCENT_ERROR: Color32 = Color32::from_rgb(200, 40, 40);

    // Text colors
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(25, 28, 36);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(80, 86, 100);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(130, 136, 150);

    pub const BORDER: Color32 = Color32::from_rgb(210, 214, 224);
}

/// Apply the theme to egui
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = Visuals::light();

    visuals.window_fill = ThemeColors::BG_CARD;
    visuals.panel_fill = ThemeColors::BG_PAGE;
    visuals.faint_bg_color = ThemeColors::BG_WIDGET;
    visuals.extreme_bg_color = ThemeColors::BG_CARD;

    visuals.widgets.noninteractive.bg_fill = ThemeColors::BG_CARD;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT_SECONDARY);
    visuals.widgets.noninteractive.rounding = Rounding::same(5.0);

    // Buttons: white text on the accent color
    visuals.widgets.inactive.bg_fill = ThemeColors::ACCENT_PRIMARY;
    visuals.widgets.inactive.weak_bg_fill = ThemeColors::ACCENT_PRIMARY;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.inactive.rounding = Rounding::same(5.0);

    visuals.widgets.hovered.bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 220);
    visuals.widgets.hovered.weak_bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 220);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.hovered.rounding = Rounding::same(5.0);

    visuals.widgets.active.bg_fill = ThemeColors::ACCENT_PRIMARY;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.active.rounding = Rounding::same(5.0);

    visuals.widgets.open.bg_fill = ThemeColors::BG_HOVER;
    visuals.widgets.open.fg_stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);
    visuals.widgets.open.rounding = Rounding::same(5.0);

    visuals.selection.bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 60);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);

    visuals.hyperlink_color = ThemeColors::ACCENT_PRIMARY;
    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, ThemeColors::BORDER);
    visuals.menu_rounding = Rounding::same(5.0);

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(15.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(26.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
