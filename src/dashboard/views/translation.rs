//! Target language selector, translate button, and translated text

use egui::RichText;

use crate::controller::UserEvent;
use crate::dashboard::components::TextCard;
use crate::dashboard::state::DashboardState;
use crate::dashboard::theme::ThemeColors;
use crate::session::Session;
use crate::translate::TargetLanguage;

/// Render the translation section
///
/// Returns a language change to apply right away; the translate click is
/// queued on `state`.
pub fn render_translation_view(
    ui: &mut egui::Ui,
    session: &Session,
    state: &mut DashboardState,
) -> Option<UserEvent> {
    session.extraction()?;

    ui.add_space(12.0);
    ui.separator();
    ui.label(
        RichText::new("Text Translation")
            .size(20.0)
            .color(ThemeColors::ACCENT_PRIMARY)
            .strong(),
    );
    ui.add_space(6.0);

    let current = session.target_language().to_string();
    let mut selected = current.clone();
    let selected_text = TargetLanguage::from_code(&current)
        .map(|lang| lang.display_name().to_string())
        .unwrap_or_else(|| current.clone());

    ui.horizontal(|ui| {
        ui.label("Select Target Language");
        egui::ComboBox::from_id_salt("target_language")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for lang in TargetLanguage::ALL {
                    ui.selectable_value(&mut selected, lang.code().to_string(), lang.display_name());
                }
            });

        ui.add_space(16.0);
        if ui.add_enabled(!state.is_busy(), egui::Button::new("Translate")).clicked() {
            state.queue(UserEvent::Translate);
        }
    });

    if let Some(translation) = session.translation() {
        ui.add_space(12.0);
        let title = format!("Translated Text ({})", translation.language.display_name());
        TextCard::new(&title, &translation.text).show(ui);
    }

    (selected != current).then_some(UserEvent::SelectLanguage(selected))
}
