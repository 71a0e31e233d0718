//! Presentation controller
//!
//! Turns user events into session updates. Every adapter call is made here,
//! and every adapter failure becomes a [`Notice::Error`] with the session left
//! as it was before the event.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AnnotationSettings;
use crate::imaging;
use crate::session::{Extraction, LoadedImage, Session, Translation};
use crate::translate::{TargetLanguage, Translator};
use crate::vision::{self, TextRecognizer};

/// Something the user did
#[derive(Debug, Clone)]
pub enum UserEvent {
    /// A file was provided
    Upload { name: String, bytes: Vec<u8> },
    /// Extract button
    Extract,
    /// Target language selector changed
    SelectLanguage(String),
    /// Translate button
    Translate,
}

/// Feedback shown to the user after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Info(m) | Notice::Success(m) | Notice::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Drives one session through upload, extraction and translation
#[derive(Clone)]
pub struct Controller {
    recognizer: Arc<dyn TextRecognizer>,
    translator: Arc<dyn Translator>,
    annotation: AnnotationSettings,
}

impl Controller {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        translator: Arc<dyn Translator>,
        annotation: AnnotationSettings,
    ) -> Self {
        Self { recognizer, translator, annotation }
    }

    /// Apply one event to the session
    pub fn handle(&self, session: &mut Session, event: UserEvent) -> Notice {
        debug!("Session {} handling {:?}", session.id(), event_name(&event));

        let notice = match event {
            UserEvent::Upload { name, bytes } => self.upload(session, name, &bytes),
            UserEvent::Extract => self.extract(session),
            UserEvent::SelectLanguage(code) => {
                session.set_target_language(code.as_str());
                Notice::Info(format!("Target language set to {}", display_code(&code)))
            }
            UserEvent::Translate => self.translate(session),
        };

        if let Notice::Error(message) = &notice {
            warn!("Session {}: {}", session.id(), message);
        }
        notice
    }

    fn upload(&self, session: &mut Session, name: String, bytes: &[u8]) -> Notice {
        if !imaging::is_supported_upload(&name) {
            return Notice::Error(format!(
                "Unsupported file '{}': upload a jpg, jpeg or png image",
                name
            ));
        }

        let fingerprint = imaging::fingerprint(bytes);
        if let Some(current) = session.upload().filter(|u| u.fingerprint == fingerprint) {
            debug!("Upload {} matches {}, keeping current session state", name, current.name);
            return Notice::Info(format!("Uploaded: {}", current.name));
        }

        let image = match imaging::load_image(bytes) {
            Ok(image) => image,
            Err(e) => return Notice::Error(format!("Could not load {}: {}", name, e)),
        };

        info!("Loaded {} ({}x{})", name, image.width(), image.height());
        session.install_upload(LoadedImage {
            name: name.clone(),
            fingerprint,
            image: Arc::new(image),
        });

        Notice::Info(format!("Uploaded: {}", name))
    }

    fn extract(&self, session: &mut Session) -> Notice {
        let Some(upload) = session.upload() else {
            return Notice::Error("Upload an image before extracting text".to_string());
        };
        let image = Arc::clone(&upload.image);

        let detections = match self.recognizer.detect(&image) {
            Ok(detections) => detections,
            Err(e) => return Notice::Error(e.to_string()),
        };

        let full_text = vision::full_text(&detections);
        let annotated = imaging::annotate(&image, &detections, &self.annotation);
        info!("Extracted {} text regions", detections.len());

        session.store_extraction(Extraction {
            detections,
            full_text,
            annotated: Arc::new(annotated),
        });

        Notice::Success("Text extracted successfully!".to_string())
    }

    fn translate(&self, session: &mut Session) -> Notice {
        let Some(extraction) = session.extraction() else {
            return Notice::Error("Extract text before translating".to_string());
        };

        let code = session.target_language().to_string();
        let result = self
            .translator
            .translate(&extraction.full_text, &code)
            .and_then(|text| {
                TargetLanguage::from_code(&code)
                    .map(|language| Translation { language, text })
                    .ok_or_else(|| crate::error::TranslationError::UnsupportedLanguage(code.clone()))
            });

        match result {
            Ok(translation) => {
                info!("Translated via {} into {}", self.translator.name(), translation.language);
                session.store_translation(translation);
                Notice::Success("Translation Complete!".to_string())
            }
            Err(e) => Notice::Error(format!("Translation failed: {}", e)),
        }
    }
}

fn event_name(event: &UserEvent) -> &'static str {
    match event {
        UserEvent::Upload { .. } => "upload",
        UserEvent::Extract => "extract",
        UserEvent::SelectLanguage(_) => "select-language",
        UserEvent::Translate => "translate",
    }
}

fn display_code(code: &str) -> String {
    match TargetLanguage::from_code(code) {
        Some(language) => language.to_string(),
        None => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::loader::tests::encode_test_image;
    use crate::session::SessionPhase;
    use crate::testing::{StubRecognizer, StubTranslator};
    use image::ImageFormat;

    fn setup(recognizer: StubRecognizer) -> (Controller, Arc<StubRecognizer>, Arc<StubTranslator>) {
        let recognizer = Arc::new(recognizer);
        let translator = Arc::new(StubTranslator::new());
        let controller = Controller::new(
            recognizer.clone(),
            translator.clone(),
            AnnotationSettings::default(),
        );
        (controller, recognizer, translator)
    }

    fn upload(name: &str, bytes: Vec<u8>) -> UserEvent {
        UserEvent::Upload { name: name.to_string(), bytes }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_test_image(width, height, ImageFormat::Png)
    }

    #[test]
    fn test_end_to_end_two_lines() {
        let (controller, recognizer, _) = setup(StubRecognizer::lines(&["Hello", "World"]));
        let mut session = Session::new("hi");

        let notice = controller.handle(&mut session, upload("sign.png", png(200, 120)));
        assert_eq!(notice, Notice::Info("Uploaded: sign.png".to_string()));
        assert_eq!(session.phase(), SessionPhase::ImageLoaded);

        let notice = controller.handle(&mut session, UserEvent::Extract);
        assert_eq!(notice, Notice::Success("Text extracted successfully!".to_string()));
        assert_eq!(session.phase(), SessionPhase::TextExtracted);

        let extraction = session.extraction().unwrap();
        assert_eq!(extraction.detections.len(), 2);
        assert_eq!(extraction.full_text, "Hello World");
        assert_eq!(extraction.annotated.dimensions(), (200, 120));
        // Top edges of both rectangles are drawn
        assert_eq!(extraction.annotated.get_pixel(50, 10).0, [0, 255, 0]);
        assert_eq!(extraction.annotated.get_pixel(50, 40).0, [0, 255, 0]);
        // Original stays clean
        assert_eq!(session.upload().unwrap().image.get_pixel(50, 10).0, [0, 0, 255]);

        controller.handle(&mut session, UserEvent::SelectLanguage("es".to_string()));
        let notice = controller.handle(&mut session, UserEvent::Translate);
        assert_eq!(notice, Notice::Success("Translation Complete!".to_string()));
        assert_eq!(session.phase(), SessionPhase::Translated);

        let translation = session.translation().unwrap();
        assert_eq!(translation.language, TargetLanguage::Spanish);
        assert_eq!(translation.text, "[es] Hello World");
        assert_eq!(recognizer.calls(), 1);
    }

    #[test]
    fn test_extract_requires_image() {
        let (controller, recognizer, _) = setup(StubRecognizer::lines(&["x"]));
        let mut session = Session::new("hi");

        assert!(controller.handle(&mut session, UserEvent::Extract).is_error());
        assert_eq!(session.phase(), SessionPhase::NoImage);
        assert_eq!(recognizer.calls(), 0);
    }

    #[test]
    fn test_translate_requires_extraction() {
        let (controller, _, translator) = setup(StubRecognizer::lines(&["x"]));
        let mut session = Session::new("hi");
        controller.handle(&mut session, upload("a.png", png(20, 20)));

        assert!(controller.handle(&mut session, UserEvent::Translate).is_error());
        assert_eq!(session.phase(), SessionPhase::ImageLoaded);
        assert_eq!(translator.calls(), 0);
    }

    #[test]
    fn test_rejected_uploads_leave_session_unchanged() {
        let (controller, _, _) = setup(StubRecognizer::lines(&["x"]));
        let mut session = Session::new("hi");
        controller.handle(&mut session, upload("a.png", png(20, 20)));
        controller.handle(&mut session, UserEvent::Extract);

        let notice = controller.handle(&mut session, upload("anim.gif", png(20, 20)));
        assert!(notice.is_error());

        let notice = controller.handle(&mut session, upload("broken.png", b"not an image".to_vec()));
        assert!(notice.message().contains("broken.png"));

        assert_eq!(session.phase(), SessionPhase::TextExtracted);
        assert_eq!(session.upload().unwrap().name, "a.png");
    }

    #[test]
    fn test_same_upload_is_memoized() {
        let (controller, recognizer, _) = setup(StubRecognizer::lines(&["Hello"]));
        let mut session = Session::new("hi");
        let bytes = png(30, 30);

        controller.handle(&mut session, upload("a.png", bytes.clone()));
        controller.handle(&mut session, UserEvent::Extract);
        let before = Arc::clone(&session.upload().unwrap().image);

        controller.handle(&mut session, upload("a.png", bytes));

        assert_eq!(session.phase(), SessionPhase::TextExtracted);
        assert!(Arc::ptr_eq(&before, &session.upload().unwrap().image));
        assert_eq!(recognizer.calls(), 1);
    }

    #[test]
    fn test_renamed_duplicate_reports_kept_name() {
        let (controller, recognizer, _) = setup(StubRecognizer::lines(&["Hello"]));
        let mut session = Session::new("hi");
        let bytes = png(30, 30);

        controller.handle(&mut session, upload("a.png", bytes.clone()));
        controller.handle(&mut session, UserEvent::Extract);

        let notice = controller.handle(&mut session, upload("copy of a.png", bytes));
        assert_eq!(notice, Notice::Info("Uploaded: a.png".to_string()));
        assert_eq!(session.upload().unwrap().name, "a.png");
        assert_eq!(session.phase(), SessionPhase::TextExtracted);
        assert_eq!(recognizer.calls(), 1);
    }

    #[test]
    fn test_new_upload_resets_session() {
        let (controller, _, _) = setup(StubRecognizer::lines(&["Hello"]));
        let mut session = Session::new("hi");
        controller.handle(&mut session, upload("a.png", png(30, 30)));
        controller.handle(&mut session, UserEvent::Extract);
        controller.handle(&mut session, UserEvent::Translate);
        assert_eq!(session.phase(), SessionPhase::Translated);

        controller.handle(&mut session, upload("b.jpg", encode_test_image(40, 40, ImageFormat::Jpeg)));

        assert_eq!(session.phase(), SessionPhase::ImageLoaded);
        assert_eq!(session.upload().unwrap().image.dimensions(), (40, 40));
    }

    #[test]
    fn test_reextract_overwrites() {
        let (controller, recognizer, _) = setup(StubRecognizer::lines(&["Hello", "World"]));
        let mut session = Session::new("hi");
        controller.handle(&mut session, upload("a.png", png(200, 120)));

        controller.handle(&mut session, UserEvent::Extract);
        controller.handle(&mut session, UserEvent::Extract);

        let extraction = session.extraction().unwrap();
        assert_eq!(extraction.detections.len(), 2);
        assert_eq!(extraction.full_text, "Hello World");
        assert_eq!(recognizer.calls(), 2);
    }

    #[test]
    fn test_engine_failure_keeps_state() {
        let (controller, _, _) = setup(StubRecognizer::failing());
        let mut session = Session::new("hi");
        controller.handle(&mut session, upload("a.png", png(20, 20)));

        let notice = controller.handle(&mut session, UserEvent::Extract);
        assert!(notice.message().contains("models missing"));
        assert_eq!(session.phase(), SessionPhase::ImageLoaded);
    }

    #[test]
    fn test_failed_translate_keeps_previous_translation() {
        let (controller, _, translator) = setup(StubRecognizer::lines(&["Hello"]));
        let mut session = Session::new("fr");
        controller.handle(&mut session, upload("a.png", png(20, 20)));
        controller.handle(&mut session, UserEvent::Extract);
        controller.handle(&mut session, UserEvent::Translate);

        translator.set_failing(true);
        controller.handle(&mut session, UserEvent::SelectLanguage("de".to_string()));
        let notice = controller.handle(&mut session, UserEvent::Translate);

        assert_eq!(
            notice,
            Notice::Error("Translation failed: network error: connection reset".to_string())
        );
        let translation = session.translation().unwrap();
        assert_eq!(translation.language, TargetLanguage::French);
        assert_eq!(translation.text, "[fr] Hello");
    }

    #[test]
    fn test_unsupported_language_rejected() {
        let (controller, recognizer, _) = setup(StubRecognizer::lines(&["Hello"]));
        let mut session = Session::new("hi");
        controller.handle(&mut session, upload("a.png", png(20, 20)));
        controller.handle(&mut session, UserEvent::Extract);

        controller.handle(&mut session, UserEvent::SelectLanguage("xx".to_string()));
        let notice = controller.handle(&mut session, UserEvent::Translate);

        assert!(notice.message().starts_with("Translation failed: unsupported target language"));
        assert_eq!(session.phase(), SessionPhase::TextExtracted);
        assert_eq!(recognizer.calls(), 1);
    }

    #[test]
    fn test_retranslate_does_not_reextract() {
        let (controller, recognizer, _) = setup(StubRecognizer::lines(&["Hello"]));
        let mut session = Session::new("hi");
        controller.handle(&mut session, upload("a.png", png(20, 20)));
        controller.handle(&mut session, UserEvent::Extract);

        for code in ["es", "fr", "de"] {
            controller.handle(&mut session, UserEvent::SelectLanguage(code.to_string()));
            controller.handle(&mut session, UserEvent::Translate);
        }

        assert_eq!(session.translation().unwrap().text, "[de] Hello");
        assert_eq!(recognizer.calls(), 1);
    }
}
