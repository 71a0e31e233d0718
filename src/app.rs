//! Application wiring
//!
//! Builds the production adapters and drives a session without a window for
//! scripted use.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::controller::{Controller, Notice, UserEvent};
use crate::session::Session;
use crate::translate::GoogleTranslator;
use crate::vision::OcrAdapter;

/// Build a controller backed by the PaddleOCR engine and Google Translate
pub fn build_controller(config: &AppConfig) -> Controller {
    let recognizer = Arc::new(OcrAdapter::new(config.ocr.clone()));
    let translator = Arc::new(GoogleTranslator::new(config.translation.clone()));
    Controller::new(recognizer, translator, config.annotation.clone())
}

/// Read a file from disk into an upload event
pub fn read_upload(path: &Path) -> Result<UserEvent> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(UserEvent::Upload { name, bytes })
}

/// What a headless run should do after extracting text
#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub image: PathBuf,
    /// Target language code; the session default when None
    pub language: Option<String>,
    pub translate: bool,
    /// Where to write the annotated PNG
    pub annotated_out: Option<PathBuf>,
}

/// Outcome of a headless run
#[derive(Debug, Clone)]
pub struct HeadlessReport {
    pub detections: usize,
    pub extracted_text: String,
    pub translated_text: Option<String>,
}

/// Upload, extract, and optionally translate and export, stopping at the first error
pub fn run_headless(
    controller: &Controller,
    session: &mut Session,
    options: &HeadlessOptions,
) -> Result<HeadlessReport> {
    info!("Running headless on {:?}", options.image);

    dispatch(controller, session, read_upload(&options.image)?)?;
    dispatch(controller, session, UserEvent::Extract)?;

    if let Some(code) = &options.language {
        dispatch(controller, session, UserEvent::SelectLanguage(code.clone()))?;
    }
    if options.translate {
        dispatch(controller, session, UserEvent::Translate)?;
    }

    let extraction = session
        .extraction()
        .context("Extraction finished without a result")?;

    if let Some(out) = &options.annotated_out {
        extraction
            .annotated
            .save_with_format(out, image::ImageFormat::Png)
            .with_context(|| format!("Failed to write annotated image to {:?}", out))?;
        info!("Annotated image written to {:?}", out);
    }

    Ok(HeadlessReport {
        detections: extraction.detections.len(),
        extracted_text: extraction.full_text.clone(),
        translated_text: session.translation().map(|t| t.text.clone()),
    })
}

fn dispatch(controller: &Controller, session: &mut Session, event: UserEvent) -> Result<()> {
    match controller.handle(session, event) {
        Notice::Error(message) => anyhow::bail!(message),
        notice => {
            info!("{}", notice.message());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnnotationSettings;
    use crate::imaging::loader::tests::encode_test_image;
    use crate::testing::{StubRecognizer, StubTranslator};
    use image::ImageFormat;
    use tempfile::TempDir;

    fn stub_controller(recognizer: StubRecognizer) -> Controller {
        Controller::new(
            Arc::new(recognizer),
            Arc::new(StubTranslator::new()),
            AnnotationSettings::default(),
        )
    }

    fn write_png(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, encode_test_image(160, 120, ImageFormat::Png)).unwrap();
        path
    }

    #[test]
    fn test_read_upload_uses_file_name() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "menu.png");

        match read_upload(&path).unwrap() {
            UserEvent::Upload { name, bytes } => {
                assert_eq!(name, "menu.png");
                assert!(!bytes.is_empty());
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(read_upload(&dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn test_headless_translate_and_export() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("annotated.png");
        let controller = stub_controller(StubRecognizer::lines(&["Hello", "World"]));
        let mut session = Session::new("hi");

        let report = run_headless(
            &controller,
            &mut session,
            &HeadlessOptions {
                image: write_png(&dir, "sign.png"),
                language: Some("es".to_string()),
                translate: true,
                annotated_out: Some(out.clone()),
            },
        )
        .unwrap();

        assert_eq!(report.detections, 2);
        assert_eq!(report.extracted_text, "Hello World");
        assert_eq!(report.translated_text.as_deref(), Some("[es] Hello World"));

        let written = image::open(&out).unwrap();
        assert_eq!((written.width(), written.height()), (160, 120));
    }

    #[test]
    fn test_headless_without_translation() {
        let dir = TempDir::new().unwrap();
        let controller = stub_controller(StubRecognizer::lines(&["Hello"]));
        let mut session = Session::new("hi");

        let report = run_headless(
            &controller,
            &mut session,
            &HeadlessOptions {
                image: write_png(&dir, "sign.png"),
                ..HeadlessOptions::default()
            },
        )
        .unwrap();

        assert_eq!(report.extracted_text, "Hello");
        assert!(report.translated_text.is_none());
    }

    #[test]
    fn test_headless_stops_on_engine_error() {
        let dir = TempDir::new().unwrap();
        let controller = stub_controller(StubRecognizer::failing());
        let mut session = Session::new("hi");

        let err = run_headless(
            &controller,
            &mut session,
            &HeadlessOptions {
                image: write_png(&dir, "sign.png"),
                translate: true,
                ..HeadlessOptions::default()
            },
        )
        .unwrap_err();

        assert!(err.to_string().contains("models missing"));
    }

    #[test]
    fn test_headless_rejects_unsupported_language() {
        let dir = TempDir::new().unwrap();
        let controller = stub_controller(StubRecognizer::lines(&["Hello"]));
        let mut session = Session::new("hi");

        let err = run_headless(
            &controller,
            &mut session,
            &HeadlessOptions {
                image: write_png(&dir, "sign.png"),
                language: Some("xx".to_string()),
                translate: true,
                annotated_out: None,
            },
        )
        .unwrap_err();

        assert!(err.to_string().starts_with("Translation failed"));
    }
}
