//! Per-user session state
//!
//! Holds every artifact produced so far for one user: the uploaded image,
//! the extraction and the latest translation. The phase is derived from which
//! of them exist.

use image::RgbImage;
use std::sync::Arc;
use uuid::Uuid;

use crate::translate::TargetLanguage;
use crate::vision::Detection;

/// Where a session stands in the upload → extract → translate flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NoImage,
    ImageLoaded,
    TextExtracted,
    Translated,
}

/// A decoded upload
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// File name as uploaded
    pub name: String,
    /// SHA-256 of the uploaded bytes
    pub fingerprint: String,
    pub image: Arc<RgbImage>,
}

/// Result of running OCR over the current image
#[derive(Debug, Clone)]
pub struct Extraction {
    pub detections: Vec<Detection>,
    /// Detection texts joined with single spaces
    pub full_text: String,
    /// Copy of the image with detections drawn on it
    pub annotated: Arc<RgbImage>,
}

/// Latest successful translation of the extracted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub language: TargetLanguage,
    pub text: String,
}

/// All state belonging to one user session
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    upload: Option<LoadedImage>,
    extraction: Option<Extraction>,
    translation: Option<Translation>,
    target_language: String,
}

impl Session {
    /// Fresh session with the given target language preselected
    pub fn new(default_target: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            upload: None,
            extraction: None,
            translation: None,
            target_language: default_target.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.upload, &self.extraction, &self.translation) {
            (None, _, _) => SessionPhase::NoImage,
            (Some(_), None, _) => SessionPhase::ImageLoaded,
            (Some(_), Some(_), None) => SessionPhase::TextExtracted,
            (Some(_), Some(_), Some(_)) => SessionPhase::Translated,
        }
    }

    pub fn upload(&self) -> Option<&LoadedImage> {
        self.upload.as_ref()
    }

    pub fn extraction(&self) -> Option<&Extraction> {
        self.extraction.as_ref()
    }

    pub fn translation(&self) -> Option<&Translation> {
        self.translation.as_ref()
    }

    /// Currently selected target language code (not validated)
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn set_target_language(&mut self, code: impl Into<String>) {
        self.target_language = code.into();
    }

    /// Start a fresh upload context holding `image`
    ///
    /// Drops every artifact derived from the previous image; the language
    /// selection survives.
    pub fn install_upload(&mut self, image: LoadedImage) {
        self.extraction = None;
        self.translation = None;
        self.upload = Some(image);
    }

    /// Store a new extraction, replacing any previous one
    pub fn store_extraction(&mut self, extraction: Extraction) {
        self.extraction = Some(extraction);
    }

    /// Store a new translation, replacing any previous one
    pub fn store_translation(&mut self, translation: Translation) {
        self.translation = Some(translation);
    }
}
