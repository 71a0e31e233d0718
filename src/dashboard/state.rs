//! Dashboard view state
//!
//! Window-only state. Everything the user produced lives in the
//! [`Session`](crate::session::Session); this only tracks input widgets,
//! the last notice, the queued action, and GPU textures.

use egui::TextureHandle;
use image::RgbImage;
use std::sync::Arc;

use crate::controller::{Notice, UserEvent};

/// A clicked action waiting to run
///
/// Actions run one frame after the click so the spinner gets painted first.
#[derive(Debug)]
pub struct PendingAction {
    pub event: UserEvent,
    /// Set once a frame showing the spinner has been drawn
    pub spinner_shown: bool,
}

impl PendingAction {
    pub fn new(event: UserEvent) -> Self {
        Self { event, spinner_shown: false }
    }

    /// Label for the busy indicator
    pub fn label(&self) -> &'static str {
        match self.event {
            UserEvent::Upload { .. } => "Loading image...",
            UserEvent::Extract => "Extracting text...",
            UserEvent::Translate => "Translating...",
            UserEvent::SelectLanguage(_) => "Updating...",
        }
    }
}

/// Texture uploaded for a specific image
pub struct CachedTexture {
    /// Image the texture was built from; held so its identity stays unique
    pub source: Arc<RgbImage>,
    pub texture: TextureHandle,
}

impl std::fmt::Debug for CachedTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedTexture")
            .field("source", &self.source.dimensions())
            .field("texture", &"<TextureHandle>")
            .finish()
    }
}

/// State of the dashboard window
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Path typed into the upload row
    pub path_input: String,
    /// Feedback from the last action
    pub notice: Option<Notice>,
    /// Action queued for the next frame
    pub pending: Option<PendingAction>,
    /// Texture of the uploaded image
    pub original_texture: Option<CachedTexture>,
    /// Texture of the annotated image
    pub annotated_texture: Option<CachedTexture>,
}

impl DashboardState {
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Queue an action unless one is already waiting
    pub fn queue(&mut self, event: UserEvent) {
        if self.pending.is_none() {
            self.pending = Some(PendingAction::new(event));
        }
    }
}
