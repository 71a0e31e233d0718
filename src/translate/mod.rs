//! Translation Layer
//!
//! Target languages offered to the user and the translator that turns the
//! extracted text into one of them.

use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::config::TranslationSettings;
use crate::error::TranslationError;

/// Languages offered in the target selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    Hindi,
    Spanish,
    French,
    German,
}

impl TargetLanguage {
    /// Selector order; the first entry is the default
    pub const ALL: [TargetLanguage; 4] = [
        TargetLanguage::Hindi,
        TargetLanguage::Spanish,
        TargetLanguage::French,
        TargetLanguage::German,
    ];

    /// Parse a two-letter language code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    pub fn code(&self) -> &'static str {
        match self {
            TargetLanguage::Hindi => "hi",
            TargetLanguage::Spanish => "es",
            TargetLanguage::French => "fr",
            TargetLanguage::German => "de",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::Hindi => "Hindi",
            TargetLanguage::Spanish => "Spanish",
            TargetLanguage::French => "French",
            TargetLanguage::German => "German",
        }
    }
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.code())
    }
}

/// Trait for translation backends
pub trait Translator: Send + Sync {
    /// Translate `text` into the language identified by `target_code`
    fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError>;

    /// Get the translator name
    fn name(&self) -> &str;
}

/// Translator backed by the public Google Translate web endpoint
pub struct GoogleTranslator {
    settings: TranslationSettings,
}

impl GoogleTranslator {
    pub fn new(settings: TranslationSettings) -> Self {
        Self { settings }
    }

    async fn request(&self, text: &str, target: TargetLanguage) -> Result<String, TranslationError> {
        // New client per call; nothing is pooled between translations
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let response = client
            .get(&self.settings.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", self.settings.source_language.as_str()),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TranslationError::Service {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| body.chars().take(200).collect()),
            });
        }

        parse_response(&body)
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        let target = TargetLanguage::from_code(target_code)
            .ok_or_else(|| TranslationError::UnsupportedLanguage(target_code.to_string()))?;

        if text.trim().is_empty() {
            debug!("Nothing to translate");
            return Ok(String::new());
        }

        info!("Translating {} chars to {}", text.chars().count(), target);

        let rt = Runtime::new()
            .map_err(|e| TranslationError::Network(format!("failed to start runtime: {}", e)))?;
        let translated = rt.block_on(self.request(text, target)).inspect_err(|e| {
            warn!("Translation failed: {}", e);
        })?;

        debug!("Translated into {} chars", translated.chars().count());
        Ok(translated)
    }

    fn name(&self) -> &str {
        "Google Translate"
    }
}

/// Extract the translation from the endpoint's nested-array body
///
/// The first element lists segments; each segment's first element is the
/// translated chunk. The remaining elements (source echo, detected language,
/// alternatives) are ignored.
pub fn parse_response(body: &str) -> Result<String, TranslationError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| TranslationError::MalformedResponse(e.to_string()))?;

    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslationError::MalformedResponse("missing segment list".to_string()))?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(chunk) = segment.get(0).and_then(|c| c.as_str()) {
            translated.push_str(chunk);
        }
    }

    if let Some(source) = value.get(2).and_then(|v| v.as_str()) {
        debug!("Detected source language: {}", source);
    }

    Ok(translated)
}
