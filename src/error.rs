//! Error types for the external-library boundaries
//!
//! Each adapter returns its own error enum so the controller can branch on
//! the failure and turn it into a user-visible notice.

use thiserror::Error;

/// The uploaded bytes could not be turned into an image
#[derive(Debug, Error)]
pub enum DecodeError {
    /// File type outside jpg/jpeg/png
    #[error("unsupported file type '{0}' (expected jpg, jpeg or png)")]
    UnsupportedFormat(String),
    /// Bytes claim a supported format but fail to decode
    #[error("could not decode image: {0}")]
    Malformed(#[from] image::ImageError),
    /// Nothing was uploaded
    #[error("uploaded file is empty")]
    Empty,
}

/// The OCR engine could not be built or run
#[derive(Debug, Error)]
pub enum EngineError {
    /// Models missing, download refused, or ONNX session creation failed
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
    /// Inference failed on an otherwise working engine
    #[error("OCR inference failed: {0}")]
    Inference(String),
}

/// The translation call failed
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("unsupported target language '{0}' (expected one of hi, es, fr, de)")]
    UnsupportedLanguage(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("translation service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("unexpected response from translation service: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        TranslationError::Network(err.to_string())
    }
}
