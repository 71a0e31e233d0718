//! Image decoding and annotation

pub mod annotate;
pub mod loader;

pub use annotate::annotate;
pub use loader::{fingerprint, is_supported_upload, load_image};
