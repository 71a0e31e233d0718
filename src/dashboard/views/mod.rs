//! Dashboard views

pub mod annotated;
pub mod extraction;
pub mod translation;
pub mod upload;

pub use annotated::render_annotated_view;
pub use extraction::render_extraction_view;
pub use translation::render_translation_view;
pub use upload::render_upload_view;
