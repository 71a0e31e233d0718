//! Dashboard UI Module
//!
//! A single-page window for uploading an image, extracting and translating
//! its text, and viewing the annotated result.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;
pub mod views;

pub use app::run_dashboard;
