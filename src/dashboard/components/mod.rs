//! Reusable UI components for the dashboard

pub mod image_panel;
pub mod notice_banner;
pub mod text_card;

pub use image_panel::{ensure_texture, render_image};
pub use notice_banner::{render_busy, render_notice};
pub use text_card::TextCard;
