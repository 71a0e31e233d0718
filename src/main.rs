//! LingoLens - extract, translate, and annotate text in images
//!
//! Loads an image, reads its text with PaddleOCR, translates it, and shows
//! the recognized regions drawn on the original.

mod app;
mod config;
mod controller;
mod dashboard;
mod error;
mod imaging;
mod session;
mod storage;
mod translate;
mod vision;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::app::HeadlessOptions;
use crate::session::Session;

/// LingoLens - OCR, translation, and annotation for images
#[derive(Parser, Debug)]
#[command(name = "lingolens")]
#[command(about = "Extract text from an image, translate it, and view the detected regions")]
struct Args {
    /// Image to load at start-up (jpg, jpeg or png)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Target language code (hi, es, fr, de)
    #[arg(short, long)]
    language: Option<String>,

    /// Run without a window; requires --image
    #[arg(long, requires = "image")]
    headless: bool,

    /// Headless: also translate the extracted text
    #[arg(long, requires = "headless")]
    translate: bool,

    /// Headless: write the annotated image to this PNG file
    #[arg(long, requires = "headless")]
    annotated_out: Option<PathBuf>,

    /// Configuration file (defaults to config.toml in the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("LingoLens starting...");

    let config = config::load_or_default(args.config.as_deref())?;
    let controller = app::build_controller(&config);

    let default_target = args
        .language
        .clone()
        .unwrap_or_else(|| config.translation.default_target.clone());
    let mut session = Session::new(default_target);
    info!("Session {} started", session.id());

    if args.headless {
        let options = HeadlessOptions {
            image: args.image.unwrap_or_default(),
            language: args.language,
            translate: args.translate,
            annotated_out: args.annotated_out,
        };
        let report = app::run_headless(&controller, &mut session, &options)?;

        println!("Detected regions: {}", report.detections);
        println!("Extracted text: {}", report.extracted_text);
        if let Some(translated) = report.translated_text {
            println!("Translated text: {}", translated);
        }
    } else {
        let initial_upload = match args.image.as_deref().map(app::read_upload).transpose() {
            Ok(upload) => upload,
            Err(e) => {
                error!("{:#}", e);
                None
            }
        };

        if let Err(e) = dashboard::run_dashboard(controller, session, initial_upload) {
            error!("Dashboard error: {}", e);
        }
    }

    info!("LingoLens shutdown complete");

    Ok(())
}
