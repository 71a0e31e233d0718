//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OCR engine settings
    pub ocr: OcrSettings,
    /// Translation service settings
    pub translation: TranslationSettings,
    /// Annotated image appearance
    pub annotation: AnnotationSettings,
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Recognition languages; the first is the primary Latin-script language
    pub languages: Vec<String>,
    /// Directory holding the ONNX models (defaults to the platform data dir)
    pub models_dir: Option<PathBuf>,
    /// Longest image side fed to the detection model
    pub limit_side_len: u32,
    /// Probability above which a pixel counts as text
    pub binary_threshold: f32,
    /// Minimum mean probability for a detected region
    pub box_score_threshold: f32,
    /// Expansion applied to each detected region
    pub unclip_ratio: f32,
    /// Readings below this confidence are dropped
    pub min_text_confidence: f32,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
    /// Never download models, even if they are missing
    pub offline: bool,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "hi".to_string()],
            models_dir: None,
            limit_side_len: 960,
            binary_threshold: 0.3,
            box_score_threshold: 0.6,
            unclip_ratio: 1.5,
            min_text_confidence: 0.5,
            intra_threads: 4,
            offline: false,
        }
    }
}

/// Translation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Translate endpoint
    pub endpoint: String,
    /// Source language code ("auto" lets the service detect it)
    pub source_language: String,
    /// Target language selected when a session starts
    pub default_target: String,
    /// Request timeout; None keeps the HTTP client's default
    pub timeout_secs: Option<u64>,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            source_language: "auto".to_string(),
            default_target: "hi".to_string(),
            timeout_secs: None,
        }
    }
}

/// Annotated image appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSettings {
    /// Rectangle and label color (RGB)
    pub color: [u8; 3],
    /// Rectangle stroke width in pixels
    pub stroke_width: u32,
    /// Horizontal position of every label
    pub label_x: i32,
    /// Baseline of the first label
    pub label_start_y: i32,
    /// Baseline increment per detection
    pub label_step: i32,
    /// Label glyph height in pixels
    pub font_px: f32,
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            stroke_width: 3,
            label_x: 20,
            label_start_y: 100,
            label_step: 15,
            font_px: 14.0,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load the configuration from an explicit path, the platform config dir, or defaults
pub fn load_or_default(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let config = load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    if let Ok(config_dir) = crate::storage::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            match load_config(&config_path) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", config_path);
                    return Ok(config);
                }
                Err(e) => warn!("Ignoring unreadable config {:?}: {}", config_path, e),
            }
        }
    }

    info!("Using default configuration");
    Ok(AppConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.ocr.languages, vec!["en", "hi"]);
        assert_eq!(config.ocr.limit_side_len, 960);
        assert!(!config.ocr.offline);

        assert_eq!(config.translation.source_language, "auto");
        assert_eq!(config.translation.default_target, "hi");
        assert!(config.translation.timeout_secs.is_none());

        assert_eq!(config.annotation.color, [0, 255, 0]);
        assert_eq!(config.annotation.stroke_width, 3);
        assert_eq!(config.annotation.label_x, 20);
        assert_eq!(config.annotation.label_start_y, 100);
        assert_eq!(config.annotation.label_step, 15);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = AppConfig::default();
        config.translation.default_target = "fr".to_string();
        config.annotation.label_step = 20;

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();

        let loaded = load_config(temp_file.path()).unwrap();
        assert_eq!(loaded.translation.default_target, "fr");
        assert_eq!(loaded.annotation.label_step, 20);
        assert_eq!(loaded.ocr.languages, config.ocr.languages);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[translation]\ndefault_target = \"de\"").unwrap();

        let loaded = load_config(temp_file.path()).unwrap();
        assert_eq!(loaded.translation.default_target, "de");
        assert_eq!(loaded.translation.source_language, "auto");
        assert_eq!(loaded.annotation.stroke_width, 3);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        assert!(load_config(temp_file.path()).is_err());
        assert!(load_or_default(Some(temp_file.path())).is_err());
    }
}
