//! Model management for ONNX Runtime
//!
//! Handles downloading, caching, and loading of PaddleOCR models.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use ort::session::{builder::GraphOptimizationLevel, Session};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

const MODEL_BASE_URL: &str = "https://huggingface.co/monkt/paddleocr-onnx/resolve/main";

/// Environment variable that forbids model downloads
pub const OFFLINE_ENV: &str = "LINGOLENS_OFFLINE";

/// Writing system served by one recognition model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    /// English and other Latin-alphabet languages
    Latin,
    /// Hindi and other Devanagari languages
    Devanagari,
}

impl Script {
    /// Script used for a recognition language code
    pub fn for_language(code: &str) -> Option<Self> {
        match code {
            "en" | "es" | "fr" | "de" => Some(Script::Latin),
            "hi" | "mr" | "ne" => Some(Script::Devanagari),
            _ => None,
        }
    }

    fn folder(&self) -> &'static str {
        match self {
            Script::Latin => "english",
            Script::Devanagari => "devanagari",
        }
    }
}

/// Model file identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    /// Text detection model (DBNet), shared by all scripts
    Detection,
    /// Text recognition model (CRNN)
    Recognition(Script),
    /// Character dictionary for recognition
    Dictionary(Script),
}

impl ModelType {
    /// Get the filename for this model type
    pub fn filename(&self) -> String {
        match self {
            ModelType::Detection => "det.onnx".to_string(),
            ModelType::Recognition(script) => format!("rec_{}.onnx", script.folder()),
            ModelType::Dictionary(script) => format!("dict_{}.txt", script.folder()),
        }
    }

    /// Get the download URL for this model
    pub fn download_url(&self) -> String {
        match self {
            ModelType::Detection => format!("{}/detection/v3/det.onnx", MODEL_BASE_URL),
            ModelType::Recognition(script) => {
                format!("{}/languages/{}/rec.onnx", MODEL_BASE_URL, script.folder())
            }
            ModelType::Dictionary(script) => {
                format!("{}/languages/{}/dict.txt", MODEL_BASE_URL, script.folder())
            }
        }
    }

    /// Plausible file size range in bytes
    pub fn expected_size_range(&self) -> (u64, u64) {
        match self {
            ModelType::Detection => (1_000_000, 20_000_000),
            ModelType::Recognition(_) => (1_000_000, 50_000_000),
            ModelType::Dictionary(_) => (100, 500_000),
        }
    }

    /// Display name for logging
    pub fn display_name(&self) -> String {
        match self {
            ModelType::Detection => "Text Detection".to_string(),
            ModelType::Recognition(script) => format!("{:?} Text Recognition", script),
            ModelType::Dictionary(script) => format!("{:?} Character Dictionary", script),
        }
    }
}

/// Model manifest tracking downloaded models
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModelManifest {
    pub version: String,
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub filename: String,
    pub size_bytes: u64,
    pub sha256: Option<String>,
    pub downloaded_at: String,
}

impl Default for ModelManifest {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            models: Vec::new(),
        }
    }
}

/// Model manager for downloading and caching ONNX models
pub struct ModelManager {
    models_dir: PathBuf,
    offline: bool,
}

impl ModelManager {
    /// Create a model manager over `models_dir`
    ///
    /// Downloads are disabled when `offline` is set or `LINGOLENS_OFFLINE` is
    /// present in the environment.
    pub fn with_dir(models_dir: PathBuf, offline: bool) -> Result<Self> {
        std::fs::create_dir_all(&models_dir)
            .with_context(|| format!("Failed to create models directory {:?}", models_dir))?;
        let offline = offline || std::env::var_os(OFFLINE_ENV).is_some();
        Ok(Self { models_dir, offline })
    }

    /// Get the path to a specific model file
    pub fn model_path(&self, model_type: ModelType) -> PathBuf {
        self.models_dir.join(model_type.filename())
    }

    /// Check if a model is present with a plausible size
    pub fn is_model_available(&self, model_type: ModelType) -> bool {
        match std::fs::metadata(self.model_path(model_type)) {
            Ok(metadata) => {
                let (min, max) = model_type.expected_size_range();
                let size = metadata.len();
                size >= min && size <= max
            }
            Err(_) => false,
        }
    }

    /// Download a model if not already available
    /// Returns the path to the model file
    pub fn ensure_model(&self, model_type: ModelType) -> Result<PathBuf> {
        let path = self.model_path(model_type);

        if self.is_model_available(model_type) {
            if self.matches_manifest(model_type)? {
                debug!("Model {:?} already available at {:?}", model_type, path);
                return Ok(path);
            }
            warn!("Checksum of {:?} differs from the manifest, downloading again", path);
        }

        info!("Downloading model {:?}...", model_type);
        self.download_model(model_type)?;

        Ok(path)
    }

    /// Ensure the detection model and every script's recognizer and dictionary
    pub fn ensure_all(&self, scripts: &[Script]) -> Result<()> {
        self.ensure_model(ModelType::Detection)?;
        for &script in scripts {
            self.ensure_model(ModelType::Recognition(script))?;
            self.ensure_model(ModelType::Dictionary(script))?;
        }
        Ok(())
    }

    /// Compare a cached file against the checksum recorded when it was downloaded
    ///
    /// Files without a manifest entry (e.g. placed by hand) are accepted.
    fn matches_manifest(&self, model_type: ModelType) -> Result<bool> {
        let manifest = self.load_manifest().unwrap_or_default();
        let filename = model_type.filename();

        let Some(expected) = manifest
            .models
            .iter()
            .find(|m| m.filename == filename)
            .and_then(|m| m.sha256.clone())
        else {
            return Ok(true);
        };

        Ok(file_sha256(&self.model_path(model_type))? == expected)
    }

    /// Download a specific model (blocking)
    fn download_model(&self, model_type: ModelType) -> Result<()> {
        let url = model_type.download_url();
        let path = self.model_path(model_type);

        if self.offline {
            anyhow::bail!(
                "Offline mode: cannot download {}. Download it from {} and place it at {:?}",
                model_type.display_name(),
                url,
                path
            );
        }

        info!("Downloading {} model from {}", model_type.display_name(), url);

        let rt = Runtime::new().context("Failed to create tokio runtime")?;
        let hash = rt.block_on(async { self.download_file_async(&url, &path).await })?;

        if !self.is_model_available(model_type) {
            anyhow::bail!("Download completed but model verification failed");
        }

        self.update_manifest_for_model(model_type, hash)?;

        info!("Successfully downloaded {} model", model_type.display_name());
        Ok(())
    }

    /// Stream a file to disk, returning its SHA-256
    async fn download_file_async(&self, url: &str, path: &Path) -> Result<String> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client")?;

        let response = client
            .get(url)
            .send()
            .await
            .context("Failed to send download request")?;

        if !response.status().is_success() {
            anyhow::bail!("Download failed with status {}: {}", response.status(), url);
        }

        debug!("Download size: {:?} bytes", response.content_length());

        let temp_path = path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).context("Failed to create temp file")?;

        let mut hasher = Sha256::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Error reading download stream")?;
            file.write_all(&chunk).context("Failed to write to temp file")?;
            hasher.update(&chunk);
        }

        file.flush().context("Failed to flush temp file")?;
        drop(file);

        std::fs::rename(&temp_path, path)
            .context("Failed to move downloaded file to final location")?;

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Update manifest after successful download
    fn update_manifest_for_model(&self, model_type: ModelType, sha256: String) -> Result<()> {
        let mut manifest = self.load_manifest().unwrap_or_default();
        let metadata = std::fs::metadata(self.model_path(model_type))?;

        let model_info = ModelInfo {
            model_type: format!("{:?}", model_type),
            filename: model_type.filename(),
            size_bytes: metadata.len(),
            sha256: Some(sha256),
            downloaded_at: unix_timestamp(),
        };

        if let Some(existing) = manifest.models.iter_mut().find(|m| m.filename == model_info.filename) {
            *existing = model_info;
        } else {
            manifest.models.push(model_info);
        }

        self.save_manifest(&manifest)
    }

    /// Load the model manifest
    pub fn load_manifest(&self) -> Result<ModelManifest> {
        let manifest_path = self.models_dir.join("manifest.json");
        if manifest_path.exists() {
            let content = std::fs::read_to_string(&manifest_path)?;
            let manifest: ModelManifest = serde_json::from_str(&content)?;
            Ok(manifest)
        } else {
            Ok(ModelManifest::default())
        }
    }

    /// Save the model manifest
    pub fn save_manifest(&self, manifest: &ModelManifest) -> Result<()> {
        let manifest_path = self.models_dir.join("manifest.json");
        let content = serde_json::to_string_pretty(manifest)?;
        std::fs::write(manifest_path, content)?;
        Ok(())
    }
}

/// Open an ONNX session for a model file
pub fn open_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
    info!("Loading ONNX model from {:?}", model_path);

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads.max(1))?
        .commit_from_file(model_path)
        .with_context(|| format!("Failed to load ONNX model {:?}", model_path))?;

    let inputs: Vec<&str> = session.inputs.iter().map(|i| i.name.as_str()).collect();
    let outputs: Vec<&str> = session.outputs.iter().map(|o| o.name.as_str()).collect();
    debug!("Model loaded. Inputs: {:?}, Outputs: {:?}", inputs, outputs);

    Ok(session)
}

fn file_sha256(path: &Path) -> Result<String> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Seconds since the Unix epoch, as a string
fn unix_timestamp() -> String {
    use std::time::SystemTime;

    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_script_for_language() {
        assert_eq!(Script::for_language("en"), Some(Script::Latin));
        assert_eq!(Script::for_language("hi"), Some(Script::Devanagari));
        assert_eq!(Script::for_language("zz"), None);
    }

    #[test]
    fn test_model_filenames_and_urls() {
        assert_eq!(ModelType::Detection.filename(), "det.onnx");
        assert_eq!(ModelType::Recognition(Script::Devanagari).filename(), "rec_devanagari.onnx");
        assert_eq!(ModelType::Dictionary(Script::Latin).filename(), "dict_english.txt");
        assert!(ModelType::Recognition(Script::Latin)
            .download_url()
            .ends_with("/languages/english/rec.onnx"));
    }

    #[test]
    fn test_availability_checks_size() {
        let dir = TempDir::new().unwrap();
        let manager = ModelManager::with_dir(dir.path().to_path_buf(), true).unwrap();
        let dict = ModelType::Dictionary(Script::Latin);

        assert!(!manager.is_model_available(dict));

        std::fs::write(manager.model_path(dict), "a").unwrap();
        assert!(!manager.is_model_available(dict));

        std::fs::write(manager.model_path(dict), "a\n".repeat(200)).unwrap();
        assert!(manager.is_model_available(dict));
        assert_eq!(manager.ensure_model(dict).unwrap(), manager.model_path(dict));
    }

    #[test]
    fn test_offline_refuses_download() {
        let dir = TempDir::new().unwrap();
        let manager = ModelManager::with_dir(dir.path().to_path_buf(), true).unwrap();

        let err = manager.ensure_model(ModelType::Detection).unwrap_err();
        assert!(err.to_string().contains("Offline mode"));
    }

    #[test]
    fn test_manifest_mismatch_triggers_redownload() {
        let dir = TempDir::new().unwrap();
        let manager = ModelManager::with_dir(dir.path().to_path_buf(), true).unwrap();
        let dict = ModelType::Dictionary(Script::Devanagari);
        std::fs::write(manager.model_path(dict), "x\n".repeat(100)).unwrap();

        let mut manifest = ModelManifest::default();
        manifest.models.push(ModelInfo {
            model_type: format!("{:?}", dict),
            filename: dict.filename(),
            size_bytes: 200,
            sha256: Some("0".repeat(64)),
            downloaded_at: unix_timestamp(),
        });
        manager.save_manifest(&manifest).unwrap();

        // Stale checksum forces a download, which offline mode refuses
        assert!(manager.ensure_model(dict).is_err());

        manifest.models[0].sha256 = Some(file_sha256(&manager.model_path(dict)).unwrap());
        manager.save_manifest(&manifest).unwrap();
        assert!(manager.ensure_model(dict).is_ok());
    }
}
