use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{GuardError, Result};

pub const MB: u64 = 1024 * 1024;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 15 * MB;
pub const DEFAULT_MAX_FILES: usize = 5;
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 50 * MB;
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const DEFAULT_MAX_EXTENSION_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub max_file_size: u64,
    pub max_files: usize,
    pub max_total_size: u64,
    pub max_filename_length: usize,
    pub max_extension_length: usize,
    pub allowed_types: Vec<String>,
    pub hash_algorithm: HashAlgorithm,
    pub inspect_pdf_streams: bool,
    pub max_inflated_stream_bytes: u64,
    pub max_pdf_streams: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_files: DEFAULT_MAX_FILES,
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            max_filename_length: MAX_FILENAME_LENGTH,
            max_extension_length: DEFAULT_MAX_EXTENSION_LENGTH,
            allowed_types: vec![
                "application/pdf".into(),
                "image/jpeg".into(),
                "image/png".into(),
            ],
            hash_algorithm: HashAlgorithm::Sha256,
            inspect_pdf_streams: true,
            max_inflated_stream_bytes: 4 * MB,
            max_pdf_streams: 256,
        }
    }
}

impl ValidationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size == 0 || self.max_total_size == 0 {
            return Err(GuardError::Config("size limits must be greater than zero".into()));
        }
        if self.max_files == 0 {
            return Err(GuardError::Config("max_files must be greater than zero".into()));
        }
        if self.max_filename_length == 0 || self.max_extension_length == 0 {
            return Err(GuardError::Config("filename limits must be greater than zero".into()));
        }
        if self.allowed_types.is_empty() {
            return Err(GuardError::Config("allowed_types cannot be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub validation: ValidationConfig,
    pub rate_limit: RateLimitConfig,
}

impl GuardConfig {
    /// `<config dir>/upload-guard/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("upload-guard").join("config.json"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: GuardConfig = serde_json::from_str(content)
            .map_err(|e| GuardError::Config(format!("Failed to parse config: {}", e)))?;
        config.validation.validate()?;
        Ok(config)
    }

    /// Loads from `path` when given, else from the default location when a file
    /// exists there, else falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_owned(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => p,
                None => {
                    debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(&path)?;
        Self::from_json(&content)
    }
}
