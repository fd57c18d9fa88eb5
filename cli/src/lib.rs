use plot_extract::{CandidateOrdering, Pipeline, server::DEFAULT_MAX_UPLOAD_BYTES};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    PlotError(#[from] plot_extract::PlotError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Text recognition settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct OcrSettings {
    /// Run OCR on accepted plots; when off every plot has empty text
    pub enabled: bool,
    /// Tesseract language code, e.g. "eng"
    pub language: String,
    /// Directory holding the traineddata files; Tesseract's default when unset
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "eng".to_string(),
            tessdata_dir: None,
        }
    }
}

/// Service configuration.
///
/// Filter thresholds are fixed in the library and intentionally absent here.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub max_upload_bytes: usize,
    pub ordering: CandidateOrdering,
    pub ocr: OcrSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            ordering: CandidateOrdering::default(),
            ocr: OcrSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load ServerConfig from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load ServerConfig from TOML string
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let config: ServerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load ServerConfig from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load ServerConfig from JSON string
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        let config: ServerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Save in the format implied by the file extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        let path_ref = path.as_ref();
        let content = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(CliError::UnsupportedFileFormat),
        };
        fs::write(path_ref, content)?;
        Ok(())
    }

    /// Convert ServerConfig to TOML string
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert ServerConfig to JSON string
    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn validate(&self) -> Result<(), CliError> {
        if self.bind_address.trim().is_empty() {
            return Err(CliError::InvalidConfig("bind_address must not be empty".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(CliError::InvalidConfig("max_upload_bytes must be positive".to_string()));
        }
        if self.ocr.enabled && self.ocr.language.trim().is_empty() {
            return Err(CliError::InvalidConfig("ocr.language must not be empty".to_string()));
        }
        Ok(())
    }

    /// Assemble the extraction pipeline these settings describe
    pub fn build_pipeline(&self) -> Result<Pipeline, CliError> {
        let builder = Pipeline::builder().with_ordering(self.ordering);

        if !self.ocr.enabled {
            return Ok(builder.build());
        }

        #[cfg(feature = "tesseract")]
        {
            let builder = builder.with_tesseract(&self.ocr.language, self.ocr.tessdata_dir.clone())?;
            Ok(builder.build())
        }

        #[cfg(not(feature = "tesseract"))]
        {
            tracing::warn!("Built without the `tesseract` feature, plot text will be empty");
            Ok(builder.build())
        }
    }
}
