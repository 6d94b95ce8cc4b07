//! Configuration loader
//!
//! Loads the requirement policy and cluster snapshots from YAML or JSON
//! files. Fields missing from a policy file keep their defaults, and a loaded
//! policy is validated before it is handed out.

use super::thresholds::RequirementsConfig;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Document format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// JSON for `.json`, YAML for everything else (YAML also reads JSON)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Decode a document from a string
pub fn parse_document<T: DeserializeOwned>(content: &str, format: DocumentFormat) -> Result<T> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(content)?),
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
    }
}

/// Read and decode a document file
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Loading {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_document(&content, DocumentFormat::from_path(path))
}

/// Loads the requirement policy
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Optional policy file; defaults apply when unset
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Load and validate the policy
    pub fn load(&self) -> Result<RequirementsConfig> {
        let config = match &self.path {
            Some(path) => {
                let config: RequirementsConfig = load_document(path).map_err(|e| {
                    Error::Configuration(format!("{}: {}", path.display(), e))
                })?;
                info!("Loaded requirement policy from {}", path.display());
                config
            }
            None => {
                debug!("No policy file given, using defaults");
                RequirementsConfig::default()
            }
        };

        config.validate()?;
        Ok(config)
    }
}
