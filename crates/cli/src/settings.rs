// Run settings
// Loaded from docparity.toml (or --config / DOCPARITY_CONFIG)

use std::path::{Path, PathBuf};

use docparity_recon::{ReconConfig, ReconError};
use serde::{Deserialize, Serialize};

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_IO};
use crate::CliError;

/// Settings file picked up from the working directory when no path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "docparity.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub recon: ReconConfig,
    pub source: SourceSettings,
    pub fetch: FetchSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSettings {
    /// Line-delimited JSON produced by the batch indexer
    pub file: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("./data/traject_file.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSettings {
    pub base_url: String,
    /// Live document endpoint
    pub doc_path: String,
    /// Document built by the service from its own cached copy
    pub cached_doc_path: String,
    /// Raw record endpoint used by `download`
    pub raw_path: String,
    pub query_param: String,
    pub timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9001".to_string(),
            doc_path: "/bibutils/solr/doc/".to_string(),
            cached_doc_path: "/bibutils/solr/docFromFile/".to_string(),
            raw_path: "/bibutils/bib/".to_string(),
            query_param: "bib".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    /// Raw records stored by `download`
    pub dir: PathBuf,
    /// Built documents stored by `download`, read by `--candidate local-cache`
    pub docs_dir: PathBuf,
    /// Holds the last identifier `download` stored
    pub tracker_file: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
            docs_dir: PathBuf::from("./data/docs"),
            tracker_file: PathBuf::from("./data/last_downloaded.txt"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl Settings {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        self.recon.validate()?;

        let url = url::Url::parse(&self.fetch.base_url).map_err(|e| {
            ReconError::ConfigValidation(format!("fetch.base_url '{}': {e}", self.fetch.base_url))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ReconError::ConfigValidation(format!(
                "fetch.base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.fetch.timeout_secs == 0 {
            return Err(ReconError::ConfigValidation(
                "fetch.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.fetch.query_param.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "fetch.query_param must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Load settings from `path`, else `docparity.toml` in the working
    /// directory if present, else built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
                if !fallback.exists() {
                    log::debug!("no {DEFAULT_SETTINGS_FILE}, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|e| CliError {
            code: EXIT_IO,
            message: format!("cannot read settings {}: {e}", path.display()),
            hint: None,
        })?;

        log::debug!("loading settings from {}", path.display());
        Self::from_toml(&text).map_err(|e| CliError {
            code: EXIT_INVALID_CONFIG,
            message: format!("{}: {e}", path.display()),
            hint: None,
        })
    }
}
