//! Local document cache: one `<identifier>.json` file per record.
//!
//! `download` fills it, `compare --candidate local-cache` reads from it.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use docparity_recon::{Record, RecordFetcher};

use crate::exit_codes::{EXIT_IO, EXIT_PARSE};
use crate::CliError;

use super::common::parse_record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Identifier cannot be used as a file name.
    InvalidKey(String),
    Io { path: PathBuf, message: String },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "identifier '{key}' is not a valid cache key"),
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        let code = match &e {
            CacheError::InvalidKey(_) => EXIT_PARSE,
            CacheError::Io { .. } => EXIT_IO,
        };
        CliError { code, message: e.to_string(), hint: None }
    }
}

/// Identifier-keyed document store.
pub trait DocCache {
    fn get(&self, identifier: &str) -> Result<Option<String>, CacheError>;
    fn exists(&self, identifier: &str) -> bool;
    fn put(&self, identifier: &str, body: &str) -> Result<(), CacheError>;
}

#[derive(Debug, Clone)]
pub struct DirCache {
    dir: PathBuf,
}

impl DirCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, identifier: &str) -> Result<PathBuf, CacheError> {
        if identifier.is_empty()
            || identifier.contains('/')
            || identifier.contains('\\')
            || identifier.contains("..")
        {
            return Err(CacheError::InvalidKey(identifier.to_string()));
        }
        Ok(self.dir.join(format!("{identifier}.json")))
    }
}

impl DocCache for DirCache {
    fn get(&self, identifier: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(identifier)?;
        match fs::read_to_string(&path) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io {
                path,
                message: e.to_string(),
            }),
        }
    }

    fn exists(&self, identifier: &str) -> bool {
        self.path_for(identifier).map(|p| p.is_file()).unwrap_or(false)
    }

    fn put(&self, identifier: &str, body: &str) -> Result<(), CacheError> {
        let path = self.path_for(identifier)?;
        fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, body).map_err(|e| CacheError::Io {
            path,
            message: e.to_string(),
        })
    }
}

/// Candidate fetcher over a `DocCache`. Absent entries are empty records.
pub struct CacheFetcher<C> {
    cache: C,
}

impl<C: DocCache> CacheFetcher<C> {
    pub fn new(cache: C) -> Self {
        Self { cache }
    }
}

impl<C: DocCache> RecordFetcher for CacheFetcher<C> {
    fn fetch(&self, identifier: &str) -> Record {
        match self.cache.get(identifier) {
            Ok(Some(body)) => parse_record(&body, identifier),
            Ok(None) => {
                log::warn!("{identifier}: not in local cache");
                Record::new()
            }
            Err(e) => {
                log::warn!("{identifier}: {e}, treating as empty");
                Record::new()
            }
        }
    }
}
