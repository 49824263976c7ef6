//! Candidate record sources: the live record service and the local cache.

pub mod cache;
pub mod common;
pub mod http;

use std::path::Path;

use clap::ValueEnum;
use docparity_recon::RecordFetcher;

use crate::settings::Settings;
use crate::CliError;

pub use cache::{CacheError, CacheFetcher, DirCache, DocCache};
pub use common::{parse_record, FetchError, RawFetcher};
pub use http::HttpFetcher;

/// Where `compare` gets candidate records from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CandidateSource {
    /// Live document endpoint
    Live,
    /// Service-side document built from its cached copy
    ServerCache,
    /// Documents stored by `download` under `cache.docs_dir`
    LocalCache,
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::ServerCache => write!(f, "server-cache"),
            Self::LocalCache => write!(f, "local-cache"),
        }
    }
}

/// Build the fetcher for `source` from the run settings.
pub fn build_fetcher(
    source: CandidateSource,
    settings: &Settings,
) -> Result<Box<dyn RecordFetcher>, CliError> {
    let fetch = &settings.fetch;
    let fetcher: Box<dyn RecordFetcher> = match source {
        CandidateSource::Live => Box::new(HttpFetcher::from_settings(fetch, &fetch.doc_path)?),
        CandidateSource::ServerCache => {
            Box::new(HttpFetcher::from_settings(fetch, &fetch.cached_doc_path)?)
        }
        CandidateSource::LocalCache => {
            Box::new(CacheFetcher::new(DirCache::new(Path::new(&settings.cache.docs_dir))))
        }
    };
    Ok(fetcher)
}

/// Human label for report metadata.
pub fn candidate_label(source: CandidateSource, settings: &Settings) -> String {
    let fetch = &settings.fetch;
    match source {
        CandidateSource::Live => format!("{}{}", fetch.base_url, fetch.doc_path),
        CandidateSource::ServerCache => format!("{}{}", fetch.base_url, fetch.cached_doc_path),
        CandidateSource::LocalCache => settings.cache.docs_dir.display().to_string(),
    }
}
