//! Shared infrastructure for candidate fetchers.
//!
//! - `FetchError`: what can go wrong talking to the record service
//! - `RawFetcher`: identifier in, response body out (used by `download`)
//! - `parse_record`: response body to `Record`, empty on anything unparseable
//!
//! # Empty-record contract
//!
//! `compare` never fails because of a candidate. A failed request, a non-2xx
//! status, an unparseable body, or a body that is not a JSON object all
//! become the empty record, so every reference field reports as missing.
//! The cause is logged at warn level.

use std::fmt;

use docparity_recon::Record;
use serde_json::Value;

use crate::exit_codes;
use crate::CliError;

// ── Constants ───────────────────────────────────────────────────────

pub(crate) const USER_AGENT: &str = concat!("docparity/", env!("CARGO_PKG_VERSION"));

/// Longest body excerpt quoted in a warning.
const BODY_EXCERPT: usize = 200;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Request could not be built or sent (connection refused, timeout, ...).
    Network(String),
    /// Service answered with a non-2xx status.
    Status { status: u16, url: String },
    /// Response body could not be read.
    Body(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "request failed: {msg}"),
            Self::Status { status, url } => write!(f, "HTTP {status} from {url}"),
            Self::Body(msg) => write!(f, "cannot read response body: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError {
            code: exit_codes::EXIT_FETCH_UPSTREAM,
            message: e.to_string(),
            hint: Some("is the record service running? check fetch.base_url".to_string()),
        }
    }
}

// ── RawFetcher ──────────────────────────────────────────────────────

/// Fetch the unparsed response body for an identifier.
pub trait RawFetcher {
    fn fetch_raw(&self, identifier: &str) -> Result<String, FetchError>;
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Parse a candidate response. Anything but a JSON object is the empty record.
pub fn parse_record(body: &str, identifier: &str) -> Record {
    let trimmed = body.trim_start_matches('\u{feff}');
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            log::warn!(
                "{identifier}: response is not a JSON object ({}), treating as empty",
                excerpt(&other.to_string())
            );
            Record::new()
        }
        Err(e) => {
            log::warn!(
                "{identifier}: unparseable response ({e}), treating as empty (body: {})",
                excerpt(trimmed)
            );
            Record::new()
        }
    }
}

fn excerpt(s: &str) -> &str {
    match s.char_indices().nth(BODY_EXCERPT) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
