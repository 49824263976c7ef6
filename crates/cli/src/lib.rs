//! `docparity` command implementations.

pub mod batches;
pub mod compare;
pub mod download;
pub mod exit_codes;
pub mod fetch;
pub mod render;
pub mod settings;

use docparity_recon::ReconError;

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_IO, EXIT_PARSE, EXIT_USAGE};

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(e: ReconError) -> Self {
        let code = match &e {
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
            ReconError::Io(_) | ReconError::Sink(_) => EXIT_IO,
            ReconError::LineParse { .. } | ReconError::MissingIdentifier { .. } => EXIT_PARSE,
        };
        Self { code, message: e.to_string(), hint: None }
    }
}
