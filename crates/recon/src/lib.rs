//! `docparity-recon`: field-level reconciliation of indexed JSON records.
//!
//! Pure engine crate: receives a reference source and a candidate fetcher,
//! returns per-record discrepancy reports. No network or filesystem access.

pub mod config;
pub mod engine;
pub mod equivalence;
pub mod error;
pub mod evidence;
pub mod fetch;
pub mod model;
pub mod reconciler;
pub mod source;

pub use config::{ArrayPolicy, ReconConfig};
pub use engine::{run, run_corpus, ReportSink};
pub use equivalence::{equal_array, equal_array_with, equal_value};
pub use error::ReconError;
pub use fetch::{RecordFetcher, StaticFetcher};
pub use model::{FieldOutcome, FieldReport, Record, RecordReport, Report, ReportEntry, ReportSummary};
pub use reconciler::{compare_records, Reconciler};
pub use source::{JsonLinesSource, SourceEntry};
