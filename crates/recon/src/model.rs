use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ArrayPolicy;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One indexed document: field name to scalar or sequence of scalars.
/// Field order is the order the producer wrote them in.
pub type Record = Map<String, Value>;

/// A reference record read from the source, with its identifier resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub identifier: String,
    pub document: Record,
}

// ---------------------------------------------------------------------------
// Per-field outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FieldOutcome {
    Equal,
    Mismatch { reference: Value, candidate: Value },
    Missing,
}

impl FieldOutcome {
    pub fn is_discrepancy(&self) -> bool {
        !matches!(self, Self::Equal)
    }
}

impl std::fmt::Display for FieldOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Mismatch { .. } => write!(f, "mismatch"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    pub field: String,
    #[serde(flatten)]
    pub outcome: FieldOutcome,
}

// ---------------------------------------------------------------------------
// Per-record report
// ---------------------------------------------------------------------------

/// The two timestamp values when they disagree. Display context only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestampMismatch {
    pub reference: Option<Value>,
    pub candidate: Option<Value>,
}

impl std::fmt::Display for TimestampMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({} vs {})",
            display_optional(self.reference.as_ref()),
            display_optional(self.candidate.as_ref()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordReport {
    pub identifier: String,
    pub sequence: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimestampMismatch>,
    /// Number of fields visited (reference fields minus the ignore set).
    pub compared: usize,
    /// Emitted outcomes in visit order. Equal fields appear only with `show_equal`.
    pub fields: Vec<FieldReport>,
}

impl RecordReport {
    pub fn has_discrepancies(&self) -> bool {
        self.fields.iter().any(|f| f.outcome.is_discrepancy())
    }

    pub fn mismatched(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| matches!(f.outcome, FieldOutcome::Mismatch { .. }))
            .count()
    }

    pub fn missing(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| matches!(f.outcome, FieldOutcome::Missing))
            .count()
    }

    /// Equal fields, whether or not they were emitted.
    pub fn equal(&self) -> usize {
        self.compared - self.mismatched() - self.missing()
    }
}

// ---------------------------------------------------------------------------
// Corpus-level report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportEntry {
    Record(RecordReport),
    LineError { sequence: u64, message: String },
}

impl ReportEntry {
    pub fn sequence(&self) -> u64 {
        match self {
            Self::Record(r) => r.sequence,
            Self::LineError { sequence, .. } => *sequence,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub records_read: usize,
    pub records_compared: usize,
    pub records_with_discrepancies: usize,
    pub fields_equal: usize,
    pub fields_mismatched: usize,
    pub fields_missing: usize,
    pub line_errors: usize,
}

impl ReportSummary {
    pub fn is_clean(&self) -> bool {
        self.records_with_discrepancies == 0 && self.line_errors == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub source: String,
    pub candidate: String,
    pub show_equal: bool,
    pub array_policy: ArrayPolicy,
    pub ignore_keys: Vec<String>,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub entries: Vec<ReportEntry>,
}

// ---------------------------------------------------------------------------
// Value rendering
// ---------------------------------------------------------------------------

/// Render a field value for the text report.
///
/// Strings print raw, sequences as `["a", "b"]`, null as nothing.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(Value::to_string).collect();
            format!("[{}]", inner.join(", "))
        }
        other => other.to_string(),
    }
}

fn display_optional(value: Option<&Value>) -> String {
    value.map(display_value).unwrap_or_default()
}
