use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::fetch::RecordFetcher;
use crate::model::{Report, ReportEntry, ReportMeta, ReportSummary};
use crate::reconciler::Reconciler;
use crate::source::SourceEntry;

/// Receives report entries in source order as they are produced.
pub trait ReportSink {
    fn emit(&mut self, entry: &ReportEntry) -> Result<(), ReconError>;

    /// Called once after the source is exhausted.
    fn finish(&mut self, _summary: &ReportSummary) -> Result<(), ReconError> {
        Ok(())
    }
}

impl ReportSink for Vec<ReportEntry> {
    fn emit(&mut self, entry: &ReportEntry) -> Result<(), ReconError> {
        self.push(entry.clone());
        Ok(())
    }
}

/// Walk the source in order: fetch, compare, and emit each record before
/// reading the next one.
///
/// Bad lines become `LineError` entries and the run continues. Only a source
/// read failure or a sink failure stops it.
pub fn run_corpus<I, F, S>(
    reconciler: &Reconciler,
    source: I,
    fetcher: &F,
    sink: &mut S,
) -> Result<ReportSummary, ReconError>
where
    I: IntoIterator<Item = SourceEntry>,
    F: RecordFetcher + ?Sized,
    S: ReportSink + ?Sized,
{
    let mut summary = ReportSummary::default();

    for SourceEntry { sequence, result } in source {
        let entry = match result {
            Ok(record) => {
                log::debug!("comparing {} (line {sequence})", record.identifier);
                let candidate = fetcher.fetch(&record.identifier);
                ReportEntry::Record(reconciler.compare_records(
                    &record.identifier,
                    &record.document,
                    &candidate,
                    sequence,
                ))
            }
            Err(ReconError::Io(msg)) => return Err(ReconError::Io(msg)),
            Err(e) => {
                log::warn!("{e}");
                ReportEntry::LineError {
                    sequence,
                    message: e.to_string(),
                }
            }
        };

        summary.record(&entry);
        sink.emit(&entry)?;
    }

    sink.finish(&summary)?;
    Ok(summary)
}

/// Run the whole corpus and collect a serializable report.
pub fn run<I, F>(
    config: &ReconConfig,
    source: I,
    fetcher: &F,
    source_label: &str,
    candidate_label: &str,
) -> Result<Report, ReconError>
where
    I: IntoIterator<Item = SourceEntry>,
    F: RecordFetcher + ?Sized,
{
    let reconciler = Reconciler::new(config.clone());
    let mut entries: Vec<ReportEntry> = Vec::new();
    let summary = run_corpus(&reconciler, source, fetcher, &mut entries)?;

    Ok(Report {
        meta: ReportMeta::new(reconciler.config(), source_label, candidate_label),
        summary,
        entries,
    })
}

impl ReportMeta {
    pub fn new(config: &ReconConfig, source_label: &str, candidate_label: &str) -> Self {
        Self {
            source: source_label.to_string(),
            candidate: candidate_label.to_string(),
            show_equal: config.show_equal,
            array_policy: config.array_policy,
            ignore_keys: config.ignore_keys.iter().cloned().collect(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
