//! Text report: one block per record with emitted fields, streamed as the
//! corpus is walked.

use std::io::Write;

use docparity_recon::model::display_value;
use docparity_recon::{FieldOutcome, ReconError, RecordReport, ReportEntry, ReportSink, ReportSummary};

/// Writes the text report to `out`. Optionally keeps the entries so the
/// same run can also produce a JSON report.
pub struct TextSink<W: Write> {
    out: W,
    collected: Option<Vec<ReportEntry>>,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, collected: None }
    }

    pub fn collecting(out: W) -> Self {
        Self {
            out,
            collected: Some(Vec::new()),
        }
    }

    pub fn into_entries(self) -> Vec<ReportEntry> {
        self.collected.unwrap_or_default()
    }

    fn write_record(&mut self, report: &RecordReport) -> std::io::Result<()> {
        if report.fields.is_empty() {
            return Ok(());
        }

        match &report.timestamp {
            Some(ts) => writeln!(self.out, "{} {} {ts}", report.identifier, report.sequence)?,
            None => writeln!(self.out, "{} {}", report.identifier, report.sequence)?,
        }

        for field in &report.fields {
            match &field.outcome {
                FieldOutcome::Mismatch { reference, candidate } => writeln!(
                    self.out,
                    "\t{} \t| {} | {}",
                    field.field,
                    display_value(reference),
                    display_value(candidate)
                )?,
                FieldOutcome::Missing => writeln!(self.out, "\t{} \t| (MISSING)", field.field)?,
                FieldOutcome::Equal => writeln!(self.out, "\t{} \t [EQUAL]", field.field)?,
            }
        }
        Ok(())
    }
}

fn sink_err(e: std::io::Error) -> ReconError {
    ReconError::Sink(e.to_string())
}

impl<W: Write> ReportSink for TextSink<W> {
    fn emit(&mut self, entry: &ReportEntry) -> Result<(), ReconError> {
        match entry {
            ReportEntry::Record(report) => self.write_record(report).map_err(sink_err)?,
            ReportEntry::LineError { sequence, .. } => {
                writeln!(self.out, "Error processing line: {sequence}").map_err(sink_err)?
            }
        }
        if let Some(entries) = self.collected.as_mut() {
            entries.push(entry.clone());
        }
        Ok(())
    }

    fn finish(&mut self, _summary: &ReportSummary) -> Result<(), ReconError> {
        writeln!(self.out, "Done.").map_err(sink_err)?;
        self.out.flush().map_err(sink_err)
    }
}
