use crate::model::{ReportEntry, ReportSummary};

impl ReportSummary {
    /// Fold one report entry into the running totals.
    pub fn record(&mut self, entry: &ReportEntry) {
        self.records_read += 1;
        match entry {
            ReportEntry::Record(r) => {
                self.records_compared += 1;
                if r.has_discrepancies() {
                    self.records_with_discrepancies += 1;
                }
                self.fields_equal += r.equal();
                self.fields_mismatched += r.mismatched();
                self.fields_missing += r.missing();
            }
            ReportEntry::LineError { .. } => self.line_errors += 1,
        }
    }
}
