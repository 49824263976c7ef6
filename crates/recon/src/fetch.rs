use std::collections::HashMap;

use crate::model::Record;

/// Resolves the candidate record for an identifier.
///
/// Never fails: an unreachable service or an unparseable response yields an
/// empty record, which the reconciler then reports field by field as missing.
pub trait RecordFetcher {
    fn fetch(&self, identifier: &str) -> Record;
}

impl<F: RecordFetcher + ?Sized> RecordFetcher for &F {
    fn fetch(&self, identifier: &str) -> Record {
        (**self).fetch(identifier)
    }
}

/// In-memory fetcher, keyed by identifier. Unknown identifiers yield an
/// empty record.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    records: HashMap<String, Record>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, record: Record) {
        self.records.insert(identifier.into(), record);
    }
}

impl FromIterator<(String, Record)> for StaticFetcher {
    fn from_iter<I: IntoIterator<Item = (String, Record)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl RecordFetcher for StaticFetcher {
    fn fetch(&self, identifier: &str) -> Record {
        self.records.get(identifier).cloned().unwrap_or_default()
    }
}
