use serde_json::Value;

use crate::config::ReconConfig;
use crate::equivalence::{equal_array_with, equal_value};
use crate::model::{FieldOutcome, FieldReport, Record, RecordReport, TimestampMismatch};

/// Field-level comparison of a reference record against a candidate record.
///
/// Holds the ignore set and output options; comparing is a pure function of
/// the two documents.
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: ReconConfig,
}

impl Reconciler {
    pub fn new(config: ReconConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    /// Compare every non-ignored field of `reference` against `candidate`,
    /// in the reference's field order.
    pub fn compare_records(
        &self,
        identifier: &str,
        reference: &Record,
        candidate: &Record,
        sequence: u64,
    ) -> RecordReport {
        let mut fields = Vec::new();
        let mut compared = 0;

        for (key, value1) in reference {
            if self.config.is_ignored(key) {
                continue;
            }
            compared += 1;

            let outcome = self.classify(value1, candidate.get(key));
            if outcome.is_discrepancy() || self.config.show_equal {
                fields.push(FieldReport {
                    field: key.clone(),
                    outcome,
                });
            }
        }

        RecordReport {
            identifier: identifier.to_string(),
            sequence,
            timestamp: self.timestamp_mismatch(reference, candidate),
            compared,
            fields,
        }
    }

    fn classify(&self, value1: &Value, value2: Option<&Value>) -> FieldOutcome {
        let equal = match value1 {
            Value::Array(items) => {
                let empty = Value::Array(Vec::new());
                // Falsy candidates compare as an empty array
                let other = match value2 {
                    None | Some(Value::Null) | Some(Value::Bool(false)) => &empty,
                    Some(v) => v,
                };
                equal_array_with(items, other, self.config.array_policy)
            }
            _ => equal_value(value1, value2),
        };

        match value2 {
            _ if equal => FieldOutcome::Equal,
            None | Some(Value::Null) => FieldOutcome::Missing,
            Some(v) => FieldOutcome::Mismatch {
                reference: value1.clone(),
                candidate: v.clone(),
            },
        }
    }

    /// Not filtered by the ignore set: the timestamp is display context.
    fn timestamp_mismatch(&self, reference: &Record, candidate: &Record) -> Option<TimestampMismatch> {
        let field = self.config.timestamp_field.as_str();
        let (r, c) = (reference.get(field), candidate.get(field));
        if r == c {
            return None;
        }
        Some(TimestampMismatch {
            reference: r.cloned(),
            candidate: c.cloned(),
        })
    }
}

/// One-shot comparison with an explicit `show_equal` flag.
pub fn compare_records(
    config: &ReconConfig,
    identifier: &str,
    reference: &Record,
    candidate: &Record,
    show_equal: bool,
    sequence: u64,
) -> RecordReport {
    let config = config.clone().show_equal(show_equal);
    Reconciler::new(config).compare_records(identifier, reference, candidate, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        match v {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn outcomes(report: &RecordReport) -> Vec<(&str, &FieldOutcome)> {
        report.fields.iter().map(|f| (f.field.as_str(), &f.outcome)).collect()
    }

    #[test]
    fn title_and_isbn_scenario() {
        let reference = record(json!({"id": ["b123"], "title_t": ["The Title"], "isbn_t": ["12345:"]}));
        let candidate = record(json!({"id": ["b123"], "title_t": ["The Title."], "isbn_t": ["12345"]}));
        let config = ReconConfig::with_ignore_keys(["isbn_t"]).show_equal(true);
        let report = Reconciler::new(config).compare_records("b123", &reference, &candidate, 7);

        assert_eq!(report.identifier, "b123");
        assert_eq!(report.sequence, 7);
        assert_eq!(report.compared, 2);
        assert_eq!(
            outcomes(&report),
            vec![("id", &FieldOutcome::Equal), ("title_t", &FieldOutcome::Equal)]
        );
        assert!(!report.has_discrepancies());
    }

    #[test]
    fn equal_fields_hidden_by_default() {
        let reference = record(json!({"id": ["b1"], "title_t": ["A"]}));
        let report = Reconciler::new(ReconConfig::with_ignore_keys(Vec::<String>::new()))
            .compare_records("b1", &reference, &reference, 0);
        assert!(report.fields.is_empty());
        assert_eq!(report.compared, 2);
        assert_eq!(report.equal(), 2);
    }

    #[test]
    fn empty_candidate_reports_every_field_missing() {
        let reference = record(json!({
            "id": ["b9"],
            "title_t": ["T"],
            "format": "Book",
            "updated_dt": "2020-01-01",
        }));
        let report = Reconciler::new(ReconConfig::default())
            .compare_records("b9", &reference, &Record::new(), 3);

        assert_eq!(
            outcomes(&report),
            vec![
                ("id", &FieldOutcome::Missing),
                ("title_t", &FieldOutcome::Missing),
                ("format", &FieldOutcome::Missing),
            ]
        );
    }

    #[test]
    fn absent_candidate_array_against_blank_reference_is_equal() {
        let reference = record(json!({"id": ["b1"], "note_t": [""]}));
        let candidate = record(json!({"id": ["b1"]}));
        let report = Reconciler::new(ReconConfig::default())
            .compare_records("b1", &reference, &candidate, 0);
        assert!(report.fields.is_empty());
    }

    #[test]
    fn order_insensitive_facet() {
        let reference = record(json!({"subject_facet": ["a", "b"]}));
        let candidate = record(json!({"subject_facet": ["b", "a"]}));
        let report = compare_records(&ReconConfig::default(), "x", &reference, &candidate, true, 0);
        assert_eq!(outcomes(&report), vec![("subject_facet", &FieldOutcome::Equal)]);
    }

    #[test]
    fn mismatch_carries_both_values() {
        let reference = record(json!({"title_t": ["Alpha"]}));
        let candidate = record(json!({"title_t": ["Beta"]}));
        let report = compare_records(&ReconConfig::default(), "x", &reference, &candidate, false, 0);
        assert_eq!(
            outcomes(&report),
            vec![(
                "title_t",
                &FieldOutcome::Mismatch {
                    reference: json!(["Alpha"]),
                    candidate: json!(["Beta"]),
                }
            )]
        );
    }

    #[test]
    fn non_array_candidate_for_array_reference_is_mismatch() {
        let reference = record(json!({"title_t": ["Alpha"]}));
        let candidate = record(json!({"title_t": "Alpha"}));
        let report = compare_records(&ReconConfig::default(), "x", &reference, &candidate, false, 0);
        assert_eq!(report.mismatched(), 1);
    }

    #[test]
    fn false_candidate_reads_as_empty_array() {
        let reference = record(json!({"note_t": [""], "tags_ss": []}));
        let candidate = record(json!({"note_t": false, "tags_ss": false}));
        let report = compare_records(&ReconConfig::default(), "x", &reference, &candidate, true, 0);
        assert_eq!(
            outcomes(&report),
            vec![("note_t", &FieldOutcome::Equal), ("tags_ss", &FieldOutcome::Equal)]
        );
    }

    #[test]
    fn false_candidate_against_populated_array_shows_false() {
        let reference = record(json!({"title_t": ["Alpha"]}));
        let candidate = record(json!({"title_t": false}));
        let report = compare_records(&ReconConfig::default(), "x", &reference, &candidate, false, 0);
        assert_eq!(
            outcomes(&report),
            vec![(
                "title_t",
                &FieldOutcome::Mismatch {
                    reference: json!(["Alpha"]),
                    candidate: json!(false),
                }
            )]
        );
    }

    #[test]
    fn null_candidate_is_missing() {
        let reference = record(json!({"format": "Book"}));
        let candidate = record(json!({"format": null}));
        let report = compare_records(&ReconConfig::default(), "x", &reference, &candidate, false, 0);
        assert_eq!(outcomes(&report), vec![("format", &FieldOutcome::Missing)]);
    }

    #[test]
    fn fields_only_in_candidate_are_not_visited() {
        let reference = record(json!({"a": "1"}));
        let candidate = record(json!({"a": "1", "extra": "2"}));
        let report = compare_records(&ReconConfig::default(), "x", &reference, &candidate, true, 0);
        assert_eq!(report.compared, 1);
        assert_eq!(report.fields.len(), 1);
    }

    #[test]
    fn timestamp_annotation_ignores_ignore_set() {
        let reference = record(json!({"id": ["b1"], "updated_dt": "2020-01-01"}));
        let candidate = record(json!({"id": ["b1"], "updated_dt": "2021-06-30"}));
        let report = Reconciler::new(ReconConfig::default())
            .compare_records("b1", &reference, &candidate, 0);
        let ts = report.timestamp.expect("timestamp annotation");
        assert_eq!(ts.to_string(), "(2020-01-01 vs 2021-06-30)");
        assert!(report.fields.is_empty());
    }

    #[test]
    fn timestamp_absent_on_both_sides() {
        let reference = record(json!({"id": ["b1"]}));
        let report = Reconciler::new(ReconConfig::default())
            .compare_records("b1", &reference, &reference, 0);
        assert!(report.timestamp.is_none());
    }

    #[test]
    fn strict_policy_flags_candidate_extras() {
        let reference = record(json!({"topic_facet": ["a"]}));
        let candidate = record(json!({"topic_facet": ["a", "b"]}));
        let lenient = compare_records(&ReconConfig::default(), "x", &reference, &candidate, false, 0);
        assert!(!lenient.has_discrepancies());

        let strict_config = ReconConfig::default().array_policy(crate::config::ArrayPolicy::Strict);
        let strict = compare_records(&strict_config, "x", &reference, &candidate, false, 0);
        assert_eq!(strict.mismatched(), 1);
    }

    #[test]
    fn idempotent() {
        let reference = record(json!({"id": ["b1"], "title_t": ["A", "B"], "pub_t": "x,"}));
        let candidate = record(json!({"id": ["b1"], "title_t": ["B"], "pub_t": "y"}));
        let reconciler = Reconciler::new(ReconConfig::default().show_equal(true));
        let first = reconciler.compare_records("b1", &reference, &candidate, 1);
        let second = reconciler.compare_records("b1", &reference, &candidate, 1);
        assert_eq!(first, second);
    }
}
