//! `docparity batches`: turn an export tracker into `d.AddBatch(...)` lines.

use std::fmt;
use std::path::PathBuf;

use clap::Args;
use serde::Deserialize;

use crate::CliError;

#[derive(Debug, Args)]
pub struct BatchesArgs {
    /// Export tracker JSON (`{"batches": [...]}`)
    pub tracker: PathBuf,

    /// Merge consecutive batches two at a time
    #[arg(long)]
    pub pairs: bool,
}

#[derive(Debug, Deserialize)]
pub struct TrackerFile {
    pub batches: Vec<Batch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Batch {
    pub chunk_start_bib: BibNumber,
    pub chunk_end_bib: BibNumber,
    pub file_name: String,
}

/// Record number as the exporter writes it: bare number or string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BibNumber {
    Number(u64),
    Text(String),
}

impl fmt::Display for BibNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

pub fn parse_tracker(text: &str) -> Result<Vec<Batch>, CliError> {
    let tracker: TrackerFile = serde_json::from_str(text.trim_start_matches('\u{feff}'))
        .map_err(|e| CliError::parse(format!("invalid tracker: {e}")))?;
    Ok(tracker.batches)
}

fn add_batch(start: &BibNumber, end: &BibNumber, file_name: &str) -> String {
    format!("d.AddBatch(\"b{start}\", \"b{end}\", \"{file_name}\")")
}

/// One line per tracker batch.
pub fn batch_lines(batches: &[Batch]) -> Vec<String> {
    batches
        .iter()
        .map(|b| add_batch(&b.chunk_start_bib, &b.chunk_end_bib, &b.file_name))
        .collect()
}

/// Consecutive batches merged in twos. An odd trailing batch stands alone
/// and is named after its own index in the tracker.
pub fn paired_batch_lines(batches: &[Batch]) -> Vec<String> {
    let mut lines: Vec<String> = batches
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            add_batch(
                &pair[0].chunk_start_bib,
                &pair[1].chunk_end_bib,
                &format!("big_sierra_export_{i}.mrc"),
            )
        })
        .collect();

    if batches.len() % 2 != 0 {
        let x = batches.len() - 1;
        let last = &batches[x];
        lines.push(add_batch(
            &last.chunk_start_bib,
            &last.chunk_end_bib,
            &format!("big_sierra_export_{x}.mrc"),
        ));
    }
    lines
}

pub fn cmd_batches(args: BatchesArgs) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&args.tracker)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", args.tracker.display())))?;
    let batches = parse_tracker(&text)?;
    log::debug!("{} batches in {}", batches.len(), args.tracker.display());

    let lines = if args.pairs {
        paired_batch_lines(&batches)
    } else {
        batch_lines(&batches)
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::EXIT_PARSE;

    const TRACKER: &str = r#"{
        "batches": [
            {"chunk_start_bib": 1000001, "chunk_end_bib": 1050000, "file_name": "export_0.mrc", "status": "done"},
            {"chunk_start_bib": 1050001, "chunk_end_bib": 1100000, "file_name": "export_1.mrc"},
            {"chunk_start_bib": "1100001", "chunk_end_bib": "1150000", "file_name": "export_2.mrc"}
        ]
    }"#;

    #[test]
    fn one_line_per_batch() {
        let batches = parse_tracker(TRACKER).unwrap();
        assert_eq!(
            batch_lines(&batches),
            vec![
                r#"d.AddBatch("b1000001", "b1050000", "export_0.mrc")"#,
                r#"d.AddBatch("b1050001", "b1100000", "export_1.mrc")"#,
                r#"d.AddBatch("b1100001", "b1150000", "export_2.mrc")"#,
            ]
        );
    }

    #[test]
    fn pairs_with_odd_tail() {
        let batches = parse_tracker(TRACKER).unwrap();
        assert_eq!(
            paired_batch_lines(&batches),
            vec![
                r#"d.AddBatch("b1000001", "b1100000", "big_sierra_export_0.mrc")"#,
                r#"d.AddBatch("b1100001", "b1150000", "big_sierra_export_2.mrc")"#,
            ]
        );
    }

    #[test]
    fn pairs_even() {
        let batches = parse_tracker(TRACKER).unwrap();
        assert_eq!(paired_batch_lines(&batches[..2]).len(), 1);
        assert!(paired_batch_lines(&[]).is_empty());
    }

    #[test]
    fn missing_field_is_parse_error() {
        let err = parse_tracker(r#"{"batches":[{"chunk_start_bib":1,"file_name":"x"}]}"#).unwrap_err();
        assert_eq!(err.code, EXIT_PARSE);
        assert!(err.message.contains("chunk_end_bib"), "{}", err.message);
    }

    #[test]
    fn not_a_tracker() {
        assert_eq!(parse_tracker("[]").unwrap_err().code, EXIT_PARSE);
    }
}
