//! `docparity compare`: reconcile the indexer output against a candidate source.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use clap::Args;
use docparity_recon::model::{Report, ReportMeta};
use docparity_recon::{run_corpus, ArrayPolicy, JsonLinesSource, Reconciler, ReportEntry, ReportSummary};

use crate::exit_codes::EXIT_DISCREPANCIES;
use crate::fetch::{build_fetcher, candidate_label, CandidateSource};
use crate::render::TextSink;
use crate::settings::Settings;
use crate::CliError;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Line-delimited JSON from the batch indexer [default: source.file]
    pub source: Option<PathBuf>,

    /// Settings file [default: ./docparity.toml if present]
    #[arg(long, env = "DOCPARITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Record service base URL (overrides fetch.base_url)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Where candidate records come from
    #[arg(long, value_enum, default_value_t = CandidateSource::ServerCache)]
    pub candidate: CandidateSource,

    /// Document directory for --candidate local-cache (overrides cache.docs_dir)
    #[arg(long)]
    pub docs_dir: Option<PathBuf>,

    /// Also list fields that agree
    #[arg(long)]
    pub show_equal: bool,

    /// Skip a field (repeatable, adds to recon.ignore_keys)
    #[arg(long = "ignore", value_name = "FIELD")]
    pub ignore: Vec<String>,

    /// Arrays must also have the same length
    #[arg(long)]
    pub strict_arrays: bool,

    /// Print the JSON report to stdout instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Write the JSON report to a file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Exit 3 when any record has discrepancies or any line failed
    #[arg(long)]
    pub strict_exit: bool,

    /// Suppress the summary on stderr
    #[arg(long, short)]
    pub quiet: bool,
}

/// Load settings and fold the command-line overrides into them.
pub fn resolve_settings(args: &CompareArgs) -> Result<Settings, CliError> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if args.show_equal {
        settings.recon.show_equal = true;
    }
    settings.recon.ignore_keys.extend(args.ignore.iter().cloned());
    if args.strict_arrays {
        settings.recon.array_policy = ArrayPolicy::Strict;
    }
    if let Some(url) = &args.base_url {
        settings.fetch.base_url = url.clone();
    }
    if let Some(dir) = &args.docs_dir {
        settings.cache.docs_dir = dir.clone();
    }
    if let Some(source) = &args.source {
        settings.source.file = source.clone();
    }

    settings.validate().map_err(|e| CliError::args(e.to_string()))?;
    Ok(settings)
}

pub fn open_source(path: &Path, id_field: &str) -> Result<JsonLinesSource<BufReader<File>>, CliError> {
    let file = File::open(path).map_err(|e| {
        CliError::io(format!("cannot open {}: {e}", path.display()))
            .with_hint("pass the indexer output as SOURCE or set source.file")
    })?;
    Ok(JsonLinesSource::new(BufReader::new(file), id_field))
}

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let settings = resolve_settings(&args)?;
    let config = settings.recon.clone();
    let source_path = settings.source.file.clone();

    let source = open_source(&source_path, &config.id_field)?;
    let fetcher = build_fetcher(args.candidate, &settings)?;
    let reconciler = Reconciler::new(config);

    log::info!(
        "comparing {} against {}",
        source_path.display(),
        candidate_label(args.candidate, &settings)
    );

    let (summary, entries) = if args.json {
        let mut entries: Vec<ReportEntry> = Vec::new();
        let summary = run_corpus(&reconciler, source, &*fetcher, &mut entries)?;
        (summary, entries)
    } else {
        let stdout = io::stdout().lock();
        let mut sink = if args.output.is_some() {
            TextSink::collecting(stdout)
        } else {
            TextSink::new(stdout)
        };
        let summary = run_corpus(&reconciler, source, &*fetcher, &mut sink)?;
        (summary, sink.into_entries())
    };

    if args.json || args.output.is_some() {
        let report = Report {
            meta: ReportMeta::new(
                reconciler.config(),
                &source_path.display().to_string(),
                &candidate_label(args.candidate, &settings),
            ),
            summary: summary.clone(),
            entries,
        };
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = args.output {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            if !args.quiet {
                eprintln!("wrote {}", path.display());
            }
        }

        if args.json {
            println!("{json_str}");
        }
    }

    if !args.quiet {
        eprintln!("{}", summary_line(&summary));
    }

    if args.strict_exit && !summary.is_clean() {
        return Err(CliError {
            code: EXIT_DISCREPANCIES,
            message: "discrepancies found".to_string(),
            hint: None,
        });
    }

    Ok(())
}

/// One-line human summary for stderr.
pub fn summary_line(s: &ReportSummary) -> String {
    format!(
        "compared {} of {} records: {} with discrepancies ({} mismatched, {} missing, {} equal fields), {} line errors",
        s.records_compared,
        s.records_read,
        s.records_with_discrepancies,
        s.fields_mismatched,
        s.fields_missing,
        s.fields_equal,
        s.line_errors,
    )
}
