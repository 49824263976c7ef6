//! `docparity download`: mirror records from the service into local caches,
//! resumable through a tracker file.
//!
//! Each record is stored twice: the raw record under `cache.dir` and the
//! built document under `cache.docs_dir`. `compare --candidate local-cache`
//! reads the latter.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use docparity_recon::{ReconError, SourceEntry};

use crate::compare::open_source;
use crate::fetch::{DirCache, DocCache, HttpFetcher, RawFetcher};
use crate::settings::Settings;
use crate::CliError;

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Line-delimited JSON from the batch indexer [default: source.file]
    pub source: Option<PathBuf>,

    /// Settings file [default: ./docparity.toml if present]
    #[arg(long, env = "DOCPARITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Record service base URL (overrides fetch.base_url)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Raw record directory (overrides cache.dir)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Built document directory (overrides cache.docs_dir)
    #[arg(long)]
    pub docs_dir: Option<PathBuf>,

    /// Tracker file holding the last stored identifier (overrides cache.tracker_file)
    #[arg(long)]
    pub tracker: Option<PathBuf>,

    /// Ignore the tracker and fetch every record
    #[arg(long)]
    pub force: bool,

    /// No progress lines
    #[arg(long, short)]
    pub quiet: bool,
}

/// Last identifier stored by a previous run.
#[derive(Debug, Clone)]
pub struct Tracker {
    path: PathBuf,
}

impl Tracker {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Stored marker, empty when the file does not exist yet.
    pub fn read(&self) -> Result<String, CliError> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(s.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(CliError::io(format!(
                "cannot read tracker {}: {e}",
                self.path.display()
            ))),
        }
    }

    pub fn write(&self, identifier: &str) -> Result<(), CliError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CliError::io(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&self.path, identifier).map_err(|e| {
            CliError::io(format!("cannot write tracker {}: {e}", self.path.display()))
        })
    }
}

/// One endpoint mirrored into one cache.
#[derive(Clone, Copy)]
pub struct MirrorTarget<'a> {
    pub label: &'static str,
    pub fetcher: &'a dyn RawFetcher,
    pub cache: &'a dyn DocCache,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub line_errors: usize,
}

/// Fetch and store every record after the tracker marker, in source order.
///
/// Identifiers compare byte-wise against the marker. The marker is rewritten
/// once every target holds the record, so a failed run resumes where it
/// stopped.
pub fn run_download<I, W>(
    source: I,
    targets: &[MirrorTarget<'_>],
    tracker: &Tracker,
    force: bool,
    progress: &mut W,
) -> Result<DownloadSummary, CliError>
where
    I: IntoIterator<Item = SourceEntry>,
    W: Write + ?Sized,
{
    let marker = if force { String::new() } else { tracker.read()? };
    if !marker.is_empty() {
        log::info!("resuming after {marker}");
    }

    let progress_err = |e: io::Error| CliError::io(format!("cannot write progress: {e}"));
    let mut summary = DownloadSummary::default();

    for SourceEntry { sequence, result } in source {
        let record = match result {
            Ok(record) => record,
            Err(ReconError::Io(msg)) => return Err(CliError::io(msg)),
            Err(e) => {
                log::warn!("{e}");
                writeln!(progress, "Error processing line: {sequence}").map_err(progress_err)?;
                summary.line_errors += 1;
                continue;
            }
        };

        let id = record.identifier.as_str();
        if id <= marker.as_str() {
            summary.skipped += 1;
            continue;
        }

        log::info!("downloading {id} (line {sequence})");
        writeln!(progress, "Downloading {id} ({sequence})").map_err(progress_err)?;

        for target in targets {
            let body = target.fetcher.fetch_raw(id)?;
            if target.cache.exists(id) {
                log::debug!("{id}: replacing cached {}", target.label);
            }
            target.cache.put(id, &body)?;
        }
        tracker.write(id)?;
        summary.downloaded += 1;
    }

    Ok(summary)
}

pub fn cmd_download(args: DownloadArgs) -> Result<(), CliError> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(url) = args.base_url {
        settings.fetch.base_url = url;
    }
    if let Some(dir) = args.cache_dir {
        settings.cache.dir = dir;
    }
    if let Some(dir) = args.docs_dir {
        settings.cache.docs_dir = dir;
    }
    if let Some(tracker) = args.tracker {
        settings.cache.tracker_file = tracker;
    }
    if let Some(source) = args.source {
        settings.source.file = source;
    }
    settings.validate().map_err(|e| CliError::args(e.to_string()))?;

    let source = open_source(&settings.source.file, &settings.recon.id_field)?;
    let raw_fetcher = HttpFetcher::from_settings(&settings.fetch, &settings.fetch.raw_path)?;
    let doc_fetcher = HttpFetcher::from_settings(&settings.fetch, &settings.fetch.doc_path)?;
    let raw_cache = DirCache::new(&settings.cache.dir);
    let docs_cache = DirCache::new(&settings.cache.docs_dir);
    let targets = [
        MirrorTarget { label: "record", fetcher: &raw_fetcher, cache: &raw_cache },
        MirrorTarget { label: "document", fetcher: &doc_fetcher, cache: &docs_cache },
    ];
    let tracker = Tracker::new(&settings.cache.tracker_file);

    let summary = if args.quiet {
        run_download(source, &targets, &tracker, args.force, &mut io::sink())?
    } else {
        let mut stdout = io::stdout().lock();
        run_download(source, &targets, &tracker, args.force, &mut stdout)?
    };

    if !args.quiet {
        eprintln!(
            "downloaded {} records into {} and {} ({} skipped, {} line errors)",
            summary.downloaded,
            raw_cache.dir().display(),
            docs_cache.dir().display(),
            summary.skipped,
            summary.line_errors,
        );
    }
    Ok(())
}
