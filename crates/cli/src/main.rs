// docparity - record parity checks between the batch indexer and the live service

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use docparity_cli::batches::{cmd_batches, BatchesArgs};
use docparity_cli::compare::{cmd_compare, CompareArgs};
use docparity_cli::download::{cmd_download, DownloadArgs};
use docparity_cli::exit_codes::EXIT_SUCCESS;
use docparity_cli::settings::Settings;
use docparity_cli::CliError;

#[derive(Parser)]
#[command(name = "docparity")]
#[command(about = "Compare indexed records against the live record service")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report field-level differences between indexer output and the service
    #[command(after_help = "\
Examples:
  docparity compare
  docparity compare data/traject_file.json --candidate live
  docparity compare --candidate local-cache --docs-dir data/docs --show-equal
  docparity compare --json --strict-exit > report.json")]
    Compare(CompareArgs),

    /// Mirror raw records and built documents locally, resuming after the tracker
    #[command(after_help = "\
Examples:
  docparity download
  docparity download data/traject_file.json --cache-dir data --docs-dir data/docs --quiet
  docparity download --force")]
    Download(DownloadArgs),

    /// Print d.AddBatch(...) lines for an export tracker
    #[command(after_help = "\
Examples:
  docparity batches tracker.json
  docparity batches tracker.json --pairs")]
    Batches(BatchesArgs),

    /// Check a settings file without running anything
    #[command(after_help = "\
Examples:
  docparity validate --config docparity.toml")]
    Validate {
        /// Settings file [default: ./docparity.toml if present]
        #[arg(long, env = "DOCPARITY_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare(args) => cmd_compare(args),
        Commands::Download(args) => cmd_download(args),
        Commands::Batches(args) => cmd_batches(args),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn cmd_validate(config: Option<PathBuf>) -> Result<(), CliError> {
    let settings = Settings::load(config.as_deref())?;
    let recon = &settings.recon;
    eprintln!(
        "ok: id field '{}', {} ignored fields, {} arrays, service {}",
        recon.id_field,
        recon.ignore_keys.len(),
        recon.array_policy,
        settings.fetch.base_url,
    );
    Ok(())
}
