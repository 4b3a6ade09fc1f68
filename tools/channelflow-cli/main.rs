use anyhow::{Context, Result, bail};
use channelflow::prelude::*;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compiles and checks channel documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a channel document into its pipeline specification
    Compile {
        /// Exported channel document or persisted state
        document: PathBuf,
        /// Write the pipeline here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the pipeline JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Re-validate every edge of a channel document
    Check {
        document: PathBuf,
    },
    /// Write the document without credentials or export header
    Sanitize {
        document: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether the command succeeded without findings.
fn run(command: Command) -> Result<bool> {
    match command {
        Command::Compile {
            document,
            output,
            pretty,
        } => {
            let start = Instant::now();
            let channel = load(&document)?;
            report(&audit(&channel.graph));

            let spec = channel.compile();
            let json = if pretty {
                serde_json::to_string_pretty(&spec)
            } else {
                serde_json::to_string(&spec)
            }
            .context("Failed to serialize pipeline")?;

            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write '{}'", path.display()))?;
                    info!(path = %path.display(), elapsed = ?start.elapsed(), "pipeline written");
                }
                None => println!("{}", json),
            }
            Ok(true)
        }
        Command::Check { document } => {
            let channel = load(&document)?;
            let issues = audit(&channel.graph);
            report(&issues);
            if issues.is_empty() {
                println!(
                    "{}: {} nodes, {} edges, no issues",
                    document.display(),
                    channel.graph.nodes().len(),
                    channel.graph.edges().len()
                );
            }
            Ok(issues.is_empty())
        }
        Command::Sanitize { document, output } => {
            if output == document {
                bail!("Refusing to overwrite the input document '{}'", document.display());
            }
            let channel = load(&document)?;
            channel
                .save_persisted(&output)
                .with_context(|| format!("Failed to sanitize '{}'", document.display()))?;
            info!(path = %output.display(), "sanitized document written");
            Ok(true)
        }
    }
}

fn load(path: &Path) -> Result<Channel> {
    Channel::load(path).with_context(|| format!("Failed to load channel document '{}'", path.display()))
}

fn report(issues: &[AuditIssue]) {
    for issue in issues {
        eprintln!("  -> {}: {}", issue.edge_id, issue.reason);
    }
}
