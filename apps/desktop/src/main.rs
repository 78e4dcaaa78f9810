use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{AnalysisService, HttpAnalysisService, UploadController};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod media;
mod session;
mod ui;

use config::load_settings;
use controller::orchestration::Workflow;

const DEFAULT_LOG_FILTER: &str = "radimal=info,client_core=info";
const VERBOSE_LOG_FILTER: &str = "radimal=debug,client_core=debug";

#[derive(Parser, Debug)]
#[command(
    name = "radimal",
    version,
    about = "Submit a medical study for AI analysis and review the report"
)]
struct Cli {
    /// Analysis endpoint URL (overrides config file and environment).
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Request timeout in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Config file; defaults to ./radimal.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a single study and print the report.
    Analyze {
        path: PathBuf,
        /// Write the embedded scan image to this file.
        #[arg(long)]
        save_image: Option<PathBuf>,
    },
    /// Interactive session: upload, review, reset, repeat.
    Session,
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_analyze<S: AnalysisService>(
    controller: &UploadController<S>,
    path: PathBuf,
    save_image: Option<PathBuf>,
) -> Result<ExitCode> {
    let mut workflow = Workflow::new();
    workflow.submit_path(controller, Some(&path)).await?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", ui::render_workflow(workflow.state(), false))?;

    if let Some(message) = workflow.state().error_message() {
        warn!(path = %path.display(), error = message, "study analysis failed");
        return Ok(ExitCode::FAILURE);
    }
    if let (Some(result), Some(out)) = (workflow.result(), save_image) {
        let written = media::save_embedded_image(result, &out)?;
        info!(path = %out.display(), size_bytes = written, "saved embedded scan image");
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?
        .with_cli_overrides(cli.endpoint, cli.timeout_secs);
    settings.validate()?;
    info!(
        endpoint = %settings.endpoint,
        timeout_secs = settings.timeout_secs,
        "using analysis endpoint"
    );

    let service =
        HttpAnalysisService::with_timeout(&settings.endpoint, settings.request_timeout())?;
    let controller = UploadController::new(service);

    match cli.command.unwrap_or(Command::Session) {
        Command::Analyze { path, save_image } => run_analyze(&controller, path, save_image).await,
        Command::Session => {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = io::stdout();
            session::run_session(&controller, stdin, &mut stdout).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod workflow_tests;
