mod args;
mod client;
mod config;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use lattice_cli::{AnsiTerminal, AppCommands, JsonRunner, Output, SignalExitHandler};
use lattice_common::telemetry::init_tracing;
use lattice_receptor::ClusterApi;

use crate::args::{Args, Command};
use crate::client::connect;
use crate::config::build_template;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing("warn");
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("✗ {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let api: Arc<dyn ClusterApi> = Arc::new(connect(&args)?);
    debug!(url = %args.receptor_url, "using receptor");

    let terminal = Arc::new(AnsiTerminal::detect(args.no_color));
    let output = Output::stdout(terminal);
    let runner = JsonRunner::new(Arc::clone(&api), build_template(&args.defaults));
    let exit = Arc::new(SignalExitHandler::install());
    let mut commands = AppCommands::new(api, output, exit, runner);

    // Handlers have already reported any failure; only the status remains.
    let result = match args.command {
        Command::List => commands.list_apps().await,
        Command::Status { app_name } => commands.app_status(app_name.as_deref()).await,
        Command::Visualize { rate } => commands.visualize_cells(rate.unwrap_or_default()).await,
        Command::CreateFromJson { path } => commands.create_from_json(path.as_deref()).await,
    };

    Ok(match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(%err, "command failed");
            ExitCode::FAILURE
        }
    })
}
