//! northwind - data access demonstrations against the Northwind sample database.

use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::debug;

use northwind_cli::cli::{Cli, Command};
use northwind_cli::commands::{open_database, run_all, run_demo};
use northwind_cli::logging::init_tracing;
use northwind_cli::{load_settings, render};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(&cli).context("Could not load settings")?;
    let mut out = io::stdout().lock();

    let demo = match cli.command.clone().unwrap_or(Command::Connection) {
        Command::Connection => {
            let connection_string = settings.connection_string(&cli.connection).unwrap_or("");
            writeln!(out, "{}", render::connection_line(connection_string))?;
            return Ok(());
        }
        Command::All => None,
        Command::Demo(demo) => Some(demo),
    };

    let db = open_database(&settings, &cli.connection)
        .await
        .with_context(|| format!("Could not open connection '{}'", cli.connection))?;

    let result = match &demo {
        Some(demo) => run_demo(&db, demo, &mut out).await,
        None => run_all(&db, &mut out).await,
    };

    db.close().await;
    debug!("Database closed");

    out.flush()?;
    Ok(result?)
}
