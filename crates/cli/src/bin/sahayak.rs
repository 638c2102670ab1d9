use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use sahayak::{App, Cli, commands};

async fn run(cli: Cli) -> Result<()> {
    let settings = settings_loader::load_with_env(cli.settings.as_ref())?;
    let app = App::from_settings(&settings, cli.demo)?;
    let mut stdout = io::stdout().lock();
    commands::run(&app, cli.command, cli.json, &mut stdout).await
}

#[tokio::main]
async fn main() -> ExitCode {
    logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("{err:?}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
