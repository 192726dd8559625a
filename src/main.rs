use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cli;
mod ui;

#[cfg(test)]
#[path = "../tests/support/temp_file_fixture.rs"]
mod temp_file_fixture;

use cli::{Cli, CliError, Command, build_client, run_probe, run_submit};

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Window) {
        Command::Window => {
            ui::run_form_window();
            ExitCode::SUCCESS
        }
        Command::Submit {
            cta,
            bgm,
            prompt,
            endpoint,
        } => report(build_client(endpoint.as_deref()).and_then(|client| {
            run_submit(&client, cta, bgm, &prompt)
        })),
        Command::Probe { endpoint } => {
            report(build_client(endpoint.as_deref()).and_then(|client| run_probe(&client)))
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(result: Result<(bool, String), CliError>) -> ExitCode {
    match result {
        Ok((ok, json)) => {
            println!("{json}");
            if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("{}", err.user_message());
            ExitCode::from(2)
        }
    }
}
