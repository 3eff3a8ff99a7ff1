//! Autodock CLI entry point

use std::process::ExitCode;

use clap::Parser;

use autodock::cli::{
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    daemon_app::run_daemon,
    daemon_cmd::{handle_ctl_command, CtlAction},
    devices_cmd::handle_devices_command,
    presenter::Presenter,
    EXIT_ERROR,
};
use autodock::infrastructure::JsonConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    match cli.command {
        Commands::Run(options) => run_daemon(options).await,
        Commands::Status => ctl(CtlAction::Status, &presenter).await,
        Commands::Override { category, name } => {
            ctl(
                CtlAction::Override {
                    category: category.into(),
                    name,
                },
                &presenter,
            )
            .await
        }
        Commands::Clear { category } => {
            ctl(
                CtlAction::Clear {
                    category: category.into(),
                },
                &presenter,
            )
            .await
        }
        Commands::Devices => match handle_devices_command(&presenter).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                presenter.error(&e);
                ExitCode::from(EXIT_ERROR)
            }
        },
        Commands::Config { action } => {
            let store = JsonConfigStore::new();
            match handle_config_command(action, &store, &presenter).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
    }
}

async fn ctl(action: CtlAction, presenter: &Presenter) -> ExitCode {
    match handle_ctl_command(action, presenter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            presenter.error(&e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
