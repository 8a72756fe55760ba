use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use hashlinker::cli::{Cli, Commands};
use hashlinker::config::init_config;
use hashlinker::system::init_logging;

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match init_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let _guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("Failed to initialize logging: {:#}", e);
                    return ExitCode::FAILURE;
                }
            };

            tracing::info!("starting url shortener");
            if let Err(e) = hashlinker::runtime::run_server(config).await {
                error!("{:#}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        #[cfg(feature = "cli")]
        command => match hashlinker::cli::commands::run_cli_command(command) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", e.format_colored());
                ExitCode::FAILURE
            }
        },
        #[cfg(not(feature = "cli"))]
        _ => {
            eprintln!("this build only supports `serve`");
            ExitCode::FAILURE
        }
    }
}
