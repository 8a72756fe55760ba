//! Command-line parsing tests

use clap::Parser;
use hashlinker::cli::{Cli, CliError, Commands, ConfigCommands};
use hashlinker::errors::HashlinkerError;

#[test]
fn test_no_command_defaults_to_none() {
    let cli = Cli::try_parse_from(["hashlinker"]).unwrap();
    assert!(cli.command.is_none());
    assert!(cli.config.is_none());
}

#[test]
fn test_global_config_flag() {
    let cli = Cli::try_parse_from(["hashlinker", "serve", "-c", "custom.toml"]).unwrap();
    assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    assert_eq!(cli.command, Some(Commands::Serve));

    let cli = Cli::try_parse_from(["hashlinker", "--config=other.toml", "list"]).unwrap();
    assert_eq!(cli.config.as_deref(), Some("other.toml"));
    assert_eq!(cli.command, Some(Commands::List));
}

#[test]
fn test_key_command_requires_urls() {
    assert!(Cli::try_parse_from(["hashlinker", "key"]).is_err());

    let cli = Cli::try_parse_from(["hashlinker", "key", "https://a", "https://b"]).unwrap();
    assert_eq!(
        cli.command,
        Some(Commands::Key {
            urls: vec!["https://a".to_string(), "https://b".to_string()]
        })
    );
}

#[test]
fn test_config_generate() {
    let cli = Cli::try_parse_from(["hashlinker", "config", "generate", "out.toml", "--force"])
        .unwrap();
    assert_eq!(
        cli.command,
        Some(Commands::Config {
            action: ConfigCommands::Generate {
                output_path: Some("out.toml".to_string()),
                force: true,
            }
        })
    );
}

#[test]
fn test_unknown_command_fails() {
    assert!(Cli::try_parse_from(["hashlinker", "frobnicate"]).is_err());
}

#[test]
fn test_cli_error_from_crate_error() {
    let err: CliError = HashlinkerError::validation("empty").into();
    assert!(matches!(err, CliError::StorageError(_)));
    assert!(err.to_string().starts_with("Storage error:"));
}
