//! Offline commands: key derivation, route listing, sample config

use colored::Colorize;
use std::path::Path;

use super::{CliError, Commands, ConfigCommands};
use crate::config::{StaticConfig, get_config};
use crate::routing::{RouteTable, short_key};
use crate::storage::UrlConfig;

const DEFAULT_SAMPLE_PATH: &str = "hashlinker.example.toml";

/// One line of `list` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    pub key: String,
    pub url: String,
    /// Another url later in the config owns this key
    pub shadowed: bool,
}

/// Run a non-server command against the global configuration
pub fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    let config = get_config();
    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "serve must be handled by the server runtime".to_string(),
        )),
        Commands::Key { urls } => {
            for (key, url) in derive_keys(&urls, config.routes.key_length) {
                println!("{}  {}", key.green().bold(), url);
            }
            Ok(())
        }
        Commands::List => {
            let rows = list_routes(
                Path::new(&config.routes.config_path),
                config.routes.key_length,
            )?;
            for row in &rows {
                if row.shadowed {
                    println!(
                        "{}  {} {}",
                        row.key.yellow(),
                        row.url.dimmed(),
                        "(shadowed by a later url)".yellow()
                    );
                } else {
                    println!("{}  {}", row.key.green().bold(), row.url);
                }
            }
            println!("{} urls", rows.len());
            Ok(())
        }
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => {
            let path = output_path.unwrap_or_else(|| DEFAULT_SAMPLE_PATH.to_string());
            config_generate(Path::new(&path), force)?;
            println!("{} {}", "Sample configuration written to".green(), path);
            Ok(())
        }
    }
}

pub fn derive_keys(urls: &[String], key_length: usize) -> Vec<(String, String)> {
    urls.iter()
        .map(|url| (short_key(url, key_length), url.clone()))
        .collect()
}

/// Route table rows in config order
pub fn list_routes(config_path: &Path, key_length: usize) -> Result<Vec<RouteRow>, CliError> {
    let urls = UrlConfig::load(config_path)?;
    let table = RouteTable::build(&urls, key_length);

    Ok(urls
        .urls
        .iter()
        .map(|url| {
            let key = short_key(url, key_length);
            let shadowed = table.get(&key) != Some(url.as_str());
            RouteRow {
                key,
                url: url.clone(),
                shadowed,
            }
        })
        .collect())
}

pub fn config_generate(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::CommandError(format!(
            "{} already exists, use --force to overwrite",
            path.display()
        )));
    }
    StaticConfig::default().save_to_file(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_derive_keys_matches_short_key() {
        let urls = vec!["https://example.com/a".to_string()];
        let keys = derive_keys(&urls, 6);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].0, short_key("https://example.com/a", 6));
        assert_eq!(keys[0].1, "https://example.com/a");
    }

    #[test]
    fn test_list_routes_marks_shadowed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routes.json");
        let urls: Vec<String> = (0..20).map(|i| format!("https://example.com/{}", i)).collect();
        UrlConfig::new(urls.clone()).save(&path).unwrap();

        let rows = list_routes(&path, 1).unwrap();
        assert_eq!(rows.len(), 20);
        // 20 urls over 16 possible keys: at least four are shadowed.
        assert!(rows.iter().filter(|r| r.shadowed).count() >= 4);
        // The last url is never shadowed.
        assert!(!rows.last().unwrap().shadowed);
    }

    #[test]
    fn test_config_generate_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("sample.toml");

        config_generate(&path, false).unwrap();
        assert!(path.exists());
        assert!(matches!(
            config_generate(&path, false),
            Err(CliError::CommandError(_))
        ));
        config_generate(&path, true).unwrap();
    }
}
