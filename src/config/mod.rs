mod schema;

pub use schema::{AdviceConfig, Config};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/stock-ranker/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("stock-ranker"))
}

/// Get the default config file path (~/.config/stock-ranker/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/stock-ranker/config.yaml) and falls back to built-in defaults
///   when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path
        }
        None => match get_config_path() {
            Some(default_path) if default_path.exists() => default_path,
            _ => {
                tracing::debug!("no config file, using built-in defaults");
                return Ok(Config::default());
            }
        },
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config = parse_config(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Parse configuration from YAML text
pub fn parse_config(yaml: &str) -> Result<Config> {
    let config: Config = serde_saphyr::from_str(yaml)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp_path = env::temp_dir().join("stock_ranker_test_missing_config.yaml");
        let _ = std::fs::remove_file(&temp_path);

        let err = load_config(Some(temp_path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp_path = env::temp_dir().join("stock_ranker_test_config.yaml");
        std::fs::write(
            &temp_path,
            "scoring:\n  weights:\n    short_term_change: 3\nadvice:\n  count: 4\n",
        )
        .unwrap();

        let config = load_config(Some(temp_path.clone())).unwrap();
        let weights = config.scoring.unwrap().weights.unwrap();
        assert_eq!(weights["short_term_change"], 3.0);
        assert_eq!(config.advice.unwrap().count, Some(4));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let temp_path = env::temp_dir().join("stock_ranker_test_invalid_config.yaml");
        std::fs::write(&temp_path, "scoring: [not, a, map\n").unwrap();

        let err = load_config(Some(temp_path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));

        let _ = std::fs::remove_file(&temp_path);
    }
}
