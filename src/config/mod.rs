mod schema;

pub use schema::{Config, SeasonConfig};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ranking::validation::collect_ranking_errors;

/// Get the config directory path (~/.config/beanstalk/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("beanstalk"))
}

/// Get the default config file path (~/.config/beanstalk/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path and
///   falls back to the built-in seasons when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(explicit) => {
            if !explicit.exists() {
                anyhow::bail!("Config file not found at {}", explicit.display());
            }
            explicit
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                debug!(path = %default_path.display(), "no config file, using built-in seasons");
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    debug!(path = %config_path.display(), seasons = config.seasons.len(), "loaded config");
    Ok(config)
}

/// Write `config` as YAML, atomically.
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn save_config(path: &Path, config: &Config, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

/// Validate every season in the config.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.seasons.is_empty() {
        errors.push("seasons: at least one season is required".to_string());
    }

    let mut seen_ids = HashSet::new();
    for (i, season) in config.seasons.iter().enumerate() {
        if !seen_ids.insert(season.id) {
            errors.push(format!("seasons[{}].id: duplicate season id {}", i, season.id));
        }

        if let Some(ended_at) = season.ended_at {
            if ended_at < season.started_at {
                errors.push(format!(
                    "seasons[{}].ended_at: {} is before started_at {}",
                    i, ended_at, season.started_at
                ));
            }
        }

        collect_ranking_errors(&season.ranking, &format!("seasons[{}].ranking", i), &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::env;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_duplicate_season_ids() {
        let mut config = Config::default();
        config.seasons.push(config.seasons[0].clone());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("seasons[1].id"));
    }

    #[test]
    fn test_season_ends_before_start() {
        let mut config = Config::default();
        config.seasons[0].ended_at = NaiveDate::from_ymd_opt(2020, 1, 1);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("seasons[0].ended_at"));
    }

    #[test]
    fn test_ranking_errors_carry_season_path() {
        let mut config = Config::default();
        config.seasons[0].ranking.tournaments.national.receiving_fraction = 0.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].starts_with("seasons[0].ranking.tournaments.national.receiving_fraction"));
    }

    #[test]
    fn test_no_seasons() {
        let config = Config { seasons: vec![] };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp_path = env::temp_dir().join("beanstalk_test_missing_config.yaml");
        let _ = std::fs::remove_file(&temp_path);

        let result = load_config(Some(temp_path));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("beanstalk_test_roundtrip.yaml");
        let _ = std::fs::remove_file(&temp_path);

        let config = Config::default();
        save_config(&temp_path, &config, false).unwrap();
        let loaded = load_config(Some(temp_path.clone())).unwrap();
        assert_eq!(loaded, config);

        // Second save without overwrite is refused
        assert!(save_config(&temp_path, &config, false).is_err());
        assert!(save_config(&temp_path, &config, true).is_ok());

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_path = env::temp_dir().join("beanstalk_test_invalid.yaml");
        std::fs::write(&temp_path, "seasons: [unterminated").unwrap();

        let result = load_config(Some(temp_path.clone()));
        assert!(result.is_err());

        let _ = std::fs::remove_file(&temp_path);
    }
}
