use crate::catalog::{CatalogError, StoryCatalog};
use crate::session::ProfileCard;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Nominal length of one slide at full progress
pub const DEFAULT_BASE_DURATION_MS: u64 = 6000;
/// How often the progress bar is refreshed while playing
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Timing options for a story session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub base_duration: Duration,
    pub frame_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            base_duration: Duration::from_millis(DEFAULT_BASE_DURATION_MS),
            frame_interval: Duration::from_millis(DEFAULT_FRAME_INTERVAL_MS),
        }
    }
}

/// Application configuration
/// In debug builds: also loads a .env file before reading the environment
#[derive(Clone, Debug)]
pub struct Config {
    pub playback: PlaybackConfig,
    /// JSON story manifest; the builtin reel is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Entry screen shown while no story is open
    pub profile: ProfileCard,
}

impl Config {
    /// Load configuration from the environment
    pub fn load() -> Result<Self, ConfigError> {
        #[cfg(debug_assertions)]
        {
            if dotenvy::dotenv().is_ok() {
                info!("Config: Dev mode activated - loaded .env file");
            } else {
                tracing::debug!("Config: No .env file found");
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_duration =
            duration_var(&lookup, "STORY_BASE_DURATION_MS", DEFAULT_BASE_DURATION_MS)?;
        let frame_interval =
            duration_var(&lookup, "STORY_FRAME_INTERVAL_MS", DEFAULT_FRAME_INTERVAL_MS)?;

        let catalog_path = lookup("STORY_CATALOG_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let defaults = ProfileCard::default();
        let profile = ProfileCard {
            display_name: lookup("STORY_PROFILE_NAME").unwrap_or(defaults.display_name),
            outline_color: lookup("STORY_PROFILE_OUTLINE").unwrap_or(defaults.outline_color),
            image: lookup("STORY_PROFILE_IMAGE").or(defaults.image),
        };

        match &catalog_path {
            Some(path) => info!("Config: Story manifest: {}", path.display()),
            None => info!("Config: Using builtin story reel"),
        }

        Ok(Config {
            playback: PlaybackConfig {
                base_duration,
                frame_interval,
            },
            catalog_path,
            profile,
        })
    }

    /// Load the configured story catalog
    pub fn load_catalog(&self) -> Result<StoryCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => StoryCatalog::load(path),
            None => Ok(StoryCatalog::builtin()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            playback: PlaybackConfig::default(),
            catalog_path: None,
            profile: ProfileCard::default(),
        }
    }
}

fn duration_var<F>(
    lookup: &F,
    var: &'static str,
    default_ms: u64,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let millis = match lookup(var) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value })?,
        None => default_ms,
    };

    if millis == 0 {
        return Err(ConfigError::ZeroDuration(var));
    }
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_six_second_reel() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.playback.base_duration, Duration::from_millis(6000));
        assert_eq!(config.playback.frame_interval, Duration::from_millis(16));
        assert!(config.catalog_path.is_none());
        assert_eq!(config.profile.display_name, "Binaryhood");
        assert_eq!(config.profile.outline_color, "#33ad1d");
        assert_eq!(config.load_catalog().unwrap().len(), 8);
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = config_from(&[
            ("STORY_BASE_DURATION_MS", "4000"),
            ("STORY_FRAME_INTERVAL_MS", " 33 "),
            ("STORY_CATALOG_PATH", "/tmp/reel.json"),
            ("STORY_PROFILE_NAME", "Night Owl"),
        ])
        .unwrap();

        assert_eq!(config.playback.base_duration, Duration::from_millis(4000));
        assert_eq!(config.playback.frame_interval, Duration::from_millis(33));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/reel.json")));
        assert_eq!(config.profile.display_name, "Night Owl");
    }

    #[test]
    fn non_numeric_duration_is_rejected() {
        match config_from(&[("STORY_BASE_DURATION_MS", "six seconds")]) {
            Err(ConfigError::InvalidNumber { var, value }) => {
                assert_eq!(var, "STORY_BASE_DURATION_MS");
                assert_eq!(value, "six seconds");
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn zero_durations_are_rejected() {
        assert!(matches!(
            config_from(&[("STORY_BASE_DURATION_MS", "0")]),
            Err(ConfigError::ZeroDuration("STORY_BASE_DURATION_MS"))
        ));
        assert!(matches!(
            config_from(&[("STORY_FRAME_INTERVAL_MS", "0")]),
            Err(ConfigError::ZeroDuration("STORY_FRAME_INTERVAL_MS"))
        ));
    }
}
