//! Runtime configuration read from the environment (and a `.env` file, if present).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::commands::music::utils::autoplay_manager::AutoplaySettings;
use crate::commands::music::utils::skip_vote::SkipPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    /// Prefix for text commands; mentioning the bot always works too.
    pub command_prefix: String,
    /// Append-only log of enqueued queries, used as the autoplay pool.
    pub history_path: PathBuf,
    pub skip_policy: SkipPolicy,
    /// Volume applied to new tracks, 0.0 - 1.0
    pub default_volume: f32,
    pub autoplay: AutoplaySettings,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let discord_token = env::var("DISCORD_TOKEN").map_err(|_| ConfigError::Missing("DISCORD_TOKEN"))?;
        Self::from_lookup(discord_token, |key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to defaults
    /// for every optional key.
    pub fn from_lookup<F>(discord_token: String, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::with_token(discord_token);

        let command_prefix = lookup("COMMAND_PREFIX").unwrap_or(defaults.command_prefix);
        let history_path = lookup("SONG_HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.history_path);

        let elevated_roles = match lookup("SKIP_ROLES") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.skip_policy.elevated_roles,
        };
        let threshold = parse_or("SKIP_THRESHOLD", &lookup, defaults.skip_policy.threshold)?;
        if threshold == 0 {
            return Err(ConfigError::Invalid {
                key: "SKIP_THRESHOLD",
                value: threshold.to_string(),
            });
        }

        let volume_percent: u8 = parse_or("DEFAULT_VOLUME", &lookup, 60)?;
        if volume_percent > 100 {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_VOLUME",
                value: volume_percent.to_string(),
            });
        }

        let min_queue = parse_or("AUTOPLAY_MIN_QUEUE", &lookup, defaults.autoplay.min_queue)?;
        let interval_secs: u64 = parse_or(
            "AUTOPLAY_INTERVAL_SECS",
            &lookup,
            defaults.autoplay.interval.as_secs(),
        )?;

        Ok(Self {
            discord_token: defaults.discord_token,
            command_prefix,
            history_path,
            skip_policy: SkipPolicy {
                threshold,
                elevated_roles,
            },
            default_volume: f32::from(volume_percent) / 100.0,
            autoplay: AutoplaySettings {
                min_queue,
                min_history: defaults.autoplay.min_history,
                interval: Duration::from_secs(interval_secs),
            },
        })
    }

    /// Default configuration around a token
    pub fn with_token(discord_token: String) -> Self {
        Self {
            discord_token,
            command_prefix: "$".to_string(),
            history_path: PathBuf::from("songs.txt"),
            skip_policy: SkipPolicy::default(),
            default_volume: 0.6,
            autoplay: AutoplaySettings::default(),
        }
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
