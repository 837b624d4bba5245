//! Configuration module for ctfr-bot.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;
pub mod runtime;

use crate::config::file::{FileConfig, TwitterSection};
use crate::config::runtime::{BotConfig, RuntimeConfig, SourceConfig, TwitterCredentials};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variables overriding the `[twitter]` section.
pub const TWITTER_CONSUMER_KEY_ENV: &str = "TWITTER_CONSUMER_KEY";
pub const TWITTER_CONSUMER_SECRET_ENV: &str = "TWITTER_CONSUMER_SECRET";
pub const TWITTER_ACCESS_TOKEN_ENV: &str = "TWITTER_ACCESS_TOKEN";
pub const TWITTER_ACCESS_TOKEN_SECRET_ENV: &str = "TWITTER_ACCESS_TOKEN_SECRET";

/// Upper bound of `source.horizon_days`.
pub const MAX_HORIZON_DAYS: u32 = 3650;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    state_override: Option<PathBuf>,
    dry_run: bool,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, state_override: Option<PathBuf>, dry_run: bool) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            state_override,
            dry_run,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (defaults apply when it does not exist)
    /// 2. Apply environment and CLI overrides
    /// 3. Validate the configuration
    /// 4. Build the runtime configuration
    pub fn load(&self) -> Result<RuntimeConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => toml::from_str("")?,
            Err(e) => return Err(e.into()),
        };

        apply_env_overrides(&mut file_config, |key| std::env::var(key).ok());
        self.apply_cli_overrides(&mut file_config);

        validate(&file_config)?;

        Ok(build_runtime_config(file_config))
    }

    fn apply_cli_overrides(&self, config: &mut FileConfig) {
        if let Some(state_path) = &self.state_override {
            config.bot.state_path = state_path.clone();
        }
        if self.dry_run {
            config.bot.production = false;
        }
    }
}

/// Overwrite Twitter credentials with values found in the environment.
pub fn apply_env_overrides(config: &mut FileConfig, env: impl Fn(&str) -> Option<String>) {
    let overrides = [
        TWITTER_CONSUMER_KEY_ENV,
        TWITTER_CONSUMER_SECRET_ENV,
        TWITTER_ACCESS_TOKEN_ENV,
        TWITTER_ACCESS_TOKEN_SECRET_ENV,
    ]
    .map(|key| env(key).filter(|value| !value.is_empty()));

    if overrides.iter().all(Option::is_none) {
        return;
    }

    let [consumer_key, consumer_secret, access_token, access_token_secret] = overrides;
    let twitter = config.twitter.get_or_insert_with(TwitterSection::default);
    if let Some(value) = consumer_key {
        twitter.consumer_key = value;
    }
    if let Some(value) = consumer_secret {
        twitter.consumer_secret = value;
    }
    if let Some(value) = access_token {
        twitter.access_token = value;
    }
    if let Some(value) = access_token_secret {
        twitter.access_token_secret = value;
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.bot.user_agent.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "bot.user_agent must not be empty".to_string(),
        ));
    }
    if config.source.horizon_days == 0 || config.source.horizon_days > MAX_HORIZON_DAYS {
        return Err(ConfigError::ValidationError(format!(
            "source.horizon_days must be between 1 and {MAX_HORIZON_DAYS}"
        )));
    }
    if config.source.limit == 0 {
        return Err(ConfigError::ValidationError(
            "source.limit must be positive".to_string(),
        ));
    }
    if !config.source.team_url.path().ends_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "source.team_url {} must end with '/'",
            config.source.team_url
        )));
    }
    if config.bot.production {
        let complete = config.twitter.as_ref().is_some_and(|t| {
            [
                &t.consumer_key,
                &t.consumer_secret,
                &t.access_token,
                &t.access_token_secret,
            ]
            .iter()
            .all(|v| !v.is_empty())
        });
        if !complete {
            return Err(ConfigError::ValidationError(
                "production mode requires all four twitter credentials".to_string(),
            ));
        }
    }
    Ok(())
}

fn build_runtime_config(file_config: FileConfig) -> RuntimeConfig {
    let FileConfig {
        bot,
        source,
        twitter,
    } = file_config;

    RuntimeConfig {
        bot: BotConfig {
            production: bot.production,
            state_path: bot.state_path,
            log_file: bot.log_file,
            user_agent: bot.user_agent,
        },
        source: SourceConfig {
            events_url: source.events_url,
            team_url: source.team_url,
            horizon: time::Duration::days(i64::from(source.horizon_days)),
            limit: source.limit,
            event_key: source.event_key,
        },
        twitter: twitter.map(|t| TwitterCredentials {
            consumer_key: t.consumer_key,
            consumer_secret: t.consumer_secret,
            access_token: t.access_token,
            access_token_secret: t.access_token_secret,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(toml_str: &str) -> FileConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_env_overrides_credentials() {
        let mut config = parse("[twitter]\nconsumer_key = \"from-file\"\n");
        let env = HashMap::from([
            (TWITTER_CONSUMER_SECRET_ENV, "env-secret".to_string()),
            (TWITTER_ACCESS_TOKEN_ENV, String::new()),
        ]);
        apply_env_overrides(&mut config, |k| env.get(k).cloned());

        let twitter = config.twitter.unwrap();
        assert_eq!(twitter.consumer_key, "from-file");
        assert_eq!(twitter.consumer_secret, "env-secret");
        assert_eq!(twitter.access_token, "");
    }

    #[test]
    fn test_env_creates_twitter_section() {
        let mut config = parse("");
        apply_env_overrides(&mut config, |k| Some(format!("{k}-value")));
        let twitter = config.twitter.unwrap();
        assert_eq!(twitter.access_token_secret, "TWITTER_ACCESS_TOKEN_SECRET-value");
    }

    #[test]
    fn test_production_requires_credentials() {
        let config = parse("[bot]\nproduction = true\n");
        assert!(matches!(validate(&config), Err(ConfigError::ValidationError(_))));

        let config = parse(
            r#"
[bot]
production = true
[twitter]
consumer_key = "a"
consumer_secret = "b"
access_token = "c"
access_token_secret = "d"
"#,
        );
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_dry_run_needs_no_credentials() {
        assert!(validate(&parse("")).is_ok());
    }

    #[test]
    fn test_invalid_source_settings() {
        assert!(validate(&parse("[source]\nlimit = 0\n")).is_err());
        assert!(validate(&parse("[source]\nhorizon_days = 0\n")).is_err());
        assert!(validate(&parse("[source]\nhorizon_days = 3650\n")).is_ok());
        assert!(validate(&parse("[source]\nhorizon_days = 3651\n")).is_err());
        assert!(validate(&parse("[source]\nhorizon_days = 4294967295\n")).is_err());
        assert!(validate(&parse("[source]\nteam_url = \"https://ctftime.org/team\"\n")).is_err());
        assert!(validate(&parse("[bot]\nuser_agent = \" \"\n")).is_err());
    }

    #[test]
    fn test_cli_overrides_and_missing_file() {
        let dir = std::env::temp_dir().join(format!("ctfr-config-test-{}", std::process::id()));
        let loader = ConfigLoader::new(
            dir.join("does-not-exist.toml"),
            Some(PathBuf::from("/tmp/override.json")),
            true,
        );
        let config = loader.load().unwrap();
        assert_eq!(config.bot.state_path, PathBuf::from("/tmp/override.json"));
        assert!(!config.bot.production);
        assert_eq!(config.source.horizon, time::Duration::days(365));
    }

    #[test]
    fn test_runtime_conversion() {
        let config = build_runtime_config(parse(
            r#"
[source]
horizon_days = 30
[twitter]
consumer_key = "a"
consumer_secret = "b"
access_token = "c"
access_token_secret = "d"
"#,
        ));
        assert_eq!(config.source.horizon, time::Duration::days(30));
        assert_eq!(config.twitter.unwrap().consumer_secret, "b");
    }
}
