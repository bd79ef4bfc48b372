// ABOUTME: Configuration management for the actparse application
// ABOUTME: Handles loading configuration from files and environment variables

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_format")]
    pub default_format: String,

    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            strict: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&contents)?
        } else {
            Config::default()
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> PathBuf {
        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".actparse").join("config.yaml");
            if home_config.exists() {
                return home_config;
            }
        }

        ["actparse.yaml", "actparse.yml", ".actparse.yaml", ".actparse.yml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
            .unwrap_or_else(|| PathBuf::from("actparse.yaml"))
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("ACTPARSE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ACTPARSE_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(format) = std::env::var("ACTPARSE_FORMAT") {
            self.default_format = format;
        }
        if let Ok(strict) = std::env::var("ACTPARSE_STRICT") {
            self.strict = strict.parse()?;
        }

        Ok(())
    }
}
