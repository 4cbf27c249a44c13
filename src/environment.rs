// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    pub secret_key: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_token_ttl_hours() -> i64 {
    DEFAULT_TOKEN_TTL_HOURS
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
    test: Option<EnvironmentConfig>,
}

impl EnvironmentConfig {
    /// Load `config.yaml` for the current environment, then apply env overrides
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.yaml"))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        if !config_path.exists() {
            anyhow::bail!(
                "{} not found. Server cannot start without configuration.",
                config_path.display()
            );
        }

        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let mut config = Self::from_yaml(&config_content, &environment)?;
        config.database_path = Self::resolve_path(&config.database_path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("JOBLY_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Pick the section for `environment`; unknown names fall back to `local`.
    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            "test" => config_file
                .test
                .ok_or_else(|| anyhow::anyhow!("config.yaml has no test section"))?,
            _ => config_file.local,
        };

        if env_config.secret_key.trim().is_empty() {
            anyhow::bail!("secret_key must not be empty");
        }

        Ok(env_config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(secret_key) = std::env::var("SECRET_KEY") {
            self.secret_key = secret_key;
        }

        if let Ok(port) = std::env::var("ROCKET_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }

        Ok(())
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }
}
