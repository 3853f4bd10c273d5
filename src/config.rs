use crate::domain::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub insurer_rates_file: Option<PathBuf>,
    pub salesperson_rates_file: Option<PathBuf>,
    pub default_salesperson_rate: Option<Decimal>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let insurer_rates_file = optional_path(&env_map, "INSURER_RATES_FILE");
        let salesperson_rates_file = optional_path(&env_map, "SALESPERSON_RATES_FILE");

        let default_salesperson_rate = env_map
            .get("DEFAULT_SALESPERSON_RATE")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                Decimal::from_str_canonical(s).map_err(|_| {
                    ConfigError::InvalidValue(
                        "DEFAULT_SALESPERSON_RATE".to_string(),
                        format!("must be a decimal rate, got {}", s),
                    )
                })
            })
            .transpose()?;

        Ok(Config {
            port,
            database_path,
            insurer_rates_file,
            salesperson_rates_file,
            default_salesperson_rate,
        })
    }
}

fn optional_path(env_map: &HashMap<String, String>, key: &str) -> Option<PathBuf> {
    env_map
        .get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}
