use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::RecipeError;

/// Environment variable naming an optional TOML settings file.
pub const SETTINGS_ENV: &str = "RECIPES_SETTINGS";

/// Prefix for per-key environment overrides, e.g. `RECIPES_DATABASE`.
pub const ENV_PREFIX: &str = "RECIPES_";

/// Cookie key derivation needs at least this much input material.
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the SQLite database file.
    pub database: PathBuf,
    pub secret_key: String,
    pub debug: bool,
    /// Admin account seeded into `users` on startup.
    pub username: String,
    pub password: String,
    pub listen_addr: String,
    pub loglevel: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("recipes.db"),
            secret_key: "development key, replace before serving real traffic".to_string(),
            debug: true,
            username: "admin".to_string(),
            password: "default".to_string(),
            listen_addr: "0.0.0.0:8080".to_string(),
            loglevel: None,
        }
    }
}

impl Config {
    /// Defaults, then the settings file named by `RECIPES_SETTINGS`, then `RECIPES_*` vars.
    pub fn load() -> Result<Self, RecipeError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Ok(path) = std::env::var(SETTINGS_ENV) {
            figment = figment.merge(Toml::file(path));
        }
        let cfg: Config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.secret_key.len() < MIN_SECRET_LEN {
            return Err(RecipeError::InvalidConfig(format!(
                "secret_key must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.username.trim().is_empty() {
            return Err(RecipeError::InvalidConfig(
                "username must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective log level: explicit setting, else derived from `debug`.
    pub fn loglevel(&self) -> &str {
        match self.loglevel.as_deref() {
            Some(level) => level,
            None if self.debug => "debug",
            None => "info",
        }
    }

    pub fn database_url(&self) -> String {
        format!("sqlite:{}", self.database.display())
    }
}
