use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;
use std::fmt;
use std::path::Path;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_SSL_MODE: &str = "prefer";

#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(about = "Runs the bookshelf service", long_about = None)]
pub struct Cli {
    #[arg(short = 'e', long = "env-file", default_value = ".env")]
    pub env_file: String,

    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

/// Loads the environment file into the process environment.
/// Variables that are already set are not overridden.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    dotenvy::from_path(path).with_context(|| format!("failed to load env file {}", path.display()))?;
    Ok(())
}

#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: PgSslMode,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

impl DbConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, treating empty values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| anyhow::anyhow!("environment variable {key} is not set"));

        let port = match get("DB_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("DB_PORT is not a valid port: {raw}"))?,
            None => DEFAULT_DB_PORT,
        };

        let ssl_mode_raw = get("DB_SSLMODE").unwrap_or_else(|| DEFAULT_SSL_MODE.to_string());
        let ssl_mode = ssl_mode_raw
            .trim()
            .parse::<PgSslMode>()
            .map_err(|e| anyhow::anyhow!("DB_SSLMODE is not a valid ssl mode: {ssl_mode_raw}: {e}"))?;

        Ok(DbConfig {
            host: required("DB_HOST")?,
            port,
            user: required("DB_USER")?,
            password: lookup("DB_PASS").unwrap_or_default(),
            name: required("DB_NAME")?,
            ssl_mode,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let opts = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name)
            .ssl_mode(self.ssl_mode);

        if self.password.is_empty() {
            opts
        } else {
            opts.password(&self.password)
        }
    }
}
