//! Connection configuration.

use crate::error::{CallError, CallResult};
use std::env;
use std::fmt;

/// Settings for the single database connection.
///
/// Supplied by the host application, or loaded from the environment with
/// [`DatabaseConfig::from_env`]. A missing value is a fatal configuration
/// error; there is no fallback and no partial startup.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl DatabaseConfig {
    /// Read configuration from `DB_HOST`, `DB_USER`, `DB_PASS`, `DB_NAME` and
    /// the optional `DB_PORT` (default 5432), loading a local `.env` file
    /// first when one exists.
    pub fn from_env() -> CallResult<Self> {
        dotenvy::dotenv().ok();
        let port = match env::var("DB_PORT") {
            Ok(raw) => raw.parse().map_err(|_| {
                CallError::Config(format!("DB_PORT is not a valid port number: {raw}"))
            })?,
            Err(_) => 5432,
        };
        Ok(Self {
            host: require("DB_HOST")?,
            port,
            user: require("DB_USER")?,
            password: require("DB_PASS")?,
            dbname: require("DB_NAME")?,
        })
    }

    pub(crate) fn pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.dbname);
        config
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}

fn require(name: &str) -> CallResult<String> {
    env::var(name)
        .map_err(|_| CallError::Config(format!("missing required configuration value: {name}")))
}
