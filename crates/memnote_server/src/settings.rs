use config::{Config, ConfigError, Environment, File, FileFormat};
use memnote_core::db::DbLocation;
use memnote_core::default_log_level;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "memnote.toml";
/// Server keys read as `MEMNOTE__SECTION__KEY`; single-underscore
/// `MEMNOTE_*` variables belong to the client.
const ENV_PREFIX: &str = "MEMNOTE";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    /// SQLite file path, or `:memory:`.
    pub path: String,
    pub max_connections: u32,
}

impl Database {
    pub fn location(&self) -> DbLocation {
        DbLocation::from_setting(&self.path)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: String,
    /// Absolute directory for rolling log files; stderr when unset.
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub log: Log,
}

impl Settings {
    /// Loads defaults, then the TOML file, then `MEMNOTE__*` environment variables.
    ///
    /// An explicit `path` must exist; the default `memnote.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE)
                .format(FileFormat::Toml)
                .required(false),
        };

        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.path", "memnote.sqlite3")?
            .set_default("database.max_connections", 8)?
            .set_default("log.level", default_log_level())?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
