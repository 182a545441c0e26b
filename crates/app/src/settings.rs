//! Backend settings.
//!
//! Layered, lowest priority first: `config/default.toml`, `config/local.toml`,
//! `BUDGET__*` environment variables, then the bare `PORT`, `DB_URL` and
//! `TOKEN_SECRET` variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

/// Where the data lives. `DB_URL=memory` selects the in-memory store, any
/// other value is taken as a SQLite file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl<'de> Deserialize<'de> for Database {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Plain(String),
            Table { sqlite: SqlitePath },
        }

        #[derive(Deserialize)]
        struct SqlitePath {
            path: String,
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Plain(value) if value == "memory" => Database::Memory,
            Raw::Plain(path) => Database::Sqlite(path),
            Raw::Table { sqlite } => Database::Sqlite(sqlite.path),
        })
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => "sqlite::memory:".to_string(),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    pub token_secret: String,
    pub token_ttl_minutes: u64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name("config/local").required(false))
                .add_source(Environment::with_prefix("BUDGET").separator("__")),
            std::env::var("PORT").ok(),
            std::env::var("DB_URL").ok(),
            std::env::var("TOKEN_SECRET").ok(),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        port: Option<String>,
        db_url: Option<String>,
        token_secret: Option<String>,
    ) -> Result<Self, ConfigError> {
        let settings: Settings = builder
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.database", "budget.db")?
            .set_default("server.token_ttl_minutes", 60)?
            .set_override_option("server.port", port)?
            .set_override_option("server.database", db_url)?
            .set_override_option("server.token_secret", token_secret)?
            .build()?
            .try_deserialize()?;

        if settings.server.token_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "server.token_secret must not be empty".to_string(),
            ));
        }
        Ok(settings)
    }
}
