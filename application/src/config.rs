//! [`Config`]-related definitions.

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::SecretString;
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Database configuration.
    pub database: Database,

    /// Email drafting configuration.
    pub drafting: Drafting,

    /// Law firm the drafted emails are written on behalf of.
    pub firm: service::domain::draft::Firm,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Database configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Database {
    /// Connection URL of the database (e.g.
    /// `postgres://user@host:5432/dbname`).
    pub url: Option<String>,

    /// Access key (password) overriding the one of the [`Database::url`].
    pub key: Option<SecretString>,

    /// Indicator whether an empty database should be seeded with the mock
    /// dataset on startup.
    pub seed: bool,
}

impl Database {
    /// Converts this [`Database`] configuration into a Postgres one.
    ///
    /// [`None`] is returned if either the URL or the key is missing.
    #[must_use]
    pub fn to_postgres(&self) -> Option<service::infra::postgres::Config> {
        use secrecy::ExposeSecret as _;

        let url = self.url.as_deref().filter(|u| !u.trim().is_empty())?;
        let key = self.key.as_ref().filter(|k| !k.expose_secret().is_empty())?;
        Some(service::infra::postgres::Config {
            url: Some(url.to_owned()),
            password: Some(key.expose_secret().to_owned()),
            ..service::infra::postgres::Config::default()
        })
    }
}

/// Email drafting configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Drafting {
    /// API key of the Gemini API, if any.
    pub api_key: Option<SecretString>,

    /// Name of the model generating the drafts.
    #[default("gemini-3-flash-preview".to_owned())]
    pub model: String,

    /// Base URL of the Generative Language API.
    #[default("https://generativelanguage.googleapis.com/v1beta".to_owned())]
    pub endpoint: String,
}

impl From<Drafting> for service::infra::llm::gemini::Config {
    fn from(value: Drafting) -> Self {
        let Drafting {
            api_key,
            model,
            endpoint,
        } = value;
        Self {
            api_key,
            model,
            endpoint,
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use secrecy::SecretString;

    use super::{Config, Database};

    #[test]
    fn defaults_drafting_model() {
        let config = Config::default();

        assert_eq!(config.drafting.model, "gemini-3-flash-preview");
        assert!(config.drafting.api_key.is_none());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.firm.sign_off, "The iClosed Team");
    }

    #[test]
    fn requires_url_and_key_for_postgres() {
        let mut database = Database {
            url: Some("postgres://postgres@localhost/iclosed".into()),
            ..Database::default()
        };
        assert!(database.to_postgres().is_none());

        database.key = Some(SecretString::from("secret"));
        let postgres = database.to_postgres().unwrap();
        assert_eq!(
            postgres.url.as_deref(),
            Some("postgres://postgres@localhost/iclosed"),
        );
        assert_eq!(postgres.password.as_deref(), Some("secret"));
    }
}
