//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `CHATHUB__`-prefixed environment variables. Each
//! sub-module represents a logical configuration section.

pub mod app;
pub mod hub;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::hub::HubConfig;
pub use self::logging::LoggingConfig;

use crate::result::AppResult;

/// Root application configuration.
///
/// Every section falls back to its defaults, so the server starts with no
/// configuration file at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Broadcast hub settings.
    #[serde(default)]
    pub hub: HubConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment.
    ///
    /// Merges `config/default.toml`, the `config/{env}.toml` overlay and
    /// environment variables prefixed with `CHATHUB` (`__` separated).
    /// Missing files are not an error.
    pub fn load(env: &str) -> AppResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CHATHUB")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    /// Load configuration from a single TOML file (used by tests and tools).
    pub fn load_file(path: &str) -> AppResult<Self> {
        let builder = config::Config::builder().add_source(config::File::with_name(path));
        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> AppResult<Self> {
        let app: AppConfig = builder.build()?.try_deserialize()?;

        app.validate()?;
        Ok(app)
    }

    /// Rejects values the hub cannot operate with.
    pub fn validate(&self) -> AppResult<()> {
        self.hub.validate()
    }
}
