//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Admin panel credentials.
    pub admin: AdminConfig,
    /// Media host (Cloudinary) configuration.
    pub media: MediaConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token expiration in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: i64,
}

fn default_token_expiry() -> i64 {
    7200 // 2 hours
}

/// Admin panel credentials.
///
/// The panel has a single admin identity configured via environment; there is
/// no user table.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Admin login email.
    pub email: String,
    /// Admin login password.
    pub password: String,
}

/// Media host (Cloudinary) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Cloud name, part of every delivery URL.
    pub cloud_name: String,
    /// API key for signed requests.
    pub api_key: String,
    /// API secret for request signing.
    pub api_secret: String,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
