//! hobbylog/crates/configs/src/lib.rs
//!
//! Layered configuration: `.env` first, then real environment variables
//! with `__` section separators (e.g. `AUTH__JWT_SECRET`), with defaults
//! that make the local dev loop work out of the box.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Root directory of the local object store.
    #[serde(default = "default_media_root")]
    pub root: String,
    /// Public URL prefix local uploads are served under.
    #[serde(default = "default_media_url_prefix")]
    pub url_prefix: String,
    /// S3 backend, when the binary is built with `media-s3`.
    #[serde(default)]
    pub s3_bucket: Option<String>,
    #[serde(default)]
    pub s3_public_base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_session_ttl_hours() -> i64 {
    24 * 7
}

fn default_cookie_name() -> String {
    "hobbylog_session".to_string()
}

fn default_media_root() -> String {
    "./data/uploads".to_string()
}

fn default_media_url_prefix() -> String {
    "/static/uploads".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_err() {
            warn!("no .env file found; relying on the environment");
        }

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("database.url", "postgres://localhost/hobbylog")?
            .set_default("database.max_connections", default_max_connections() as i64)?
            .set_default("auth.jwt_secret", "development-secret-change-in-production")?
            .set_default("auth.session_ttl_hours", default_session_ttl_hours())?
            .set_default("auth.cookie_name", default_cookie_name())?
            .set_default("media.root", default_media_root())?
            .set_default("media.url_prefix", default_media_url_prefix())?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_cover_the_dev_loop() {
        let config = AppConfig::load().expect("defaults should satisfy every field");
        assert_eq!(config.auth.cookie_name, "hobbylog_session");
        assert!(!config.auth.jwt_secret.expose_secret().is_empty());
        assert_eq!(config.media.url_prefix, "/static/uploads");
        assert!(config.media.s3_bucket.is_none());
    }
}
