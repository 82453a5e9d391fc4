//! Configuration management.
//!
//! Everything is read from environment variables (with `.env` support in the
//! binary via dotenvy). Defaults are development-friendly; production deploys
//! must provide `SESSION_SECRET` explicitly.

use serde::Deserialize;

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// Application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, production).
    pub env: String,
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Session/auth configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session tokens.
    pub session_secret: String,
    /// Session lifetime in hours.
    pub session_ttl_hours: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let session_secret = match std::env::var("SESSION_SECRET") {
            Ok(value) if !value.trim().is_empty() => value,
            _ if app_env.eq_ignore_ascii_case("production") => {
                return Err("SESSION_SECRET must be set in production".to_string());
            }
            _ => "yatube-dev-secret".to_string(),
        };

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("YATUBE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("YATUBE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8000),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/yatube".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            },
            auth: AuthConfig {
                session_secret,
                session_ttl_hours: std::env::var("SESSION_TTL_HOURS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(24 * 14),
            },
        })
    }
}
