//! Configuration management for the booking application.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Managed backend configuration
    pub supabase: SupabaseConfig,
    /// Demo mode: serve the in-memory backend instead of the managed
    /// one, with a seeded session token. For local development only.
    pub demo: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Managed backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project base URL
    pub url: String,
    /// Service-role key for server-side calls
    pub service_key: String,
    /// Path of the local confirmation record file
    pub confirmation_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
                log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
                shutdown_timeout: env::var("SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
            supabase: SupabaseConfig {
                url: env::var("SUPABASE_URL")
                    .unwrap_or_else(|_| "http://localhost:54321".to_string()),
                service_key: env::var("SUPABASE_SERVICE_KEY").unwrap_or_default(),
                confirmation_path: env::var("CONFIRMATION_PATH")
                    .unwrap_or_else(|_| "confirmations.json".to_string()),
            },
            demo: env::var("DEMO_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }
}
