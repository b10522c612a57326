// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Production backend origin.
pub const DEFAULT_API_BASE_URL: &str = "https://hskh-backend.onrender.com";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 15;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin, without trailing slash
    pub api_base_url: String,
    /// File backing the durable key-value store
    pub storage_path: PathBuf,
    /// Default per-request timeout
    pub request_timeout: Duration,
    /// Timeout for the login call
    pub login_timeout: Duration,
    /// Timeout for multipart uploads
    pub upload_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            storage_path: PathBuf::from(".hskh/storage.json"),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            login_timeout: Duration::from_secs(DEFAULT_LOGIN_TIMEOUT_SECS),
            upload_timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("HSKH_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if api_base_url.is_empty() {
            return Err(ConfigError::Invalid("HSKH_API_BASE_URL"));
        }

        Ok(Self {
            api_base_url,
            storage_path: env::var("HSKH_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".hskh/storage.json")),
            request_timeout: secs_from_env(
                "HSKH_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            login_timeout: secs_from_env("HSKH_LOGIN_TIMEOUT_SECS", DEFAULT_LOGIN_TIMEOUT_SECS),
            upload_timeout: secs_from_env(
                "HSKH_UPLOAD_TIMEOUT_SECS",
                DEFAULT_UPLOAD_TIMEOUT_SECS,
            ),
        })
    }

    /// Config pointing at a test backend (e.g. a mock server URL).
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

fn secs_from_env(name: &str, default: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
