// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 ApexRun

//! # Gate Configuration
//!
//! Configuration is supplied by the host service at construction, or loaded
//! from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SUPABASE_URL` | Supabase project base URL (JWKS is fetched from `<url>/auth/v1/.well-known/jwks.json`) | Required |
//! | `SUPABASE_JWT_SECRET` | Shared secret for HS256-signed tokens | Required |
//! | `JWKS_CACHE_TTL_SECONDS` | Freshness window for cached JWKS | `300` |

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default JWKS cache freshness window (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
const JWT_SECRET_ENV: &str = "SUPABASE_JWT_SECRET";
const CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECONDS";

/// Configuration error raised during startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Configuration for the authentication gate.
#[derive(Clone)]
pub struct AuthConfig {
    /// Supabase project base URL.
    pub supabase_url: String,
    /// Shared secret for the HS256 verification path. Never logged.
    pub jwt_secret: String,
    /// JWKS cache freshness window.
    pub cache_ttl: Duration,
}

impl AuthConfig {
    /// Create a configuration with the default cache TTL.
    pub fn new(supabase_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into(),
            jwt_secret: jwt_secret.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override the JWKS cache freshness window.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = require_env(SUPABASE_URL_ENV)?;
        let jwt_secret = require_env(JWT_SECRET_ENV)?;

        let cache_ttl = env::var(CACHE_TTL_ENV)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CACHE_TTL);

        Ok(Self {
            supabase_url,
            jwt_secret,
            cache_ttl,
        })
    }
}

// The secret must never appear in logs or debug dumps.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("supabase_url", &self.supabase_url)
            .field("jwt_secret", &"<redacted>")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name)),
    }
}
