// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 ApexRun

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! Supabase signs access tokens with ES256 and publishes the verification
//! keys at `<project-url>/auth/v1/.well-known/jwks.json`. This module fetches
//! that set, keeps only EC P-256 entries, and caches the result with a
//! freshness window so the endpoint is not hit on every request.
//!
//! ## Security
//!
//! - Keys are fetched over HTTPS with a bounded timeout
//! - A stale cache behaves exactly like an empty one: lookups miss and the
//!   gate refreshes before trusting any key
//! - Replacement is wholesale; a refresh never merges into the old set

use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::AuthError;

/// Path of the Supabase JWKS endpoint, relative to the project base URL.
const JWKS_PATH: &str = "/auth/v1/.well-known/jwks.json";

/// Timeout for a single JWKS fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON Web Key Set response shape.
#[derive(Debug, Deserialize)]
pub struct JwksResponse {
    pub keys: Vec<Jwk>,
}

/// One JWKS entry. Absent fields deserialize to empty strings, which fail
/// the decode checks and skip the entry, mirroring a permissive provider
/// that may publish multi-algorithm sets.
#[derive(Debug, Deserialize)]
pub struct Jwk {
    #[serde(default)]
    pub kty: String,
    #[serde(default)]
    pub crv: String,
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub y: String,
    #[serde(default)]
    pub kid: String,
    #[serde(default)]
    pub alg: String,
}

impl Jwk {
    /// Decode this entry into a verification key.
    ///
    /// Returns `None` for anything that is not an EC P-256 key with valid
    /// base64url coordinates; such entries are not ours to verify with and
    /// are skipped rather than failing the whole fetch.
    pub fn to_decoding_key(&self) -> Option<DecodingKey> {
        if self.kty != "EC" || self.crv != "P-256" {
            return None;
        }
        if URL_SAFE_NO_PAD.decode(&self.x).is_err() || URL_SAFE_NO_PAD.decode(&self.y).is_err() {
            return None;
        }
        DecodingKey::from_ec_components(&self.x, &self.y).ok()
    }
}

/// Fetches the Supabase JWKS over HTTPS.
#[derive(Clone)]
pub struct JwksFetcher {
    jwks_url: String,
    client: reqwest::Client,
}

impl JwksFetcher {
    /// Create a fetcher for the given Supabase project base URL.
    pub fn new(supabase_url: &str) -> Self {
        Self {
            jwks_url: format!("{}{}", supabase_url.trim_end_matches('/'), JWKS_PATH),
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// The resolved JWKS endpoint URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Fetch and decode the key set.
    ///
    /// Fails with [`AuthError::JwksFetch`] on transport errors, non-200
    /// statuses, or an unparseable body, and with [`AuthError::EmptyKeySet`]
    /// when the response parses but no usable key survives decoding. The
    /// latter is surfaced separately because a provider rotating to an
    /// entirely non-EC set is an anomaly worth distinguishing from an
    /// outage.
    pub async fn fetch(&self) -> Result<HashMap<String, DecodingKey>, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetch(format!("fetch JWKS: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::JwksFetch(format!(
                "fetch JWKS: status {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| AuthError::JwksFetch(format!("decode JWKS: {e}")))?;

        let total = jwks.keys.len();
        let mut keys = HashMap::new();
        for jwk in &jwks.keys {
            if let Some(key) = jwk.to_decoding_key() {
                keys.insert(jwk.kid.clone(), key);
            }
        }

        if keys.is_empty() {
            return Err(AuthError::EmptyKeySet);
        }

        tracing::info!(
            accepted = keys.len(),
            skipped = total - keys.len(),
            "JWKS fetched"
        );
        Ok(keys)
    }
}

struct CacheEntry {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

/// Cached JWKS with a freshness window.
///
/// Read-mostly: concurrent lookups share the read lock, a replace takes the
/// write lock so readers see either the old set or the new one in full.
pub struct JwksCache {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl JwksCache {
    /// Create an empty cache with the given freshness window.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Look up a verification key by key id.
    ///
    /// Misses when the id is absent or when the cached set is older than the
    /// freshness window, regardless of its contents.
    pub async fn lookup(&self, kid: &str) -> Option<DecodingKey> {
        let entry = self.entry.read().await;
        let entry = entry.as_ref()?;
        if entry.fetched_at.elapsed() > self.ttl {
            return None;
        }
        entry.keys.get(kid).cloned()
    }

    /// Atomically replace the cached set and reset its age.
    pub async fn replace(&self, keys: HashMap<String, DecodingKey>) {
        self.replace_at(keys, Instant::now()).await;
    }

    /// Replace the cached set with an explicit fetch timestamp. Tests use
    /// this to age the cache without sleeping through the window.
    pub(crate) async fn replace_at(&self, keys: HashMap<String, DecodingKey>, fetched_at: Instant) {
        let mut entry = self.entry.write().await;
        *entry = Some(CacheEntry { keys, fetched_at });
    }

    /// Sorted key ids of the stored set, ignoring freshness.
    #[cfg(test)]
    pub(crate) async fn kids(&self) -> Vec<String> {
        let entry = self.entry.read().await;
        let mut kids: Vec<String> = entry
            .as_ref()
            .map(|e| e.keys.keys().cloned().collect())
            .unwrap_or_default();
        kids.sort();
        kids
    }
}
