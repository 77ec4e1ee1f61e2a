// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 ApexRun

//! # ApexRun Authentication Gate
//!
//! Stateless JWT verification for the ApexRun API.
//!
//! ## Auth Flow
//!
//! 1. The mobile client authenticates the user with Supabase
//! 2. The client sends `Authorization: Bearer <Supabase JWT>`
//! 3. The gate:
//!    - Inspects the token header to pick a verification path
//!    - ES256: resolves the public key from the cached Supabase JWKS,
//!      refreshing the set on a miss
//!    - HS256: verifies against the shared project secret
//!    - Attaches the `sub` claim as the request's [`Principal`]
//!
//! ## Security
//!
//! - The header's algorithm only selects the path; the verifier pins the
//!   expected algorithm so a forged header cannot downgrade verification
//! - Verification failures collapse to one public message to avoid oracle
//!   leakage
//! - The JWKS cache is in-memory only and rebuilt on demand; nothing
//!   survives a restart
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apexrun_auth::{require_auth, AuthConfig, AuthGate, Principal};
//!
//! let gate = AuthGate::with_prefetch(AuthConfig::from_env()?).await;
//! let app = Router::new()
//!     .route("/v1/activities", get(list_activities))
//!     .layer(axum::middleware::from_fn_with_state(gate, require_auth));
//!
//! async fn list_activities(principal: Principal) -> String {
//!     format!("activities for {}", principal.as_str())
//! }
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod jwks;
pub mod middleware;
pub mod verify;

pub use claims::{Claims, Principal};
pub use config::{AuthConfig, ConfigError};
pub use error::AuthError;
pub use jwks::{JwksCache, JwksFetcher};
pub use middleware::{require_auth, AuthGate};
