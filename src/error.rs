// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 ApexRun

//! Authentication errors.
//!
//! `Display` is the public-facing rejection message. Signature, expiry and
//! other verification failures are collapsed into a single message so a
//! caller probing the gate cannot tell which check failed; the full detail
//! is kept on the variant and only reaches the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Reasons the gate rejects a request.
///
/// Every variant maps to HTTP 401 with a JSON body `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("missing authorization header")]
    MissingAuthHeader,
    /// Header present but not of the form `Bearer <token>`.
    #[error("invalid authorization format")]
    InvalidAuthFormat,
    /// Token does not have three segments or its header is not valid JSON.
    #[error("malformed token")]
    MalformedToken,
    /// Header declared an algorithm outside {ES256, HS256}.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// Key id not present even after a forced JWKS refresh.
    #[error("unknown signing key")]
    UnknownSigningKey,
    /// JWKS endpoint unreachable, non-200, or unparseable. The detail string
    /// is internal only.
    #[error("unable to verify token (JWKS unavailable)")]
    JwksFetch(String),
    /// JWKS parsed but contained zero usable EC P-256 keys.
    #[error("unable to verify token (JWKS unavailable)")]
    EmptyKeySet,
    /// Signature, expiry or claim validation failed. Collapsed publicly;
    /// the source error carries the real cause for internal diagnostics.
    #[error("invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    /// Verified token carries an empty `sub` claim.
    #[error("token missing subject")]
    MissingSubject,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Upstream failures mean we could not check the token at all; those
        // need operator attention, unlike ordinary bad-token noise.
        match &self {
            AuthError::JwksFetch(_) | AuthError::EmptyKeySet => {
                tracing::error!(error = ?self, "request rejected: JWKS unavailable");
            }
            _ => {
                tracing::debug!(error = ?self, "request rejected");
            }
        }

        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
