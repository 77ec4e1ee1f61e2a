// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 ApexRun

//! JWT claims and the verified principal.

use std::collections::HashMap;

use serde::Deserialize;

/// Claims carried by a Supabase JWT.
///
/// Only `sub` and the temporal claims are interpreted by the gate. The
/// remaining fields are carried through for downstream handlers but never
/// drive an authentication decision here.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Subject: the canonical Supabase user id. Required; an empty value is
    /// rejected after signature verification.
    #[serde(default)]
    pub sub: String,

    /// Expiration timestamp (Unix seconds).
    #[serde(default)]
    pub exp: i64,

    /// Issued-at timestamp (Unix seconds).
    #[serde(default)]
    pub iat: i64,

    /// Not-before timestamp (optional).
    #[serde(default)]
    pub nbf: Option<i64>,

    /// User email, if the token carries one.
    #[serde(default)]
    pub email: Option<String>,

    /// Supabase role claim (e.g. `authenticated`). Not interpreted here.
    #[serde(default)]
    pub role: Option<String>,

    /// Provider-managed metadata, passed through untouched.
    #[serde(default)]
    pub app_metadata: Option<HashMap<String, serde_json::Value>>,

    /// User-managed metadata, passed through untouched.
    #[serde(default)]
    pub user_metadata: Option<HashMap<String, serde_json::Value>>,
}

/// The authenticated user id, attached to request extensions by the gate.
///
/// Presence of this value in a request's extensions is the definition of
/// "authenticated" for everything behind the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

impl Principal {
    /// The user id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_claims_deserialize_with_defaults() {
        let claims: Claims = serde_json::from_str(r#"{"sub":"user-1","exp":1700003600}"#).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.exp, 1700003600);
        assert_eq!(claims.iat, 0);
        assert!(claims.nbf.is_none());
        assert!(claims.email.is_none());
        assert!(claims.role.is_none());
    }

    #[test]
    fn missing_subject_defaults_to_empty() {
        // A token without `sub` must still deserialize so the gate can
        // reject it with the dedicated missing-subject message.
        let claims: Claims = serde_json::from_str(r#"{"exp":1700003600}"#).unwrap();
        assert!(claims.sub.is_empty());
    }

    #[test]
    fn metadata_fields_pass_through() {
        let claims: Claims = serde_json::from_str(
            r#"{
                "sub": "user-1",
                "exp": 1700003600,
                "email": "runner@example.com",
                "role": "authenticated",
                "app_metadata": {"provider": "email"},
                "user_metadata": {"display_name": "Runner"}
            }"#,
        )
        .unwrap();

        assert_eq!(claims.email.as_deref(), Some("runner@example.com"));
        assert_eq!(claims.role.as_deref(), Some("authenticated"));
        assert_eq!(
            claims.app_metadata.unwrap()["provider"],
            serde_json::json!("email")
        );
        assert_eq!(
            claims.user_metadata.unwrap()["display_name"],
            serde_json::json!("Runner")
        );
    }
}
