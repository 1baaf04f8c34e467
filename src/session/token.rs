//! Unverified decoding of session token claims
//!
//! Tokens are `header.payload.signature` with a base64url JSON payload. Only
//! the payload is read; the signature is never checked, so claims decoded
//! here are for display and must not drive authentication decisions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CtlError, Result};

/// HTTP verb granted by a role binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verb::Get => write!(f, "GET"),
            Verb::Post => write!(f, "POST"),
            Verb::Put => write!(f, "PUT"),
            Verb::Delete => write!(f, "DELETE"),
        }
    }
}

/// Verbs granted over resource types within one namespace.
/// Sequences keep the order the issuer declared them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBinding {
    pub namespace: String,
    #[serde(default)]
    pub verbs: Vec<Verb>,
    #[serde(default)]
    pub resource_types: Vec<String>,
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    #[serde(rename = "sub")]
    pub subject: String,
    /// Expiration, epoch seconds UTC
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub role_bindings: Vec<RoleBinding>,
}

impl SessionClaims {
    /// Expiration as a timestamp, if representable
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    /// Whether the token's own expiration has passed at `now` (local view only)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now.timestamp()
    }
}

/// Decode the payload segment of `raw` into claims
pub fn decode(raw: &str) -> Result<SessionClaims> {
    let segments: Vec<&str> = raw.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(CtlError::MalformedToken(format!(
            "expected 3 dot-separated segments, found {}",
            segments.len()
        )));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|e| CtlError::MalformedToken(format!("payload is not base64url: {}", e)))?;

    serde_json::from_slice(&payload)
        .map_err(|e| CtlError::MalformedToken(format!("payload is not valid claims: {}", e)))
}
