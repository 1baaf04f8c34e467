//! Session API data models

use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Serialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep the secret out of debug logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Successful login response
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IssuedCredential {
    #[serde(rename = "username")]
    pub subject: String,
    pub access_token: String,
    #[serde(rename = "token_type", default)]
    pub token_kind: String,
    #[serde(rename = "expires_in")]
    pub expires_in_seconds: i64,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Server-side view of a token's liveness
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteSessionStatus {
    #[serde(rename = "username")]
    pub subject: String,
    /// Expiration, epoch seconds UTC
    #[serde(rename = "exp")]
    pub expires_at: i64,
    pub active: bool,
}
