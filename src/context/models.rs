//! Context configuration data models

use serde::{Deserialize, Serialize};

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContextConfig {
    /// Name of the currently selected context
    #[serde(rename = "current-context", skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,
    /// Contexts in declaration order
    #[serde(default)]
    pub contexts: Vec<Context>,
}

/// A named target: API endpoint, namespace and login secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Unique context name
    pub name: String,
    /// Base URL of the administrative API
    pub api: String,
    /// Namespace commands are scoped to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// User token exchanged for a session on login
    #[serde(
        rename = "user-token",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,
    /// Login username (falls back to `defaults::USERNAME`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl ContextConfig {
    /// Find a context by exact, case-sensitive name
    pub fn get(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|ctx| ctx.name == name)
    }

    /// Names of all contexts, in declaration order
    #[cfg(test)]
    pub fn names(&self) -> Vec<&str> {
        self.contexts.iter().map(|ctx| ctx.name.as_str()).collect()
    }
}
