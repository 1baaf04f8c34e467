//! Context configuration file I/O

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::context as context_config;
use crate::error::CtlError;

use super::models::ContextConfig;

/// Handles reading and writing the context configuration file, and knows
/// where each context keeps its local state.
pub struct ContextStore {
    config_dir: PathBuf,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    /// Create a new store using the default config directory (~/.nsctl)
    pub fn new() -> Self {
        Self {
            config_dir: Self::default_config_dir(),
        }
    }

    /// Create a store rooted at a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { config_dir: dir }
    }

    /// Get the default config directory
    pub fn default_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(context_config::DIR_NAME)
    }

    /// Root configuration directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(context_config::FILE_NAME)
    }

    /// Local state directory of one context. Each context gets its own, so a
    /// credential cached for one context is never visible from another.
    pub fn context_dir(&self, name: &str) -> PathBuf {
        self.config_dir.join(context_config::CONTEXTS_DIR).join(name)
    }

    /// Load the context configuration from disk.
    /// Returns Default if file doesn't exist, errors on corrupt YAML.
    pub fn load(&self) -> Result<ContextConfig, CtlError> {
        let path = self.config_path();
        if !path.exists() {
            debug!("No config file at {}, using empty config", path.display());
            return Ok(ContextConfig::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            CtlError::Config(format!(
                "Failed to read context config {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: ContextConfig = serde_yml::from_str(&content).map_err(|e| {
            CtlError::Config(format!(
                "Failed to parse context config {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(
            "Loaded {} context(s) from {}",
            config.contexts.len(),
            path.display()
        );
        Ok(config)
    }

    /// Save the context configuration to disk.
    /// Uses atomic write (tmp file + rename) and creates the directory if needed.
    pub fn save(&self, config: &ContextConfig) -> Result<(), CtlError> {
        fs::create_dir_all(&self.config_dir).map_err(|e| {
            CtlError::Config(format!(
                "Failed to create config directory {}: {}",
                self.config_dir.display(),
                e
            ))
        })?;

        let yaml = serde_yml::to_string(config)
            .map_err(|e| CtlError::Config(format!("Failed to serialize context config: {}", e)))?;

        let path = self.config_path();
        let tmp_path = path.with_extension("yml.tmp");
        fs::write(&tmp_path, &yaml).map_err(|e| {
            CtlError::Config(format!(
                "Failed to write temp config file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        // Contexts carry user tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&tmp_path, permissions).map_err(|e| {
                CtlError::Config(format!("Failed to set permissions on config file: {}", e))
            })?;
        }

        fs::rename(&tmp_path, &path).map_err(|e| {
            CtlError::Config(format!(
                "Failed to rename temp config file to {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!("Saved context config to {}", path.display());
        Ok(())
    }
}
