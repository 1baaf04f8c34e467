//! Cached bearer token file

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::session;
use crate::error::{CtlError, Result};

/// Reads and writes the raw bearer token kept in a context directory.
///
/// The file holds the token string and nothing else. There is no locking:
/// two processes writing the same directory race and the last rename wins.
pub struct CredentialCache;

impl CredentialCache {
    /// Path of the cache file inside `dir`
    pub fn path(dir: &Path) -> PathBuf {
        dir.join(session::CACHE_FILE)
    }

    /// Whether a cached token is present in `dir`
    pub fn exists(dir: &Path) -> bool {
        Self::path(dir).exists()
    }

    /// Read the cached token from `dir`
    pub fn read(dir: &Path) -> Result<String> {
        let path = Self::path(dir);
        debug!("Reading cached token from {}", path.display());

        let content = fs::read_to_string(&path)
            .map_err(|e| CtlError::CacheUnreadable(format!("{}: {}", path.display(), e)))?;
        Ok(content.trim().to_string())
    }

    /// Replace the cached token in `dir`.
    /// Writes a temp file and renames it so readers never see a partial token.
    pub fn write(dir: &Path, token: &str) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| {
            CtlError::Config(format!(
                "Failed to create session directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let path = Self::path(dir);
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, token).map_err(|e| {
            CtlError::Config(format!(
                "Failed to write temp token file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&tmp_path, permissions).map_err(|e| {
                CtlError::Config(format!("Failed to set permissions on token file: {}", e))
            })?;
        }

        fs::rename(&tmp_path, &path).map_err(|e| {
            CtlError::Config(format!(
                "Failed to rename temp token file to {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!("Cached token written to {}", path.display());
        Ok(())
    }
}
