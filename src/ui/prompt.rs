//! Interactive secret prompt

use dialoguer::{theme::ColorfulTheme, Password};
use log::debug;

use crate::error::{CtlError, Result};

/// Ask the user for the login password of `context`.
///
/// In batch mode there is nobody to ask, so this fails instead of blocking.
pub fn prompt_password(context: &str, batch_mode: bool) -> Result<String> {
    if batch_mode {
        return Err(CtlError::Config(format!(
            "context '{}' has no user-token configured and --batch disables the password prompt",
            context
        )));
    }

    debug!("Prompting for password of context '{}'", context);
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Password for context '{}'", context))
        .interact()
        .map_err(|e| CtlError::Config(format!("Failed to read password: {}", e)))
}
