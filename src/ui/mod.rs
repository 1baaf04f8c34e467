//! UI utilities for terminal output
//!
//! This module provides the output/error channel pair every command writes
//! to, and the interactive password prompt used when no secret is configured.

mod console;
mod prompt;

pub use console::Console;
pub use prompt::prompt_password;
