//! CLI argument parsing

mod auth;
mod common;
mod context;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{context as context_config, defaults};

pub use auth::AuthAction;
pub use common::OutputFormat;
pub use context::{ConfigAction, UseContextArgs};

/// nsctl command line
#[derive(Parser, Debug)]
#[command(name = "nsctl")]
#[command(version)]
#[command(about = "Switch contexts and manage sessions for a namespace administration API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Context to use for this invocation (does not change current-context)
    #[arg(long, global = true, env = context_config::ENV_VAR)]
    pub context: Option<String>,

    /// Configuration directory (default: ~/.nsctl)
    #[arg(long, global = true, env = context_config::DIR_ENV_VAR)]
    pub config_dir: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// Never prompt interactively
    #[arg(long, global = true, default_value_t = false)]
    pub batch: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage configuration contexts
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the session of the active context
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}
