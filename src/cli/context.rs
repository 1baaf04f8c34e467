//! Config management CLI arguments (kubectl-style)

use clap::{Parser, Subcommand};

/// Config subcommands for managing connection contexts
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Describe all contexts
    #[command(name = "get-contexts")]
    GetContexts,

    /// Display the current-context
    #[command(name = "current-context")]
    CurrentContext,

    /// Set the current-context in the config file
    #[command(name = "use-context")]
    UseContext(UseContextArgs),
}

/// Arguments for 'config use-context' subcommand
#[derive(Parser, Debug)]
pub struct UseContextArgs {
    /// Context name to activate
    pub name: String,
}
