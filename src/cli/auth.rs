//! Session CLI arguments

use clap::Subcommand;

/// Auth subcommands operating on the active context's session
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Show the claims of the cached session token (decoded locally)
    Info,

    /// Log in again, discarding the cached session
    Renew,

    /// Ensure a live session and print the Authorization header value
    #[command(after_help = "EXAMPLES:\n  \
        curl -H \"Authorization: $(nsctl auth token)\" https://ns.example.com/api/namespaces")]
    Token,
}
