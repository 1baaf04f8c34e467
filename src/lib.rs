//! nsctl - Contexts and sessions for a namespace administration API
//!
//! A kubectl-style CLI core: named contexts selecting which API endpoint and
//! namespace to talk to, and a per-context cached bearer token that is reused
//! while the server accepts it and refreshed by logging in when it does not.
//!
//! # Example
//!
//! ```bash
//! # List configured contexts
//! nsctl config get-contexts
//!
//! # Switch to another context
//! nsctl config use-context prod
//!
//! # Show the cached session and its role bindings
//! nsctl auth info -o yaml
//!
//! # Use a live session from a script
//! curl -H "Authorization: $(nsctl auth token)" https://ns.example.com/api/namespaces
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod session;
pub mod ui;

pub use cli::{AuthAction, Cli, Command, ConfigAction, OutputFormat};
pub use context::{run_config_command, Context, ContextConfig, ContextManager, ContextStore};
pub use error::{CtlError, Result};
pub use session::{
    run_auth_command, AuthClient, CredentialCache, CredentialSource, HttpAuthClient,
    SessionClaims, SessionOrchestrator,
};
pub use ui::Console;
