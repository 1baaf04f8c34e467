//! Context management module
//!
//! Provides named contexts that bundle an API endpoint, a namespace and a
//! login secret, and the kubectl-style commands that switch between them.

mod commands;
mod manager;
mod models;
mod store;

pub use commands::run_config_command;
pub use manager::ContextManager;
pub use models::{Context, ContextConfig};
pub use store::ContextStore;
