//! Session management for the active context
//!
//! - [`cache`]: the cached bearer token file
//! - [`token`]: local, unverified decoding of token claims
//! - [`client`]: login and liveness calls against the API
//! - [`orchestrator`]: reuse-or-login logic tying the above together

mod cache;
mod client;
mod commands;
mod models;
mod orchestrator;
mod token;

pub use cache::CredentialCache;
pub use client::{ApiFailure, ApiOutcome, AuthClient, HttpAuthClient};
pub use commands::run_auth_command;
pub use models::{Credentials, IssuedCredential, RemoteSessionStatus};
pub use orchestrator::{format_expiry, CredentialSource, SessionOrchestrator};
pub use token::{decode as decode_token, RoleBinding, SessionClaims, Verb};
