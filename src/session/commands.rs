//! Auth command handlers

use std::io::Write;

use chrono::Utc;
use log::debug;

use crate::cli::{AuthAction, OutputFormat};
use crate::output::{render, Record};
use crate::ui::Console;

use super::client::AuthClient;
use super::orchestrator::{format_expiry, SessionOrchestrator};
use super::token::{RoleBinding, SessionClaims};

const KIND: &str = "RoleBinding";

/// Dispatch auth subcommands, returning the process exit code
pub async fn run_auth_command<A: AuthClient, O: Write, E: Write>(
    session: &mut SessionOrchestrator<A>,
    action: &AuthAction,
    format: OutputFormat,
    console: &mut Console<O, E>,
) -> i32 {
    match action {
        AuthAction::Info => run_info(session, format, console),
        AuthAction::Renew => exit_code(session.renew(console, true).await),
        AuthAction::Token => run_token(session, console).await,
    }
}

fn exit_code(success: bool) -> i32 {
    if success {
        0
    } else {
        1
    }
}

/// Describe the cached session without contacting the server
fn run_info<A: AuthClient, O: Write, E: Write>(
    session: &SessionOrchestrator<A>,
    format: OutputFormat,
    console: &mut Console<O, E>,
) -> i32 {
    let claims = match session.cached_claims() {
        Ok(Some(claims)) => claims,
        Ok(None) => {
            console.println("No session found. You are not authenticated.");
            return 0;
        }
        Err(e) => {
            console.eprintln(format!("error: {}", e));
            return 1;
        }
    };

    debug!(
        "Cached session of '{}' has {} role binding(s)",
        claims.subject,
        claims.role_bindings.len()
    );
    console.println(validity_line(&claims));
    if !claims.roles.is_empty() {
        console.println(format!("Roles: {}", claims.roles.join(", ")));
    }

    if claims.role_bindings.is_empty() {
        return 0;
    }

    let records: Vec<Record> = claims.role_bindings.iter().map(binding_record).collect();
    match render(console.out(), KIND, &records, format) {
        Ok(()) => 0,
        Err(e) => {
            console.eprintln(format!("error: {}", e));
            1
        }
    }
}

/// Ensure a session, then print the header value for scripts
async fn run_token<A: AuthClient, O: Write, E: Write>(
    session: &mut SessionOrchestrator<A>,
    console: &mut Console<O, E>,
) -> i32 {
    if !session.authenticate(console, false).await {
        return 1;
    }
    match session.authorization_header() {
        Some(header) => {
            console.println(header);
            0
        }
        None => 1,
    }
}

fn validity_line(claims: &SessionClaims) -> String {
    let date = format_expiry(claims.expires_at);
    if claims.is_expired_at(Utc::now()) {
        format!("Your session has expired on {}.", date)
    } else {
        format!("Your session is valid until {}.", date)
    }
}

fn binding_record(binding: &RoleBinding) -> Record {
    let verbs = binding
        .verbs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let resource_types = binding.resource_types.join(",");

    Record::new(&binding.namespace)
        .with("verbs", Some(verbs.as_str()))
        .with("resource-types", Some(resource_types.as_str()))
}
