//! Session reuse, refresh and authorization
//!
//! Every invocation starts from scratch:
//!
//! ```text
//! no cache ──────────────────────────────► unauthenticated
//! cache ──► liveness check ──► active ───► authenticated (token reused)
//!                         ├──► inactive ─► unauthenticated
//!                         ├──► 401 ──────► unauthenticated (silent)
//!                         └──► failure ──► unauthenticated (reported)
//! unauthenticated ──► login ──► success ─► refreshed (token cached)
//!                          └──► failure ─► unauthenticated (reported)
//! ```
//!
//! Claims decoded from the cached token are never used to decide validity;
//! only the server's liveness answer is.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use log::{debug, warn};

use crate::config::{defaults, session};
use crate::context::Context;
use crate::error::Result;
use crate::ui::{prompt_password, Console};

use super::cache::CredentialCache;
use super::client::{ApiOutcome, AuthClient};
use super::models::Credentials;
use super::token::{self, SessionClaims};

/// Where login credentials come from when a fresh session is needed
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Username and secret taken from configuration
    Configured(Credentials),
    /// Ask interactively, only if a login actually happens
    Prompt {
        context: String,
        username: String,
        batch_mode: bool,
    },
}

impl CredentialSource {
    /// Credentials for `ctx`: its user-token if set, else a prompt
    pub fn for_context(ctx: &Context, batch_mode: bool) -> Self {
        let username = ctx
            .username
            .clone()
            .unwrap_or_else(|| defaults::USERNAME.to_string());

        match ctx.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => CredentialSource::Configured(Credentials::new(username, token)),
            None => CredentialSource::Prompt {
                context: ctx.name.clone(),
                username,
                batch_mode,
            },
        }
    }

    fn resolve(&self) -> Result<Credentials> {
        match self {
            CredentialSource::Configured(credentials) => Ok(credentials.clone()),
            CredentialSource::Prompt {
                context,
                username,
                batch_mode,
            } => {
                let password = prompt_password(context, *batch_mode)?;
                Ok(Credentials::new(username.clone(), password))
            }
        }
    }
}

/// Drives the credential cache and the auth client for one context
pub struct SessionOrchestrator<A: AuthClient> {
    client: A,
    session_dir: PathBuf,
    credentials: CredentialSource,
    /// Most recently obtained token (reused or freshly issued)
    token: Option<String>,
}

impl<A: AuthClient> SessionOrchestrator<A> {
    /// Create an orchestrator caching its token in `session_dir`
    pub fn new(client: A, session_dir: PathBuf, credentials: CredentialSource) -> Self {
        Self {
            client,
            session_dir,
            credentials,
            token: None,
        }
    }

    /// The underlying auth client
    pub fn client(&self) -> &A {
        &self.client
    }

    /// Check whether the cached token is still accepted by the server.
    ///
    /// Without a cached token this returns `false` immediately, without a
    /// network call or any output. With `announce`, whose session was found
    /// and until when it is valid is printed whether or not it is active.
    pub async fn is_authenticated<O: Write, E: Write>(
        &mut self,
        console: &mut Console<O, E>,
        announce: bool,
    ) -> bool {
        if !CredentialCache::exists(&self.session_dir) {
            debug!("No cached token in {}", self.session_dir.display());
            return false;
        }

        let cached = match CredentialCache::read(&self.session_dir) {
            Ok(token) => token,
            Err(e) => {
                console.eprintln(format!("{}.", e));
                return false;
            }
        };
        if cached.is_empty() {
            debug!("Cached token in {} is empty", self.session_dir.display());
            return false;
        }

        match self.client.check_liveness(&cached).await {
            ApiOutcome::Success(status) => {
                debug!(
                    "Token of '{}' is {}",
                    status.subject,
                    if status.active { "active" } else { "inactive" }
                );
                if announce {
                    console.println(format!(
                        "Authentication reused. Welcome {}!",
                        status.subject
                    ));
                    console.println(format!(
                        "Your session is valid until {}.",
                        format_expiry(status.expires_at)
                    ));
                }
                if status.active {
                    self.token = Some(cached);
                }
                status.active
            }
            ApiOutcome::Unauthorized => {
                debug!("Cached token rejected with 401");
                false
            }
            ApiOutcome::Failure(failure) => {
                console.eprintln(format!("Unexpected error occurred: {}.", failure));
                false
            }
        }
    }

    /// Exchange credentials for a new token and cache it.
    /// A failed login leaves any previously cached token untouched.
    pub async fn login<O: Write, E: Write>(
        &mut self,
        console: &mut Console<O, E>,
        username: &str,
        password: &str,
        announce: bool,
    ) -> bool {
        if announce {
            console.println("Authenticating...");
        }

        let credentials = Credentials::new(username, password);
        let issued = match self.client.login(&credentials).await {
            ApiOutcome::Success(issued) => issued,
            ApiOutcome::Unauthorized => {
                console.eprintln("Authentication failed because the credentials were rejected.");
                return false;
            }
            ApiOutcome::Failure(failure) => {
                console.eprintln(format!("Authentication failed because {}.", failure.message));
                return false;
            }
        };

        // Out of range lifetimes are shown as the raw epoch value
        let expires_at = Utc::now()
            .timestamp()
            .checked_add(issued.expires_in_seconds)
            .unwrap_or(i64::MAX);

        // The session is usable for this invocation even if it cannot be cached
        if let Err(e) = CredentialCache::write(&self.session_dir, &issued.access_token) {
            warn!("Failed to cache token: {}", e);
            console.eprintln(format!("Warning: session could not be cached: {}", e));
        }

        if announce {
            console.println(format!(
                "Authentication successful. Welcome {}!",
                issued.subject
            ));
            console.println(format!(
                "Your session is valid until {}.",
                format_expiry(expires_at)
            ));
        }

        self.token = Some(issued.access_token);
        true
    }

    /// Reuse the cached session if the server still accepts it, otherwise log
    /// in with the configured credentials. Login is attempted at most once and
    /// never after a successful reuse.
    pub async fn authenticate<O: Write, E: Write>(
        &mut self,
        console: &mut Console<O, E>,
        announce: bool,
    ) -> bool {
        if self.is_authenticated(console, announce).await {
            return true;
        }
        self.login_with_configured(console, announce).await
    }

    /// Log in with the configured credentials without checking the cached
    /// session first
    pub async fn renew<O: Write, E: Write>(
        &mut self,
        console: &mut Console<O, E>,
        announce: bool,
    ) -> bool {
        self.login_with_configured(console, announce).await
    }

    async fn login_with_configured<O: Write, E: Write>(
        &mut self,
        console: &mut Console<O, E>,
        announce: bool,
    ) -> bool {
        let credentials = match self.credentials.resolve() {
            Ok(credentials) => credentials,
            Err(e) => {
                console.eprintln(format!("Authentication failed because {}.", e));
                return false;
            }
        };
        self.login(
            console,
            &credentials.username,
            &credentials.password,
            announce,
        )
        .await
    }

    /// `Authorization` header value for the most recently obtained token
    pub fn authorization_header(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("{}{}", session::BEARER_PREFIX, token))
    }

    /// Claims of the cached token, decoded locally. `None` without a cache
    /// or with an empty one.
    pub fn cached_claims(&self) -> Result<Option<SessionClaims>> {
        if !CredentialCache::exists(&self.session_dir) {
            return Ok(None);
        }
        let raw = CredentialCache::read(&self.session_dir)?;
        if raw.is_empty() {
            return Ok(None);
        }
        token::decode(&raw).map(Some)
    }
}

/// Human-readable local time for an epoch-seconds expiration
pub fn format_expiry(expires_at: i64) -> String {
    match DateTime::<Utc>::from_timestamp(expires_at, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string(),
        None => expires_at.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::client::ApiFailure;
    use crate::session::models::{IssuedCredential, RemoteSessionStatus};
    use crate::session::token::tests::token_with_payload;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use tempfile::TempDir;

    /// In-memory auth client returning canned outcomes and counting calls
    struct FakeAuthClient {
        liveness: ApiOutcome<RemoteSessionStatus>,
        login: ApiOutcome<IssuedCredential>,
        liveness_calls: Cell<usize>,
        login_calls: Cell<usize>,
        checked_token: RefCell<Option<String>>,
        login_credentials: RefCell<Option<Credentials>>,
    }

    impl FakeAuthClient {
        fn new(
            liveness: ApiOutcome<RemoteSessionStatus>,
            login: ApiOutcome<IssuedCredential>,
        ) -> Self {
            Self {
                liveness,
                login,
                liveness_calls: Cell::new(0),
                login_calls: Cell::new(0),
                checked_token: RefCell::new(None),
                login_credentials: RefCell::new(None),
            }
        }
    }

    impl AuthClient for FakeAuthClient {
        async fn login(&self, credentials: &Credentials) -> ApiOutcome<IssuedCredential> {
            self.login_calls.set(self.login_calls.get() + 1);
            *self.login_credentials.borrow_mut() = Some(credentials.clone());
            self.login.clone()
        }

        async fn check_liveness(&self, token: &str) -> ApiOutcome<RemoteSessionStatus> {
            self.liveness_calls.set(self.liveness_calls.get() + 1);
            *self.checked_token.borrow_mut() = Some(token.to_string());
            self.liveness.clone()
        }
    }

    fn status(active: bool) -> ApiOutcome<RemoteSessionStatus> {
        ApiOutcome::Success(RemoteSessionStatus {
            subject: "username".to_string(),
            expires_at: 10,
            active,
        })
    }

    fn issued() -> ApiOutcome<IssuedCredential> {
        ApiOutcome::Success(IssuedCredential {
            subject: "username".to_string(),
            access_token: "accessToken".to_string(),
            token_kind: "tokenType".to_string(),
            expires_in_seconds: 1,
            roles: vec!["user".to_string()],
        })
    }

    fn server_error() -> ApiFailure {
        ApiFailure::new(Some(500), "error")
    }

    fn cached_token() -> String {
        token_with_payload(&serde_json::json!({
            "sub": "admin",
            "exp": 1711313691,
            "roles": ["isAdmin()"],
            "roleBindings": [{"namespace": "ns", "verbs": ["GET"], "resourceTypes": ["quota"]}]
        }))
    }

    fn configured() -> CredentialSource {
        CredentialSource::Configured(Credentials::new("username", "passwd"))
    }

    fn orchestrator(
        dir: &TempDir,
        with_cache: bool,
        client: FakeAuthClient,
    ) -> SessionOrchestrator<FakeAuthClient> {
        if with_cache {
            CredentialCache::write(dir.path(), &cached_token()).unwrap();
        }
        SessionOrchestrator::new(client, dir.path().to_path_buf(), configured())
    }

    #[tokio::test]
    async fn test_not_authenticated_without_cache() {
        let dir = TempDir::new().unwrap();
        let mut session = orchestrator(&dir, false, FakeAuthClient::new(status(true), issued()));
        let mut console = Console::buffered();

        assert!(!session.is_authenticated(&mut console, true).await);
        assert_eq!(session.client.liveness_calls.get(), 0);
        assert!(console.out_text().is_empty());
        assert!(console.err_text().is_empty());
        assert!(session.authorization_header().is_none());
    }

    #[tokio::test]
    async fn test_authenticated_when_active() {
        let dir = TempDir::new().unwrap();
        let mut session = orchestrator(&dir, true, FakeAuthClient::new(status(true), issued()));
        let mut console = Console::buffered();

        assert!(session.is_authenticated(&mut console, true).await);
        let out = console.out_text();
        assert!(out.contains("Authentication reused. Welcome username!"));
        assert!(out.contains("Your session is valid until"));
        assert_eq!(
            session.authorization_header(),
            Some(format!("Bearer {}", cached_token()))
        );
        assert_eq!(
            session.client.checked_token.borrow().as_deref(),
            Some(cached_token().as_str())
        );
    }

    #[tokio::test]
    async fn test_authenticated_quietly_without_announce() {
        let dir = TempDir::new().unwrap();
        let mut session = orchestrator(&dir, true, FakeAuthClient::new(status(true), issued()));
        let mut console = Console::buffered();

        assert!(session.is_authenticated(&mut console, false).await);
        assert!(console.out_text().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_still_announces() {
        let dir = TempDir::new().unwrap();
        let mut session = orchestrator(&dir, true, FakeAuthClient::new(status(false), issued()));
        let mut console = Console::buffered();

        assert!(!session.is_authenticated(&mut console, true).await);
        let out = console.out_text();
        assert!(out.contains("Authentication reused. Welcome username!"));
        assert!(out.contains("Your session is valid until"));
        assert!(session.authorization_header().is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_is_silent() {
        let dir = TempDir::new().unwrap();
        let client = FakeAuthClient::new(ApiOutcome::Unauthorized, issued());
        let mut session = orchestrator(&dir, true, client);
        let mut console = Console::buffered();

        assert!(!session.is_authenticated(&mut console, true).await);
        assert!(console.out_text().is_empty());
        assert!(console.err_text().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let dir = TempDir::new().unwrap();
        let client = FakeAuthClient::new(ApiOutcome::Failure(server_error()), issued());
        let mut session = orchestrator(&dir, true, client);
        let mut console = Console::buffered();

        assert!(!session.is_authenticated(&mut console, true).await);
        assert_eq!(
            console.err_text().trim(),
            "Unexpected error occurred: error (500)."
        );
    }

    #[tokio::test]
    async fn test_unreadable_cache_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(CredentialCache::path(dir.path())).unwrap();
        let mut session = orchestrator(&dir, false, FakeAuthClient::new(status(true), issued()));
        let mut console = Console::buffered();

        assert!(!session.is_authenticated(&mut console, true).await);
        assert_eq!(session.client.liveness_calls.get(), 0);
        assert!(console.err_text().contains("Cannot read cached credential"));
    }

    #[tokio::test]
    async fn test_login_success() {
        let dir = TempDir::new().unwrap();
        let mut session = orchestrator(&dir, false, FakeAuthClient::new(status(true), issued()));
        let mut console = Console::buffered();

        assert!(session.login(&mut console, "username", "passwd", true).await);

        let out = console.out_text();
        let authenticating = out.find("Authenticating...").unwrap();
        let welcome = out
            .find("Authentication successful. Welcome username!")
            .unwrap();
        assert!(authenticating < welcome);
        assert!(out.contains("Your session is valid until"));

        assert_eq!(
            session.authorization_header(),
            Some("Bearer accessToken".to_string())
        );
        assert_eq!(CredentialCache::read(dir.path()).unwrap(), "accessToken");
        assert_eq!(
            *session.client.login_credentials.borrow(),
            Some(Credentials::new("username", "passwd"))
        );
    }

    #[tokio::test]
    async fn test_login_failure_keeps_cache() {
        let dir = TempDir::new().unwrap();
        let client = FakeAuthClient::new(status(true), ApiOutcome::Failure(server_error()));
        let mut session = orchestrator(&dir, true, client);
        let mut console = Console::buffered();

        assert!(!session.login(&mut console, "username", "passwd", false).await);
        assert!(console
            .err_text()
            .contains("Authentication failed because error."));
        assert_eq!(CredentialCache::read(dir.path()).unwrap(), cached_token());
        assert!(session.authorization_header().is_none());
    }

    #[tokio::test]
    async fn test_login_rejected_credentials() {
        let dir = TempDir::new().unwrap();
        let client = FakeAuthClient::new(status(true), ApiOutcome::Unauthorized);
        let mut session = orchestrator(&dir, false, client);
        let mut console = Console::buffered();

        assert!(!session.login(&mut console, "username", "wrong", false).await);
        assert!(console.err_text().contains("Authentication failed because"));
        assert!(!CredentialCache::exists(dir.path()));
    }

    #[tokio::test]
    async fn test_authenticate_reuses_without_login() {
        let dir = TempDir::new().unwrap();
        let mut session = orchestrator(&dir, true, FakeAuthClient::new(status(true), issued()));
        let mut console = Console::buffered();

        assert!(session.authenticate(&mut console, true).await);
        assert_eq!(session.client.liveness_calls.get(), 1);
        assert_eq!(session.client.login_calls.get(), 0);
        assert!(console
            .out_text()
            .contains("Authentication reused. Welcome username!"));
        assert!(session
            .authorization_header()
            .unwrap()
            .starts_with("Bearer eyJ"));
    }

    #[tokio::test]
    async fn test_authenticate_logs_in_when_inactive() {
        let dir = TempDir::new().unwrap();
        let mut session = orchestrator(&dir, true, FakeAuthClient::new(status(false), issued()));
        let mut console = Console::buffered();

        assert!(session.authenticate(&mut console, false).await);
        assert_eq!(session.client.liveness_calls.get(), 1);
        assert_eq!(session.client.login_calls.get(), 1);
        assert_eq!(
            session.authorization_header(),
            Some("Bearer accessToken".to_string())
        );
    }

    #[tokio::test]
    async fn test_authenticate_logs_in_without_cache() {
        let dir = TempDir::new().unwrap();
        let mut session = orchestrator(&dir, false, FakeAuthClient::new(status(true), issued()));
        let mut console = Console::buffered();

        assert!(session.authenticate(&mut console, false).await);
        assert_eq!(session.client.liveness_calls.get(), 0);
        assert_eq!(session.client.login_calls.get(), 1);
        assert!(CredentialCache::exists(dir.path()));
    }

    #[tokio::test]
    async fn test_login_with_unrepresentable_lifetime() {
        let dir = TempDir::new().unwrap();
        let issued = ApiOutcome::Success(IssuedCredential {
            subject: "username".to_string(),
            access_token: "accessToken".to_string(),
            token_kind: "Bearer".to_string(),
            expires_in_seconds: i64::MAX,
            roles: vec![],
        });
        let mut session = orchestrator(&dir, false, FakeAuthClient::new(status(true), issued));
        let mut console = Console::buffered();

        assert!(session.login(&mut console, "u", "p", true).await);
        assert_eq!(CredentialCache::read(dir.path()).unwrap(), "accessToken");
        assert!(console
            .out_text()
            .contains(&format!("Your session is valid until {}.", i64::MAX)));
        assert_eq!(
            session.authorization_header(),
            Some("Bearer accessToken".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_cache_is_treated_as_absent() {
        let dir = TempDir::new().unwrap();
        fs::write(CredentialCache::path(dir.path()), "  \n").unwrap();
        let mut session = orchestrator(&dir, false, FakeAuthClient::new(status(true), issued()));
        let mut console = Console::buffered();

        assert!(!session.is_authenticated(&mut console, true).await);
        assert_eq!(session.client.liveness_calls.get(), 0);
        assert!(console.out_text().is_empty());
        assert!(console.err_text().is_empty());
        assert!(session.cached_claims().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_logs_in_after_rejected_token() {
        let dir = TempDir::new().unwrap();
        let client = FakeAuthClient::new(ApiOutcome::Unauthorized, issued());
        let mut session = orchestrator(&dir, true, client);
        let mut console = Console::buffered();

        assert!(session.authenticate(&mut console, false).await);
        assert_eq!(session.client.liveness_calls.get(), 1);
        assert_eq!(session.client.login_calls.get(), 1);
        assert!(console.err_text().is_empty());
        assert_eq!(CredentialCache::read(dir.path()).unwrap(), "accessToken");
    }

    #[tokio::test]
    async fn test_authenticate_logs_in_after_liveness_failure() {
        let dir = TempDir::new().unwrap();
        let client = FakeAuthClient::new(ApiOutcome::Failure(server_error()), issued());
        let mut session = orchestrator(&dir, true, client);
        let mut console = Console::buffered();

        assert!(session.authenticate(&mut console, false).await);
        assert_eq!(session.client.liveness_calls.get(), 1);
        assert_eq!(session.client.login_calls.get(), 1);
        assert!(console
            .err_text()
            .contains("Unexpected error occurred: error (500)."));
        assert_eq!(
            session.authorization_header(),
            Some("Bearer accessToken".to_string())
        );
    }

    #[tokio::test]
    async fn test_authenticate_cannot_authenticate() {
        let dir = TempDir::new().unwrap();
        let client = FakeAuthClient::new(status(false), ApiOutcome::Failure(server_error()));
        let mut session = orchestrator(&dir, true, client);
        let mut console = Console::buffered();

        assert!(!session.authenticate(&mut console, false).await);
        assert_eq!(session.client.login_calls.get(), 1);
        assert!(session.authorization_header().is_none());
    }

    #[tokio::test]
    async fn test_announce_only_controls_banner() {
        // The same flag never changes which calls are made
        for announce in [true, false] {
            let dir = TempDir::new().unwrap();
            let mut session =
                orchestrator(&dir, true, FakeAuthClient::new(status(true), issued()));
            let mut console = Console::buffered();

            assert!(session.authenticate(&mut console, announce).await);
            assert_eq!(session.client.liveness_calls.get(), 1);
            assert_eq!(session.client.login_calls.get(), 0);
            assert_eq!(console.out_text().is_empty(), !announce);
        }
    }

    #[tokio::test]
    async fn test_renew_forces_login_without_liveness_check() {
        let dir = TempDir::new().unwrap();
        let mut session = orchestrator(&dir, true, FakeAuthClient::new(status(true), issued()));
        let mut console = Console::buffered();

        assert!(session.renew(&mut console, true).await);
        assert_eq!(session.client.liveness_calls.get(), 0);
        assert_eq!(session.client.login_calls.get(), 1);
        assert_eq!(CredentialCache::read(dir.path()).unwrap(), "accessToken");
        assert!(console.out_text().contains("Authenticating..."));
    }

    #[tokio::test]
    async fn test_prompt_in_batch_mode_fails_login() {
        let dir = TempDir::new().unwrap();
        let source = CredentialSource::Prompt {
            context: "dev".to_string(),
            username: "token".to_string(),
            batch_mode: true,
        };
        let client = FakeAuthClient::new(status(true), issued());
        let mut session = SessionOrchestrator::new(client, dir.path().to_path_buf(), source);
        let mut console = Console::buffered();

        assert!(!session.authenticate(&mut console, false).await);
        assert_eq!(session.client.login_calls.get(), 0);
        assert!(console.err_text().contains("--batch"));
    }

    #[test]
    fn test_cached_claims() {
        let dir = TempDir::new().unwrap();
        let session = orchestrator(&dir, false, FakeAuthClient::new(status(true), issued()));
        assert!(session.cached_claims().unwrap().is_none());

        CredentialCache::write(dir.path(), &cached_token()).unwrap();
        let claims = session.cached_claims().unwrap().unwrap();
        assert_eq!(claims.subject, "admin");
        assert_eq!(claims.role_bindings[0].resource_types, vec!["quota"]);
    }

    #[test]
    fn test_credential_source_for_context() {
        let mut ctx = Context {
            name: "dev".to_string(),
            api: "https://dev".to_string(),
            namespace: None,
            token: Some("user-token".to_string()),
            username: None,
        };
        match CredentialSource::for_context(&ctx, false) {
            CredentialSource::Configured(creds) => {
                assert_eq!(creds.username, defaults::USERNAME);
                assert_eq!(creds.password, "user-token");
            }
            other => panic!("Expected Configured, got {:?}", other),
        }

        ctx.token = None;
        ctx.username = Some("alice".to_string());
        match CredentialSource::for_context(&ctx, true) {
            CredentialSource::Prompt {
                username,
                batch_mode,
                ..
            } => {
                assert_eq!(username, "alice");
                assert!(batch_mode);
            }
            other => panic!("Expected Prompt, got {:?}", other),
        }
    }

    #[test]
    fn test_format_expiry_out_of_range() {
        assert_eq!(format_expiry(i64::MAX), i64::MAX.to_string());
    }
}
