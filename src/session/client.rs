//! Authentication API client

use std::fmt;

use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{api, session};

use super::models::{Credentials, IssuedCredential, RemoteSessionStatus};

/// Outcome of an authentication API call.
///
/// `401` is its own variant because callers treat it as an expected answer
/// ("this token is no longer accepted") rather than as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome<T> {
    Success(T),
    Unauthorized,
    Failure(ApiFailure),
}

/// Non-401 failure: an error status, or no response at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    /// HTTP status, absent when the request never got a response
    pub status: Option<u16>,
    pub message: String,
}

impl ApiFailure {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

/// The two remote operations the session logic depends on
#[allow(async_fn_in_trait)]
pub trait AuthClient {
    /// Exchange credentials for a fresh access token
    async fn login(&self, credentials: &Credentials) -> ApiOutcome<IssuedCredential>;

    /// Ask the server whether `token` is still active
    async fn check_liveness(&self, token: &str) -> ApiOutcome<RemoteSessionStatus>;
}

/// Error body returned by the API
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP implementation of [`AuthClient`]
pub struct HttpAuthClient {
    client: Client,
    base_url: String,
}

impl HttpAuthClient {
    /// Create a client for the API at `base_url`
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .connect_timeout(api::CONNECT_TIMEOUT)
            .timeout(api::REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

impl AuthClient for HttpAuthClient {
    async fn login(&self, credentials: &Credentials) -> ApiOutcome<IssuedCredential> {
        let url = self.url(api::LOGIN);
        debug!("Logging in as '{}' at {}", credentials.username, url);

        let result = self.client.post(&url).json(credentials).send().await;
        into_outcome(result).await
    }

    async fn check_liveness(&self, token: &str) -> ApiOutcome<RemoteSessionStatus> {
        let url = self.url(api::TOKEN_INFO);
        debug!("Checking token liveness at {}", url);

        let result = self
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("{}{}", session::BEARER_PREFIX, token),
            )
            .send()
            .await;
        into_outcome(result).await
    }
}

/// Map a raw HTTP result onto [`ApiOutcome`]
async fn into_outcome<T: DeserializeOwned>(
    result: reqwest::Result<Response>,
) -> ApiOutcome<T> {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            debug!("Request failed without a response: {}", e);
            return ApiOutcome::Failure(ApiFailure::new(
                e.status().map(|s| s.as_u16()),
                e.to_string(),
            ));
        }
    };

    let status = response.status();
    debug!("Response status: {}", status);

    if status == StatusCode::UNAUTHORIZED {
        return ApiOutcome::Unauthorized;
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return ApiOutcome::Failure(ApiFailure::new(
            Some(status.as_u16()),
            failure_message(status, &body),
        ));
    }

    match response.json::<T>().await {
        Ok(payload) => ApiOutcome::Success(payload),
        Err(e) => ApiOutcome::Failure(ApiFailure::new(
            Some(status.as_u16()),
            format!("invalid response body: {}", e),
        )),
    }
}

/// Prefer the API's own `message`, else the status reason phrase
fn failure_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}
