//! HTTP client for the Users API
//!
//! A thin typed wrapper over [`reqwest`] that mirrors the server routes
//! one to one. Server-side failures (validation, duplicates, missing
//! users) surface as [`ClientError::Api`] carrying the status code and
//! the `message` from the error body.
//!
//! # Example
//! ```ignore
//! use users_client::UsersClient;
//!
//! let client = UsersClient::new("http://localhost:8000");
//! let users = client.get_users().await?;
//! ```

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

pub use domain_users::models::{ContactPreference, User, UserPayload};

/// Errors produced by [`UsersClient`] calls
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// The request never produced a usable response
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Error body shape returned by the Users API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Typed client for the Users API
#[derive(Debug, Clone)]
pub struct UsersClient {
    client: reqwest::Client,
    base_url: String,
}

impl UsersClient {
    /// Create a client targeting the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client from `USERS_API_BASE_URL`, defaulting to the
    /// local development server
    pub fn from_env() -> Self {
        let base_url = core_config::env_or_default("USERS_API_BASE_URL", "http://localhost:8000");
        Self::new(base_url)
    }

    /// Base URL this client sends requests to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch all users
    #[instrument(skip(self))]
    pub async fn get_users(&self) -> ClientResult<Vec<User>> {
        let response = self.client.get(self.url("/users")).send().await?;
        decode(response).await
    }

    /// Create a user from the given payload
    #[instrument(skip(self, payload))]
    pub async fn create_user(&self, payload: &UserPayload) -> ClientResult<User> {
        let response = self
            .client
            .post(self.url("/users"))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    /// Replace the user with the given id
    #[instrument(skip(self, payload))]
    pub async fn update_user(&self, id: &str, payload: &UserPayload) -> ClientResult<User> {
        let response = self
            .client
            .put(self.url(&format!("/users/{id}")))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    /// Delete the user with the given id
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> ClientResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/users/{id}")))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turn non-success responses into [`ClientError::Api`]
///
/// The message comes from the error body's `message` field when it
/// parses, otherwise the raw body text is used.
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    tracing::warn!(%status, %message, "Users API request failed");
    Err(ClientError::Api { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = check_status(response).await?;
    Ok(response.json().await?)
}
