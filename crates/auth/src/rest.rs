//! REST identity client — Identity-Toolkit-style password authentication.
//!
//! Speaks the `accounts:signInWithPassword` / `accounts:signUp` endpoints.
//! Error responses carry a structured `error.message` field which is
//! mapped to `InvalidCredentials`.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, warn};
use unihelp_core::auth::{AuthUser, IdentityProvider};
use unihelp_core::error::AuthError;

/// An identity client for an Identity-Toolkit-compatible endpoint.
pub struct RestIdentity {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    state: watch::Sender<Option<AuthUser>>,
}

impl RestIdentity {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        let (state, _) = watch::channel(None);

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
            state,
        }
    }

    /// Create a client against the hosted Google endpoint.
    pub fn hosted(api_key: impl Into<String>) -> Self {
        Self::new("https://identitytoolkit.googleapis.com/v1", api_key)
    }

    async fn password_request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        debug!(endpoint, "Sending identity request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Network(format!("Failed to parse response: {e}")))?;

        if let Some(error) = api_response.error {
            warn!(message = %error.message, "Identity endpoint rejected request");
            return Err(AuthError::InvalidCredentials(error.message));
        }

        match (api_response.local_id, api_response.email) {
            (Some(uid), Some(email)) => {
                let user = AuthUser { uid, email };
                self.state.send_replace(Some(user.clone()));
                Ok(user)
            }
            _ => Err(AuthError::Network("Incomplete identity response".into())),
        }
    }
}

#[async_trait]
impl IdentityProvider for RestIdentity {
    fn name(&self) -> &str {
        "rest"
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.password_request("accounts:signInWithPassword", email, password)
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.password_request("accounts:signUp", email, password)
            .await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state.send_replace(None);
        Ok(())
    }

    fn current_user(&self) -> watch::Receiver<Option<AuthUser>> {
        self.state.subscribe()
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default, rename = "localId")]
    local_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}
