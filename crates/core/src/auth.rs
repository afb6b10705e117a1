//! IdentityProvider trait — the auth collaborator.
//!
//! Sign-in, sign-up, sign-out, and an observable current-user
//! subscription. "No provider configured" and "no signed-in user" both
//! fall back to local-only chat; the pipeline never requires a user.

use crate::error::AuthError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The signed-in user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Provider-assigned stable user id.
    pub uid: String,
    pub email: String,
}

/// The identity provider seam.
///
/// Implementations: demo (accepts any credentials, local-only) and an
/// Identity-Toolkit-style REST client.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "demo", "rest").
    fn name(&self) -> &str;

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<AuthUser, AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<AuthUser, AuthError>;

    async fn sign_out(&self) -> std::result::Result<(), AuthError>;

    /// Observable auth state. Receivers see `None` while signed out.
    fn current_user(&self) -> watch::Receiver<Option<AuthUser>>;
}
