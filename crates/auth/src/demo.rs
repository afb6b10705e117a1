//! Demo identity — local-only sign-in used when no identity project is
//! configured. Accepts any non-empty email/password pair.

use async_trait::async_trait;
use tokio::sync::watch;
use unihelp_core::auth::{AuthUser, IdentityProvider};
use unihelp_core::error::AuthError;
use uuid::Uuid;

/// A local-only identity provider.
pub struct DemoIdentity {
    state: watch::Sender<Option<AuthUser>>,
}

impl DemoIdentity {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }
}

impl Default for DemoIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for DemoIdentity {
    fn name(&self) -> &str {
        "demo"
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "email and password are required".into(),
            ));
        }
        let user = AuthUser {
            uid: Uuid::new_v4().to_string(),
            email: email.trim().to_string(),
        };
        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        // Demo mode does not distinguish registration from sign-in.
        self.sign_in(email, password).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state.send_replace(None);
        Ok(())
    }

    fn current_user(&self) -> watch::Receiver<Option<AuthUser>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_publishes_auth_state() {
        let identity = DemoIdentity::new();
        let rx = identity.current_user();
        assert!(rx.borrow().is_none());

        let user = identity.sign_in("ana@uni.edu", "secret").await.unwrap();
        assert_eq!(user.email, "ana@uni.edu");
        assert_eq!(rx.borrow().as_ref().unwrap().email, "ana@uni.edu");
    }

    #[tokio::test]
    async fn sign_out_clears_state() {
        let identity = DemoIdentity::new();
        identity.sign_in("ana@uni.edu", "secret").await.unwrap();
        identity.sign_out().await.unwrap();
        assert!(identity.current_user().borrow().is_none());
    }

    #[tokio::test]
    async fn empty_credentials_rejected() {
        let identity = DemoIdentity::new();
        let err = identity.sign_in("", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
        assert!(identity.current_user().borrow().is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let identity = DemoIdentity::new();
        let mut rx = identity.current_user();

        identity.sign_in("bob@uni.edu", "pw").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        identity.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }
}
