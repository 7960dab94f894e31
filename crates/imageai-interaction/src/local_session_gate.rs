//! In-process session gate.
//!
//! Holds the signed-in identity in memory. Used by the terminal front end and
//! by tests; a real deployment plugs in its own authentication provider.

use async_trait::async_trait;
use imageai_core::error::{ImageAiError, Result};
use imageai_core::identity::{Identity, SessionGate};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct LocalSessionGate {
    identity: RwLock<Option<Identity>>,
}

impl LocalSessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gate with a user already signed in.
    pub fn signed_in(display_label: impl Into<String>) -> Self {
        Self {
            identity: RwLock::new(Some(Identity::new(display_label))),
        }
    }

    /// Signs a user in, replacing any current identity.
    pub async fn sign_in(&self, display_label: impl Into<String>) -> Result<Identity> {
        let display_label = display_label.into();
        if display_label.trim().is_empty() {
            return Err(ImageAiError::security("Display label must not be empty"));
        }

        let identity = Identity::new(display_label.trim());
        *self.identity.write().await = Some(identity.clone());
        tracing::info!("[LocalSessionGate] Signed in: {}", identity.display_label);
        Ok(identity)
    }
}

#[async_trait]
impl SessionGate for LocalSessionGate {
    async fn current_identity(&self) -> Option<Identity> {
        self.identity.read().await.clone()
    }

    async fn end_session(&self) -> Result<()> {
        let previous = self.identity.write().await.take();
        match previous {
            Some(identity) => {
                tracing::info!("[LocalSessionGate] Signed out: {}", identity.display_label)
            }
            None => tracing::debug!("[LocalSessionGate] end_session without an active session"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let gate = LocalSessionGate::new();
        assert!(gate.current_identity().await.is_none());

        gate.sign_in("  ada@example.com ").await.unwrap();
        assert_eq!(
            gate.current_identity().await,
            Some(Identity::new("ada@example.com"))
        );

        gate.end_session().await.unwrap();
        assert!(gate.current_identity().await.is_none());
    }

    #[tokio::test]
    async fn test_blank_label_is_rejected() {
        let gate = LocalSessionGate::new();
        let err = gate.sign_in("   ").await.unwrap_err();
        assert!(matches!(err, ImageAiError::Security(_)));
        assert!(gate.current_identity().await.is_none());
    }
}
