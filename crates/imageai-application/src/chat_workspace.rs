//! Chat workspace: the conversation, its history sidebar and the session
//! lifecycle hooks called by the host router.

use crate::conversation::ConversationController;
use imageai_core::conversation::RejectionReason;
use imageai_core::error::{ImageAiError, Result};
use imageai_core::generation::GenerationClient;
use imageai_core::history::{HistoryEntry, HistoryStore};
use imageai_core::identity::{Identity, Route, SessionGate};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the chat surface needs for one signed-in user.
///
/// The workspace owns the conversation controller and the history store and
/// exposes the two navigation hooks (`on_session_established`,
/// `on_session_ended`). It never routes by itself; hooks return the route the
/// host should show next.
pub struct ChatWorkspace {
    controller: ConversationController,
    history: HistoryStore,
    gate: Arc<dyn SessionGate>,
    /// Identity the history belongs to; `None` until a session claims it
    history_owner: Mutex<Option<String>>,
}

impl ChatWorkspace {
    /// Creates a workspace with an empty conversation and history.
    pub fn new(client: Arc<dyn GenerationClient>, gate: Arc<dyn SessionGate>) -> Self {
        Self::with_history(client, gate, HistoryStore::new())
    }

    /// Creates a workspace with a pre-populated history store.
    pub fn with_history(
        client: Arc<dyn GenerationClient>,
        gate: Arc<dyn SessionGate>,
        history: HistoryStore,
    ) -> Self {
        Self {
            controller: ConversationController::new(client, Arc::clone(&gate)),
            history,
            gate,
            history_owner: Mutex::new(None),
        }
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Identity of the signed-in user, for the sidebar.
    pub async fn current_identity(&self) -> Option<Identity> {
        self.gate.current_identity().await
    }

    /// Route to show on first load: chat with an active session, login otherwise.
    pub async fn initial_route(&self) -> Route {
        if self.gate.current_identity().await.is_some() {
            Route::Chat
        } else {
            Route::Login
        }
    }

    /// Whether `route` may be shown right now.
    pub async fn can_enter(&self, route: Route) -> bool {
        !route.requires_session() || self.gate.current_identity().await.is_some()
    }

    /// Hook for the router after a successful login.
    ///
    /// Starts a fresh conversation for the new identity. History archived
    /// under a different identity is dropped.
    ///
    /// # Errors
    ///
    /// Returns a security error if the gate reports no identity.
    pub async fn on_session_established(&self) -> Result<Route> {
        let identity = self
            .gate
            .current_identity()
            .await
            .ok_or_else(|| ImageAiError::security("No active session"))?;

        self.controller.reset().await;

        let mut owner = self.history_owner.lock().await;
        let changed = owner
            .as_deref()
            .filter(|previous| *previous != identity.display_label);
        if let Some(previous) = changed {
            tracing::info!(
                "[ChatWorkspace] Identity changed from {} to {}, dropping history",
                previous,
                identity.display_label
            );
            self.history.clear().await;
        }
        *owner = Some(identity.display_label.clone());
        drop(owner);

        tracing::info!(
            "[ChatWorkspace] Session established for {}",
            identity.display_label
        );
        Ok(Route::Chat)
    }

    /// Hook for the router once the session is gone.
    ///
    /// Discards the conversation (orphaning any in-flight request) and the
    /// history list.
    pub async fn on_session_ended(&self) -> Route {
        self.controller.reset().await;
        self.history.clear().await;
        *self.history_owner.lock().await = None;
        tracing::info!("[ChatWorkspace] Session ended");
        Route::Login
    }

    /// Logs out through the gate, then runs `on_session_ended`.
    ///
    /// # Errors
    ///
    /// If the gate fails to end the session the error is returned and the
    /// conversation is left untouched.
    pub async fn logout(&self) -> Result<Route> {
        if let Err(e) = self.gate.end_session().await {
            tracing::error!("[ChatWorkspace] Failed to logout: {}", e);
            return Err(e);
        }
        Ok(self.on_session_ended().await)
    }

    /// Archives the current conversation into history and starts a new one.
    ///
    /// Returns the created history entry, or `None` when the conversation
    /// had no prompt worth archiving.
    ///
    /// # Errors
    ///
    /// `GenerationInProgress` while a request is pending.
    pub async fn new_chat(&self) -> std::result::Result<Option<HistoryEntry>, RejectionReason> {
        let closed = self.controller.start_new_session().await?;
        let entry = HistoryEntry::from_conversation(&closed);

        if let Some(entry) = &entry {
            tracing::debug!(
                "[ChatWorkspace] Archiving conversation as '{}' ({})",
                entry.title,
                entry.id
            );
            self.history.add(entry.clone()).await;
        }

        Ok(entry)
    }

    /// Deletes a history entry. Unknown ids are ignored.
    pub async fn delete_history_entry(&self, id: &str) {
        self.history.remove(id).await;
    }
}
