use super::message::Message;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ordered, append-only log of the active conversation.
///
/// `append` is the only way an entry enters the log and entries are never
/// edited or removed afterwards; `clear` drops the whole conversation when a
/// new one starts. Readers always get a snapshot, so a partially appended
/// entry is never observable.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Arc<RwLock<Vec<Message>>>,
}

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message at the end of the log.
    pub async fn append(&self, message: Message) {
        let mut entries = self.entries.write().await;
        tracing::debug!(
            "[MessageLog] append #{}: role={:?}, id={}",
            entries.len(),
            message.role,
            message.id
        );
        entries.push(message);
    }

    /// Returns a snapshot of every message in insertion order.
    pub async fn all(&self) -> Vec<Message> {
        self.entries.read().await.clone()
    }

    /// Removes every message, starting a new conversation.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        tracing::debug!("[MessageLog] clear: dropping {} messages", entries.len());
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Returns the most recently appended message.
    pub async fn last(&self) -> Option<Message> {
        self.entries.read().await.last().cloned()
    }
}
