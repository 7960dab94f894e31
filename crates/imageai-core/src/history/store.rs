use super::model::HistoryEntry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory list of past conversations.
///
/// `HistoryStore` is the only owner of its entries. It has no ordering
/// dependency on the conversation controller; the application layer decides
/// when a conversation is archived into it.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    /// Entries in insertion order
    entries: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl HistoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given entries.
    pub fn with_entries(entries: impl IntoIterator<Item = HistoryEntry>) -> Self {
        let mut seeded: Vec<HistoryEntry> = Vec::new();
        for entry in entries {
            seeded.retain(|e| e.id != entry.id);
            seeded.push(entry);
        }
        Self {
            entries: Arc::new(RwLock::new(seeded)),
        }
    }

    /// Lists entries, most recent first.
    ///
    /// Entries are ordered by `created_at`; entries with the same timestamp
    /// are ordered by when they were added, latest first.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        let entries = self.entries.read().await;
        let mut listed: Vec<HistoryEntry> = entries.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listed
    }

    /// Adds an entry. An existing entry with the same id is replaced.
    pub async fn add(&self, entry: HistoryEntry) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.id != entry.id);
        if entries.len() != before {
            tracing::debug!("[HistoryStore] Replacing entry: id={}", entry.id);
        } else {
            tracing::debug!("[HistoryStore] Adding entry: id={}", entry.id);
        }
        entries.push(entry);
    }

    /// Removes the entry with the given id. Unknown ids are ignored.
    pub async fn remove(&self, id: &str) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            tracing::debug!("[HistoryStore] remove: no entry with id={}", id);
        } else {
            tracing::debug!("[HistoryStore] Removed entry: id={}", id);
        }
    }

    pub async fn get(&self, id: &str) -> Option<HistoryEntry> {
        let entries = self.entries.read().await;
        entries.iter().find(|e| e.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn entry(id: &str, age_days: i64) -> HistoryEntry {
        HistoryEntry::new(
            id,
            format!("Chat {id}"),
            Utc::now() - Duration::days(age_days),
            "preview",
        )
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let store = HistoryStore::new();
        store.add(entry("old", 2)).await;
        store.add(entry("new", 0)).await;
        store.add(entry("mid", 1)).await;

        let ids: Vec<String> = store.list().await.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_same_timestamp_lists_latest_added_first() {
        let now = Utc::now();
        let store = HistoryStore::new();
        store.add(HistoryEntry::new("a", "A", now, "")).await;
        store.add(HistoryEntry::new("b", "B", now, "")).await;

        let ids: Vec<String> = store.list().await.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = HistoryStore::with_entries(vec![entry("1", 0), entry("2", 1)]);

        store.remove("1").await;
        let after_first = store.list().await;
        store.remove("1").await;
        let after_second = store.list().await;

        assert_eq!(after_first, after_second);
        assert_eq!(after_second.len(), 1);
        assert!(store.get("1").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_noop() {
        let store = HistoryStore::with_entries(vec![entry("1", 0)]);
        store.remove("does-not-exist").await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_add_with_existing_id_replaces() {
        let store = HistoryStore::new();
        store.add(entry("1", 1)).await;
        store
            .add(HistoryEntry::new("1", "Renamed", Utc::now(), "new preview"))
            .await;

        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Renamed");
    }

    #[tokio::test]
    async fn test_clear() {
        let store = HistoryStore::with_entries(vec![entry("1", 0), entry("2", 0)]);
        store.clear().await;
        assert!(store.is_empty().await);
    }
}
