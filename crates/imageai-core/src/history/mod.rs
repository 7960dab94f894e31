//! Chat history domain module.
//!
//! - `model`: `HistoryEntry`, one archived or started conversation
//! - `store`: `HistoryStore`, the exclusively owned list of entries

mod model;
mod store;

pub use model::{HistoryEntry, HistoryEntryId};
pub use store::HistoryStore;
