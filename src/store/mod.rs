//! String-keyed persistent storage.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;

/// Key under which the favorites list is stored.
pub const FAVORITES_KEY: &str = "favorites";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Either the whole value lands or the previous value stays.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
