//! Search GitHub repositories and keep favorites for offline viewing.
//!
//! The two moving parts are [`QueryController`], which turns a stream of
//! keystrokes into debounced searches, and [`Favorites`], which keeps the
//! bookmarked repositories in memory and in a [`KeyValueStore`].

pub mod config;
pub mod error;
pub mod favorites;
pub mod query;
pub mod search;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, FavoritesError, SearchError, StoreError};
pub use favorites::{Favorites, FavoritesSet, Notification};
pub use query::{FailurePolicy, QueryController, QueryState};
pub use search::{GitHubClient, MockSearch, RepositorySearch};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::{Owner, Repository, SearchResponse};
