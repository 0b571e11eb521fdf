//! Favorites kept in memory and mirrored to a key-value store.
//!
//! A single task owns the set and the store. `Favorites` handles send it
//! commands over a channel, so toggles and removals apply one at a time in the
//! order they were issued. Every mutation is persisted before it is committed
//! to memory: if the write fails, the set observers see does not change.

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::error::{FavoritesError, StoreError};
use crate::store::{KeyValueStore, FAVORITES_KEY};
use crate::types::Repository;

const COMMAND_BUFFER: usize = 32;
const NOTIFICATION_BUFFER: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Added,
    Removed,
    Deleted,
}

impl Notification {
    pub fn message(&self) -> &'static str {
        match self {
            Notification::Added => "Added to Favorites!",
            Notification::Removed => "Removed from Favorites!",
            Notification::Deleted => "Delete from Favorites!",
        }
    }
}

/// Ordered list of repositories, unique by id.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FavoritesSet(Vec<Repository>);

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first occurrence of each id.
    pub fn from_repos(repos: Vec<Repository>) -> Self {
        let mut set = Vec::with_capacity(repos.len());
        for repo in repos {
            if !set.iter().any(|r: &Repository| r.id == repo.id) {
                set.push(repo);
            }
        }
        FavoritesSet(set)
    }

    /// Entries that fail validation are dropped.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let repos: Vec<Repository> = serde_json::from_str(json)?;
        let repos = repos
            .into_iter()
            .filter(|repo| match repo.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "skipping invalid stored favorite");
                    false
                }
            })
            .collect();
        Ok(Self::from_repos(repos))
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(&self.0).map_err(|e| StoreError::Persistence(e.to_string()))
    }

    pub fn contains(&self, id: u64) -> bool {
        self.0.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: u64) -> Option<&Repository> {
        self.0.iter().find(|r| r.id == id)
    }

    /// The set with `repo` removed if present, appended otherwise.
    pub fn toggled(&self, repo: Repository) -> (Self, Notification) {
        if self.contains(repo.id) {
            (self.without(repo.id), Notification::Removed)
        } else {
            let mut next = self.0.clone();
            next.push(repo);
            (FavoritesSet(next), Notification::Added)
        }
    }

    pub fn without(&self, id: u64) -> Self {
        FavoritesSet(self.0.iter().filter(|r| r.id != id).cloned().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.0.iter().map(|r| r.id).collect()
    }
}

/// Reads the persisted set. Never fails: a missing, corrupted or unreadable
/// blob yields an empty set.
pub async fn load_set<K: KeyValueStore + ?Sized>(store: &K) -> FavoritesSet {
    match store.get(FAVORITES_KEY).await {
        Ok(None) => FavoritesSet::new(),
        Ok(Some(blob)) => match FavoritesSet::from_json(&blob) {
            Ok(set) => set,
            Err(e) => {
                warn!(error = %e, "favorites blob is corrupted, starting empty");
                FavoritesSet::new()
            }
        },
        Err(e) => {
            warn!(error = %e, "can't read favorites, starting empty");
            FavoritesSet::new()
        }
    }
}

type Reply = oneshot::Sender<Result<Notification, StoreError>>;

enum Command {
    Toggle { repo: Repository, reply: Reply },
    Remove { id: u64, reply: Reply },
}

struct FavoritesActor<K> {
    store: K,
    set: FavoritesSet,
    snapshot: watch::Sender<FavoritesSet>,
    notifications: broadcast::Sender<Notification>,
}

impl<K: KeyValueStore> FavoritesActor<K> {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        while let Some(command) = rx.recv().await {
            let (next, notification, reply) = match command {
                Command::Toggle { repo, reply } => {
                    let (next, notification) = self.set.toggled(repo);
                    (next, notification, reply)
                }
                Command::Remove { id, reply } => (self.set.without(id), Notification::Deleted, reply),
            };

            let outcome = self.commit(next).await.map(|()| notification);
            match &outcome {
                Ok(n) => {
                    let _ = self.notifications.send(*n);
                }
                Err(e) => warn!(error = %e, "favorites update not applied"),
            }
            let _ = reply.send(outcome);
        }
        debug!("favorites task stopped");
    }

    async fn commit(&mut self, next: FavoritesSet) -> Result<(), StoreError> {
        let blob = next.to_json()?;
        self.store.set(FAVORITES_KEY, &blob).await?;
        info!(count = next.len(), "favorites persisted");
        self.set = next;
        self.snapshot.send_replace(self.set.clone());
        Ok(())
    }
}

/// Handle to the favorites task. Cheap to clone.
#[derive(Clone)]
pub struct Favorites {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<FavoritesSet>,
    notifications: broadcast::Sender<Notification>,
}

impl Favorites {
    /// Loads the persisted set and starts the task that owns it.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn load<K: KeyValueStore + 'static>(store: K) -> Self {
        let set = load_set(&store).await;
        debug!(count = set.len(), "favorites loaded");

        let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot) = watch::channel(set.clone());
        let (notifications, _) = broadcast::channel(NOTIFICATION_BUFFER);

        let actor = FavoritesActor {
            store,
            set,
            snapshot: snapshot_tx,
            notifications: notifications.clone(),
        };
        tokio::spawn(actor.run(rx));

        Self {
            commands,
            snapshot,
            notifications,
        }
    }

    /// Fails with `FavoritesError::Invalid` without touching the store if
    /// `repo` doesn't validate.
    pub async fn toggle(&self, repo: Repository) -> Result<Notification, FavoritesError> {
        repo.validate()?;
        self.request(|reply| Command::Toggle { repo, reply }).await
    }

    pub async fn remove(&self, id: u64) -> Result<Notification, FavoritesError> {
        self.request(|reply| Command::Remove { id, reply }).await
    }

    async fn request(
        &self,
        command: impl FnOnce(Reply) -> Command,
    ) -> Result<Notification, FavoritesError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| FavoritesError::Closed)?;
        let outcome = rx.await.map_err(|_| FavoritesError::Closed)?;
        Ok(outcome?)
    }

    pub fn snapshot(&self) -> FavoritesSet {
        self.snapshot.borrow().clone()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.snapshot.borrow().contains(id)
    }

    pub fn watch(&self) -> watch::Receiver<FavoritesSet> {
        self.snapshot.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }
}
