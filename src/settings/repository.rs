//! Settings repository
//!
//! An in-memory collection of entries keyed by id, hydrated once from the
//! settings store and kept as the source of truth afterwards. Mutations
//! notify subscribers in the order they are applied and schedule a
//! debounced write of the whole collection on a background task.

use crate::persistence::{CodecError, DualSourceStore, Persisted};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Capacity of the change notification channel
const EVENT_CAPACITY: usize = 64;

/// An item stored in a repository
pub trait Entry: Clone + Send + Sync + 'static {
    type Id: Ord + Clone + Debug + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    fn name(&self) -> &str;
}

/// Change notifications emitted by a repository
#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryEvent<E: Entry> {
    Added(E),
    Updated(E),
    Removed(E::Id),
}

enum PersistCommand {
    Changed,
    Flush(oneshot::Sender<()>),
}

/// Keyed collection with observer notification and debounced persistence
///
/// Must be created inside a Tokio runtime; the persistence worker is
/// spawned on it.
pub struct Repository<E: Entry> {
    key: String,
    entries: Arc<Mutex<BTreeMap<E::Id, E>>>,
    events: broadcast::Sender<RepositoryEvent<E>>,
    persist_tx: mpsc::UnboundedSender<PersistCommand>,
    load_error: Option<CodecError>,
}

impl<E: Entry> Repository<E>
where
    Vec<E>: Persisted + Send + 'static,
{
    /// Hydrate from `store` under `key` and start the persistence worker.
    ///
    /// Unreadable stored data leaves the repository empty; the error is
    /// kept for the caller to surface (see [`Repository::load_error`]).
    /// Until [`Repository::replace_unreadable`] is called, changes stay in
    /// memory and the unreadable entry is left as it is. Hydration itself
    /// never schedules a write.
    pub fn open(store: DualSourceStore, key: impl Into<String>, debounce: Duration) -> Self {
        let key = key.into();
        let (loaded, load_error) = match store.load::<Vec<E>>(&key) {
            Ok(loaded) => (loaded, None),
            Err(e) => {
                tracing::warn!("Unreadable settings '{}', starting empty: {}", key, e);
                (Vec::new(), Some(e))
            }
        };

        tracing::info!("Loaded {} entries from '{}'", loaded.len(), key);

        let entries: BTreeMap<E::Id, E> = loaded
            .into_iter()
            .map(|entry| (entry.id().clone(), entry))
            .collect();
        let entries = Arc::new(Mutex::new(entries));

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (persist_tx, persist_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_persister(
            entries.clone(),
            store,
            key.clone(),
            debounce,
            persist_rx,
        ));

        Self {
            key,
            entries,
            events,
            persist_tx,
            load_error,
        }
    }

    /// Insert or overwrite by id
    pub fn add(&self, entry: E) {
        let mut entries = self.entries.lock();
        let event = match entries.insert(entry.id().clone(), entry.clone()) {
            Some(_) => RepositoryEvent::Updated(entry),
            None => RepositoryEvent::Added(entry),
        };
        self.publish(event);
        drop(entries);
        self.schedule_write();
    }

    /// Overwrite an existing entry.
    ///
    /// Returns `false` and changes nothing when the id is unknown; no
    /// notification is sent and no write is scheduled in that case.
    pub fn update(&self, entry: E) -> bool {
        let mut entries = self.entries.lock();
        match entries.get_mut(entry.id()) {
            Some(existing) => {
                *existing = entry.clone();
                self.publish(RepositoryEvent::Updated(entry));
            }
            None => {
                tracing::debug!("Ignoring update of unknown id {:?} in '{}'", entry.id(), self.key);
                return false;
            }
        }
        drop(entries);
        self.schedule_write();
        true
    }

    /// Delete by id. Returns `false` when the id is unknown.
    pub fn remove(&self, id: &E::Id) -> bool {
        let mut entries = self.entries.lock();
        if entries.remove(id).is_none() {
            return false;
        }
        self.publish(RepositoryEvent::Removed(id.clone()));
        drop(entries);
        self.schedule_write();
        true
    }

    pub fn get(&self, id: &E::Id) -> Option<E> {
        self.entries.lock().get(id).cloned()
    }

    /// All entries sorted by name, then id
    pub fn all(&self) -> Vec<E> {
        self.select(|_| true)
    }

    /// Entries matching `predicate`, sorted by name, then id
    pub fn select<F>(&self, predicate: F) -> Vec<E>
    where
        F: Fn(&E) -> bool,
    {
        let mut selected: Vec<E> = self
            .entries
            .lock()
            .values()
            .filter(|entry| predicate(entry))
            .cloned()
            .collect();
        selected.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
        selected
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Decode error observed while hydrating, if any
    pub fn load_error(&self) -> Option<&CodecError> {
        self.load_error.as_ref()
    }

    /// Give up on unreadable stored data and overwrite it with the current
    /// in-memory entries. Returns the error that was blocking writes.
    pub fn replace_unreadable(&mut self) -> Option<CodecError> {
        let error = self.load_error.take()?;
        tracing::warn!("Overwriting unreadable settings '{}': {}", self.key, error);
        self.schedule_write();
        Some(error)
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<RepositoryEvent<E>> {
        self.events.subscribe()
    }

    /// Write any pending change now and wait for the write to finish
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.persist_tx.send(PersistCommand::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    // Called with the entries lock held so notifications keep mutation order
    fn publish(&self, event: RepositoryEvent<E>) {
        let _ = self.events.send(event);
    }

    fn schedule_write(&self) {
        if self.load_error.is_some() {
            tracing::debug!("Not writing '{}' over unreadable stored data", self.key);
            return;
        }
        if self.persist_tx.send(PersistCommand::Changed).is_err() {
            tracing::warn!("Persistence worker for '{}' is gone, change not saved", self.key);
        }
    }
}

/// Background writer. Waits until no change has arrived for `debounce`
/// (or a flush is requested) and then saves a snapshot of the collection.
async fn run_persister<E: Entry>(
    entries: Arc<Mutex<BTreeMap<E::Id, E>>>,
    store: DualSourceStore,
    key: String,
    debounce: Duration,
    mut commands: mpsc::UnboundedReceiver<PersistCommand>,
) where
    Vec<E>: Persisted + Send + 'static,
{
    while let Some(command) = commands.recv().await {
        if let PersistCommand::Flush(ack) = command {
            let _ = ack.send(());
            continue;
        }

        let mut waiters = Vec::new();
        let mut closed = false;
        loop {
            match tokio::time::timeout(debounce, commands.recv()).await {
                Ok(Some(PersistCommand::Changed)) => continue,
                Ok(Some(PersistCommand::Flush(ack))) => {
                    waiters.push(ack);
                    break;
                }
                Ok(None) => {
                    closed = true;
                    break;
                }
                Err(_) => break,
            }
        }

        write_snapshot(&entries, &store, &key).await;

        for ack in waiters {
            let _ = ack.send(());
        }
        if closed {
            break;
        }
    }

    tracing::debug!("Persistence worker for '{}' stopped", key);
}

async fn write_snapshot<E: Entry>(
    entries: &Arc<Mutex<BTreeMap<E::Id, E>>>,
    store: &DualSourceStore,
    key: &str,
) where
    Vec<E>: Persisted + Send + 'static,
{
    let snapshot: Vec<E> = entries.lock().values().cloned().collect();
    let count = snapshot.len();
    let store = store.clone();
    let write_key = key.to_string();

    let result = tokio::task::spawn_blocking(move || store.save(&write_key, &snapshot)).await;

    match result {
        Ok(Ok(())) => tracing::debug!("Saved {} entries to '{}'", count, key),
        // In-memory state stays authoritative; a later write may succeed
        Ok(Err(e)) => tracing::error!("Dropped settings write for '{}': {}", key, e),
        Err(e) => tracing::error!("Settings write task for '{}' panicked: {}", key, e),
    }
}
