//! In-memory session registry.
//!
//! Each session sits behind its own async mutex. Actions take it with
//! `try_lock`, so a second action on a session that is still working is
//! refused instead of queued. Sessions never touch each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::Session;

struct Entry {
    session: Arc<AsyncMutex<Session>>,
    last_used: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<Mutex<HashMap<Uuid, Entry>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        // The map holds no invariants a panicking holder could break
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a fresh session. Idle sessions are evicted first.
    pub fn create(&self) -> Uuid {
        let mut entries = self.entries();
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| {
            // A held handle means an action is running; never evict it
            Arc::strong_count(&entry.session) > 1
                || now.duration_since(entry.last_used) < self.idle_ttl
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }

        let id = Uuid::new_v4();
        entries.insert(
            id,
            Entry {
                session: Arc::new(AsyncMutex::new(Session::default())),
                last_used: now,
            },
        );
        id
    }

    fn handle(&self, id: Uuid) -> Result<Arc<AsyncMutex<Session>>, AppError> {
        let mut entries = self.entries();
        let entry = entries
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        entry.last_used = Instant::now();
        Ok(entry.session.clone())
    }

    /// Exclusive access for one action. Fails with `SessionBusy` while another
    /// action on the same session is in flight.
    pub fn acquire(&self, id: Uuid) -> Result<OwnedMutexGuard<Session>, AppError> {
        self.handle(id)?
            .try_lock_owned()
            .map_err(|_| AppError::SessionBusy)
    }

    /// Snapshot for display. Waits for a running action to finish.
    pub async fn snapshot(&self, id: Uuid) -> Result<Session, AppError> {
        let handle = self.handle(id)?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    /// Ends a session. Returns whether it existed.
    pub fn remove(&self, id: Uuid) -> bool {
        self.entries().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_snapshot_default_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.create();
        assert_eq!(store.snapshot(id).await.unwrap(), Session::default());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session_not_found() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(matches!(
            store.acquire(Uuid::new_v4()).unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(store.snapshot(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_second_action_while_busy_is_refused() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.create();

        let guard = store.acquire(id).unwrap();
        assert!(matches!(
            store.acquire(id).unwrap_err(),
            AppError::SessionBusy
        ));
        drop(guard);

        assert!(store.acquire(id).is_ok());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.create();
        let b = store.create();

        let mut guard = store.acquire(a).unwrap();
        guard.resume_text = "Jane Doe".into();
        // b is usable while a is held
        let other = store.acquire(b).unwrap();
        assert!(other.resume_text.is_empty());
        drop(guard);

        assert_eq!(store.snapshot(a).await.unwrap().resume_text, "Jane Doe");
    }

    #[tokio::test]
    async fn test_remove_ends_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.create();
        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.acquire(id).is_err());
    }

    #[tokio::test]
    async fn test_idle_sessions_evicted_on_create() {
        let store = SessionStore::new(Duration::ZERO);
        let idle = store.create();
        let _fresh = store.create();
        assert!(store.acquire(idle).is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_busy_session_survives_eviction() {
        let store = SessionStore::new(Duration::ZERO);
        let busy = store.create();
        let _guard = store.acquire(busy).unwrap();
        store.create();
        assert_eq!(store.len(), 2);
    }
}
