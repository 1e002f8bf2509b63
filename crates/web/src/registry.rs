//! In-process home of workout drafts and running sessions.
//!
//! Each entry is owned by one user and guarded by its own lock, so requests
//! on different workouts never wait on each other. Entries of another user
//! are reported as missing.
//!
//! Entries untouched for longer than the idle timeout are swept on the next
//! insert, and each user holds a bounded number of drafts and of running
//! sessions. Reaching the bound evicts that user's least recently used entry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use storage::models::Identity;
use storage::services::{composer::WorkoutComposer, runner::SessionRunner};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(6 * 60 * 60);
pub const DEFAULT_ENTRIES_PER_USER: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct RegistryLimits {
    pub idle_timeout: Duration,
    pub entries_per_user: usize,
}

impl Default for RegistryLimits {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            entries_per_user: DEFAULT_ENTRIES_PER_USER,
        }
    }
}

struct Entry<T> {
    owner: Uuid,
    last_used: Instant,
    inner: Arc<Mutex<T>>,
}

struct Slots<T> {
    limits: RegistryLimits,
    entries: Mutex<HashMap<Uuid, Entry<T>>>,
}

impl<T> Slots<T> {
    fn new(limits: RegistryLimits) -> Self {
        Self {
            limits,
            entries: Mutex::new(HashMap::new()),
        }
    }

    async fn insert(&self, id: Uuid, owner: Uuid, value: T, now: Instant) -> Arc<Mutex<T>> {
        let mut entries = self.entries.lock().await;

        let before = entries.len();
        let idle_timeout = self.limits.idle_timeout;
        entries.retain(|_, entry| now.saturating_duration_since(entry.last_used) < idle_timeout);
        let swept = before - entries.len();
        if swept > 0 {
            tracing::debug!(swept, "Swept idle workout entries");
        }

        let cap = self.limits.entries_per_user.max(1);
        while entries.values().filter(|entry| entry.owner == owner).count() >= cap {
            let oldest = entries
                .iter()
                .filter(|(_, entry)| entry.owner == owner)
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| *key);
            match oldest {
                Some(key) => {
                    entries.remove(&key);
                    tracing::debug!(%owner, evicted = %key, "Evicted least recently used workout entry");
                }
                None => break,
            }
        }

        let inner = Arc::new(Mutex::new(value));
        entries.insert(
            id,
            Entry {
                owner,
                last_used: now,
                inner: Arc::clone(&inner),
            },
        );
        inner
    }

    async fn get(&self, id: Uuid, owner: Uuid, now: Instant) -> Option<Arc<Mutex<T>>> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get_mut(&id).filter(|entry| entry.owner == owner)?;
        entry.last_used = now;
        Some(Arc::clone(&entry.inner))
    }

    async fn remove(&self, id: Uuid, owner: Uuid) -> Option<Arc<Mutex<T>>> {
        let mut entries = self.entries.lock().await;
        match entries.get(&id) {
            Some(entry) if entry.owner == owner => entries.remove(&id).map(|e| e.inner),
            _ => None,
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[derive(Clone)]
pub struct WorkoutRegistry {
    drafts: Arc<Slots<WorkoutComposer>>,
    active: Arc<Slots<SessionRunner>>,
}

impl Default for WorkoutRegistry {
    fn default() -> Self {
        Self::with_limits(RegistryLimits::default())
    }
}

impl WorkoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: RegistryLimits) -> Self {
        Self {
            drafts: Arc::new(Slots::new(limits)),
            active: Arc::new(Slots::new(limits)),
        }
    }

    /// Registers a new empty draft for `identity` and returns its id.
    pub async fn create_draft(&self, identity: Identity, name: Option<String>) -> (Uuid, Arc<Mutex<WorkoutComposer>>) {
        let draft_id = Uuid::new_v4();
        let owner = identity.user_id;
        let mut composer = WorkoutComposer::new(identity);
        composer.set_name(name);

        let draft = self.drafts.insert(draft_id, owner, composer, Instant::now()).await;
        (draft_id, draft)
    }

    pub async fn draft(&self, draft_id: Uuid, user_id: Uuid) -> Option<Arc<Mutex<WorkoutComposer>>> {
        self.drafts.get(draft_id, user_id, Instant::now()).await
    }

    pub async fn discard_draft(&self, draft_id: Uuid, user_id: Uuid) -> bool {
        self.drafts.remove(draft_id, user_id).await.is_some()
    }

    /// Keyed by the session id of the runner.
    pub async fn activate(&self, runner: SessionRunner) -> Arc<Mutex<SessionRunner>> {
        let session_id = runner.session().session_id;
        let owner = runner.identity().user_id;
        self.active.insert(session_id, owner, runner, Instant::now()).await
    }

    pub async fn active(&self, session_id: Uuid, user_id: Uuid) -> Option<Arc<Mutex<SessionRunner>>> {
        self.active.get(session_id, user_id, Instant::now()).await
    }

    pub async fn release(&self, session_id: Uuid, user_id: Uuid) {
        self.active.remove(session_id, user_id).await;
    }

    #[cfg(test)]
    async fn draft_count(&self) -> usize {
        self.drafts.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "deniz@example.com".to_string(),
            username: "deniz".to_string(),
            full_name: "Deniz Aksoy".to_string(),
        }
    }

    #[tokio::test]
    async fn test_draft_is_visible_to_owner_only() {
        let registry = WorkoutRegistry::new();
        let owner = identity();
        let owner_id = owner.user_id;

        let (draft_id, _) = registry.create_draft(owner, Some("Legs".to_string())).await;

        let draft = registry.draft(draft_id, owner_id).await.unwrap();
        assert_eq!(draft.lock().await.name(), Some("Legs"));
        assert!(registry.draft(draft_id, Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_discard_draft() {
        let registry = WorkoutRegistry::new();
        let owner = identity();
        let owner_id = owner.user_id;
        let (draft_id, _) = registry.create_draft(owner, None).await;

        assert!(!registry.discard_draft(draft_id, Uuid::new_v4()).await);
        assert!(registry.discard_draft(draft_id, owner_id).await);
        assert!(registry.draft(draft_id, owner_id).await.is_none());
    }

    fn limits(idle_secs: u64, entries_per_user: usize) -> RegistryLimits {
        RegistryLimits {
            idle_timeout: Duration::from_secs(idle_secs),
            entries_per_user,
        }
    }

    #[tokio::test]
    async fn test_idle_entries_are_swept_on_insert() {
        let slots = Slots::new(limits(60, 10));
        let owner = Uuid::new_v4();
        let start = Instant::now();
        let stale = Uuid::new_v4();
        let fresh = Uuid::new_v4();

        slots.insert(stale, owner, "stale", start).await;
        slots.insert(fresh, owner, "fresh", start).await;
        // Touching an entry keeps it alive.
        assert!(slots.get(fresh, owner, start + Duration::from_secs(50)).await.is_some());

        slots.insert(Uuid::new_v4(), Uuid::new_v4(), "other", start + Duration::from_secs(90)).await;

        assert!(slots.get(stale, owner, start + Duration::from_secs(90)).await.is_none());
        assert!(slots.get(fresh, owner, start + Duration::from_secs(90)).await.is_some());
        assert_eq!(slots.len().await, 2);
    }

    #[tokio::test]
    async fn test_per_user_cap_evicts_least_recently_used() {
        let slots = Slots::new(limits(3600, 2));
        let owner = Uuid::new_v4();
        let neighbour = Uuid::new_v4();
        let start = Instant::now();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();
        let theirs = Uuid::new_v4();

        slots.insert(theirs, neighbour, 0, start).await;
        slots.insert(first, owner, 1, start + Duration::from_secs(1)).await;
        slots.insert(second, owner, 2, start + Duration::from_secs(2)).await;
        slots.get(first, owner, start + Duration::from_secs(3)).await;
        slots.insert(third, owner, 3, start + Duration::from_secs(4)).await;

        let now = start + Duration::from_secs(5);
        assert!(slots.get(second, owner, now).await.is_none());
        assert!(slots.get(first, owner, now).await.is_some());
        assert!(slots.get(third, owner, now).await.is_some());
        assert!(slots.get(theirs, neighbour, now).await.is_some());
    }

    #[tokio::test]
    async fn test_registry_caps_drafts_per_user() {
        let registry = WorkoutRegistry::with_limits(limits(3600, 3));
        let owner = identity();

        for _ in 0..5 {
            registry.create_draft(owner.clone(), None).await;
        }
        registry.create_draft(identity(), None).await;

        assert_eq!(registry.draft_count().await, 4);
    }
}
