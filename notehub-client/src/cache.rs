//! Keyed query cache.
//!
//! Reads of the same key share a single in-flight request. Successful mutations mark the keys
//! they affect as stale (see [`Mutation::invalidates`]) and the next read of such a key goes to
//! the backend again. Keys match by prefix, so invalidating `["note", 7]` also covers
//! `["note", 7, "plans"]`.

use crate::error::ApiError;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use notehub_common::domain::{NoteId, UserId};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Name(&'static str),
    Id(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    pub fn notes() -> Self {
        Self(vec![KeyPart::Name("notes")])
    }

    pub fn note(id: NoteId) -> Self {
        Self(vec![KeyPart::Name("note"), KeyPart::Id(id)])
    }

    pub fn note_plans(id: NoteId) -> Self {
        Self(vec![
            KeyPart::Name("note"),
            KeyPart::Id(id),
            KeyPart::Name("plans"),
        ])
    }

    pub fn current_user() -> Self {
        Self(vec![KeyPart::Name("users"), KeyPart::Name("me")])
    }

    /// Prefix of every admin query.
    pub fn admin() -> Self {
        Self(vec![KeyPart::Name("admin")])
    }

    pub fn admin_users() -> Self {
        Self(vec![KeyPart::Name("admin"), KeyPart::Name("users")])
    }

    pub fn admin_notes() -> Self {
        Self(vec![KeyPart::Name("admin"), KeyPart::Name("notes")])
    }

    pub fn admin_user_notes(id: UserId) -> Self {
        Self(vec![
            KeyPart::Name("admin"),
            KeyPart::Name("user"),
            KeyPart::Id(id),
            KeyPart::Name("notes"),
        ])
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|x| match x {
                KeyPart::Name(v) => format!("{v:?}"),
                KeyPart::Id(v) => v.to_string(),
            })
            .collect::<Vec<_>>();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Every write the client can make. Adding a variant forces a decision about which queries it
/// makes outdated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreateNote,
    UpdateNote(NoteId),
    DeleteNote(NoteId),
    CreatePlan(NoteId),
    UpdatePlan(NoteId),
    DeletePlan(NoteId),
}

impl Mutation {
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match *self {
            Self::CreateNote => vec![QueryKey::notes(), QueryKey::admin()],
            Self::UpdateNote(id)
            | Self::DeleteNote(id)
            | Self::CreatePlan(id)
            | Self::UpdatePlan(id)
            | Self::DeletePlan(id) => {
                vec![QueryKey::note(id), QueryKey::notes(), QueryKey::admin()]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error(String),
}

type Value = Arc<dyn Any + Send + Sync>;
type Fetch = Shared<BoxFuture<'static, Result<Value, ApiError>>>;

struct Entry {
    value: Option<Value>,
    status: QueryStatus,
    stale: bool,
    in_flight: Option<(u64, Fetch)>,
}

impl Entry {
    fn new() -> Self {
        Self {
            value: None,
            status: QueryStatus::Idle,
            stale: true,
            in_flight: None,
        }
    }
}

#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
    fetch_ids: Arc<AtomicU64>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key` when it is fresh. Otherwise joins the request already
    /// in flight for it, or starts one with `fetcher`.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (id, fetch) = {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);

            if !entry.stale {
                if let Some(value) = &entry.value {
                    return downcast(value);
                }
            }

            match &entry.in_flight {
                Some((id, fetch)) => (*id, fetch.clone()),
                None => {
                    let id = self.fetch_ids.fetch_add(1, Ordering::Relaxed);
                    let fut = fetcher();
                    let fetch = async move { fut.await.map(|x| Arc::new(x) as Value) }
                        .boxed()
                        .shared();

                    debug!(%key, "fetching");
                    entry.in_flight = Some((id, fetch.clone()));
                    entry.status = QueryStatus::Loading;
                    entry.stale = false;
                    (id, fetch)
                }
            }
        };

        let result = fetch.await;
        self.settle(&key, id, &result);
        result.and_then(|x| downcast(&x))
    }

    /// Stores the outcome of fetch `id`, unless the entry was dropped or a newer fetch took
    /// over in the meantime.
    fn settle(&self, key: &QueryKey, id: u64, result: &Result<Value, ApiError>) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };

        if !matches!(&entry.in_flight, Some((current, _)) if *current == id) {
            return;
        }

        entry.in_flight = None;
        match result {
            Ok(value) => {
                entry.value = Some(value.clone());
                entry.status = QueryStatus::Success;
            }
            Err(e) => {
                // Keep the last good value around but make the next read try again.
                entry.status = QueryStatus::Error(e.to_string());
                entry.stale = true;
            }
        }
    }

    /// Marks every key starting with `prefix` as stale. Returns how many entries were hit.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.lock();
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                // Readers from here on must not join a request sent before the change.
                if entry.in_flight.take().is_some() {
                    entry.status = match entry.value {
                        Some(_) => QueryStatus::Success,
                        None => QueryStatus::Idle,
                    };
                }
                count += 1;
            }
        }
        debug!(%prefix, count, "invalidated");
        count
    }

    pub fn apply(&self, mutation: Mutation) -> usize {
        mutation
            .invalidates()
            .iter()
            .map(|x| self.invalidate(x))
            .sum()
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        self.lock()
            .get(key)
            .map_or(QueryStatus::Idle, |x| x.status.clone())
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.lock().get(key).map_or(true, |x| x.stale)
    }

    /// Last value fetched for `key`, fresh or not.
    pub fn peek<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.lock()
            .get(key)
            .and_then(|x| x.value.as_ref())
            .and_then(|x| downcast(x).ok())
    }

    pub fn remove(&self, key: &QueryKey) {
        self.lock().remove(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn downcast<T: Clone + 'static>(value: &Value) -> Result<T, ApiError> {
    value.downcast_ref::<T>().cloned().ok_or_else(|| {
        ApiError::Decode(format!(
            "cached value is not a {}",
            std::any::type_name::<T>()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn counting(
        calls: &Arc<AtomicUsize>,
        value: u32,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<u32, ApiError>> {
        let calls = calls.clone();
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_request() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.fetch(QueryKey::notes(), counting(&calls, 1)),
            cache.fetch(QueryKey::notes(), counting(&calls, 2)),
        );

        assert_eq!(a, Ok(1));
        assert_eq!(b, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.status(&QueryKey::notes()), QueryStatus::Success);
    }

    #[tokio::test]
    async fn fresh_value_is_served_until_invalidated() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.fetch(QueryKey::note(7), counting(&calls, 1)).await.unwrap();
        let cached = cache.fetch(QueryKey::note(7), counting(&calls, 2)).await;
        assert_eq!(cached, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(cache.apply(Mutation::UpdatePlan(7)), 1);
        let refetched = cache.fetch(QueryKey::note(7), counting(&calls, 2)).await;
        assert_eq!(refetched, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_matches_by_prefix() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.fetch(QueryKey::note(7), counting(&calls, 1)).await.unwrap();
        cache.fetch(QueryKey::note_plans(7), counting(&calls, 1)).await.unwrap();
        cache.fetch(QueryKey::note(8), counting(&calls, 1)).await.unwrap();

        assert_eq!(cache.invalidate(&QueryKey::note(7)), 2);
        assert!(cache.is_stale(&QueryKey::note_plans(7)));
        assert!(!cache.is_stale(&QueryKey::note(8)));
    }

    #[tokio::test]
    async fn invalidation_during_flight_forces_refetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (first, _) = tokio::join!(cache.fetch(QueryKey::notes(), counting(&calls, 1)), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            cache.apply(Mutation::CreateNote);
        });
        assert_eq!(first, Ok(1));
        assert!(cache.is_stale(&QueryKey::notes()));

        let second = cache.fetch(QueryKey::notes(), counting(&calls, 2)).await;
        assert_eq!(second, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn read_after_invalidation_skips_pending_request() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (first, second) = tokio::join!(
            cache.fetch(QueryKey::notes(), counting(&calls, 1)),
            async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                cache.apply(Mutation::CreateNote);
                cache
                    .fetch(QueryKey::notes(), || async { Ok::<u32, ApiError>(2) })
                    .await
            }
        );

        assert_eq!(first, Ok(1));
        assert_eq!(second, Ok(2));
        // The older request finished last but must not overwrite the newer value.
        assert_eq!(cache.peek::<u32>(&QueryKey::notes()), Some(2));
        assert!(!cache.is_stale(&QueryKey::notes()));
        assert_eq!(cache.status(&QueryKey::notes()), QueryStatus::Success);
    }

    #[tokio::test]
    async fn failure_keeps_value_and_retries_next_read() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache.fetch(QueryKey::notes(), counting(&calls, 1)).await.unwrap();
        cache.invalidate(&QueryKey::notes());

        let failed = cache
            .fetch(QueryKey::notes(), || async {
                Err::<u32, _>(ApiError::Transport("connection refused".into()))
            })
            .await;
        assert_eq!(failed, Err(ApiError::Transport("connection refused".into())));
        assert_eq!(
            cache.status(&QueryKey::notes()),
            QueryStatus::Error("connection refused".into())
        );
        assert_eq!(cache.peek::<u32>(&QueryKey::notes()), Some(1));

        let retried = cache.fetch(QueryKey::notes(), counting(&calls, 3)).await;
        assert_eq!(retried, Ok(3));
    }

    #[tokio::test]
    async fn wrong_type_is_a_decode_error() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        cache.fetch(QueryKey::notes(), counting(&calls, 1)).await.unwrap();

        let res = cache
            .fetch(QueryKey::notes(), || async { Ok(String::from("nope")) })
            .await;
        assert!(matches!(res, Err(ApiError::Decode(_))));
    }

    #[test]
    fn unknown_key_is_idle() {
        let cache = QueryCache::new();
        assert_eq!(cache.status(&QueryKey::admin_users()), QueryStatus::Idle);
        assert!(cache.is_stale(&QueryKey::admin_users()));
    }

    #[test]
    fn key_display() {
        assert_eq!(QueryKey::admin_user_notes(3).to_string(), r#"["admin", "user", 3, "notes"]"#);
    }

    #[quickcheck]
    fn plan_mutations_only_touch_their_note(note: i64, other: i64) -> TestResult {
        if note == other {
            return TestResult::discard();
        }

        let keys = Mutation::UpdatePlan(note).invalidates();
        let hits = |key: &QueryKey| keys.iter().any(|x| key.starts_with(x));

        TestResult::from_bool(
            hits(&QueryKey::note(note))
                && hits(&QueryKey::note_plans(note))
                && hits(&QueryKey::notes())
                && !hits(&QueryKey::note(other))
                && !hits(&QueryKey::current_user()),
        )
    }
}
