//! Shared instance cache with background reclamation
//!
//! [`InstanceCache`] hands out one shared instance per key for as long as
//! somebody holds it. The cache itself keeps only weak references, so an
//! instance is freed as soon as its last [`Arc`] goes away.
//!
//! Dead map entries are removed by a single process-wide reclamation thread.
//! Dropping the last strong reference to a [`Cached`] value queues a notice
//! for that thread, which blocks on its queue and never polls. A notice only
//! removes the entry if it is still dead when processed, so an instance that
//! was recreated in the meantime is left alone.

use std::borrow::Borrow;
use std::boxed::Box;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use std::thread;

type Job = Box<dyn FnOnce() + Send>;

/// Queue of the shared reclamation thread, `None` if it could not be spawned
static RECLAIMER: OnceLock<Option<Mutex<Sender<Job>>>> = OnceLock::new();

fn reclaimer() -> Option<&'static Mutex<Sender<Job>>> {
    RECLAIMER
        .get_or_init(|| {
            let (tx, rx) = channel::<Job>();
            thread::Builder::new()
                .name("bitio-cache-reclaimer".into())
                .spawn(move || {
                    for job in rx {
                        job();
                    }
                })
                .ok()
                .map(|_| Mutex::new(tx))
        })
        .as_ref()
}

/// Queue `job` on the reclamation thread
///
/// Dropped silently when the thread is unavailable; [`InstanceCache::sweep`]
/// still cleans up in that case.
fn reclaim(job: Job) {
    if let Some(queue) = reclaimer() {
        let _ = lock(queue).send(job);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Table<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    entries: Mutex<HashMap<K, Weak<Cached<K, V>>>>,
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Remove `key` if its instance is dead
    fn purge(&self, key: &K) {
        let mut entries = lock(&self.entries);
        if entries.get(key).is_some_and(|weak| weak.strong_count() == 0) {
            entries.remove(key);
        }
    }
}

/// A value shared through an [`InstanceCache`]
///
/// Dereferences to the cached value.
pub struct Cached<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    key: K,
    value: V,
    home: Weak<Table<K, V>>,
}

impl<K, V> Cached<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Key this instance was created for
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K, V> Deref for Cached<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    type Target = V;

    #[inline]
    fn deref(&self) -> &V {
        &self.value
    }
}

impl<K, V> Drop for Cached<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn drop(&mut self) {
        let home = self.home.clone();
        if home.strong_count() == 0 {
            return;
        }
        let key = self.key.clone();
        reclaim(Box::new(move || {
            if let Some(table) = home.upgrade() {
                table.purge(&key);
            }
        }));
    }
}

impl<K, V> fmt::Debug for Cached<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + fmt::Debug + 'static,
    V: Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cached")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

/// Cache of shared instances keyed by configuration
pub struct InstanceCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    table: Arc<Table<K, V>>,
}

impl<K, V> InstanceCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            table: Arc::new(Table {
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Return the live instance for `key`, constructing it with `factory` if
    /// there is none
    ///
    /// Construction happens under the cache lock: concurrent first requests
    /// for the same key call `factory` exactly once.
    pub fn get<F>(&self, key: K, factory: F) -> Arc<Cached<K, V>>
    where
        F: FnOnce(&K) -> V,
    {
        let mut entries = lock(&self.table.entries);
        if let Some(instance) = entries.get(&key).and_then(Weak::upgrade) {
            return instance;
        }
        let value = factory(&key);
        let instance = Arc::new(Cached {
            key: key.clone(),
            value,
            home: Arc::downgrade(&self.table),
        });
        entries.insert(key, Arc::downgrade(&instance));
        instance
    }

    /// Like [`get`](Self::get), for factories that can fail
    ///
    /// Nothing is stored when `factory` fails.
    pub fn try_get<F, E>(&self, key: K, factory: F) -> Result<Arc<Cached<K, V>>, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        let mut entries = lock(&self.table.entries);
        if let Some(instance) = entries.get(&key).and_then(Weak::upgrade) {
            return Ok(instance);
        }
        let value = factory(&key)?;
        let instance = Arc::new(Cached {
            key: key.clone(),
            value,
            home: Arc::downgrade(&self.table),
        });
        entries.insert(key, Arc::downgrade(&instance));
        Ok(instance)
    }

    /// Return the live instance for `key` without constructing one
    pub fn peek<Q>(&self, key: &Q) -> Option<Arc<Cached<K, V>>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        lock(&self.table.entries).get(key).and_then(Weak::upgrade)
    }

    /// Remove every dead entry now, returning how many were removed
    pub fn sweep(&self) -> usize {
        let mut entries = lock(&self.table.entries);
        let before = entries.len();
        entries.retain(|_, weak| weak.strong_count() > 0);
        before - entries.len()
    }

    /// Number of entries, including dead ones not yet reclaimed
    pub fn len(&self) -> usize {
        lock(&self.table.entries).len()
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for InstanceCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for InstanceCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceCache")
            .field("len", &self.len())
            .finish()
    }
}
