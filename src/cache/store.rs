//! In-memory query cache for note list pages.
//!
//! Entries are replaced whole; invalidation marks every entry of a resource
//! kind stale instead of removing it, so readers can still peek at old data.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use metrics::counter;
use notehub_api_types::NotesPage;
use time::OffsetDateTime;
use tracing::debug;

use super::config::CacheConfig;
use super::keys::{QueryKey, ResourceKind};
use super::lock::{rw_read, rw_write};
use super::snapshot::{DehydratedQuery, DehydratedState};

const SOURCE: &str = "cache::store";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub data: NotesPage,
    pub updated_at: OffsetDateTime,
    pub stale: bool,
}

/// Entries and per-kind invalidation marks live under one lock so a write can
/// never slip between the staleness check and the store.
struct CacheState {
    entries: LruCache<QueryKey, CacheEntry>,
    invalidated_at: HashMap<ResourceKind, OffsetDateTime>,
}

impl CacheState {
    /// Data read at `read_at` predates the last invalidation of `kind`.
    fn predates_invalidation(&self, kind: ResourceKind, read_at: OffsetDateTime) -> bool {
        self.invalidated_at
            .get(&kind)
            .is_some_and(|invalidated_at| read_at < *invalidated_at)
    }

    fn store(&mut self, key: QueryKey, entry: CacheEntry) -> Option<QueryKey> {
        let kind = key.kind.as_str();
        let evicted = self
            .entries
            .push(key.clone(), entry)
            .map(|(evicted_key, _)| evicted_key)
            .filter(|evicted_key| *evicted_key != key);

        if evicted.is_some() {
            counter!("notehub_query_cache_evict_total", "kind" => kind).increment(1);
        }
        evicted
    }
}

pub struct QueryCache {
    state: RwLock<CacheState>,
    invalidations: AtomicU64,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: LruCache::new(config.max_entries_non_zero()),
                invalidated_at: HashMap::new(),
            }),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Store a page read just now, replacing any previous entry for the key.
    ///
    /// Returns the key evicted to make room, if any.
    pub fn insert(&self, key: QueryKey, data: NotesPage) -> Option<QueryKey> {
        self.insert_fetched(key, data, OffsetDateTime::now_utc())
    }

    /// Store a page whose fetch started at `fetched_at`.
    ///
    /// A fetch that started before the last invalidation of its kind may have
    /// read pre-mutation data, so the entry is stored stale.
    pub fn insert_fetched(
        &self,
        key: QueryKey,
        data: NotesPage,
        fetched_at: OffsetDateTime,
    ) -> Option<QueryKey> {
        let mut state = rw_write(&self.state, SOURCE, "insert");
        let stale = state.predates_invalidation(key.kind, fetched_at);
        if stale {
            debug!(
                target = SOURCE,
                kind = key.kind.as_str(),
                "fetch started before invalidation; storing stale"
            );
        }
        state.store(
            key,
            CacheEntry {
                data,
                updated_at: fetched_at,
                stale,
            },
        )
    }

    /// Data for `key` if cached and not stale.
    pub fn get_fresh(&self, key: &QueryKey) -> Option<NotesPage> {
        let kind = key.kind.as_str();
        let data = rw_write(&self.state, SOURCE, "get_fresh")
            .entries
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.data.clone());

        match data {
            Some(_) => counter!("notehub_query_cache_hit_total", "kind" => kind).increment(1),
            None => counter!("notehub_query_cache_miss_total", "kind" => kind).increment(1),
        }
        data
    }

    /// Entry for `key` regardless of staleness; does not touch LRU order.
    pub fn peek(&self, key: &QueryKey) -> Option<CacheEntry> {
        rw_read(&self.state, SOURCE, "peek")
            .entries
            .peek(key)
            .cloned()
    }

    /// Mark every entry of `kind` stale. Returns how many entries were marked.
    ///
    /// The time is recorded so that reads started earlier land stale.
    pub fn invalidate(&self, kind: ResourceKind) -> usize {
        let mut state = rw_write(&self.state, SOURCE, "invalidate");
        state.invalidated_at.insert(kind, OffsetDateTime::now_utc());
        let mut marked = 0;
        for (key, entry) in state.entries.iter_mut() {
            if key.kind == kind {
                entry.stale = true;
                marked += 1;
            }
        }
        drop(state);

        self.invalidations.fetch_add(1, Ordering::Relaxed);
        counter!("notehub_query_cache_invalidate_total", "kind" => kind.as_str()).increment(1);
        debug!(
            target = SOURCE,
            kind = kind.as_str(),
            marked,
            "marked cached queries stale"
        );
        marked
    }

    /// Number of invalidation broadcasts issued against this cache.
    pub fn invalidation_count(&self) -> u64 {
        self.invalidations.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        rw_read(&self.state, SOURCE, "len").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every fresh entry.
    pub fn dehydrate(&self) -> DehydratedState {
        let state = rw_read(&self.state, SOURCE, "dehydrate");
        let queries = state
            .entries
            .iter()
            .filter(|(_, entry)| !entry.stale)
            .map(|(key, entry)| DehydratedQuery {
                key: key.clone(),
                data: entry.data.clone(),
                updated_at: entry.updated_at,
            })
            .collect();
        DehydratedState { queries }
    }

    /// Load a snapshot under a single write lock.
    ///
    /// Existing entries newer than an incoming query are kept, and queries
    /// read before the last invalidation of their kind are refused.
    /// Returns how many queries were accepted.
    pub fn hydrate(&self, snapshot: &DehydratedState) -> usize {
        let mut state = rw_write(&self.state, SOURCE, "hydrate");
        let mut accepted = 0;
        for query in &snapshot.queries {
            if state.predates_invalidation(query.key.kind, query.updated_at) {
                continue;
            }
            let newer_exists = state
                .entries
                .peek(&query.key)
                .is_some_and(|existing| existing.updated_at > query.updated_at);
            if newer_exists {
                continue;
            }

            state.store(
                query.key.clone(),
                CacheEntry {
                    data: query.data.clone(),
                    updated_at: query.updated_at,
                    stale: false,
                },
            );
            accepted += 1;
        }
        accepted
    }
}
