//! Memoised elevation lookups.
//!
//! A whole request is cached under one hashed key built from the exact
//! coordinate bits of every point.  Entries are evicted oldest-first once
//! the capacity is reached.  A capacity of 0 disables caching.

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::{FxHashMap, FxHasher};
use sw_core::{GeoPoint, SewerResult};
use tokio::sync::Mutex;
use tracing::trace;

use crate::services::ElevationService;

/// Hash of the exact coordinates of a request.
pub fn request_key(points: &[GeoPoint]) -> u64 {
    let mut h = FxHasher::default();
    points.len().hash(&mut h);
    for p in points {
        p.lat.to_bits().hash(&mut h);
        p.lon.to_bits().hash(&mut h);
    }
    h.finish()
}

struct CacheEntry {
    points:     Vec<GeoPoint>,
    elevations: Vec<Option<f64>>,
}

/// Capacity-capped FIFO map from request key to elevations.
pub struct ElevationCache {
    capacity: usize,
    entries:  FxHashMap<u64, CacheEntry>,
    order:    VecDeque<u64>,
}

impl ElevationCache {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: FxHashMap::default(), order: VecDeque::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached elevations for exactly `points`.  A key collision with
    /// different coordinates is a miss.
    pub fn get(&self, key: u64, points: &[GeoPoint]) -> Option<Vec<Option<f64>>> {
        self.entries
            .get(&key)
            .filter(|e| e.points == points)
            .map(|e| e.elevations.clone())
    }

    pub fn insert(&mut self, key: u64, points: &[GeoPoint], elevations: Vec<Option<f64>>) {
        if self.capacity == 0 {
            return;
        }
        let entry = CacheEntry { points: points.to_vec(), elevations };
        if self.entries.insert(key, entry).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(old) = self.order.pop_front() {
                self.entries.remove(&old);
            }
        }
    }
}

/// An [`ElevationService`] that answers repeated requests from an
/// [`ElevationCache`].
pub struct CachedElevation<E> {
    inner:  E,
    cache:  Mutex<ElevationCache>,
    hits:   AtomicU64,
    misses: AtomicU64,
}

impl<E> CachedElevation<E> {
    pub fn new(inner: E, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(ElevationCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl<E: ElevationService> ElevationService for CachedElevation<E> {
    async fn elevations(&self, points: &[GeoPoint]) -> SewerResult<Vec<Option<f64>>> {
        let key = request_key(points);
        let cached = self.cache.lock().await.get(key, points);
        if let Some(hit) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key, points = points.len(), "elevation cache hit");
            return Ok(hit);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let fetched = self.inner.elevations(points).await?;
        // Malformed answers are rejected downstream; never memoise them.
        if fetched.len() == points.len() {
            self.cache.lock().await.insert(key, points, fetched.clone());
        }
        Ok(fetched)
    }
}
