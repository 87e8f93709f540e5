//! Short-lived in-memory cache of collected features.
//!
//! Keyed by the coordinate rounded to 4 decimals (about 11 m) and the search
//! radius. Only complete collections are stored so a transient upstream
//! failure is retried on the next request.

use dashmap::DashMap;
use nr_core::{CollectedFeatures, Coordinate};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: Instant,
    collected: CollectedFeatures,
}

#[derive(Debug)]
pub struct FeatureCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
}

impl FeatureCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, 1)
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, point: Coordinate, radius_km: f64) -> Option<CollectedFeatures> {
        if !self.is_enabled() {
            return None;
        }
        let key = cache_key(point, radius_km);
        let entry = self.entries.get(&key)?;
        if entry.fetched_at.elapsed() <= self.ttl {
            return Some(entry.collected.clone());
        }
        drop(entry);
        self.evict_if_expired(&key);
        None
    }

    /// Remove `key` only if its entry is still expired, so an entry refreshed
    /// by a concurrent insert survives.
    fn evict_if_expired(&self, key: &str) {
        self.entries
            .remove_if(key, |_, entry| entry.fetched_at.elapsed() > self.ttl);
    }

    pub fn insert(&self, point: Coordinate, radius_km: f64, collected: &CollectedFeatures) {
        if !self.is_enabled() || !collected.is_complete() {
            return;
        }
        self.entries.insert(
            cache_key(point, radius_km),
            CacheEntry {
                fetched_at: Instant::now(),
                collected: collected.clone(),
            },
        );
        self.prune();
    }

    /// Drop expired entries, then the oldest ones until under the cap.
    fn prune(&self) {
        self.entries
            .retain(|_, entry| entry.fetched_at.elapsed() <= self.ttl);
        if self.entries.len() <= self.max_entries {
            return;
        }

        let mut by_age: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().fetched_at))
            .collect();
        by_age.sort_by_key(|(_, fetched_at)| *fetched_at);
        for (key, _) in by_age {
            if self.entries.len() <= self.max_entries {
                break;
            }
            self.entries.remove(&key);
        }
    }
}

fn cache_key(point: Coordinate, radius_km: f64) -> String {
    format!(
        "{:.4}:{:.4}:{:.3}",
        point.latitude(),
        point.longitude(),
        radius_km
    )
}
