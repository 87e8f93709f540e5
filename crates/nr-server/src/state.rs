//! Shared handler dependencies.

use crate::cache::FeatureCache;
use crate::config::Config;
use nr_core::Coordinate;
use nr_geodata::{classify_collected, ConfigurationReport, FeatureCollector};

/// Handler dependencies. Holds no per-request engine state; the cache is
/// disabled unless configured.
#[derive(Debug)]
pub struct AppState {
    collector: FeatureCollector,
    cache: FeatureCache,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let cache = if config.cache_ttl_s > 0 {
            FeatureCache::new(config.cache_ttl(), config.cache_max_entries)
        } else {
            FeatureCache::disabled()
        };
        Self::with_parts(FeatureCollector::new(config.collector_settings()), cache)
    }

    pub fn with_parts(collector: FeatureCollector, cache: FeatureCache) -> Self {
        Self { collector, cache }
    }

    /// Collect (or reuse cached) features for a point and classify them.
    pub async fn configuration_for(&self, point: Coordinate) -> ConfigurationReport {
        let settings = self.collector.settings();
        let radius_km = settings.effective_radius_km();
        let collected = match self.cache.get(point, radius_km) {
            Some(cached) => {
                tracing::debug!("Feature cache hit for {}", point);
                cached
            }
            None => {
                let collected = self.collector.collect(point).await;
                self.cache.insert(point, radius_km, &collected);
                collected
            }
        };
        classify_collected(point, collected, &settings.rules)
    }
}
