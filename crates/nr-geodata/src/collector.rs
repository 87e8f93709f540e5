//! Concurrent feature collection around a coordinate.
//!
//! The five fetches run as futures joined inside the caller's future, so
//! dropping the caller drops every in-flight request. Each fetch has its own
//! timeout and is turned into a value or a default at a single boundary
//! ([`settle`]); a failure never reaches sibling fetches or the caller.

use crate::client::{GeoDataClient, DEFAULT_ELEVATION_URL, DEFAULT_OVERPASS_URL};
use crate::error::FetchError;
use crate::{parse, queries};
use nr_core::{
    BoundingBox, ClassificationRules, CollectedFeatures, Coordinate, FeatureFallback, FeatureKind,
    FeatureSet, DEFAULT_SEARCH_RADIUS_KM,
};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::Instrument;

/// Peaks in the search radius required before a site counts as mountainous
/// (strictly more than this many).
pub const DEFAULT_MOUNTAIN_PEAK_THRESHOLD: usize = 5;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upstream endpoints and tuning for a [`FeatureCollector`].
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub overpass_url: String,
    pub elevation_url: String,
    /// Radius of both the bounding-box queries and the peak search
    pub search_radius_km: f64,
    pub mountain_peak_threshold: usize,
    /// Upper bound for each outbound call, response body included
    pub request_timeout: Duration,
    pub rules: ClassificationRules,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            elevation_url: DEFAULT_ELEVATION_URL.to_string(),
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            mountain_peak_threshold: DEFAULT_MOUNTAIN_PEAK_THRESHOLD,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            rules: ClassificationRules::default(),
        }
    }
}

impl CollectorSettings {
    pub fn effective_radius_km(&self) -> f64 {
        if self.search_radius_km.is_finite() && self.search_radius_km > 0.0 {
            self.search_radius_km
        } else {
            DEFAULT_SEARCH_RADIUS_KM
        }
    }

    fn overpass_timeout_s(&self) -> u64 {
        self.request_timeout.as_secs().max(1)
    }
}

/// Gathers a [`FeatureSet`] for one coordinate. Holds no per-request state,
/// so a single instance can be shared across requests.
#[derive(Debug, Clone)]
pub struct FeatureCollector {
    client: GeoDataClient,
    settings: CollectorSettings,
}

impl FeatureCollector {
    pub fn new(settings: CollectorSettings) -> Self {
        let client = GeoDataClient::new(
            settings.overpass_url.clone(),
            settings.elevation_url.clone(),
        );
        Self { client, settings }
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    /// Fetch all five features concurrently and wait for every one of them.
    pub async fn collect(&self, point: Coordinate) -> CollectedFeatures {
        let radius_km = self.settings.effective_radius_km();
        let raw_bbox = BoundingBox::around(point, radius_km);
        if !raw_bbox.is_within_world() {
            tracing::debug!("Search window around {} fitted to world bounds", point);
        }
        let bbox = raw_bbox.clamp_to_world();

        let (road_speed, buildings, land, mountains, elevation) = tokio::join!(
            self.bounded(FeatureKind::RoadSpeed, self.fetch_road_speed(&bbox)),
            self.bounded(FeatureKind::BuildingDensity, self.fetch_building_density(&bbox)),
            self.bounded(FeatureKind::LandType, self.fetch_land_type(point)),
            self.bounded(FeatureKind::Mountains, self.fetch_mountains(point, radius_km)),
            self.bounded(FeatureKind::Elevation, self.fetch_elevation(point)),
        );

        let defaults = FeatureSet::default();
        let mut fallbacks = Vec::new();
        let features = FeatureSet {
            avg_road_speed: settle(
                FeatureKind::RoadSpeed,
                road_speed,
                defaults.avg_road_speed,
                &mut fallbacks,
            ),
            building_density: settle(
                FeatureKind::BuildingDensity,
                buildings,
                defaults.building_density,
                &mut fallbacks,
            ),
            land_type: settle(FeatureKind::LandType, land, defaults.land_type, &mut fallbacks),
            mountains_nearby: settle(
                FeatureKind::Mountains,
                mountains,
                defaults.mountains_nearby,
                &mut fallbacks,
            ),
            elevation_m: settle(
                FeatureKind::Elevation,
                elevation,
                defaults.elevation_m,
                &mut fallbacks,
            ),
        };

        if !fallbacks.is_empty() {
            tracing::info!(
                "Collected features for {} with {}/{} defaults",
                point,
                fallbacks.len(),
                FeatureKind::ALL.len()
            );
        }

        CollectedFeatures {
            features,
            fallbacks,
        }
    }

    /// Like [`FeatureCollector::collect`], but gives up as soon as `cancel`
    /// completes. In-flight requests are dropped and `None` is returned.
    pub async fn collect_until<C>(&self, point: Coordinate, cancel: C) -> Option<CollectedFeatures>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                tracing::debug!("Feature collection for {} cancelled", point);
                None
            }
            collected = self.collect(point) => Some(collected),
        }
    }

    async fn bounded<T, F>(&self, feature: FeatureKind, fetch: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let limit = self.settings.request_timeout;
        let span = tracing::debug_span!("feature", feature = feature.as_str());
        async move {
            match timeout(limit, fetch).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(limit)),
            }
        }
        .instrument(span)
        .await
    }

    async fn fetch_road_speed(&self, bbox: &BoundingBox) -> Result<f64, FetchError> {
        let query = queries::road_speed_query(bbox, self.settings.overpass_timeout_s());
        let response = self.client.query_spatial_features(&query).await?;
        parse::average_road_speed(&response)
    }

    async fn fetch_building_density(&self, bbox: &BoundingBox) -> Result<u64, FetchError> {
        let query = queries::building_count_query(bbox, self.settings.overpass_timeout_s());
        let response = self.client.query_spatial_features(&query).await?;
        parse::building_count(&response)
    }

    async fn fetch_land_type(&self, point: Coordinate) -> Result<String, FetchError> {
        let query = queries::land_use_query(point, self.settings.overpass_timeout_s());
        let response = self.client.query_spatial_features(&query).await?;
        parse::land_type(&response)
    }

    async fn fetch_mountains(&self, point: Coordinate, radius_km: f64) -> Result<bool, FetchError> {
        let query = queries::peak_query(point, radius_km, self.settings.overpass_timeout_s());
        let response = self.client.query_spatial_features(&query).await?;
        let peaks = parse::peak_count(&response)?;
        Ok(peaks > self.settings.mountain_peak_threshold)
    }

    async fn fetch_elevation(&self, point: Coordinate) -> Result<f64, FetchError> {
        let response = self.client.lookup_elevation(point).await?;
        parse::elevation(&response)
    }
}

/// Resolve one fetch into its value, or its default plus a fallback record.
fn settle<T: std::fmt::Debug>(
    feature: FeatureKind,
    result: Result<T, FetchError>,
    default: T,
    fallbacks: &mut Vec<FeatureFallback>,
) -> T {
    match result {
        Ok(value) => {
            tracing::debug!(feature = feature.as_str(), "Feature resolved: {:?}", value);
            value
        }
        Err(err) => {
            tracing::warn!(
                feature = feature.as_str(),
                "Feature fetch failed, using default: {}",
                err
            );
            fallbacks.push(FeatureFallback {
                feature,
                reason: err.to_string(),
            });
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_radius_falls_back_to_default() {
        let mut settings = CollectorSettings::default();
        settings.search_radius_km = 0.0;
        assert_eq!(settings.effective_radius_km(), DEFAULT_SEARCH_RADIUS_KM);
        settings.search_radius_km = f64::NAN;
        assert_eq!(settings.effective_radius_km(), DEFAULT_SEARCH_RADIUS_KM);
        settings.search_radius_km = 5.0;
        assert_eq!(settings.effective_radius_km(), 5.0);
    }

    #[test]
    fn overpass_timeout_is_at_least_one_second() {
        let mut settings = CollectorSettings::default();
        settings.request_timeout = Duration::from_millis(200);
        assert_eq!(settings.overpass_timeout_s(), 1);
        settings.request_timeout = Duration::from_secs(25);
        assert_eq!(settings.overpass_timeout_s(), 25);
    }

    #[test]
    fn settle_records_fallbacks_only_on_failure() {
        let mut fallbacks = Vec::new();
        let ok = settle(FeatureKind::Elevation, Ok(35.0), 0.0, &mut fallbacks);
        assert_eq!(ok, 35.0);
        assert!(fallbacks.is_empty());

        let failed = settle(
            FeatureKind::BuildingDensity,
            Err(FetchError::Status(503)),
            0u64,
            &mut fallbacks,
        );
        assert_eq!(failed, 0);
        assert_eq!(fallbacks.len(), 1);
        assert_eq!(fallbacks[0].feature, FeatureKind::BuildingDensity);
        assert_eq!(fallbacks[0].reason, "upstream HTTP 503");
    }

    #[tokio::test]
    async fn collect_until_returns_none_when_cancelled_first() {
        // Unroutable TEST-NET address: requests hang until cancelled.
        let mut settings = CollectorSettings::default();
        settings.overpass_url = "http://192.0.2.1/api/interpreter".to_string();
        settings.elevation_url = "http://192.0.2.1/api/v1/lookup".to_string();
        let collector = FeatureCollector::new(settings);
        let point = Coordinate::new(10.0, 10.0).unwrap();

        let result = collector.collect_until(point, std::future::ready(())).await;
        assert!(result.is_none());
    }
}
