//! Server configuration from environment.

use nr_core::{ClassificationRules, DEFAULT_SEARCH_RADIUS_KM};
use nr_geodata::{
    CollectorSettings, DEFAULT_ELEVATION_URL, DEFAULT_MOUNTAIN_PEAK_THRESHOLD, DEFAULT_OVERPASS_URL,
};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub server_port: u16,
    pub overpass_url: String,
    pub elevation_url: String,
    pub search_radius_km: f64,
    pub mountain_peak_threshold: usize,
    pub request_timeout_s: u64,
    pub high_speed_kmh: f64,
    pub dense_building_count: u64,
    pub urban_building_count: u64,
    /// 0 disables the feature cache
    pub cache_ttl_s: u64,
    pub cache_max_entries: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or unparsable values fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let rules = ClassificationRules::default();

        Self {
            host: lookup("NR_HOST")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parsed(&lookup, "NR_PORT").unwrap_or(8080),
            overpass_url: lookup("NR_OVERPASS_URL")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_string()),
            elevation_url: lookup("NR_ELEVATION_URL")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ELEVATION_URL.to_string()),
            search_radius_km: parsed(&lookup, "NR_SEARCH_RADIUS_KM")
                .filter(|radius: &f64| radius.is_finite() && *radius > 0.0)
                .unwrap_or(DEFAULT_SEARCH_RADIUS_KM),
            mountain_peak_threshold: parsed(&lookup, "NR_MOUNTAIN_PEAK_THRESHOLD")
                .unwrap_or(DEFAULT_MOUNTAIN_PEAK_THRESHOLD),
            request_timeout_s: parsed(&lookup, "NR_REQUEST_TIMEOUT_S").unwrap_or(10u64).max(1),
            high_speed_kmh: parsed(&lookup, "NR_HIGH_SPEED_KMH")
                .filter(|speed: &f64| speed.is_finite())
                .unwrap_or(rules.high_speed_kmh),
            dense_building_count: parsed(&lookup, "NR_DENSE_BUILDING_COUNT")
                .unwrap_or(rules.dense_building_count),
            urban_building_count: parsed(&lookup, "NR_URBAN_BUILDING_COUNT")
                .unwrap_or(rules.urban_building_count),
            cache_ttl_s: parsed(&lookup, "NR_CACHE_TTL_S").unwrap_or(0),
            cache_max_entries: parsed(&lookup, "NR_CACHE_MAX_ENTRIES").unwrap_or(256),
        }
    }

    pub fn rules(&self) -> ClassificationRules {
        ClassificationRules {
            high_speed_kmh: self.high_speed_kmh,
            dense_building_count: self.dense_building_count,
            urban_building_count: self.urban_building_count,
        }
    }

    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            overpass_url: self.overpass_url.clone(),
            elevation_url: self.elevation_url.clone(),
            search_radius_km: self.search_radius_km,
            mountain_peak_threshold: self.mountain_peak_threshold,
            request_timeout: Duration::from_secs(self.request_timeout_s),
            rules: self.rules(),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_s)
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_with(&[]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.overpass_url, DEFAULT_OVERPASS_URL);
        assert_eq!(config.elevation_url, DEFAULT_ELEVATION_URL);
        assert_eq!(config.search_radius_km, 2.0);
        assert_eq!(config.mountain_peak_threshold, 5);
        assert_eq!(config.request_timeout_s, 10);
        assert_eq!(config.rules(), ClassificationRules::default());
        assert_eq!(config.cache_ttl_s, 0);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_with(&[
            ("NR_PORT", "9000"),
            ("NR_SEARCH_RADIUS_KM", "5"),
            ("NR_MOUNTAIN_PEAK_THRESHOLD", "0"),
            ("NR_REQUEST_TIMEOUT_S", " 3 "),
            ("NR_DENSE_BUILDING_COUNT", "800"),
            ("NR_CACHE_TTL_S", "300"),
        ]);
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.search_radius_km, 5.0);
        assert_eq!(config.mountain_peak_threshold, 0);
        assert_eq!(config.dense_building_count, 800);

        let settings = config.collector_settings();
        assert_eq!(settings.request_timeout, Duration::from_secs(3));
        assert_eq!(settings.search_radius_km, 5.0);
        assert_eq!(settings.rules.dense_building_count, 800);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_with(&[
            ("NR_PORT", "http"),
            ("NR_SEARCH_RADIUS_KM", "-1"),
            ("NR_REQUEST_TIMEOUT_S", "0"),
            ("NR_OVERPASS_URL", "  "),
        ]);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.search_radius_km, 2.0);
        assert_eq!(config.request_timeout_s, 1);
        assert_eq!(config.overpass_url, DEFAULT_OVERPASS_URL);
    }
}
