//! Geo-feature aggregation for NR site configuration.
//!
//! Queries an Overpass instance and an elevation service around a point,
//! turns their answers into a [`nr_core::FeatureSet`] and classifies it.

pub mod client;
pub mod collector;
pub mod error;
pub mod parse;
pub mod queries;
pub mod report;

pub use client::{GeoDataClient, DEFAULT_ELEVATION_URL, DEFAULT_OVERPASS_URL};
pub use collector::{
    CollectorSettings, FeatureCollector, DEFAULT_MOUNTAIN_PEAK_THRESHOLD, DEFAULT_REQUEST_TIMEOUT,
};
pub use error::FetchError;
pub use report::{classify_collected, compute_configuration, ConfigurationReport};
