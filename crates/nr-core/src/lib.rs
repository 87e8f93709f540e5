pub mod models;
pub mod rules;
pub mod spatial;

pub use models::{
    AntennaConfig, CollectedFeatures, Coordinate, CoordinateError, CyclicPrefixMode,
    FeatureFallback, FeatureKind, FeatureSet, FrequencyBand, OutputPower, SubcarrierSpacing,
    UNKNOWN_LAND_TYPE,
};
pub use rules::{
    classify, classify_with_rules, explain, Classification, ClassificationRules, RuleKind,
};
pub use spatial::{BoundingBox, DEFAULT_SEARCH_RADIUS_KM, EARTH_RADIUS_KM};
