//! End-to-end configuration computation for one coordinate.

use crate::collector::FeatureCollector;
use chrono::{DateTime, Utc};
use nr_core::{
    explain, AntennaConfig, ClassificationRules, CollectedFeatures, Coordinate, FeatureFallback,
    FeatureSet, RuleKind,
};
use serde::Serialize;

/// Everything an outer surface needs to render a recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationReport {
    pub coordinate: Coordinate,
    pub features: FeatureSet,
    /// Features that hold their default because the fetch failed
    pub fallbacks: Vec<FeatureFallback>,
    pub matched_rule: RuleKind,
    pub priority: u8,
    pub configuration: AntennaConfig,
    pub generated_at: DateTime<Utc>,
}

impl ConfigurationReport {
    /// Classify already collected features.
    pub fn from_collected(
        coordinate: Coordinate,
        collected: CollectedFeatures,
        rules: &ClassificationRules,
    ) -> Self {
        let classification = explain(&collected.features, rules);
        Self {
            coordinate,
            features: collected.features,
            fallbacks: collected.fallbacks,
            matched_rule: classification.rule,
            priority: classification.rule.priority(),
            configuration: classification.config,
            generated_at: Utc::now(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

/// Collect features around `coordinate` and classify them. Never fails:
/// upstream problems surface as fallbacks in the report.
pub async fn compute_configuration(
    collector: &FeatureCollector,
    coordinate: Coordinate,
) -> ConfigurationReport {
    let collected = collector.collect(coordinate).await;
    classify_collected(coordinate, collected, &collector.settings().rules)
}

/// Classify features gathered elsewhere (for example from a cache) and log
/// the outcome the same way [`compute_configuration`] does.
pub fn classify_collected(
    coordinate: Coordinate,
    collected: CollectedFeatures,
    rules: &ClassificationRules,
) -> ConfigurationReport {
    let report = ConfigurationReport::from_collected(coordinate, collected, rules);
    tracing::info!(
        "Configuration for {}: {} ({} rule)",
        coordinate,
        report.configuration,
        report.matched_rule
    );
    report
}
