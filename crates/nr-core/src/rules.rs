//! Antenna configuration rule table.
//!
//! Rules are evaluated top to bottom and the first match wins. Only the
//! thresholds are configurable; the order and the resulting profiles are
//! fixed.

use crate::models::{
    AntennaConfig, CyclicPrefixMode, FeatureSet, FrequencyBand, OutputPower, SubcarrierSpacing,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thresholds used by the rule table. All comparisons are strict `>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRules {
    /// Average road speed (km/h) above which a site is a high-speed corridor
    pub high_speed_kmh: f64,
    /// Building count above which a site is dense urban
    pub dense_building_count: u64,
    /// Building count above which a site is urban
    pub urban_building_count: u64,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            high_speed_kmh: 80.0,
            dense_building_count: 500,
            urban_building_count: 100,
        }
    }
}

/// Which row of the rule table produced a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Mountainous,
    HighSpeedCorridor,
    DenseUrban,
    Urban,
    Baseline,
}

impl RuleKind {
    /// Rule table in evaluation order.
    pub const ORDER: [RuleKind; 5] = [
        RuleKind::Mountainous,
        RuleKind::HighSpeedCorridor,
        RuleKind::DenseUrban,
        RuleKind::Urban,
        RuleKind::Baseline,
    ];

    /// 1-based priority, 1 being evaluated first.
    pub fn priority(self) -> u8 {
        match self {
            Self::Mountainous => 1,
            Self::HighSpeedCorridor => 2,
            Self::DenseUrban => 3,
            Self::Urban => 4,
            Self::Baseline => 5,
        }
    }

    fn matches(self, features: &FeatureSet, rules: &ClassificationRules) -> bool {
        match self {
            Self::Mountainous => features.mountains_nearby,
            Self::HighSpeedCorridor => features.avg_road_speed > rules.high_speed_kmh,
            Self::DenseUrban => features.building_density > rules.dense_building_count,
            Self::Urban => features.building_density > rules.urban_building_count,
            Self::Baseline => true,
        }
    }

    /// Configuration emitted when this rule fires.
    pub fn profile(self) -> AntennaConfig {
        match self {
            Self::Mountainous => AntennaConfig {
                frequency_band: FrequencyBand::Ghz3_5,
                subcarrier_spacing: SubcarrierSpacing::Khz30,
                cyclic_prefix_mode: CyclicPrefixMode::Extended,
                output_power: OutputPower::High,
                coverage_radius_km: 1.5,
            },
            Self::HighSpeedCorridor => AntennaConfig {
                frequency_band: FrequencyBand::Mhz700,
                subcarrier_spacing: SubcarrierSpacing::Khz15,
                cyclic_prefix_mode: CyclicPrefixMode::Extended,
                output_power: OutputPower::High,
                coverage_radius_km: 10.0,
            },
            Self::DenseUrban => AntennaConfig {
                frequency_band: FrequencyBand::Ghz26,
                subcarrier_spacing: SubcarrierSpacing::Khz120,
                cyclic_prefix_mode: CyclicPrefixMode::Normal,
                output_power: OutputPower::Medium,
                coverage_radius_km: 0.5,
            },
            Self::Urban => AntennaConfig {
                frequency_band: FrequencyBand::Ghz3_5,
                subcarrier_spacing: SubcarrierSpacing::Khz30,
                cyclic_prefix_mode: CyclicPrefixMode::Normal,
                output_power: OutputPower::Medium,
                coverage_radius_km: 2.0,
            },
            Self::Baseline => AntennaConfig {
                frequency_band: FrequencyBand::Mhz700,
                subcarrier_spacing: SubcarrierSpacing::Khz15,
                cyclic_prefix_mode: CyclicPrefixMode::Extended,
                output_power: OutputPower::Low,
                coverage_radius_km: 10.0,
            },
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mountainous => "mountainous",
            Self::HighSpeedCorridor => "high-speed corridor",
            Self::DenseUrban => "dense urban",
            Self::Urban => "urban",
            Self::Baseline => "baseline",
        })
    }
}

/// Result of running the rule table, including the rule that fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub rule: RuleKind,
    pub config: AntennaConfig,
}

/// Classify with the default thresholds.
pub fn classify(features: &FeatureSet) -> AntennaConfig {
    classify_with_rules(features, &ClassificationRules::default())
}

/// Classify with configured thresholds.
pub fn classify_with_rules(features: &FeatureSet, rules: &ClassificationRules) -> AntennaConfig {
    explain(features, rules).config
}

/// Run the rule table and report which rule matched.
pub fn explain(features: &FeatureSet, rules: &ClassificationRules) -> Classification {
    // Baseline always matches, so the fallback is never reached.
    let rule = RuleKind::ORDER
        .into_iter()
        .find(|rule| rule.matches(features, rules))
        .unwrap_or(RuleKind::Baseline);
    Classification {
        rule,
        config: rule.profile(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(mountains: bool, speed: f64, buildings: u64) -> FeatureSet {
        FeatureSet {
            building_density: buildings,
            land_type: "residential".to_string(),
            mountains_nearby: mountains,
            elevation_m: 120.0,
            avg_road_speed: speed,
        }
    }

    #[test]
    fn mountains_override_every_other_signal() {
        let result = explain(&features(true, 999.0, 999_999), &ClassificationRules::default());
        assert_eq!(result.rule, RuleKind::Mountainous);
        assert_eq!(result.config.frequency_band, FrequencyBand::Ghz3_5);
        assert_eq!(result.config.cyclic_prefix_mode, CyclicPrefixMode::Extended);
        assert_eq!(result.config.output_power, OutputPower::High);
        assert_eq!(result.config.coverage_radius_km, 1.5);
    }

    #[test]
    fn high_speed_beats_building_density() {
        let config = classify(&features(false, 80.5, 10_000));
        assert_eq!(config, RuleKind::HighSpeedCorridor.profile());
    }

    #[test]
    fn speed_threshold_is_strict() {
        let config = classify(&features(false, 80.0, 0));
        assert_eq!(config, RuleKind::Baseline.profile());
    }

    #[test]
    fn density_of_exactly_500_is_urban_not_dense() {
        let result = explain(&features(false, 80.0, 500), &ClassificationRules::default());
        assert_eq!(result.rule, RuleKind::Urban);
        assert_eq!(result.config.frequency_band, FrequencyBand::Ghz3_5);
        assert_eq!(result.config.coverage_radius_km, 2.0);
    }

    #[test]
    fn density_brackets() {
        assert_eq!(classify(&features(false, 30.0, 501)), RuleKind::DenseUrban.profile());
        assert_eq!(classify(&features(false, 30.0, 101)), RuleKind::Urban.profile());
        assert_eq!(classify(&features(false, 30.0, 100)), RuleKind::Baseline.profile());
    }

    #[test]
    fn default_feature_set_gets_baseline_profile() {
        let config = classify(&FeatureSet::default());
        assert_eq!(config.frequency_band, FrequencyBand::Mhz700);
        assert_eq!(config.subcarrier_spacing, SubcarrierSpacing::Khz15);
        assert_eq!(config.cyclic_prefix_mode, CyclicPrefixMode::Extended);
        assert_eq!(config.output_power, OutputPower::Low);
        assert_eq!(config.coverage_radius_km, 10.0);
    }

    #[test]
    fn land_type_and_elevation_do_not_change_the_result() {
        let mut a = features(false, 30.0, 250);
        let mut b = a.clone();
        a.land_type = "forest".to_string();
        a.elevation_m = 2_500.0;
        b.land_type = "Unknown".to_string();
        b.elevation_m = 0.0;
        assert_eq!(classify(&a), classify(&b));
    }

    #[test]
    fn configured_thresholds_are_respected() {
        let rules = ClassificationRules {
            high_speed_kmh: 50.0,
            dense_building_count: 2_000,
            urban_building_count: 1_000,
        };
        assert_eq!(
            classify_with_rules(&features(false, 60.0, 0), &rules),
            RuleKind::HighSpeedCorridor.profile()
        );
        assert_eq!(
            classify_with_rules(&features(false, 30.0, 1_500), &rules),
            RuleKind::Urban.profile()
        );
    }

    #[test]
    fn priorities_follow_table_order() {
        let priorities: Vec<u8> = RuleKind::ORDER.iter().map(|r| r.priority()).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4, 5]);
    }
}
