//! Terminal rendering for configuration reports.

use nr_core::FeatureKind;
use nr_geodata::ConfigurationReport;
use std::fmt::Write;

/// Human-readable summary. Features that hold a default because their
/// fetch failed are marked with the failure reason.
pub fn render_summary(report: &ConfigurationReport) -> String {
    let features = &report.features;
    let marker = |kind: FeatureKind| -> String {
        report
            .fallbacks
            .iter()
            .find(|fallback| fallback.feature == kind)
            .map(|fallback| format!("  (default: {})", fallback.reason))
            .unwrap_or_default()
    };

    let mut out = String::new();
    let _ = writeln!(out, "Site {}", report.coordinate);
    let _ = writeln!(out, "Features");
    let _ = writeln!(
        out,
        "  building density  {}{}",
        features.building_density,
        marker(FeatureKind::BuildingDensity)
    );
    let _ = writeln!(
        out,
        "  land type         {}{}",
        features.land_type,
        marker(FeatureKind::LandType)
    );
    let _ = writeln!(
        out,
        "  mountains nearby  {}{}",
        if features.mountains_nearby { "yes" } else { "no" },
        marker(FeatureKind::Mountains)
    );
    let _ = writeln!(
        out,
        "  elevation         {} m{}",
        features.elevation_m,
        marker(FeatureKind::Elevation)
    );
    let _ = writeln!(
        out,
        "  avg road speed    {} km/h{}",
        features.avg_road_speed as i64,
        marker(FeatureKind::RoadSpeed)
    );

    let config = &report.configuration;
    let _ = writeln!(
        out,
        "Configuration ({} rule, priority {})",
        report.matched_rule, report.priority
    );
    let _ = writeln!(out, "  frequency         {}", config.frequency_band);
    let _ = writeln!(out, "  subcarrier        {}", config.subcarrier_spacing);
    let _ = writeln!(out, "  cyclic prefix     {}", config.cyclic_prefix_mode);
    let _ = writeln!(out, "  output power      {}", config.output_power);
    let _ = writeln!(out, "  coverage radius   {} km", config.coverage_radius_km);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nr_core::{ClassificationRules, CollectedFeatures, Coordinate, FeatureFallback, FeatureSet};

    #[test]
    fn summary_marks_defaulted_features() {
        let collected = CollectedFeatures {
            features: FeatureSet {
                building_density: 120,
                land_type: "farmland".to_string(),
                mountains_nearby: false,
                elevation_m: 0.0,
                avg_road_speed: 46.67,
            },
            fallbacks: vec![FeatureFallback {
                feature: FeatureKind::Elevation,
                reason: "upstream HTTP 502".to_string(),
            }],
        };
        let report = ConfigurationReport::from_collected(
            Coordinate::new(45.0, 7.0).unwrap(),
            collected,
            &ClassificationRules::default(),
        );

        let summary = render_summary(&report);
        assert!(summary.contains("Site 45,7"));
        assert!(summary.contains("elevation         0 m  (default: upstream HTTP 502)"));
        assert!(summary.contains("land type         farmland\n"));
        assert!(summary.contains("avg road speed    46 km/h\n"));
        assert!(summary.contains("Configuration (urban rule, priority 4)"));
        assert!(summary.contains("frequency         3.5 GHz"));
        assert!(summary.contains("coverage radius   2 km"));
    }
}
