//! Overpass QL builders for the four spatial features.

use nr_core::{BoundingBox, Coordinate};

/// Road classes that contribute to the average speed.
pub const MAJOR_HIGHWAY_PATTERN: &str = "^(motorway|trunk|primary|secondary|tertiary)$";

fn header(timeout_s: u64) -> String {
    format!("[out:json][timeout:{timeout_s}];")
}

pub fn road_speed_query(bbox: &BoundingBox, timeout_s: u64) -> String {
    format!(
        "{}\nway[\"highway\"~\"{}\"]({});\nout center;",
        header(timeout_s),
        MAJOR_HIGHWAY_PATTERN,
        bbox.to_overpass_filter()
    )
}

pub fn building_count_query(bbox: &BoundingBox, timeout_s: u64) -> String {
    format!(
        "{}\nway[\"building\"]({});\nout count;",
        header(timeout_s),
        bbox.to_overpass_filter()
    )
}

pub fn land_use_query(point: Coordinate, timeout_s: u64) -> String {
    format!(
        "{}\nis_in({},{})->.a;\narea.a[\"landuse\"];\nout tags;",
        header(timeout_s),
        point.latitude(),
        point.longitude()
    )
}

pub fn peak_query(point: Coordinate, radius_km: f64, timeout_s: u64) -> String {
    format!(
        "{}\nnode(around:{},{},{})[\"natural\"=\"peak\"];\nout;",
        header(timeout_s),
        radius_km * 1000.0,
        point.latitude(),
        point.longitude()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_queries_embed_the_window() {
        let bbox = BoundingBox {
            min_lat: 48.8,
            max_lat: 48.9,
            min_lon: 2.3,
            max_lon: 2.4,
        };
        let roads = road_speed_query(&bbox, 10);
        assert!(roads.starts_with("[out:json][timeout:10];"));
        assert!(roads.contains(
            "way[\"highway\"~\"^(motorway|trunk|primary|secondary|tertiary)$\"](48.8,2.3,48.9,2.4);"
        ));
        assert!(roads.ends_with("out center;"));

        let buildings = building_count_query(&bbox, 10);
        assert!(buildings.contains("way[\"building\"](48.8,2.3,48.9,2.4);"));
        assert!(buildings.ends_with("out count;"));
    }

    #[test]
    fn point_queries_use_lat_lon_order() {
        let point = Coordinate::new(46.5, 7.25).unwrap();
        assert!(land_use_query(point, 5).contains("is_in(46.5,7.25)->.a;"));
        assert!(peak_query(point, 2.0, 5)
            .contains("node(around:2000,46.5,7.25)[\"natural\"=\"peak\"];"));
    }
}
