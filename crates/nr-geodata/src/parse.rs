//! Typed upstream payloads and per-feature parsing.

use crate::error::FetchError;
use nr_core::UNKNOWN_LAND_TYPE;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;

/// Building counts above this are logged as a dense area.
const DENSE_AREA_LOG_THRESHOLD: u64 = 10_000;

#[derive(Debug, Default, Deserialize)]
pub struct OverpassResponse {
    pub elements: Option<Vec<OverpassElement>>,
    pub remark: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OverpassElement {
    /// Tag values are strings on the wire, but count outputs from some
    /// mirrors come back as numbers.
    pub tags: Option<HashMap<String, Value>>,
}

impl OverpassResponse {
    /// Elements of a successful answer. Overpass answers runtime errors with
    /// HTTP 200 and a `remark`, which is treated as a failure.
    pub fn elements(&self) -> Result<&[OverpassElement], FetchError> {
        if let Some(remark) = self.remark.as_deref() {
            if remark.contains("error") {
                return Err(FetchError::Upstream(remark.to_string()));
            }
        }
        self.elements
            .as_deref()
            .ok_or(FetchError::MissingField("elements"))
    }
}

impl OverpassElement {
    pub fn tag(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.tags.as_ref()?.get(key)? {
            Value::String(text) => Some(Cow::Borrowed(text.as_str())),
            Value::Number(number) => Some(Cow::Owned(number.to_string())),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ElevationResponse {
    pub results: Option<Vec<ElevationResult>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ElevationResult {
    pub elevation: Option<f64>,
}

/// Integer value of a `maxspeed` tag. Surrounding whitespace and a leading
/// sign are accepted. Unit suffixes such as `"50 mph"` and symbolic values
/// such as `"none"` or `"walk"` are rejected.
pub fn parse_speed_tag(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Average `maxspeed` over the returned roads.
///
/// The element counter starts at 1, so the result is `sum / (n + 1)` for `n`
/// parsed speeds, and 0 when nothing parsed. Downstream thresholds are tuned
/// against this biased value.
pub fn average_road_speed(response: &OverpassResponse) -> Result<f64, FetchError> {
    let mut speed_sum: i64 = 0;
    let mut counted: u64 = 1;
    for element in response.elements()? {
        let Some(raw) = element.tag("maxspeed") else {
            continue;
        };
        if let Some(speed) = parse_speed_tag(&raw) {
            speed_sum = speed_sum.saturating_add(speed);
            counted += 1;
        }
    }

    if counted > 1 {
        Ok(speed_sum as f64 / counted as f64)
    } else {
        Ok(0.0)
    }
}

/// `total` of the count element returned by an `out count` query.
pub fn building_count(response: &OverpassResponse) -> Result<u64, FetchError> {
    let total = response
        .elements()?
        .first()
        .and_then(|element| element.tag("total"))
        .ok_or(FetchError::MissingField("total"))?;
    let count = total
        .trim()
        .parse::<u64>()
        .map_err(|_| FetchError::Decode(format!("total {total:?} is not a count")))?;

    if count > DENSE_AREA_LOG_THRESHOLD {
        tracing::debug!("Dense area: {} buildings in window", count);
    }
    Ok(count)
}

/// `landuse` tag of the first enclosing area, or the unknown sentinel.
pub fn land_type(response: &OverpassResponse) -> Result<String, FetchError> {
    let land = response
        .elements()?
        .first()
        .and_then(|element| element.tag("landuse"))
        .map(Cow::into_owned)
        .unwrap_or_else(|| UNKNOWN_LAND_TYPE.to_string());
    Ok(land)
}

pub fn peak_count(response: &OverpassResponse) -> Result<usize, FetchError> {
    Ok(response.elements()?.len())
}

/// Elevation of the first result.
pub fn elevation(response: &ElevationResponse) -> Result<f64, FetchError> {
    let first = response
        .results
        .as_deref()
        .and_then(|results| results.first())
        .ok_or(FetchError::MissingField("results"))?;
    match first.elevation {
        Some(value) if value.is_finite() => Ok(value),
        Some(_) => Err(FetchError::Decode("elevation is not finite".to_string())),
        None => Err(FetchError::MissingField("elevation")),
    }
}
