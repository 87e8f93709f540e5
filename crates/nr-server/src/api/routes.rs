//! REST API routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use nr_core::{Coordinate, CoordinateError};
use nr_geodata::ConfigurationReport;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

const ENTRY_FORM: &str = r#"<!doctype html>
<html>
<head><title>NR site configuration</title></head>
<body>
<form method="post" action="/result">
<label>Latitude <input name="lat"></label>
<label>Longitude <input name="lon"></label>
<button type="submit">Recommend</button>
</form>
</body>
</html>
"#;

/// Raw `lat`/`lon` pair as received from a query string or a form post.
#[derive(Debug, Default, Deserialize)]
pub struct CoordinateInput {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidCoordinate {
    #[error("missing `{0}`")]
    Missing(&'static str),
    #[error("`{field}` is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error(transparent)]
    OutOfRange(#[from] CoordinateError),
}

impl CoordinateInput {
    pub fn parse(&self) -> Result<Coordinate, InvalidCoordinate> {
        let lat = parse_field("lat", self.lat.as_deref())?;
        let lon = parse_field("lon", self.lon.as_deref())?;
        Ok(Coordinate::new(lat, lon)?)
    }
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<f64, InvalidCoordinate> {
    let raw = raw.ok_or(InvalidCoordinate::Missing(field))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| InvalidCoordinate::NotANumber {
            field,
            value: raw.to_string(),
        })
}

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(entry_form))
        .route("/health", get(|| async { "OK" }))
        .route("/v1/configuration", get(get_configuration))
        .route("/result", post(submit_form))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn entry_form() -> Html<&'static str> {
    Html(ENTRY_FORM)
}

/// Recommend a configuration for `?lat=..&lon=..`.
async fn get_configuration(
    State(state): State<Arc<AppState>>,
    Query(input): Query<CoordinateInput>,
) -> Result<Json<ConfigurationReport>, (StatusCode, Json<Value>)> {
    let point = input.parse().map_err(|err| {
        tracing::debug!("Rejected coordinate query: {}", err);
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
    })?;
    Ok(Json(state.configuration_for(point).await))
}

/// Form post from the entry page. Unusable input sends the user back to the
/// form instead of erroring.
async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(input): Form<CoordinateInput>,
) -> Response {
    match input.parse() {
        Ok(point) => Json(state.configuration_for(point).await).into_response(),
        Err(err) => {
            tracing::debug!("Rejected form input, redirecting to entry form: {}", err);
            Redirect::to("/").into_response()
        }
    }
}
