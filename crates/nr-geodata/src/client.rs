//! HTTP clients for the Overpass and elevation services.

use crate::error::FetchError;
use crate::parse::{ElevationResponse, OverpassResponse};
use nr_core::Coordinate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_ELEVATION_URL: &str = "https://api.open-elevation.com/api/v1/lookup";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = concat!("nr-geodata/", env!("CARGO_PKG_VERSION"));

/// Thin client over both upstreams. No retries: one request per call.
#[derive(Debug, Clone)]
pub struct GeoDataClient {
    client: Client,
    overpass_url: String,
    elevation_url: String,
}

impl GeoDataClient {
    pub fn new(overpass_url: impl Into<String>, elevation_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(client, overpass_url, elevation_url)
    }

    pub fn with_client(
        client: Client,
        overpass_url: impl Into<String>,
        elevation_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            overpass_url: overpass_url.into(),
            elevation_url: elevation_url.into(),
        }
    }

    /// Run an Overpass QL query, passed as the `data` parameter of a GET.
    pub async fn query_spatial_features(
        &self,
        query: &str,
    ) -> Result<OverpassResponse, FetchError> {
        let request = self.client.get(&self.overpass_url).query(&[("data", query)]);
        send_json(request).await
    }

    /// Look up the ground elevation of a single point.
    pub async fn lookup_elevation(
        &self,
        point: Coordinate,
    ) -> Result<ElevationResponse, FetchError> {
        let locations = format!("{},{}", point.latitude(), point.longitude());
        let request = self
            .client
            .get(&self.elevation_url)
            .query(&[("locations", locations)]);
        send_json(request).await
    }
}

async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, FetchError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    response
        .json::<T>()
        .await
        .map_err(|err| FetchError::Decode(err.to_string()))
}
