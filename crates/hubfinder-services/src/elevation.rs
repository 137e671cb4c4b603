//! Elevation lookups for a single coordinate.

use async_trait::async_trait;
use hubfinder_core::models::GridPoint;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{check_status, SourceError};
use crate::sources::ElevationSource;

/// Google Elevation API client.
pub struct GoogleElevationClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GoogleElevationResponse {
    #[serde(default)]
    results: Option<Vec<GoogleElevationResult>>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleElevationResult {
    elevation: f64,
}

impl GoogleElevationClient {
    const SERVICE: &'static str = "google elevation";

    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// First elevation in a Google response, if any.
pub fn parse_google_elevation(body: &str) -> Result<Option<f64>, SourceError> {
    let payload: GoogleElevationResponse = serde_json::from_str(body)
        .map_err(|err| SourceError::malformed(GoogleElevationClient::SERVICE, err.to_string()))?;
    let elevation = payload
        .results
        .and_then(|results| results.into_iter().next())
        .map(|result| result.elevation)
        .filter(|value| value.is_finite());
    if elevation.is_none() {
        tracing::debug!(
            "Elevation service returned no result (status: {})",
            payload.status.as_deref().unwrap_or("none")
        );
    }
    Ok(elevation)
}

#[async_trait]
impl ElevationSource for GoogleElevationClient {
    async fn elevation(&self, point: GridPoint) -> Result<Option<f64>, SourceError> {
        if self.api_key.trim().is_empty() {
            return Err(SourceError::MissingCredential("GOOGLE_MAPS_API_KEY"));
        }
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("locations", format!("{},{}", point.lat, point.lon)),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(SourceError::http(Self::SERVICE))?;
        let response = check_status(Self::SERVICE, response).await?;
        let body = response
            .text()
            .await
            .map_err(SourceError::http(Self::SERVICE))?;
        parse_google_elevation(&body)
    }
}

/// Open-Meteo elevation client. Needs no credential.
pub struct OpenMeteoElevationClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoElevationResponse {
    elevation: Option<Vec<f64>>,
}

impl OpenMeteoElevationClient {
    const SERVICE: &'static str = "open-meteo elevation";

    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

fn build_provider_url(base: &str, latitude: f64, longitude: f64) -> String {
    let separator = if base.contains('?') { "&" } else { "?" };
    format!(
        "{}{}latitude={:.6}&longitude={:.6}",
        base, separator, latitude, longitude
    )
}

pub fn parse_open_meteo_elevation(body: &str) -> Result<Option<f64>, SourceError> {
    let payload: OpenMeteoElevationResponse = serde_json::from_str(body).map_err(|err| {
        SourceError::malformed(OpenMeteoElevationClient::SERVICE, err.to_string())
    })?;
    Ok(payload
        .elevation
        .and_then(|values| values.into_iter().next())
        .filter(|value| value.is_finite()))
}

#[async_trait]
impl ElevationSource for OpenMeteoElevationClient {
    async fn elevation(&self, point: GridPoint) -> Result<Option<f64>, SourceError> {
        let url = build_provider_url(&self.base_url, point.lat, point.lon);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(SourceError::http(Self::SERVICE))?;
        let response = check_status(Self::SERVICE, response).await?;
        let body = response
            .text()
            .await
            .map_err(SourceError::http(Self::SERVICE))?;
        parse_open_meteo_elevation(&body)
    }
}
