//! Google Places nearby-search client.

use async_trait::async_trait;
use hubfinder_core::models::{GridPoint, PlaceRecord};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{check_status, SourceError};
use crate::sources::{PlaceQuery, PlacesSource};

const SERVICE: &str = "places";

/// HTTP client for the nearby-search endpoint. Only the first page of
/// results is ever read.
pub struct GooglePlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    #[serde(default)]
    results: Option<Vec<NearbyResult>>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GooglePlacesClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// Statuses that carry a usable (possibly empty) result list.
const ACCEPTED_STATUSES: [&str; 2] = ["OK", "ZERO_RESULTS"];

/// Parse a nearby-search body. A body without `results` means no matches,
/// unless its `status` reports that the request was refused.
pub fn parse_nearby_response(body: &str) -> Result<Vec<PlaceRecord>, SourceError> {
    let payload: NearbySearchResponse = serde_json::from_str(body)
        .map_err(|err| SourceError::malformed(SERVICE, err.to_string()))?;

    if let Some(message) = payload.error_message.as_deref() {
        tracing::warn!(
            "Nearby search status {}: {}",
            payload.status.as_deref().unwrap_or("unknown"),
            message
        );
    }

    if let Some(status) = payload.status {
        if !ACCEPTED_STATUSES.contains(&status.as_str()) {
            return Err(SourceError::Rejected {
                service: SERVICE,
                status,
                message: payload.error_message.unwrap_or_default(),
            });
        }
    }

    let Some(results) = payload.results else {
        tracing::debug!("Nearby search returned no results field");
        return Ok(Vec::new());
    };

    Ok(results
        .into_iter()
        .map(|result| PlaceRecord {
            name: result.name,
            location: result
                .geometry
                .and_then(|geometry| geometry.location)
                .map(|loc| GridPoint::new(loc.lat, loc.lng)),
        })
        .collect())
}

#[async_trait]
impl PlacesSource for GooglePlacesClient {
    async fn nearby(
        &self,
        center: GridPoint,
        radius_m: f64,
        query: &PlaceQuery,
    ) -> Result<Vec<PlaceRecord>, SourceError> {
        if self.api_key.trim().is_empty() {
            return Err(SourceError::MissingCredential("GOOGLE_MAPS_API_KEY"));
        }

        let mut params: Vec<(&str, String)> = vec![
            ("location", format!("{},{}", center.lat, center.lon)),
            ("radius", format!("{}", radius_m.round() as u64)),
            ("key", self.api_key.clone()),
        ];
        if let Some(keyword) = query.keyword {
            params.push(("keyword", keyword.to_string()));
        }
        if let Some(place_type) = query.place_type {
            params.push(("type", place_type.to_string()));
        }

        tracing::debug!(
            "Nearby search at {},{} keyword={:?} type={:?}",
            center.lat,
            center.lon,
            query.keyword,
            query.place_type
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(SourceError::http(SERVICE))?;
        let response = check_status(SERVICE, response).await?;
        let body = response.text().await.map_err(SourceError::http(SERVICE))?;
        parse_nearby_response(&body)
    }
}
