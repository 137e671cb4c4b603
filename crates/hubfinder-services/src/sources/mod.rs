//! Data source seams used by zone enrichment.
//!
//! Every external dependency sits behind one of these traits so the
//! enricher can be composed from real clients, simulated values, or test
//! fixtures.

pub mod simulated;

use async_trait::async_trait;
use hubfinder_core::models::{GridPoint, PlaceRecord, PoiCategory, WeatherReading};

use crate::error::SourceError;

pub use simulated::SimulatedSource;

/// Search filter for one nearby-search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceQuery {
    pub keyword: Option<&'static str>,
    pub place_type: Option<&'static str>,
}

impl PlaceQuery {
    /// Filter used for each category of interest.
    pub fn for_category(category: PoiCategory) -> Self {
        match category {
            PoiCategory::Hospitals => Self {
                keyword: Some("hospital centro medico"),
                place_type: None,
            },
            PoiCategory::Pharmacies => Self {
                keyword: Some("farmacia laboratorio"),
                place_type: None,
            },
            PoiCategory::Retail => Self {
                keyword: None,
                place_type: Some("store"),
            },
            PoiCategory::Logistics => Self {
                keyword: Some("logistica transporte distribucion"),
                place_type: None,
            },
        }
    }
}

/// Emissions estimate for a coordinate, in t/year.
#[async_trait]
pub trait CarbonSource: Send + Sync {
    async fn carbon_footprint(&self, point: GridPoint) -> Result<u32, SourceError>;
}

/// Ground elevation in meters. `Ok(None)` when the source has no data.
#[async_trait]
pub trait ElevationSource: Send + Sync {
    async fn elevation(&self, point: GridPoint) -> Result<Option<f64>, SourceError>;
}

/// Averaged weather for a coordinate.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn weather(&self, point: GridPoint) -> Result<WeatherReading, SourceError>;
}

/// First page of a nearby search around `center`.
#[async_trait]
pub trait PlacesSource: Send + Sync {
    async fn nearby(
        &self,
        center: GridPoint,
        radius_m: f64,
        query: &PlaceQuery,
    ) -> Result<Vec<PlaceRecord>, SourceError>;
}

/// Free-text generation used by the delegated selection strategy.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, SourceError>;
}
