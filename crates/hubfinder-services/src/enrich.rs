//! Zone enrichment: turns grid points into zone profiles.
//!
//! A failed lookup only degrades its own field. The reason is logged and
//! recorded in the profile's [`DataQuality`], and the run carries on.

use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use hubfinder_core::models::{
    DataQuality, GridPoint, PoiCategory, ProximityCount, WeatherReading, ZoneProfile,
};
use hubfinder_core::spatial::{count_by_band, FAR_BAND_M};

use crate::sources::{CarbonSource, ElevationSource, PlaceQuery, PlacesSource, WeatherSource};

/// The collaborators a run is composed from.
#[derive(Clone)]
pub struct Sources {
    pub carbon: Arc<dyn CarbonSource>,
    pub elevation: Arc<dyn ElevationSource>,
    /// Consulted when `elevation` has no answer. `None` leaves it unavailable.
    pub elevation_fallback: Option<Arc<dyn ElevationSource>>,
    pub weather: Arc<dyn WeatherSource>,
    pub places: Arc<dyn PlacesSource>,
}

pub struct ZoneEnricher {
    sources: Sources,
    search_radius_m: f64,
}

impl ZoneEnricher {
    pub fn new(sources: Sources) -> Self {
        Self {
            sources,
            search_radius_m: FAR_BAND_M,
        }
    }

    async fn carbon(&self, point: GridPoint, quality: &mut DataQuality) -> Option<u32> {
        match self.sources.carbon.carbon_footprint(point).await {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(
                    "Carbon estimate unavailable at {},{}: {}",
                    point.lat,
                    point.lon,
                    err
                );
                quality.carbon_unavailable = true;
                None
            }
        }
    }

    async fn elevation(&self, point: GridPoint, quality: &mut DataQuality) -> Option<f64> {
        match self.sources.elevation.elevation(point).await {
            Ok(Some(value)) => return Some(value),
            Ok(None) => {
                tracing::debug!("No elevation at {},{}", point.lat, point.lon);
            }
            Err(err) => {
                tracing::warn!("Elevation lookup failed at {},{}: {}", point.lat, point.lon, err);
            }
        }

        let fallback = match &self.sources.elevation_fallback {
            Some(fallback) => match fallback.elevation(point).await {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(
                        "Fallback elevation failed at {},{}: {}",
                        point.lat,
                        point.lon,
                        err
                    );
                    None
                }
            },
            None => None,
        };
        match fallback {
            Some(value) => {
                quality.elevation_fallback = true;
                Some(value)
            }
            None => {
                quality.elevation_unavailable = true;
                None
            }
        }
    }

    async fn weather(&self, point: GridPoint, quality: &mut DataQuality) -> WeatherReading {
        match self.sources.weather.weather(point).await {
            Ok(reading) if !reading.is_unavailable() => reading,
            Ok(_) => {
                quality.weather_unavailable = true;
                WeatherReading::unavailable()
            }
            Err(err) => {
                tracing::warn!("Weather unavailable at {},{}: {}", point.lat, point.lon, err);
                quality.weather_unavailable = true;
                WeatherReading::unavailable()
            }
        }
    }

    async fn proximity(
        &self,
        point: GridPoint,
        category: PoiCategory,
        quality: &mut DataQuality,
    ) -> ProximityCount {
        let query = PlaceQuery::for_category(category);
        match self
            .sources
            .places
            .nearby(point, self.search_radius_m, &query)
            .await
        {
            Ok(places) => count_by_band(&point, &places),
            Err(err) => {
                tracing::warn!(
                    "Nearby search for {} failed at {},{}: {}",
                    category.label(),
                    point.lat,
                    point.lon,
                    err
                );
                quality.failed_searches.push(category);
                ProximityCount::default()
            }
        }
    }

    /// Build the profile for one zone. Never fails.
    pub async fn enrich(&self, point: GridPoint) -> ZoneProfile {
        let mut quality = DataQuality::default();

        let carbon_t_per_year = self.carbon(point, &mut quality).await;
        let elevation_m = self.elevation(point, &mut quality).await;
        let weather = self.weather(point, &mut quality).await;
        let hospitals = self.proximity(point, PoiCategory::Hospitals, &mut quality).await;
        let pharmacies = self.proximity(point, PoiCategory::Pharmacies, &mut quality).await;
        let retail = self.proximity(point, PoiCategory::Retail, &mut quality).await;
        let logistics = self.proximity(point, PoiCategory::Logistics, &mut quality).await;

        if quality.is_degraded() {
            tracing::debug!("Zone {},{} has degraded data: {:?}", point.lat, point.lon, quality);
        }

        ZoneProfile {
            point,
            carbon_t_per_year,
            elevation_m,
            weather,
            hospitals,
            pharmacies,
            retail,
            logistics,
            quality,
        }
    }

    /// Enrich zones with up to `workers` in flight. Items come out in the
    /// same order as `points`.
    pub fn enrich_stream<'a>(
        &'a self,
        points: &'a [GridPoint],
        workers: usize,
    ) -> impl Stream<Item = ZoneProfile> + 'a {
        stream::iter(points.iter().copied())
            .map(move |point| self.enrich(point))
            .buffered(workers.max(1))
    }

    pub async fn enrich_all(&self, points: &[GridPoint], workers: usize) -> Vec<ZoneProfile> {
        self.enrich_stream(points, workers).collect().await
    }
}
