//! Core data models for station site selection.

use serde::{Deserialize, Serialize};

/// One sample coordinate of the search grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GridPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Rectangular search region in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &GridPoint) -> bool {
        point.lat >= self.lat_min
            && point.lat <= self.lat_max
            && point.lon >= self.lon_min
            && point.lon <= self.lon_max
    }
}

/// Bounding box plus the number of samples per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchArea {
    pub bounds: BoundingBox,
    pub divisions: usize,
}

impl Default for SearchArea {
    /// Quito city limits, sampled roughly every 5 km.
    fn default() -> Self {
        Self {
            bounds: BoundingBox {
                lat_min: -0.35,
                lat_max: -0.10,
                lon_min: -78.60,
                lon_max: -78.35,
            },
            divisions: 5,
        }
    }
}

/// Place categories searched around every zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiCategory {
    /// Hospitals and medical centers
    Hospitals,
    /// Pharmacies and laboratories
    Pharmacies,
    /// General retail stores
    Retail,
    /// Logistics, transport and distribution companies
    Logistics,
}

impl PoiCategory {
    pub const ALL: [PoiCategory; 4] = [
        PoiCategory::Hospitals,
        PoiCategory::Pharmacies,
        PoiCategory::Retail,
        PoiCategory::Logistics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hospitals => "hospitals",
            Self::Pharmacies => "pharmacies",
            Self::Retail => "retail",
            Self::Logistics => "logistics",
        }
    }
}

/// A single nearby-search hit. Records without a coordinate are kept so the
/// caller can see how many were dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaceRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<GridPoint>,
}

/// Points of interest bucketed by distance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProximityCount {
    /// 0-5 km
    pub count_near: u32,
    /// 5-10 km
    pub count_far: u32,
    pub count_total: u32,
}

/// Weather averages for a zone. `None` means unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    /// Annual precipitation in mm
    pub precipitation_mm: Option<f64>,
    pub humidity_pct: Option<f64>,
}

impl WeatherReading {
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_unavailable(&self) -> bool {
        self.temperature_c.is_none()
            && self.wind_speed_kmh.is_none()
            && self.wind_direction_deg.is_none()
            && self.precipitation_mm.is_none()
            && self.humidity_pct.is_none()
    }

    /// Wind speed converted back to m/s for reporting.
    pub fn wind_speed_ms(&self) -> Option<f64> {
        self.wind_speed_kmh.map(|kmh| kmh / 3.6)
    }
}

/// Degraded-data markers recorded during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataQuality {
    /// Elevation came from the fallback band, not the service.
    pub elevation_fallback: bool,
    pub elevation_unavailable: bool,
    pub weather_unavailable: bool,
    pub carbon_unavailable: bool,
    /// Categories whose nearby search failed and were counted as zero.
    pub failed_searches: Vec<PoiCategory>,
}

impl DataQuality {
    pub fn is_degraded(&self) -> bool {
        self.elevation_fallback
            || self.elevation_unavailable
            || self.weather_unavailable
            || self.carbon_unavailable
            || !self.failed_searches.is_empty()
    }
}

/// Everything known about one zone after enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneProfile {
    pub point: GridPoint,
    /// Estimated emissions in t/year
    pub carbon_t_per_year: Option<u32>,
    pub elevation_m: Option<f64>,
    pub weather: WeatherReading,
    pub hospitals: ProximityCount,
    pub pharmacies: ProximityCount,
    pub retail: ProximityCount,
    pub logistics: ProximityCount,
    #[serde(default)]
    pub quality: DataQuality,
}

impl ZoneProfile {
    pub fn proximity(&self, category: PoiCategory) -> &ProximityCount {
        match category {
            PoiCategory::Hospitals => &self.hospitals,
            PoiCategory::Pharmacies => &self.pharmacies,
            PoiCategory::Retail => &self.retail,
            PoiCategory::Logistics => &self.logistics,
        }
    }
}

/// Threshold outcome for one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QualificationFlags {
    pub climate_ok: bool,
    pub business_ok: bool,
    pub all_ok: bool,
}

/// A qualifying zone in the final ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedZone {
    pub profile: ZoneProfile,
    pub flags: QualificationFlags,
}
