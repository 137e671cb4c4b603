//! Siting rules and thresholds.

use serde::{Deserialize, Serialize};

/// Lowest acceptable average temperature (°C, inclusive).
pub const TEMP_MIN_C: f64 = 18.0;
/// Highest acceptable average temperature (°C, inclusive).
pub const TEMP_MAX_C: f64 = 28.0;
/// Wind speed must stay strictly below this (km/h).
pub const WIND_MAX_KMH: f64 = 15.0;
/// Annual precipitation must stay strictly below this (mm).
pub const PRECIPITATION_MAX_MM: f64 = 900.0;
/// Elevation must stay strictly below this (m).
pub const ELEVATION_MAX_M: f64 = 3000.0;

/// Hospitals required inside the near band.
pub const HOSPITALS_NEAR_MIN: u32 = 1;
/// Pharmacies or labs required inside the near band.
pub const PHARMACIES_NEAR_MIN: u32 = 1;
/// Retail count must be strictly greater than this within 10 km.
pub const RETAIL_TOTAL_ABOVE: u32 = 10;
/// Logistics companies required within 10 km.
pub const LOGISTICS_TOTAL_MIN: u32 = 2;

/// Most zones the ranking ever reports.
pub const MAX_TOP_N: usize = 3;
/// Number of zones reported by the ranking.
pub const DEFAULT_TOP_N: usize = MAX_TOP_N;

/// Configuration for siting rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitingRules {
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub wind_max_kmh: f64,
    pub precipitation_max_mm: f64,
    pub elevation_max_m: f64,
    pub hospitals_near_min: u32,
    pub pharmacies_near_min: u32,
    pub retail_total_above: u32,
    pub logistics_total_min: u32,
    /// Maximum zones returned by the ranker, capped at [`MAX_TOP_N`]
    pub top_n: usize,
}

impl Default for SitingRules {
    fn default() -> Self {
        Self {
            temp_min_c: TEMP_MIN_C,
            temp_max_c: TEMP_MAX_C,
            wind_max_kmh: WIND_MAX_KMH,
            precipitation_max_mm: PRECIPITATION_MAX_MM,
            elevation_max_m: ELEVATION_MAX_M,
            hospitals_near_min: HOSPITALS_NEAR_MIN,
            pharmacies_near_min: PHARMACIES_NEAR_MIN,
            retail_total_above: RETAIL_TOTAL_ABOVE,
            logistics_total_min: LOGISTICS_TOTAL_MIN,
            top_n: DEFAULT_TOP_N,
        }
    }
}
