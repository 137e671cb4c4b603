//! Stand-in values for data we have no real source for.

use std::sync::Mutex;

use async_trait::async_trait;
use hubfinder_core::models::{GridPoint, WeatherReading};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{CarbonSource, ElevationSource, WeatherSource};
use crate::error::SourceError;

pub const CARBON_RANGE_T: (u32, u32) = (40_000, 70_000);
pub const TEMPERATURE_RANGE_C: (f64, f64) = (15.0, 30.0);
pub const WIND_SPEED_RANGE_KMH: (f64, f64) = (0.0, 20.0);
pub const WIND_DIRECTION_RANGE_DEG: (f64, f64) = (0.0, 360.0);
pub const PRECIPITATION_RANGE_MM: (f64, f64) = (800.0, 1200.0);

/// Uniform random generator for carbon, weather and fallback elevation.
///
/// Seed it for reproducible runs.
pub struct SimulatedSource {
    rng: Mutex<StdRng>,
    elevation_band_m: (f64, f64),
}

impl SimulatedSource {
    pub fn new(elevation_band_m: (f64, f64)) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
            elevation_band_m,
        }
    }

    pub fn seeded(seed: u64, elevation_band_m: (f64, f64)) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            elevation_band_m,
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock still holds a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    fn uniform(rng: &mut StdRng, (low, high): (f64, f64)) -> f64 {
        if high > low {
            rng.random_range(low..=high)
        } else {
            low
        }
    }
}

#[async_trait]
impl CarbonSource for SimulatedSource {
    async fn carbon_footprint(&self, _point: GridPoint) -> Result<u32, SourceError> {
        let (low, high) = CARBON_RANGE_T;
        Ok(self.with_rng(|rng| rng.random_range(low..=high)))
    }
}

#[async_trait]
impl ElevationSource for SimulatedSource {
    async fn elevation(&self, _point: GridPoint) -> Result<Option<f64>, SourceError> {
        let band = self.elevation_band_m;
        Ok(Some(self.with_rng(|rng| Self::uniform(rng, band))))
    }
}

#[async_trait]
impl WeatherSource for SimulatedSource {
    async fn weather(&self, _point: GridPoint) -> Result<WeatherReading, SourceError> {
        Ok(self.with_rng(|rng| WeatherReading {
            temperature_c: Some(Self::uniform(rng, TEMPERATURE_RANGE_C)),
            wind_speed_kmh: Some(Self::uniform(rng, WIND_SPEED_RANGE_KMH)),
            wind_direction_deg: Some(Self::uniform(rng, WIND_DIRECTION_RANGE_DEG)),
            precipitation_mm: Some(Self::uniform(rng, PRECIPITATION_RANGE_MM)),
            humidity_pct: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within(value: Option<f64>, (low, high): (f64, f64)) -> bool {
        value.is_some_and(|v| v >= low && v <= high)
    }

    #[tokio::test]
    async fn values_stay_in_their_ranges() {
        let source = SimulatedSource::seeded(7, (2800.0, 2900.0));
        let point = GridPoint::new(-0.225, -78.475);
        for _ in 0..200 {
            let carbon = source.carbon_footprint(point).await.unwrap();
            assert!((40_000..=70_000).contains(&carbon));

            let elevation = source.elevation(point).await.unwrap();
            assert!(within(elevation, (2800.0, 2900.0)));

            let weather = source.weather(point).await.unwrap();
            assert!(within(weather.temperature_c, TEMPERATURE_RANGE_C));
            assert!(within(weather.wind_speed_kmh, WIND_SPEED_RANGE_KMH));
            assert!(within(weather.wind_direction_deg, WIND_DIRECTION_RANGE_DEG));
            assert!(within(weather.precipitation_mm, PRECIPITATION_RANGE_MM));
            assert_eq!(weather.humidity_pct, None);
        }
    }

    #[tokio::test]
    async fn same_seed_same_values() {
        let point = GridPoint::new(0.0, 0.0);
        let a = SimulatedSource::seeded(42, (2800.0, 2900.0));
        let b = SimulatedSource::seeded(42, (2800.0, 2900.0));
        for _ in 0..10 {
            assert_eq!(
                a.weather(point).await.unwrap(),
                b.weather(point).await.unwrap()
            );
            assert_eq!(
                a.carbon_footprint(point).await.unwrap(),
                b.carbon_footprint(point).await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn degenerate_band_returns_its_edge() {
        let source = SimulatedSource::seeded(1, (2850.0, 2850.0));
        let elevation = source.elevation(GridPoint::new(0.0, 0.0)).await.unwrap();
        assert_eq!(elevation, Some(2850.0));
    }
}
