//! NASA POWER daily point client.
//!
//! Each parameter is averaged across the configured date range. A missing
//! parameter, a non-numeric sample, or a series with no valid samples makes
//! the whole reading unavailable.

use async_trait::async_trait;
use chrono::NaiveDate;
use hubfinder_core::models::{GridPoint, WeatherReading};
use reqwest::Client;
use serde_json::Value;

use crate::config::format_date;
use crate::error::{check_status, SourceError};
use crate::sources::WeatherSource;

const SERVICE: &str = "nasa power";

/// Air temperature at 2 m (°C)
pub const PARAM_TEMPERATURE: &str = "T2M";
/// Relative humidity at 2 m (%)
pub const PARAM_HUMIDITY: &str = "RH2M";
/// Wind speed at 10 m (m/s)
pub const PARAM_WIND_SPEED: &str = "WS10M";
/// Wind direction at 10 m (degrees)
pub const PARAM_WIND_DIRECTION: &str = "WD10M";
/// Corrected precipitation (mm/day)
pub const PARAM_PRECIPITATION: &str = "PRECTOTCORR";

pub const PARAMETERS: [&str; 5] = [
    PARAM_TEMPERATURE,
    PARAM_HUMIDITY,
    PARAM_WIND_SPEED,
    PARAM_WIND_DIRECTION,
    PARAM_PRECIPITATION,
];

/// POWER marks missing samples with this value.
const FILL_VALUE: f64 = -999.0;
const DAYS_PER_YEAR: f64 = 365.0;
const MS_TO_KMH: f64 = 3.6;

pub struct NasaPowerClient {
    client: Client,
    base_url: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl NasaPowerClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            start,
            end,
        }
    }
}

fn series_mean(parameters: &Value, name: &str) -> Result<f64, SourceError> {
    let series = parameters
        .get(name)
        .and_then(Value::as_object)
        .ok_or_else(|| SourceError::malformed(SERVICE, format!("missing parameter {name}")))?;

    let mut sum = 0.0;
    let mut count = 0usize;
    for (day, value) in series {
        let value = value.as_f64().ok_or_else(|| {
            SourceError::malformed(SERVICE, format!("{name} sample for {day} is not numeric"))
        })?;
        if !value.is_finite() || value == FILL_VALUE {
            continue;
        }
        sum += value;
        count += 1;
    }

    if count == 0 {
        return Err(SourceError::malformed(
            SERVICE,
            format!("{name} has no valid samples"),
        ));
    }
    Ok(sum / count as f64)
}

/// Average every parameter of a POWER daily response.
pub fn parse_power_response(payload: &Value) -> Result<WeatherReading, SourceError> {
    let parameters = payload
        .get("properties")
        .and_then(|properties| properties.get("parameter"))
        .ok_or_else(|| SourceError::malformed(SERVICE, "missing properties.parameter"))?;

    let temperature_c = series_mean(parameters, PARAM_TEMPERATURE)?;
    let humidity_pct = series_mean(parameters, PARAM_HUMIDITY)?;
    let wind_speed_ms = series_mean(parameters, PARAM_WIND_SPEED)?;
    let wind_direction_deg = series_mean(parameters, PARAM_WIND_DIRECTION)?;
    let precipitation_mm_day = series_mean(parameters, PARAM_PRECIPITATION)?;

    Ok(WeatherReading {
        temperature_c: Some(temperature_c),
        wind_speed_kmh: Some(wind_speed_ms * MS_TO_KMH),
        wind_direction_deg: Some(wind_direction_deg),
        precipitation_mm: Some(precipitation_mm_day * DAYS_PER_YEAR),
        humidity_pct: Some(humidity_pct),
    })
}

#[async_trait]
impl WeatherSource for NasaPowerClient {
    async fn weather(&self, point: GridPoint) -> Result<WeatherReading, SourceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("parameters", PARAMETERS.join(",")),
                ("community", "AG".to_string()),
                ("longitude", point.lon.to_string()),
                ("latitude", point.lat.to_string()),
                ("format", "JSON".to_string()),
                ("start", format_date(self.start)),
                ("end", format_date(self.end)),
            ])
            .send()
            .await
            .map_err(SourceError::http(SERVICE))?;
        let response = check_status(SERVICE, response).await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|err| SourceError::malformed(SERVICE, err.to_string()))?;
        parse_power_response(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "type": "Feature",
            "properties": {
                "parameter": {
                    "T2M": {"20250101": 20.0, "20250102": 22.0, "20250103": 24.0},
                    "RH2M": {"20250101": 80.0, "20250102": 70.0, "20250103": 75.0},
                    "WS10M": {"20250101": 2.0, "20250102": 3.0, "20250103": -999.0},
                    "WD10M": {"20250101": 90.0, "20250102": 110.0, "20250103": 100.0},
                    "PRECTOTCORR": {"20250101": 2.0, "20250102": 3.0, "20250103": 1.0}
                }
            }
        })
    }

    #[test]
    fn averages_each_parameter() {
        let reading = parse_power_response(&sample_payload()).unwrap();
        assert_eq!(reading.temperature_c, Some(22.0));
        assert_eq!(reading.humidity_pct, Some(75.0));
        assert_eq!(reading.wind_direction_deg, Some(100.0));
        // fill value skipped: (2 + 3) / 2 m/s
        assert!((reading.wind_speed_kmh.unwrap() - 9.0).abs() < 1e-9);
        assert!((reading.precipitation_mm.unwrap() - 730.0).abs() < 1e-9);
    }

    #[test]
    fn missing_parameter_is_malformed() {
        let mut payload = sample_payload();
        payload["properties"]["parameter"]
            .as_object_mut()
            .unwrap()
            .remove("RH2M");
        assert!(matches!(
            parse_power_response(&payload),
            Err(SourceError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_properties_is_malformed() {
        let payload = json!({"messages": ["bad request"], "header": {}});
        assert!(parse_power_response(&payload).is_err());
    }

    #[test]
    fn series_of_fill_values_is_malformed() {
        let mut payload = sample_payload();
        payload["properties"]["parameter"]["T2M"] =
            json!({"20250101": -999.0, "20250102": -999.0});
        assert!(parse_power_response(&payload).is_err());
    }

    #[test]
    fn non_numeric_sample_is_malformed() {
        let mut payload = sample_payload();
        payload["properties"]["parameter"]["WD10M"]["20250102"] = json!("n/a");
        assert!(parse_power_response(&payload).is_err());
    }
}
