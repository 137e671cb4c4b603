//! Service configuration from environment.

use std::env;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;

use crate::error::SourceError;

pub const DEFAULT_PLACES_URL: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
pub const DEFAULT_ELEVATION_URL: &str = "https://maps.googleapis.com/maps/api/elevation/json";
pub const DEFAULT_OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/elevation";
pub const DEFAULT_POWER_URL: &str = "https://power.larc.nasa.gov/api/temporal/daily/point";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Band used when the elevation service has no answer (m).
pub const DEFAULT_ELEVATION_FALLBACK_M: (f64, f64) = (2800.0, 2900.0);

const DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub google_api_key: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub places_url: String,
    pub elevation_url: String,
    pub open_meteo_url: String,
    pub power_url: String,
    pub gemini_url: String,
    /// First day of the weather averaging window
    pub weather_start: NaiveDate,
    /// Last day of the weather averaging window, inclusive
    pub weather_end: NaiveDate,
    pub request_timeout_s: u64,
    /// `None` disables the fallback and leaves elevation unavailable
    pub elevation_fallback_m: Option<(f64, f64)>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            google_api_key: String::new(),
            gemini_api_key: String::new(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            places_url: DEFAULT_PLACES_URL.to_string(),
            elevation_url: DEFAULT_ELEVATION_URL.to_string(),
            open_meteo_url: DEFAULT_OPEN_METEO_URL.to_string(),
            power_url: DEFAULT_POWER_URL.to_string(),
            gemini_url: DEFAULT_GEMINI_URL.to_string(),
            weather_start: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid default date"),
            weather_end: NaiveDate::from_ymd_opt(2025, 1, 10).expect("valid default date"),
            request_timeout_s: 10,
            elevation_fallback_m: Some(DEFAULT_ELEVATION_FALLBACK_M),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let (weather_start, weather_end) = weather_window(
            env::var("WEATHER_START").ok().and_then(|s| parse_date(&s)),
            env::var("WEATHER_END").ok().and_then(|s| parse_date(&s)),
            (defaults.weather_start, defaults.weather_end),
        );
        Self {
            google_api_key: env::var("GOOGLE_MAPS_API_KEY").unwrap_or_default(),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            places_url: env::var("PLACES_URL").unwrap_or(defaults.places_url),
            elevation_url: env::var("ELEVATION_URL").unwrap_or(defaults.elevation_url),
            open_meteo_url: env::var("OPEN_METEO_URL").unwrap_or(defaults.open_meteo_url),
            power_url: env::var("POWER_URL").unwrap_or(defaults.power_url),
            gemini_url: env::var("GEMINI_URL").unwrap_or(defaults.gemini_url),
            weather_start,
            weather_end,
            request_timeout_s: env::var("REQUEST_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&s| s > 0)
                .unwrap_or(defaults.request_timeout_s),
            elevation_fallback_m: fallback_from_env(defaults.elevation_fallback_m),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_s.max(1))
    }

    /// Shared HTTP client for every service.
    pub fn http_client(&self) -> Result<Client, SourceError> {
        Client::builder()
            .timeout(self.request_timeout())
            .build()
            .map_err(SourceError::http("http client"))
    }
}

/// Parse a `YYYYMMDD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Render a date the way the weather service expects it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Resolve the weather averaging window. An inverted window would make
/// every weather request fail, so it falls back to `defaults`.
fn weather_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    defaults: (NaiveDate, NaiveDate),
) -> (NaiveDate, NaiveDate) {
    let start = start.unwrap_or(defaults.0);
    let end = end.unwrap_or(defaults.1);
    if start <= end {
        return (start, end);
    }
    tracing::warn!(
        "Ignoring inverted weather window {}..{}, using {}..{}",
        format_date(start),
        format_date(end),
        format_date(defaults.0),
        format_date(defaults.1)
    );
    defaults
}

fn fallback_from_env(default: Option<(f64, f64)>) -> Option<(f64, f64)> {
    fallback_band(
        env::var("ELEVATION_FALLBACK").ok().as_deref(),
        env::var("ELEVATION_FALLBACK_MIN").ok().as_deref(),
        env::var("ELEVATION_FALLBACK_MAX").ok().as_deref(),
        default,
    )
}

/// Resolve the elevation fallback band from its raw settings. `switch` set
/// to `off` disables the fallback.
fn fallback_band(
    switch: Option<&str>,
    min: Option<&str>,
    max: Option<&str>,
    default: Option<(f64, f64)>,
) -> Option<(f64, f64)> {
    if switch.is_some_and(|value| value.trim().eq_ignore_ascii_case("off")) {
        return None;
    }
    let (default_min, default_max) = default.unwrap_or(DEFAULT_ELEVATION_FALLBACK_M);
    let min = min
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(default_min);
    let max = max
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(default_max);
    if min.is_finite() && max.is_finite() && min <= max {
        Some((min, max))
    } else {
        tracing::warn!(
            "Ignoring invalid elevation fallback band {}..{}, using {}..{}",
            min,
            max,
            default_min,
            default_max
        );
        Some((default_min, default_max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_round_trip_in_service_format() {
        let date = parse_date("20250110").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(format_date(date), "20250110");
        assert!(parse_date("2025-01-10").is_none());
    }

    #[test]
    fn defaults_match_the_quito_study() {
        let config = ServiceConfig::default();
        assert_eq!(format_date(config.weather_start), "20250101");
        assert_eq!(format_date(config.weather_end), "20250110");
        assert_eq!(config.elevation_fallback_m, Some((2800.0, 2900.0)));
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn weather_window_keeps_ordered_dates() {
        let defaults = (date(1), date(10));
        assert_eq!(weather_window(None, None, defaults), defaults);
        assert_eq!(
            weather_window(Some(date(3)), Some(date(3)), defaults),
            (date(3), date(3))
        );
        assert_eq!(weather_window(Some(date(5)), None, defaults), (date(5), date(10)));
    }

    #[test]
    fn inverted_weather_window_falls_back_to_defaults() {
        let defaults = (date(1), date(10));
        assert_eq!(weather_window(Some(date(20)), Some(date(2)), defaults), defaults);
        assert_eq!(weather_window(Some(date(15)), None, defaults), defaults);
    }

    #[test]
    fn fallback_band_can_be_switched_off() {
        let default = Some(DEFAULT_ELEVATION_FALLBACK_M);
        assert_eq!(fallback_band(Some("off"), None, None, default), None);
        assert_eq!(fallback_band(Some(" OFF "), Some("100"), None, default), None);
        assert_eq!(
            fallback_band(Some("on"), None, None, default),
            Some((2800.0, 2900.0))
        );
    }

    #[test]
    fn fallback_band_reads_overrides_and_rejects_bad_ones() {
        let default = Some(DEFAULT_ELEVATION_FALLBACK_M);
        assert_eq!(
            fallback_band(None, Some("2500"), Some("2600"), default),
            Some((2500.0, 2600.0))
        );
        assert_eq!(
            fallback_band(None, Some("2700"), None, default),
            Some((2700.0, 2900.0))
        );
        // min above max, or unparsable values, keep the default band
        assert_eq!(
            fallback_band(None, Some("3000"), Some("2000"), default),
            Some((2800.0, 2900.0))
        );
        assert_eq!(
            fallback_band(None, Some("high"), Some("NaN"), default),
            Some((2800.0, 2900.0))
        );
    }
}
