//! Alternate selection strategy: ask a text generation model for the top
//! zones and validate what comes back.
//!
//! The reply is treated as untrusted text. Nothing from it is used until it
//! parses as exactly the requested records and every record names one of
//! the candidate zones.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ZoneProfile;

/// Number of zones the model is asked to pick.
pub const PICK_COUNT: usize = 3;

/// Maximum coordinate drift (degrees) accepted when matching a pick back to
/// a candidate zone.
pub const COORDINATE_TOLERANCE_DEG: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum DelegationError {
    #[error("no candidate zones to delegate")]
    NoCandidates,
    #[error("delegation reply was empty")]
    EmptyReply,
    #[error("delegation reply is not a JSON array of zone records: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("delegation reply has {found} records, expected {expected}")]
    WrongCount { expected: usize, found: usize },
    #[error("delegation reply record {index} has non-finite coordinates")]
    NonFiniteCoordinate { index: usize },
    #[error("delegation reply names unknown zone ({lat}, {lon})")]
    UnknownZone { lat: f64, lon: f64 },
    #[error("delegation reply names zone ({lat}, {lon}) more than once")]
    DuplicateZone { lat: f64, lon: f64 },
}

/// Weather block of a reply record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickWeather {
    pub avg_temperature_c: Option<f64>,
    pub avg_humidity_pct: Option<f64>,
    pub avg_wind_speed_ms: Option<f64>,
}

/// One record of the reply schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub logistics_companies: u32,
    pub emissions_t_per_year: Option<f64>,
    pub weather: PickWeather,
}

/// A validated pick, linked to the candidate it names.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegatedPick {
    pub record: PickRecord,
    /// Index into the candidate slice the prompt was built from.
    pub zone_index: usize,
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value:.2}{unit}"),
        None => "unavailable".to_string(),
    }
}

/// Build the instruction sent to the model.
pub fn build_prompt(city: &str, candidates: &[ZoneProfile]) -> Result<String, DelegationError> {
    if candidates.is_empty() {
        return Err(DelegationError::NoCandidates);
    }
    let count = PICK_COUNT.min(candidates.len());

    let mut prompt = format!(
        "Given the following grid zones in {city}, select the {count} best locations for a new \
         drone logistics station. Favour zones with many logistics companies, consider the \
         carbon footprint, and prefer favourable weather conditions. Zone data:\n\n"
    );
    for zone in candidates {
        let emissions = zone
            .carbon_t_per_year
            .map(|value| format!("{value} t/year"))
            .unwrap_or_else(|| "unavailable".to_string());
        // Writing to a String cannot fail.
        let _ = writeln!(
            prompt,
            "Coordinates: ({}, {}); Logistics companies: {}; CO2: {}; \
             Average temperature: {}; Average humidity: {}; Average wind: {}.",
            zone.point.lat,
            zone.point.lon,
            zone.logistics.count_total,
            emissions,
            fmt_opt(zone.weather.temperature_c, "°C"),
            fmt_opt(zone.weather.humidity_pct, "%"),
            fmt_opt(zone.weather.wind_speed_ms(), " m/s"),
        );
    }

    let record = "{\"latitude\": value, \"longitude\": value, \"logistics_companies\": value, \
                  \"emissions_t_per_year\": value, \"weather\": {\"avg_temperature_c\": value, \
                  \"avg_humidity_pct\": value, \"avg_wind_speed_ms\": value}}";
    let _ = write!(
        prompt,
        "\nReturn only the top {count} in exactly this format, copying coordinates verbatim and \
         using null for unavailable values:\n[\n"
    );
    for idx in 0..count {
        let separator = if idx + 1 < count { "," } else { "" };
        let _ = writeln!(prompt, "  {record}{separator}");
    }
    prompt.push_str("]\nDo not add any other text or explanation.");
    Ok(prompt)
}

/// Drop a surrounding Markdown code fence, if any.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") up to the first newline.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Validate a model reply against the candidates the prompt described.
pub fn parse_reply(
    reply: &str,
    candidates: &[ZoneProfile],
) -> Result<Vec<DelegatedPick>, DelegationError> {
    let body = strip_code_fence(reply);
    if body.is_empty() {
        return Err(DelegationError::EmptyReply);
    }

    let records: Vec<PickRecord> = serde_json::from_str(body).map_err(DelegationError::Malformed)?;
    let expected = PICK_COUNT.min(candidates.len());
    if records.len() != expected {
        return Err(DelegationError::WrongCount {
            expected,
            found: records.len(),
        });
    }

    let mut picks: Vec<DelegatedPick> = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if !record.latitude.is_finite() || !record.longitude.is_finite() {
            return Err(DelegationError::NonFiniteCoordinate { index });
        }
        let zone_index = candidates
            .iter()
            .position(|zone| {
                (zone.point.lat - record.latitude).abs() <= COORDINATE_TOLERANCE_DEG
                    && (zone.point.lon - record.longitude).abs() <= COORDINATE_TOLERANCE_DEG
            })
            .ok_or(DelegationError::UnknownZone {
                lat: record.latitude,
                lon: record.longitude,
            })?;
        if picks.iter().any(|pick| pick.zone_index == zone_index) {
            return Err(DelegationError::DuplicateZone {
                lat: record.latitude,
                lon: record.longitude,
            });
        }
        picks.push(DelegatedPick { record, zone_index });
    }
    Ok(picks)
}
