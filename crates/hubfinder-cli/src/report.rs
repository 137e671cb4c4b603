//! Human-readable report rendering.

use std::fmt::Write as _;

use hubfinder_core::models::{QualificationFlags, RankedZone, ZoneProfile};
use hubfinder_core::DelegatedPick;

const UNAVAILABLE: &str = "unavailable";

fn value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value:.2}{unit}"),
        None => UNAVAILABLE.to_string(),
    }
}

fn elevation(profile: &ZoneProfile) -> String {
    let rendered = value(profile.elevation_m, " m");
    if profile.quality.elevation_fallback {
        format!("{rendered} (estimated)")
    } else {
        rendered
    }
}

fn emissions(profile: &ZoneProfile) -> String {
    profile
        .carbon_t_per_year
        .map(|value| format!("{value} t/year"))
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

fn climate_line(profile: &ZoneProfile) -> String {
    let weather = &profile.weather;
    format!(
        "Temp: {}, Wind: {}, Precip: {}",
        value(weather.temperature_c, "°C"),
        value(weather.wind_speed_kmh, " km/h"),
        value(weather.precipitation_mm, " mm"),
    )
}

fn degraded_notes(profile: &ZoneProfile) -> Vec<String> {
    let quality = &profile.quality;
    let mut notes = Vec::new();
    if quality.elevation_fallback {
        notes.push("elevation estimated".to_string());
    }
    if quality.elevation_unavailable {
        notes.push("elevation unavailable".to_string());
    }
    if quality.weather_unavailable {
        notes.push("weather unavailable".to_string());
    }
    if quality.carbon_unavailable {
        notes.push("carbon unavailable".to_string());
    }
    for category in &quality.failed_searches {
        notes.push(format!("{} search failed", category.label()));
    }
    notes
}

/// Per-zone block printed while the grid is processed.
pub fn zone_diagnostics(profile: &ZoneProfile, flags: Option<&QualificationFlags>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Zone: latitude {}, longitude {}",
        profile.point.lat, profile.point.lon
    );
    let _ = writeln!(out, "  Climate -> {}, Alt: {}", climate_line(profile), elevation(profile));
    let _ = writeln!(
        out,
        "  Hospitals (0-5km): {}  (5-10km): {}",
        profile.hospitals.count_near, profile.hospitals.count_far
    );
    let _ = writeln!(
        out,
        "  Pharmacies (0-5km): {}  (5-10km): {}",
        profile.pharmacies.count_near, profile.pharmacies.count_far
    );
    let _ = writeln!(out, "  Retail total (0-10km): {}", profile.retail.count_total);
    let _ = writeln!(out, "  Logistics total (0-10km): {}", profile.logistics.count_total);
    if let Some(flags) = flags {
        let _ = writeln!(
            out,
            "  => Climate/altitude: {}, Business: {}, ALL: {}",
            flags.climate_ok, flags.business_ok, flags.all_ok
        );
    }
    let notes = degraded_notes(profile);
    if !notes.is_empty() {
        let _ = writeln!(out, "  Degraded data: {}", notes.join(", "));
    }
    out.push('\n');
    out
}

/// Final summary for the local ranking strategy.
pub fn ranking_summary(city: &str, ranked: &[RankedZone]) -> String {
    if ranked.is_empty() {
        return format!("No zone in {city} meets every climate, altitude and business criterion.\n");
    }

    let mut out = format!(
        "Top {} locations in {city} for a new drone station (climate, altitude and business criteria):\n",
        ranked.len()
    );
    for (idx, zone) in ranked.iter().enumerate() {
        let profile = &zone.profile;
        let _ = writeln!(
            out,
            "{}. Lat: {}, Lon: {}",
            idx + 1,
            profile.point.lat,
            profile.point.lon
        );
        let _ = writeln!(out, "   - CO2 emissions: {}", emissions(profile));
        let _ = writeln!(out, "   - Altitude: {}", elevation(profile));
        let _ = writeln!(out, "   - Climate -> {}", climate_line(profile));
        let _ = writeln!(
            out,
            "   - Hospitals 0-5km: {}, 5-10km: {}",
            profile.hospitals.count_near, profile.hospitals.count_far
        );
        let _ = writeln!(
            out,
            "   - Pharmacies 0-5km: {}, 5-10km: {}",
            profile.pharmacies.count_near, profile.pharmacies.count_far
        );
        let _ = writeln!(out, "   - Retail total (0-10km): {}", profile.retail.count_total);
        let _ = writeln!(
            out,
            "   - Logistics total (0-10km): {}\n",
            profile.logistics.count_total
        );
    }
    out
}

/// Final summary for the delegated strategy. Values come from the
/// validated reply; the candidate profile supplies what the model was not
/// asked to echo.
pub fn delegation_summary(city: &str, picks: &[DelegatedPick], profiles: &[ZoneProfile]) -> String {
    let mut out = format!("Delegated top {} locations in {city}:\n", picks.len());
    for (idx, pick) in picks.iter().enumerate() {
        let record = &pick.record;
        let _ = writeln!(
            out,
            "{}. Lat: {}, Lon: {}",
            idx + 1,
            record.latitude,
            record.longitude
        );
        let _ = writeln!(out, "   - Logistics companies: {}", record.logistics_companies);
        let _ = writeln!(
            out,
            "   - CO2 emissions: {}",
            record
                .emissions_t_per_year
                .map(|value| format!("{value:.0} t/year"))
                .unwrap_or_else(|| UNAVAILABLE.to_string())
        );
        let _ = writeln!(
            out,
            "   - Weather -> Temp: {}, Humidity: {}, Wind: {}",
            value(record.weather.avg_temperature_c, "°C"),
            value(record.weather.avg_humidity_pct, "%"),
            value(record.weather.avg_wind_speed_ms, " m/s"),
        );
        if let Some(profile) = profiles.get(pick.zone_index) {
            let _ = writeln!(out, "   - Altitude: {}", elevation(profile));
        }
        out.push('\n');
    }
    out
}
