//! Threshold evaluation of enriched zones.

use crate::models::{QualificationFlags, ZoneProfile};
use crate::rules::SitingRules;

/// Climate and altitude check. Any unavailable input fails the zone.
pub fn climate_ok(profile: &ZoneProfile, rules: &SitingRules) -> bool {
    let weather = &profile.weather;
    let temperature_ok = weather
        .temperature_c
        .is_some_and(|t| t >= rules.temp_min_c && t <= rules.temp_max_c);
    let wind_ok = weather
        .wind_speed_kmh
        .is_some_and(|w| w < rules.wind_max_kmh);
    let precipitation_ok = weather
        .precipitation_mm
        .is_some_and(|p| p < rules.precipitation_max_mm);
    let elevation_ok = profile
        .elevation_m
        .is_some_and(|e| e < rules.elevation_max_m);

    temperature_ok && wind_ok && precipitation_ok && elevation_ok
}

/// Commercial density check.
pub fn business_ok(profile: &ZoneProfile, rules: &SitingRules) -> bool {
    profile.hospitals.count_near >= rules.hospitals_near_min
        && profile.pharmacies.count_near >= rules.pharmacies_near_min
        && profile.retail.count_total > rules.retail_total_above
        && profile.logistics.count_total >= rules.logistics_total_min
}

pub fn evaluate(profile: &ZoneProfile, rules: &SitingRules) -> QualificationFlags {
    let climate_ok = climate_ok(profile, rules);
    let business_ok = business_ok(profile, rules);
    QualificationFlags {
        climate_ok,
        business_ok,
        all_ok: climate_ok && business_ok,
    }
}
