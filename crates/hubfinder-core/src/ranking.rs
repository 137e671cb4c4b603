//! Local selection strategy: filter qualifying zones and rank them.

use std::cmp::Reverse;

use crate::criteria::evaluate;
use crate::models::{QualificationFlags, RankedZone, ZoneProfile};
use crate::rules::{SitingRules, MAX_TOP_N};

/// Evaluate every profile, keeping input order.
pub fn evaluate_all(
    profiles: &[ZoneProfile],
    rules: &SitingRules,
) -> Vec<(ZoneProfile, QualificationFlags)> {
    profiles
        .iter()
        .map(|profile| (profile.clone(), evaluate(profile, rules)))
        .collect()
}

/// Composite sort key: more logistics first, then more retail.
fn rank_key(profile: &ZoneProfile) -> Reverse<(u32, u32)> {
    Reverse((profile.logistics.count_total, profile.retail.count_total))
}

/// Keep zones passing every rule, order them by the composite key and
/// return at most `rules.top_n` (never more than [`MAX_TOP_N`]). Ties keep
/// input order.
pub fn select_top(profiles: &[ZoneProfile], rules: &SitingRules) -> Vec<RankedZone> {
    let mut qualifying: Vec<RankedZone> = evaluate_all(profiles, rules)
        .into_iter()
        .filter(|(_, flags)| flags.all_ok)
        .map(|(profile, flags)| RankedZone { profile, flags })
        .collect();

    // sort_by_key is stable
    qualifying.sort_by_key(|zone| rank_key(&zone.profile));
    qualifying.truncate(rules.top_n.min(MAX_TOP_N));
    qualifying
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataQuality, GridPoint, ProximityCount, WeatherReading};

    fn total(total: u32) -> ProximityCount {
        ProximityCount {
            count_near: total,
            count_far: 0,
            count_total: total,
        }
    }

    fn zone(lat: f64, logistics: u32, retail: u32) -> ZoneProfile {
        ZoneProfile {
            point: GridPoint::new(lat, -78.5),
            carbon_t_per_year: Some(45_000),
            elevation_m: Some(2_820.0),
            weather: WeatherReading {
                temperature_c: Some(20.0),
                wind_speed_kmh: Some(5.0),
                wind_direction_deg: Some(90.0),
                precipitation_mm: Some(810.0),
                humidity_pct: None,
            },
            hospitals: total(1),
            pharmacies: total(1),
            retail: total(retail),
            logistics: total(logistics),
            quality: DataQuality::default(),
        }
    }

    fn lats(ranked: &[RankedZone]) -> Vec<f64> {
        ranked.iter().map(|zone| zone.profile.point.lat).collect()
    }

    #[test]
    fn orders_by_logistics_then_retail() {
        let profiles = vec![
            zone(1.0, 3, 20),
            zone(2.0, 5, 12),
            zone(3.0, 3, 30),
            zone(4.0, 2, 50),
        ];
        let ranked = select_top(&profiles, &SitingRules::default());
        assert_eq!(lats(&ranked), vec![2.0, 3.0, 1.0]);
        assert!(ranked.iter().all(|zone| zone.flags.all_ok));
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let profiles = vec![zone(1.0, 4, 15), zone(2.0, 4, 15), zone(3.0, 4, 15)];
        let ranked = select_top(&profiles, &SitingRules::default());
        assert_eq!(lats(&ranked), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn never_returns_more_than_three() {
        let profiles: Vec<ZoneProfile> = (0..10)
            .map(|idx| zone(idx as f64, 2 + idx, 11 + idx))
            .collect();
        let ranked = select_top(&profiles, &SitingRules::default());
        assert_eq!(ranked.len(), 3);
        assert_eq!(lats(&ranked), vec![9.0, 8.0, 7.0]);
    }

    #[test]
    fn larger_top_n_is_capped_at_three() {
        let profiles: Vec<ZoneProfile> = (0..6).map(|idx| zone(idx as f64, 2 + idx, 11)).collect();
        let rules = SitingRules {
            top_n: 5,
            ..SitingRules::default()
        };
        assert_eq!(lats(&select_top(&profiles, &rules)), vec![5.0, 4.0, 3.0]);

        let rules = SitingRules {
            top_n: 1,
            ..SitingRules::default()
        };
        assert_eq!(lats(&select_top(&profiles, &rules)), vec![5.0]);
    }

    #[test]
    fn fewer_results_only_when_fewer_qualify() {
        let mut failing = zone(9.0, 10, 40);
        failing.elevation_m = None;
        let profiles = vec![zone(1.0, 2, 11), failing, zone(2.0, 3, 11)];
        let ranked = select_top(&profiles, &SitingRules::default());
        assert_eq!(lats(&ranked), vec![2.0, 1.0]);
    }

    #[test]
    fn empty_when_nothing_qualifies() {
        let profiles = vec![zone(1.0, 1, 50), zone(2.0, 9, 10)];
        assert!(select_top(&profiles, &SitingRules::default()).is_empty());
        assert!(select_top(&[], &SitingRules::default()).is_empty());
    }

    #[test]
    fn permutation_does_not_change_unique_ranking() {
        let profiles = vec![
            zone(1.0, 2, 14),
            zone(2.0, 6, 11),
            zone(3.0, 4, 19),
            zone(4.0, 4, 21),
            zone(5.0, 3, 12),
        ];
        let expected = lats(&select_top(&profiles, &SitingRules::default()));
        let mut reversed = profiles.clone();
        reversed.reverse();
        let mut rotated = profiles.clone();
        rotated.rotate_left(2);
        assert_eq!(lats(&select_top(&reversed, &SitingRules::default())), expected);
        assert_eq!(lats(&select_top(&rotated, &SitingRules::default())), expected);
        assert_eq!(expected, vec![2.0, 4.0, 3.0]);
    }

    #[test]
    fn evaluate_all_keeps_input_order() {
        let profiles = vec![zone(3.0, 1, 1), zone(1.0, 5, 20), zone(2.0, 2, 12)];
        let evaluated = evaluate_all(&profiles, &SitingRules::default());
        let order: Vec<f64> = evaluated.iter().map(|(p, _)| p.point.lat).collect();
        assert_eq!(order, vec![3.0, 1.0, 2.0]);
        assert!(!evaluated[0].1.all_ok);
        assert!(evaluated[1].1.all_ok);
    }
}
