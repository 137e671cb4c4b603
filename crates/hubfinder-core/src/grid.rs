//! Sample grid generation over a bounding box.

use crate::models::{BoundingBox, GridPoint, SearchArea};
use thiserror::Error;

/// Smallest division count that still includes both endpoints.
pub const MIN_DIVISIONS: usize = 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid needs at least 2 divisions per axis, got {0}")]
    TooFewDivisions(usize),
    #[error("bounding box coordinates must be finite")]
    NonFinite,
    #[error("latitude range {min}..{max} is empty or outside [-90, 90]")]
    InvalidLatitude { min: f64, max: f64 },
    #[error("longitude range {min}..{max} is empty or outside [-180, 180]")]
    InvalidLongitude { min: f64, max: f64 },
}

/// Check the bounding box invariants.
pub fn validate_bounds(bounds: &BoundingBox) -> Result<(), GridError> {
    let values = [bounds.lat_min, bounds.lat_max, bounds.lon_min, bounds.lon_max];
    if values.iter().any(|value| !value.is_finite()) {
        return Err(GridError::NonFinite);
    }
    if bounds.lat_min >= bounds.lat_max || bounds.lat_min < -90.0 || bounds.lat_max > 90.0 {
        return Err(GridError::InvalidLatitude {
            min: bounds.lat_min,
            max: bounds.lat_max,
        });
    }
    if bounds.lon_min >= bounds.lon_max || bounds.lon_min < -180.0 || bounds.lon_max > 180.0 {
        return Err(GridError::InvalidLongitude {
            min: bounds.lon_min,
            max: bounds.lon_max,
        });
    }
    Ok(())
}

/// `count` evenly spaced values from `start` to `end`, both inclusive.
///
/// The last value is pinned to `end` so accumulated rounding never leaves
/// the grid short of the box edge.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![start];
    }
    let step = (end - start) / (count - 1) as f64;
    (0..count)
        .map(|idx| {
            if idx == count - 1 {
                end
            } else {
                start + step * idx as f64
            }
        })
        .collect()
}

/// Generate `divisions²` points covering the area, row-major
/// (outer loop latitude, inner loop longitude).
pub fn generate_grid(area: &SearchArea) -> Result<Vec<GridPoint>, GridError> {
    if area.divisions < MIN_DIVISIONS {
        return Err(GridError::TooFewDivisions(area.divisions));
    }
    validate_bounds(&area.bounds)?;

    let latitudes = linspace(area.bounds.lat_min, area.bounds.lat_max, area.divisions);
    let longitudes = linspace(area.bounds.lon_min, area.bounds.lon_max, area.divisions);

    let mut points = Vec::with_capacity(latitudes.len() * longitudes.len());
    for &lat in &latitudes {
        for &lon in &longitudes {
            points.push(GridPoint::new(lat, lon));
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
        divisions: usize,
    ) -> SearchArea {
        SearchArea {
            bounds: BoundingBox {
                lat_min,
                lat_max,
                lon_min,
                lon_max,
            },
            divisions,
        }
    }

    #[test]
    fn quito_grid_has_25_points_corner_to_corner() {
        let points = generate_grid(&SearchArea::default()).unwrap();
        assert_eq!(points.len(), 25);
        assert_eq!(points[0], GridPoint::new(-0.35, -78.60));
        assert_eq!(points[24], GridPoint::new(-0.10, -78.35));
    }

    #[test]
    fn grid_is_row_major_by_latitude() {
        let points = generate_grid(&area(0.0, 1.0, 10.0, 12.0, 3)).unwrap();
        let expected = [
            (0.0, 10.0),
            (0.0, 11.0),
            (0.0, 12.0),
            (0.5, 10.0),
            (0.5, 11.0),
            (0.5, 12.0),
            (1.0, 10.0),
            (1.0, 11.0),
            (1.0, 12.0),
        ];
        for (point, (lat, lon)) in points.iter().zip(expected) {
            assert!((point.lat - lat).abs() < 1e-12);
            assert!((point.lon - lon).abs() < 1e-12);
        }
    }

    #[test]
    fn every_point_stays_inside_the_box() {
        for divisions in 2..12 {
            let area = area(-33.9, -33.1, 150.7, 151.4, divisions);
            let points = generate_grid(&area).unwrap();
            assert_eq!(points.len(), divisions * divisions);
            assert!(points.iter().all(|point| area.bounds.contains(point)));
        }
    }

    #[test]
    fn rejects_fewer_than_two_divisions() {
        assert_eq!(
            generate_grid(&area(0.0, 1.0, 0.0, 1.0, 1)),
            Err(GridError::TooFewDivisions(1))
        );
        assert_eq!(
            generate_grid(&area(0.0, 1.0, 0.0, 1.0, 0)),
            Err(GridError::TooFewDivisions(0))
        );
    }

    #[test]
    fn rejects_inverted_or_degenerate_boxes() {
        assert!(matches!(
            generate_grid(&area(1.0, 0.0, 0.0, 1.0, 3)),
            Err(GridError::InvalidLatitude { .. })
        ));
        assert!(matches!(
            generate_grid(&area(0.0, 1.0, 5.0, 5.0, 3)),
            Err(GridError::InvalidLongitude { .. })
        ));
        assert_eq!(
            generate_grid(&area(f64::NAN, 1.0, 0.0, 1.0, 3)),
            Err(GridError::NonFinite)
        );
    }

    #[test]
    fn linspace_pins_last_value() {
        let values = linspace(-78.60, -78.35, 5);
        assert_eq!(values.len(), 5);
        assert_eq!(values[0], -78.60);
        assert_eq!(values[4], -78.35);
        assert!((values[2] - -78.475).abs() < 1e-12);
    }
}
