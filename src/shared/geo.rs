use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in [-90, 90], longitude in [-180, 180], both finite
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Axis-aligned bounding box of the served city.
///
/// Edges are inclusive: a point lying exactly on the south-west or
/// north-east corner is inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CityBounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl CityBounds {
    pub fn new(south_west: GeoPoint, north_east: GeoPoint) -> Result<Self, String> {
        if !south_west.is_valid() || !north_east.is_valid() {
            return Err("Map bounds must be valid coordinates".to_string());
        }
        if south_west.lat >= north_east.lat || south_west.lng >= north_east.lng {
            return Err("Map bounds south-west corner must be below and left of north-east".to_string());
        }
        Ok(Self {
            south_west,
            north_east,
        })
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.is_valid()
            && point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }
}

/// Fallback address shown when the reporter gives none: "<city> - lat, lng"
pub fn default_address(city_name: &str, point: GeoPoint) -> String {
    format!("{} - {:.4}, {:.4}", city_name, point.lat, point.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mahalla() -> CityBounds {
        CityBounds::new(GeoPoint::new(30.92, 31.11), GeoPoint::new(31.02, 31.22)).unwrap()
    }

    #[test]
    fn test_contains_center() {
        assert!(mahalla().contains(GeoPoint::new(30.9700, 31.1667)));
    }

    #[test]
    fn test_edges_are_inclusive() {
        let bounds = mahalla();
        assert!(bounds.contains(GeoPoint::new(30.92, 31.11)));
        assert!(bounds.contains(GeoPoint::new(31.02, 31.22)));
        assert!(bounds.contains(GeoPoint::new(30.92, 31.22)));
    }

    #[test]
    fn test_outside_points_rejected() {
        let bounds = mahalla();
        assert!(!bounds.contains(GeoPoint::new(30.0444, 31.2357))); // Cairo
        assert!(!bounds.contains(GeoPoint::new(30.9199, 31.15)));
        assert!(!bounds.contains(GeoPoint::new(30.97, 31.2201)));
    }

    #[test]
    fn test_non_finite_points_rejected() {
        let bounds = mahalla();
        assert!(!bounds.contains(GeoPoint::new(f64::NAN, 31.15)));
        assert!(!bounds.contains(GeoPoint::new(30.97, f64::INFINITY)));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(CityBounds::new(GeoPoint::new(31.02, 31.22), GeoPoint::new(30.92, 31.11)).is_err());
        assert!(CityBounds::new(GeoPoint::new(91.0, 31.11), GeoPoint::new(92.0, 31.22)).is_err());
    }

    #[test]
    fn test_default_address_rounds_to_four_places() {
        assert_eq!(
            default_address("المحلة الكبرى", GeoPoint::new(30.970612, 31.16671)),
            "المحلة الكبرى - 30.9706, 31.1667"
        );
    }
}
