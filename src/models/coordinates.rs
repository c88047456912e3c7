use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinate { lat, lng })
    }

    /// Great-circle distance to another coordinate using the Haversine formula.
    /// Returns distance in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(48.8566, 2.3522).is_ok());
        assert!(Coordinate::new(91.0, 0.0).is_err()); // Invalid lat
        assert!(Coordinate::new(0.0, 181.0).is_err()); // Invalid lng
        assert!(Coordinate::new(-90.0, -180.0).is_ok()); // Boundary values
    }

    #[test]
    fn test_distance_calculation() {
        let paris = Coordinate::new(48.8566, 2.3522).unwrap();
        let london = Coordinate::new(51.5074, -0.1278).unwrap();

        let distance = paris.distance_to(&london);
        // Paris to London is approximately 344 km
        assert!((distance - 344_000.0).abs() < 10_000.0);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let point = Coordinate::new(48.8566, 2.3522).unwrap();
        assert!(point.distance_to(&point) < 1e-9);
    }

    #[test]
    fn test_distance_symmetry() {
        let a = Coordinate::new(40.7128, -74.0060).unwrap();
        let b = Coordinate::new(34.0522, -118.2437).unwrap();
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-6);
    }
}
