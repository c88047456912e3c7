use crate::models::Coordinate;

/// Axis-aligned bounding box in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Compute a bounding box around a center point with a radius in meters.
    /// Clamped to valid coordinate ranges; longitude span is widened near the
    /// poles where the cosine correction breaks down.
    pub fn from_center_radius(center: &Coordinate, radius_m: f64) -> Self {
        let lat_delta = radius_m / 111_000.0;
        let lng_delta = if center.lat.abs() > 85.0 {
            lat_delta
        } else {
            radius_m / (111_000.0 * center.lat.to_radians().cos())
        };

        BoundingBox {
            min_lat: (center.lat - lat_delta).max(-90.0),
            max_lat: (center.lat + lat_delta).min(90.0),
            min_lng: (center.lng - lng_delta).max(-180.0),
            max_lng: (center.lng + lng_delta).min(180.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_contains_center() {
        let center = Coordinate::new(48.8566, 2.3522).unwrap();
        let bbox = BoundingBox::from_center_radius(&center, 10_000.0);

        assert!(bbox.min_lat < center.lat && center.lat < bbox.max_lat);
        assert!(bbox.min_lng < center.lng && center.lng < bbox.max_lng);
    }

    #[test]
    fn test_bounding_box_scales_with_radius() {
        let center = Coordinate::new(48.8566, 2.3522).unwrap();
        let small = BoundingBox::from_center_radius(&center, 1_000.0);
        let large = BoundingBox::from_center_radius(&center, 10_000.0);

        assert!(large.max_lat - large.min_lat > small.max_lat - small.min_lat);
        assert!(large.max_lng - large.min_lng > small.max_lng - small.min_lng);
    }

    #[test]
    fn test_bounding_box_clamped_at_poles() {
        let center = Coordinate::new(89.9, 0.0).unwrap();
        let bbox = BoundingBox::from_center_radius(&center, 50_000.0);
        assert!(bbox.max_lat <= 90.0);
    }
}
