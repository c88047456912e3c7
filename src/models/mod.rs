pub mod coordinates;
pub mod geo;
pub mod poi;
pub mod route;

pub use coordinates::Coordinate;
pub use geo::BoundingBox;
pub use poi::PointOfInterest;
pub use route::{RouteWaypoint, SavedRoute, TransportMode};
