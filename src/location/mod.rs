use crate::models::Coordinate;
use async_trait::async_trait;

/// Supplies the user's current position on demand. The engine only consumes
/// this contract; acquiring a fix is the platform's job.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// `None` means no fix is available; callers treat that as a
    /// precondition failure, not a crash.
    async fn current(&self) -> Option<Coordinate>;
}

/// Provider pinned to a configured position (headless deployments, tests).
pub struct FixedLocationProvider {
    coordinate: Option<Coordinate>,
}

impl FixedLocationProvider {
    pub fn new(coordinate: Option<Coordinate>) -> Self {
        FixedLocationProvider { coordinate }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current(&self) -> Option<Coordinate> {
        self.coordinate
    }
}
