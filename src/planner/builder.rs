use crate::constants::UNTITLED_ROUTE_NAME;
use crate::db::RouteRepository;
use crate::directions::{DirectionsApi, Segment};
use crate::error::{AppError, Result};
use crate::models::{Coordinate, RouteWaypoint, SavedRoute, TransportMode};
use crate::planner::sequence;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Orchestrates one planning session: orders selected stops, resolves each
/// consecutive pair through the directions provider, and persists the result
/// as a named route.
///
/// Holds the working waypoint list (the in-memory sequence being edited) and
/// a cached view of the saved routes. The cache is never patched in place:
/// every mutation is followed by a full repository `list()`.
pub struct RoutePlanner {
    directions: Arc<dyn DirectionsApi>,
    repository: Arc<dyn RouteRepository>,
    segment_timeout: Duration,
    working: Vec<RouteWaypoint>,
    saved: Vec<SavedRoute>,
    preview: Option<Segment>,
}

impl RoutePlanner {
    pub fn new(
        directions: Arc<dyn DirectionsApi>,
        repository: Arc<dyn RouteRepository>,
        segment_timeout: Duration,
    ) -> Self {
        RoutePlanner {
            directions,
            repository,
            segment_timeout,
            working: Vec::new(),
            saved: Vec::new(),
            preview: None,
        }
    }

    /// The in-memory waypoint sequence currently being edited.
    pub fn working(&self) -> &[RouteWaypoint] {
        &self.working
    }

    /// Cached saved routes, most recently modified first.
    pub fn saved_routes(&self) -> &[SavedRoute] {
        &self.saved
    }

    /// Last single-pair route resolved via [`RoutePlanner::resolve_route`].
    pub fn preview(&self) -> Option<&Segment> {
        self.preview.as_ref()
    }

    /// Totals over the working list: (meters, seconds).
    pub fn summary(&self) -> (f64, f64) {
        let total_distance = self.working.iter().map(|w| w.distance_to_next).sum();
        let estimated_duration = self.working.iter().map(|w| w.travel_time_to_next).sum();
        (total_distance, estimated_duration)
    }

    /// Reload the saved-route cache from the repository.
    pub async fn refresh_saved_routes(&mut self) -> Result<()> {
        self.saved = self.repository.list().await?;
        Ok(())
    }

    /// Resolve a single origin/destination pair and keep it as the current
    /// route preview. On provider failure the previous preview stays in
    /// place.
    pub async fn resolve_route(
        &mut self,
        from: Coordinate,
        to: Coordinate,
        mode: TransportMode,
    ) -> Result<Segment> {
        let segment = self.resolve_segment(from, to, mode).await?;
        self.preview = Some(segment.clone());
        Ok(segment)
    }

    /// Order the given stops and resolve each consecutive leg.
    ///
    /// Fewer than 2 coordinates is a no-op: the working list stays as it
    /// was. Segment failures are non-fatal: the affected leg keeps zero
    /// distance and time while the remaining legs are still resolved, since
    /// a degraded route beats no route. The working list is only replaced
    /// once every leg has been attempted, so a cancelled call leaves the
    /// previous list intact.
    pub async fn optimize(
        &mut self,
        coordinates: &[Coordinate],
        mode: TransportMode,
    ) -> Result<&[RouteWaypoint]> {
        if coordinates.len() < 2 {
            tracing::debug!(
                count = coordinates.len(),
                "optimize needs at least 2 waypoints, keeping current list"
            );
            return Ok(&self.working);
        }

        let ordered = sequence::nearest_neighbor_order(coordinates);

        let mut staged: Vec<RouteWaypoint> = ordered
            .iter()
            .enumerate()
            .map(|(i, coordinate)| {
                RouteWaypoint::new(*coordinate, format!("Stop {}", i + 1), i as u32)
            })
            .collect();

        let mut resolved = 0usize;
        for i in 0..ordered.len() - 1 {
            match self.resolve_segment(ordered[i], ordered[i + 1], mode).await {
                Ok(segment) => {
                    staged[i].distance_to_next = segment.distance_meters;
                    staged[i].travel_time_to_next = segment.duration_seconds;
                    resolved += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        segment = i,
                        error = %e,
                        "segment resolution failed, continuing with zero-cost leg"
                    );
                }
            }
        }

        tracing::info!(
            waypoints = staged.len(),
            resolved,
            unresolved = staged.len() - 1 - resolved,
            "optimized route"
        );

        self.working = staged;
        Ok(&self.working)
    }

    /// Persist the working list as a named route and refresh the saved-route
    /// cache. An empty working list is a precondition violation and touches
    /// nothing; a persistence failure is surfaced and leaves both the
    /// working list and the cache as they were.
    pub async fn save(&mut self, name: &str, mode: TransportMode) -> Result<SavedRoute> {
        if self.working.is_empty() {
            return Err(AppError::Precondition(
                "no waypoints to save".to_string(),
            ));
        }

        let name = if name.is_empty() {
            UNTITLED_ROUTE_NAME
        } else {
            name
        };

        let route =
            SavedRoute::from_waypoints(name.to_string(), mode, self.working.clone(), true);

        self.repository.insert(&route).await?;
        self.saved = self.repository.list().await?;

        tracing::info!(route = %route.id, name = %route.name, "saved route");
        Ok(route)
    }

    /// Delete a saved route (waypoints cascade) and refresh the cache.
    pub async fn delete(&mut self, route_id: Uuid) -> Result<()> {
        self.repository.delete(route_id).await?;
        self.saved = self.repository.list().await?;
        Ok(())
    }

    /// Make a saved route's waypoints, sorted by `order`, the new working
    /// list for re-editing or re-optimizing.
    pub fn load(&mut self, route: &SavedRoute) -> &[RouteWaypoint] {
        self.working = route.waypoints_in_order();
        &self.working
    }

    async fn resolve_segment(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TransportMode,
    ) -> Result<Segment> {
        match tokio::time::timeout(
            self.segment_timeout,
            self.directions.resolve(origin, destination, mode),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AppError::Directions(format!(
                "segment request timed out after {}s",
                self.segment_timeout.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Straight-line segments at walking pace; optionally fails the n-th
    /// resolve call (0-based).
    struct StraightLineDirections {
        calls: AtomicUsize,
        fail_on: Option<usize>,
    }

    impl StraightLineDirections {
        fn new() -> Self {
            StraightLineDirections {
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            StraightLineDirections {
                calls: AtomicUsize::new(0),
                fail_on: Some(call),
            }
        }
    }

    #[async_trait]
    impl DirectionsApi for StraightLineDirections {
        async fn resolve(
            &self,
            origin: Coordinate,
            destination: Coordinate,
            _mode: TransportMode,
        ) -> Result<Segment> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(call) == self.fail_on {
                return Err(AppError::Directions("simulated outage".to_string()));
            }
            let distance = origin.distance_to(&destination);
            Ok(Segment {
                distance_meters: distance,
                duration_seconds: distance / 1.4,
                path: vec![origin, destination],
            })
        }
    }

    /// Never responds within any timeout.
    struct HangingDirections;

    #[async_trait]
    impl DirectionsApi for HangingDirections {
        async fn resolve(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
            _mode: TransportMode,
        ) -> Result<Segment> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    #[derive(Default)]
    struct InMemoryRepository {
        routes: Mutex<Vec<SavedRoute>>,
        fail_inserts: bool,
        inserts: AtomicUsize,
    }

    impl InMemoryRepository {
        fn failing() -> Self {
            InMemoryRepository {
                fail_inserts: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl RouteRepository for InMemoryRepository {
        async fn list(&self) -> Result<Vec<SavedRoute>> {
            let mut routes = self.routes.lock().unwrap().clone();
            routes.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
            Ok(routes)
        }

        async fn insert(&self, route: &SavedRoute) -> Result<()> {
            if self.fail_inserts {
                return Err(AppError::Database(sqlx::Error::PoolClosed));
            }
            self.inserts.fetch_add(1, Ordering::SeqCst);
            self.routes.lock().unwrap().push(route.clone());
            Ok(())
        }

        async fn delete(&self, route_id: Uuid) -> Result<()> {
            self.routes.lock().unwrap().retain(|r| r.id != route_id);
            Ok(())
        }
    }

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn planner_with(
        directions: Arc<dyn DirectionsApi>,
        repository: Arc<dyn RouteRepository>,
    ) -> RoutePlanner {
        RoutePlanner::new(directions, repository, Duration::from_secs(5))
    }

    fn square_selection() -> Vec<Coordinate> {
        vec![
            coord(48.8566, 2.3522),
            coord(48.8600, 2.3600),
            coord(48.8500, 2.3450),
            coord(48.8650, 2.3700),
        ]
    }

    #[tokio::test]
    async fn test_optimize_with_fewer_than_two_is_noop() {
        let mut planner = planner_with(
            Arc::new(StraightLineDirections::new()),
            Arc::new(InMemoryRepository::default()),
        );

        planner
            .optimize(&square_selection(), TransportMode::Walking)
            .await
            .unwrap();
        let before = planner.working().to_vec();

        planner
            .optimize(&[coord(48.0, 2.0)], TransportMode::Walking)
            .await
            .unwrap();
        assert_eq!(planner.working(), before.as_slice());

        planner.optimize(&[], TransportMode::Walking).await.unwrap();
        assert_eq!(planner.working(), before.as_slice());
    }

    #[tokio::test]
    async fn test_optimize_populates_segments_and_order() {
        let directions = Arc::new(StraightLineDirections::new());
        let mut planner =
            planner_with(directions.clone(), Arc::new(InMemoryRepository::default()));

        let waypoints = planner
            .optimize(&square_selection(), TransportMode::Walking)
            .await
            .unwrap()
            .to_vec();

        assert_eq!(waypoints.len(), 4);
        // One directions call per consecutive pair
        assert_eq!(directions.calls.load(Ordering::SeqCst), 3);

        let orders: Vec<u32> = waypoints.iter().map(|w| w.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);

        for w in &waypoints[..3] {
            assert!(w.distance_to_next > 0.0);
            assert!(w.travel_time_to_next > 0.0);
        }
        // Last waypoint has no outgoing leg
        assert_eq!(waypoints[3].distance_to_next, 0.0);
        assert_eq!(waypoints[3].travel_time_to_next, 0.0);
    }

    #[tokio::test]
    async fn test_failed_segment_is_zeroed_but_rest_resolve() {
        // Fail the middle segment of three.
        let directions = Arc::new(StraightLineDirections::failing_on(1));
        let mut planner =
            planner_with(directions.clone(), Arc::new(InMemoryRepository::default()));

        let waypoints = planner
            .optimize(&square_selection(), TransportMode::Driving)
            .await
            .unwrap()
            .to_vec();

        // No early abort: every pair was attempted and all stops kept.
        assert_eq!(waypoints.len(), 4);
        assert_eq!(directions.calls.load(Ordering::SeqCst), 3);

        assert!(waypoints[0].distance_to_next > 0.0);
        assert_eq!(waypoints[1].distance_to_next, 0.0);
        assert_eq!(waypoints[1].travel_time_to_next, 0.0);
        assert!(waypoints[2].distance_to_next > 0.0);
    }

    #[tokio::test]
    async fn test_segment_timeout_treated_as_provider_error() {
        let mut planner = RoutePlanner::new(
            Arc::new(HangingDirections),
            Arc::new(InMemoryRepository::default()),
            Duration::from_millis(20),
        );

        let waypoints = planner
            .optimize(
                &[coord(48.8566, 2.3522), coord(48.8600, 2.3600)],
                TransportMode::Walking,
            )
            .await
            .unwrap()
            .to_vec();

        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[0].distance_to_next, 0.0);
        assert_eq!(waypoints[0].travel_time_to_next, 0.0);
    }

    #[tokio::test]
    async fn test_cancelled_optimize_leaves_working_list_untouched() {
        let mut planner = RoutePlanner::new(
            Arc::new(StraightLineDirections::new()),
            Arc::new(InMemoryRepository::default()),
            Duration::from_secs(5),
        );

        planner
            .optimize(&square_selection(), TransportMode::Walking)
            .await
            .unwrap();
        let before = planner.working().to_vec();

        // Swap in a hanging provider and abandon the call mid-flight.
        let mut hanging = RoutePlanner::new(
            Arc::new(HangingDirections),
            Arc::new(InMemoryRepository::default()),
            Duration::from_secs(60),
        );
        hanging.working = before.clone();

        let selection = square_selection();
        {
            let optimize = hanging.optimize(&selection, TransportMode::Walking);
            tokio::pin!(optimize);
            let raced = tokio::time::timeout(Duration::from_millis(20), &mut optimize).await;
            assert!(raced.is_err(), "optimize should still be in flight");
        } // dropped here, before any leg resolved

        assert_eq!(hanging.working(), before.as_slice());
    }

    #[tokio::test]
    async fn test_save_rejects_empty_working_list() {
        let repository = Arc::new(InMemoryRepository::default());
        let mut planner =
            planner_with(Arc::new(StraightLineDirections::new()), repository.clone());

        let result = planner.save("Weekend trip", TransportMode::Driving).await;
        assert!(matches!(result, Err(AppError::Precondition(_))));
        // No repository mutation happened.
        assert_eq!(repository.inserts.load(Ordering::SeqCst), 0);
        assert!(repository.routes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_totals_match_waypoints_and_cache_refreshes() {
        let repository = Arc::new(InMemoryRepository::default());
        let mut planner =
            planner_with(Arc::new(StraightLineDirections::new()), repository.clone());

        planner
            .optimize(&square_selection(), TransportMode::Walking)
            .await
            .unwrap();
        let (total_distance, estimated_duration) = planner.summary();

        let route = planner.save("Paris stroll", TransportMode::Walking).await.unwrap();

        assert_eq!(route.name, "Paris stroll");
        assert!(route.is_optimized);
        assert_eq!(route.total_distance, total_distance);
        assert_eq!(route.estimated_duration, estimated_duration);
        assert!(route.totals_consistent());

        assert_eq!(planner.saved_routes().len(), 1);
        assert_eq!(planner.saved_routes()[0].id, route.id);
    }

    #[tokio::test]
    async fn test_save_empty_name_gets_default() {
        let mut planner = planner_with(
            Arc::new(StraightLineDirections::new()),
            Arc::new(InMemoryRepository::default()),
        );

        planner
            .optimize(&square_selection(), TransportMode::Driving)
            .await
            .unwrap();
        let route = planner.save("", TransportMode::Driving).await.unwrap();
        assert_eq!(route.name, UNTITLED_ROUTE_NAME);
    }

    #[tokio::test]
    async fn test_persistence_failure_surfaces_and_leaves_state() {
        let repository = Arc::new(InMemoryRepository::failing());
        let mut planner =
            planner_with(Arc::new(StraightLineDirections::new()), repository.clone());

        planner
            .optimize(&square_selection(), TransportMode::Walking)
            .await
            .unwrap();
        let working_before = planner.working().to_vec();

        let result = planner.save("Doomed", TransportMode::Walking).await;
        assert!(matches!(result, Err(AppError::Database(_))));

        // In-memory state is exactly as before the attempt.
        assert_eq!(planner.working(), working_before.as_slice());
        assert!(planner.saved_routes().is_empty());
    }

    #[tokio::test]
    async fn test_load_round_trips_visiting_order() {
        let mut planner = planner_with(
            Arc::new(StraightLineDirections::new()),
            Arc::new(InMemoryRepository::default()),
        );

        planner
            .optimize(&square_selection(), TransportMode::Walking)
            .await
            .unwrap();
        let saved = planner.save("Loop", TransportMode::Walking).await.unwrap();
        let original: Vec<Coordinate> =
            planner.working().iter().map(|w| w.coordinate).collect();

        // Shuffle the stored waypoint vec; `order` must still win.
        let mut shuffled = saved.clone();
        shuffled.waypoints.reverse();

        let loaded: Vec<Coordinate> = planner
            .load(&shuffled)
            .iter()
            .map(|w| w.coordinate)
            .collect();
        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn test_delete_refreshes_cache() {
        let repository = Arc::new(InMemoryRepository::default());
        let mut planner =
            planner_with(Arc::new(StraightLineDirections::new()), repository.clone());

        planner
            .optimize(&square_selection(), TransportMode::Walking)
            .await
            .unwrap();
        let route = planner.save("Short-lived", TransportMode::Walking).await.unwrap();
        assert_eq!(planner.saved_routes().len(), 1);

        planner.delete(route.id).await.unwrap();
        assert!(planner.saved_routes().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_route_sets_preview_and_failure_keeps_it() {
        let mut planner = planner_with(
            Arc::new(StraightLineDirections::failing_on(1)),
            Arc::new(InMemoryRepository::default()),
        );

        let from = coord(48.8566, 2.3522);
        let to = coord(48.8600, 2.3600);

        let segment = planner
            .resolve_route(from, to, TransportMode::Driving)
            .await
            .unwrap();
        assert!(segment.distance_meters > 0.0);
        assert!(planner.preview().is_some());

        // Second call fails; the first preview stays.
        let result = planner.resolve_route(from, to, TransportMode::Driving).await;
        assert!(result.is_err());
        let preview = planner.preview().unwrap();
        assert_eq!(preview.distance_meters, segment.distance_meters);
    }
}
