use crate::models::Coordinate;

/// Order waypoints with a greedy nearest-neighbor pass.
///
/// The first element is a fixed start anchor and the last a fixed destination
/// anchor; only the interior stops are reordered. From the current position
/// the closest unvisited interior stop is appended next, ties resolved to the
/// first-encountered index so the result is deterministic.
///
/// This is a heuristic, not an optimum: O(n²) over the interior count, which
/// is fine for human-curated selections. Fewer than 3 points have only one
/// valid sequence and come back unchanged.
pub fn nearest_neighbor_order(waypoints: &[Coordinate]) -> Vec<Coordinate> {
    if waypoints.len() < 3 {
        return waypoints.to_vec();
    }

    let last = waypoints.len() - 1;
    let interior = &waypoints[1..last];
    // Visited bitmask over a fixed slice instead of removing from a Vec.
    let mut visited = vec![false; interior.len()];

    let mut ordered = Vec::with_capacity(waypoints.len());
    ordered.push(waypoints[0]);
    let mut current = waypoints[0];

    for _ in 0..interior.len() {
        let mut nearest: Option<(usize, f64)> = None;
        for (i, candidate) in interior.iter().enumerate() {
            if visited[i] {
                continue;
            }
            let distance = current.distance_to(candidate);
            // Strict comparison keeps the earliest index on ties.
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((i, distance)),
            }
        }

        if let Some((i, _)) = nearest {
            visited[i] = true;
            current = interior[i];
            ordered.push(current);
        }
    }

    ordered.push(waypoints[last]);
    ordered
}
