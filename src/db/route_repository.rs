use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Coordinate, RouteWaypoint, SavedRoute};

use super::RouteRepository;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct RouteRow {
    id: String,
    name: String,
    total_distance: f64,
    estimated_duration: f64,
    transport_mode: String,
    is_optimized: bool,
    created_at: String,
    last_modified: String,
}

impl RouteRow {
    fn into_saved_route(self, waypoints: Vec<RouteWaypoint>) -> SavedRoute {
        let id = parse_uuid(&self.id, "route");

        let transport_mode = self.transport_mode.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid transport mode '{}' for route '{}', defaulting",
                self.transport_mode,
                self.name
            );
            Default::default()
        });

        SavedRoute {
            id,
            name: self.name,
            total_distance: self.total_distance,
            estimated_duration: self.estimated_duration,
            transport_mode,
            waypoints,
            created_at: parse_timestamp(&self.created_at, "created_at"),
            last_modified: parse_timestamp(&self.last_modified, "last_modified"),
            is_optimized: self.is_optimized,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WaypointRow {
    id: String,
    position: i64,
    name: String,
    lat: f64,
    lng: f64,
    distance_to_next: f64,
    travel_time_to_next: f64,
}

impl WaypointRow {
    fn into_waypoint(self) -> RouteWaypoint {
        RouteWaypoint {
            id: parse_uuid(&self.id, "waypoint"),
            coordinate: Coordinate {
                lat: self.lat,
                lng: self.lng,
            },
            name: self.name,
            order: self.position.max(0) as u32,
            distance_to_next: self.distance_to_next,
            travel_time_to_next: self.travel_time_to_next,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_uuid(value: &str, what: &str) -> Uuid {
    value.parse::<Uuid>().unwrap_or_else(|_| {
        tracing::warn!("Invalid UUID '{}' for {}, using nil", value, what);
        Uuid::nil()
    })
}

fn parse_timestamp(value: &str, field: &str) -> OffsetDateTime {
    OffsetDateTime::parse(value, &Rfc3339).unwrap_or_else(|e| {
        tracing::warn!("Invalid {} timestamp '{}': {}, using epoch", field, value, e);
        OffsetDateTime::UNIX_EPOCH
    })
}

fn format_timestamp(value: OffsetDateTime) -> Result<String> {
    value
        .format(&Rfc3339)
        .map_err(|e| AppError::Internal(format!("timestamp formatting failed: {}", e)))
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

pub struct SqliteRouteRepository {
    pool: SqlitePool,
}

impl SqliteRouteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the routes schema. Idempotent.
    pub async fn create_schema(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS routes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                total_distance REAL NOT NULL DEFAULT 0.0,
                estimated_duration REAL NOT NULL DEFAULT 0.0,
                transport_mode TEXT NOT NULL,
                is_optimized INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                last_modified TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS route_waypoints (
                id TEXT PRIMARY KEY,
                route_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                lat REAL NOT NULL,
                lng REAL NOT NULL,
                distance_to_next REAL NOT NULL DEFAULT 0.0,
                travel_time_to_next REAL NOT NULL DEFAULT 0.0
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_route_waypoints_route ON route_waypoints(route_id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RouteRepository for SqliteRouteRepository {
    async fn list(&self) -> Result<Vec<SavedRoute>> {
        let rows: Vec<RouteRow> = sqlx::query_as(
            "SELECT id, name, total_distance, estimated_duration, transport_mode,
                    is_optimized, created_at, last_modified
             FROM routes",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut routes = Vec::with_capacity(rows.len());
        for row in rows {
            let waypoint_rows: Vec<WaypointRow> = sqlx::query_as(
                "SELECT id, position, name, lat, lng, distance_to_next, travel_time_to_next
                 FROM route_waypoints
                 WHERE route_id = ?1
                 ORDER BY position",
            )
            .bind(&row.id)
            .fetch_all(&self.pool)
            .await?;

            let waypoints = waypoint_rows
                .into_iter()
                .map(WaypointRow::into_waypoint)
                .collect();
            routes.push(row.into_saved_route(waypoints));
        }

        // Sorted after parsing: RFC 3339 trims trailing fractional zeros, so
        // the TEXT column ordering alone is not total.
        routes.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

        Ok(routes)
    }

    async fn insert(&self, route: &SavedRoute) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO routes (id, name, total_distance, estimated_duration,
                                 transport_mode, is_optimized, created_at, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(route.id.to_string())
        .bind(&route.name)
        .bind(route.total_distance)
        .bind(route.estimated_duration)
        .bind(route.transport_mode.to_string())
        .bind(route.is_optimized)
        .bind(format_timestamp(route.created_at)?)
        .bind(format_timestamp(route.last_modified)?)
        .execute(&mut *tx)
        .await?;

        for waypoint in &route.waypoints {
            sqlx::query(
                "INSERT INTO route_waypoints (id, route_id, position, name, lat, lng,
                                              distance_to_next, travel_time_to_next)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(waypoint.id.to_string())
            .bind(route.id.to_string())
            .bind(waypoint.order as i64)
            .bind(&waypoint.name)
            .bind(waypoint.coordinate.lat)
            .bind(waypoint.coordinate.lng)
            .bind(waypoint.distance_to_next)
            .bind(waypoint.travel_time_to_next)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, route_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM route_waypoints WHERE route_id = ?1")
            .bind(route_id.to_string())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM routes WHERE id = ?1")
            .bind(route_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("route {} not found", route_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "route_repository_tests.rs"]
mod route_repository_tests;
