use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{AppError, Result};
use crate::models::{Coordinate, PointOfInterest};

use super::PoiStore;

#[derive(sqlx::FromRow)]
struct PoiRow {
    id: String,
    name: String,
    category: String,
    lat: f64,
    lng: f64,
    address: String,
    rating: f64, // SQLite REAL is always f64
    description: String,
    visited: bool,
    created_at: String,
}

impl PoiRow {
    fn into_poi(self) -> PointOfInterest {
        let id = self.id.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid UUID '{}' for POI '{}', using nil", self.id, self.name);
            uuid::Uuid::nil()
        });

        let created_at = OffsetDateTime::parse(&self.created_at, &Rfc3339).unwrap_or_else(|e| {
            tracing::warn!(
                "Invalid created_at '{}' for POI '{}': {}, using epoch",
                self.created_at,
                self.name,
                e
            );
            OffsetDateTime::UNIX_EPOCH
        });

        PointOfInterest {
            id,
            name: self.name,
            category: self.category,
            coordinate: Coordinate {
                lat: self.lat,
                lng: self.lng,
            },
            address: self.address,
            rating: self.rating as f32,
            description: self.description,
            visited: self.visited,
            created_at,
        }
    }
}

pub struct SqlitePoiStore {
    pool: SqlitePool,
}

impl SqlitePoiStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the POI schema. Idempotent.
    pub async fn create_schema(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS pois (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                lat REAL NOT NULL,
                lng REAL NOT NULL,
                address TEXT NOT NULL DEFAULT '',
                rating REAL NOT NULL DEFAULT 0.0,
                description TEXT NOT NULL DEFAULT '',
                visited INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl PoiStore for SqlitePoiStore {
    async fn insert(&self, poi: &PointOfInterest) -> Result<()> {
        let created_at = poi
            .created_at
            .format(&Rfc3339)
            .map_err(|e| AppError::Internal(format!("timestamp formatting failed: {}", e)))?;

        sqlx::query(
            "INSERT INTO pois (id, name, category, lat, lng, address, rating,
                               description, visited, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(poi.id.to_string())
        .bind(&poi.name)
        .bind(&poi.category)
        .bind(poi.coordinate.lat)
        .bind(poi.coordinate.lng)
        .bind(&poi.address)
        .bind(poi.rating as f64)
        .bind(&poi.description)
        .bind(poi.visited)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<PointOfInterest>> {
        let rows: Vec<PoiRow> = sqlx::query_as(
            "SELECT id, name, category, lat, lng, address, rating, description,
                    visited, created_at
             FROM pois
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PoiRow::into_poi).collect())
    }
}
