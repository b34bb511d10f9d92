// src/db/repository.rs
// DOCUMENTATION: Database access layer - all SQL queries
// PURPOSE: Abstract database operations from business logic

use crate::errors::ResourceError;
use crate::models::*;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Internal struct for mapping database rows to Resource struct
/// DOCUMENTATION: Handles PostGIS POINT extraction via ST_X() and ST_Y()
#[derive(Debug, FromRow)]
struct ResourceRow {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    pub type_field: String,
    pub longitude: f64, // From ST_X(location)
    pub latitude: f64,  // From ST_Y(location)
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceRow {
    /// Convert ResourceRow to Resource model
    fn to_resource(self) -> Resource {
        Resource {
            id: self.id,
            name: self.name,
            type_field: self.type_field,
            longitude: self.longitude,
            latitude: self.latitude,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const SELECT_RESOURCE: &str = r#"
    SELECT
        id, name, type,
        ST_X(location) as longitude, ST_Y(location) as latitude,
        address, created_at, updated_at
    FROM resources
"#;

/// ResourceRepository: All database operations for resources
/// DOCUMENTATION: Uses query_as for type-safe SQL queries with PostGIS support
pub struct ResourceRepository;

impl ResourceRepository {
    /// Create new resource in database
    /// DOCUMENTATION: Inserts resource and returns created record
    pub async fn create(
        pool: &PgPool,
        req: &CreateResourceRequest,
    ) -> Result<Resource, ResourceError> {
        let inserted: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO resources (name, type, address, location, created_at, updated_at)
            VALUES (
                $1, $2, $3,
                ST_SetSRID(ST_MakePoint($4, $5), 4326),
                NOW(), NOW()
            )
            RETURNING id
            "#,
        )
        .bind(&req.name) // $1
        .bind(&req.type_) // $2
        .bind(&req.address) // $3
        .bind(req.location[0]) // $4 - longitude
        .bind(req.location[1]) // $5 - latitude
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create resource: {}", e);
            ResourceError::DatabaseError(e.to_string())
        })?;

        let resource = Self::get_by_id(pool, inserted.0).await?;
        log::info!("Created resource with id: {}", resource.id);
        Ok(resource)
    }

    /// Retrieve resource by ID
    /// DOCUMENTATION: Used for GET /api/resources/{id} endpoint
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Resource, ResourceError> {
        let sql = format!("{} WHERE id = $1", SELECT_RESOURCE);

        let row = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching resource: {}", e);
                ResourceError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Resource not found: {}", id);
                ResourceError::NotFound(id.to_string())
            })?;

        Ok(row.to_resource())
    }

    /// Retrieve all resources
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Resource>, ResourceError> {
        let sql = format!("{} ORDER BY created_at", SELECT_RESOURCE);

        let rows = sqlx::query_as::<_, ResourceRow>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list resources: {}", e);
                ResourceError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().map(|r| r.to_resource()).collect())
    }

    /// Retrieve one page of resources
    /// DOCUMENTATION: Returns tuple (results, total_count) for pagination
    pub async fn list_paged(
        pool: &PgPool,
        page: i64,
        size: i64,
    ) -> Result<(Vec<Resource>, i64), ResourceError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resources")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Count query error: {}", e);
                ResourceError::DatabaseError(e.to_string())
            })?;

        let sql = format!(
            "{} ORDER BY created_at LIMIT $1 OFFSET $2",
            SELECT_RESOURCE
        );

        let rows = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(size)
            .bind(page * size)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Page query error: {}", e);
                ResourceError::DatabaseError(e.to_string())
            })?;

        Ok((rows.into_iter().map(|r| r.to_resource()).collect(), total.0))
    }

    /// Replace an existing resource
    /// DOCUMENTATION: Full update - all four fields are overwritten
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &CreateResourceRequest,
    ) -> Result<Resource, ResourceError> {
        // Verify resource exists
        let _ = Self::get_by_id(pool, id).await?;

        let updated: (Uuid,) = sqlx::query_as(
            r#"
            UPDATE resources
            SET name = $1,
                type = $2,
                address = $3,
                location = ST_SetSRID(ST_MakePoint($4, $5), 4326),
                updated_at = NOW()
            WHERE id = $6
            RETURNING id
            "#,
        )
        .bind(&req.name)
        .bind(&req.type_)
        .bind(&req.address)
        .bind(req.location[0])
        .bind(req.location[1])
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for resource {}: {}", id, e);
            ResourceError::DatabaseError(e.to_string())
        })?;

        let resource = Self::get_by_id(pool, updated.0).await?;

        log::info!("Updated resource: {}", id);
        Ok(resource)
    }

    /// Delete resource
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ResourceError> {
        let rows = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for resource {}: {}", id, e);
                ResourceError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(ResourceError::NotFound(id.to_string()));
        }

        log::info!("Deleted resource: {}", id);
        Ok(())
    }

    /// Proximity search, nearest first
    /// DOCUMENTATION: Distance is in meters against the geography cast,
    /// so results are metric-accurate rather than degree-based
    pub async fn find_within_distance(
        pool: &PgPool,
        longitude: f64,
        latitude: f64,
        meters: f64,
    ) -> Result<Vec<Resource>, ResourceError> {
        let sql = format!(
            r#"{}
            WHERE ST_DWithin(
                location::geography,
                ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
                $3
            )
            ORDER BY ST_Distance(
                location::geography,
                ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography
            )
            "#,
            SELECT_RESOURCE
        );

        let rows = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(longitude)
            .bind(latitude)
            .bind(meters)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Proximity query error: {}", e);
                ResourceError::DatabaseError(e.to_string())
            })?;

        log::debug!(
            "Proximity search at ({}, {}) within {}m: {} results",
            latitude,
            longitude,
            meters,
            rows.len()
        );

        Ok(rows.into_iter().map(|r| r.to_resource()).collect())
    }

    /// Total number of stored resources
    pub async fn count_all(pool: &PgPool) -> Result<i64, ResourceError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resources")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Count query error: {}", e);
                ResourceError::DatabaseError(e.to_string())
            })?;

        Ok(count.0)
    }
}
