// src/services/resource_service.rs
// DOCUMENTATION: Business logic for resources
// PURPOSE: Intermediary between handlers and repository, owns validation

use crate::db::ResourceRepository;
use crate::errors::ResourceError;
use crate::models::{CreateResourceRequest, PagedResponse, ResourceResponse};
use sqlx::PgPool;
use uuid::Uuid;

/// Miles to meters conversion used by the proximity search
pub const MILES_TO_METERS: f64 = 1609.34;

pub struct ResourceService;

impl ResourceService {
    /// Create a new resource
    pub async fn create(
        pool: &PgPool,
        req: CreateResourceRequest,
    ) -> Result<ResourceResponse, ResourceError> {
        Self::validate_resource(&req)?;
        log::info!("Adding new resource: {}", req.name);
        let resource = ResourceRepository::create(pool, &req).await?;
        Ok(resource.to_response())
    }

    /// Get a resource by ID
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<ResourceResponse, ResourceError> {
        let resource = ResourceRepository::get_by_id(pool, id).await?;
        Ok(resource.to_response())
    }

    /// List all resources
    pub async fn list(pool: &PgPool) -> Result<Vec<ResourceResponse>, ResourceError> {
        let resources = ResourceRepository::list_all(pool).await?;
        Ok(resources.iter().map(|r| r.to_response()).collect())
    }

    /// List one page of resources
    /// DOCUMENTATION: Page numbers are 0-based; size is clamped to 1..=100
    pub async fn list_paged(
        pool: &PgPool,
        page: i64,
        size: i64,
    ) -> Result<PagedResponse, ResourceError> {
        let page = page.max(0);
        let size = size.clamp(1, 100);

        let (resources, total_count) = ResourceRepository::list_paged(pool, page, size).await?;
        let has_more = total_count > (page + 1) * size;

        Ok(PagedResponse {
            data: resources.iter().map(|r| r.to_response()).collect(),
            total_count,
            page,
            size,
            has_more,
        })
    }

    /// Replace an existing resource
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: CreateResourceRequest,
    ) -> Result<ResourceResponse, ResourceError> {
        Self::validate_resource(&req)?;
        log::info!("Updating resource with id: {}", id);
        let resource = ResourceRepository::update(pool, id, &req).await?;
        Ok(resource.to_response())
    }

    /// Delete a resource
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ResourceError> {
        log::info!("Deleting resource with id: {}", id);
        ResourceRepository::delete(pool, id).await
    }

    /// Find resources near a point, nearest first
    pub async fn find_nearby(
        pool: &PgPool,
        longitude: f64,
        latitude: f64,
        distance_miles: f64,
    ) -> Result<Vec<ResourceResponse>, ResourceError> {
        Self::validate_coordinates(longitude, latitude)?;
        Self::validate_distance(distance_miles)?;

        // Convert miles to meters (1 mile = 1609.34 meters)
        let distance_meters = distance_miles * MILES_TO_METERS;

        log::info!(
            "Searching for resources near ({}, {}) within {} miles",
            latitude,
            longitude,
            distance_miles
        );
        let results =
            ResourceRepository::find_within_distance(pool, longitude, latitude, distance_meters)
                .await?;
        log::info!("Found {} resources nearby", results.len());

        Ok(results.iter().map(|r| r.to_response()).collect())
    }

    /// Field checks shared by create and update, first violation wins
    fn validate_resource(req: &CreateResourceRequest) -> Result<(), ResourceError> {
        if req.name.trim().is_empty() {
            return Err(ResourceError::ValidationError(
                "Resource name cannot be empty".to_string(),
            ));
        }
        if req.type_.trim().is_empty() {
            return Err(ResourceError::ValidationError(
                "Resource type cannot be empty".to_string(),
            ));
        }
        if req.address.trim().is_empty() {
            return Err(ResourceError::ValidationError(
                "Resource address cannot be empty".to_string(),
            ));
        }
        Self::validate_coordinates(req.location[0], req.location[1])
    }

    fn validate_coordinates(longitude: f64, latitude: f64) -> Result<(), ResourceError> {
        if longitude < -180.0 || longitude > 180.0 {
            return Err(ResourceError::InvalidLocationError(
                "Longitude must be between -180 and 180".to_string(),
            ));
        }
        if latitude < -90.0 || latitude > 90.0 {
            return Err(ResourceError::InvalidLocationError(
                "Latitude must be between -90 and 90".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_distance(distance: f64) -> Result<(), ResourceError> {
        if distance <= 0.0 {
            return Err(ResourceError::ValidationError(
                "Distance must be greater than 0".to_string(),
            ));
        }
        if distance > 100.0 {
            return Err(ResourceError::ValidationError(
                "Distance cannot exceed 100 miles".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, type_: &str, address: &str, location: [f64; 2]) -> CreateResourceRequest {
        CreateResourceRequest {
            name: name.to_string(),
            type_: type_.to_string(),
            address: address.to_string(),
            location,
        }
    }

    fn validation_message(result: Result<(), ResourceError>) -> String {
        match result.unwrap_err() {
            ResourceError::ValidationError(msg) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_resource_checks_run_in_fixed_order() {
        let all_blank = request("", "", "", [0.0, 0.0]);
        assert_eq!(
            validation_message(ResourceService::validate_resource(&all_blank)),
            "Resource name cannot be empty"
        );

        let no_type = request("Central Library", "  ", "", [0.0, 0.0]);
        assert_eq!(
            validation_message(ResourceService::validate_resource(&no_type)),
            "Resource type cannot be empty"
        );

        let no_address = request("Central Library", "LIBRARY", "   ", [0.0, 0.0]);
        assert_eq!(
            validation_message(ResourceService::validate_resource(&no_address)),
            "Resource address cannot be empty"
        );

        let valid = request("Central Library", "LIBRARY", "1515 Young St", [-96.7970, 32.7767]);
        assert!(ResourceService::validate_resource(&valid).is_ok());
    }

    #[test]
    fn test_out_of_range_coordinates_fail_location_check() {
        let bad_longitude = request("A Name", "LIBRARY", "Somewhere", [200.0, 10.0]);
        match ResourceService::validate_resource(&bad_longitude).unwrap_err() {
            ResourceError::InvalidLocationError(msg) => {
                assert_eq!(msg, "Longitude must be between -180 and 180")
            }
            other => panic!("expected invalid location error, got {:?}", other),
        }

        let bad_latitude = request("A Name", "LIBRARY", "Somewhere", [10.0, -95.0]);
        match ResourceService::validate_resource(&bad_latitude).unwrap_err() {
            ResourceError::InvalidLocationError(msg) => {
                assert_eq!(msg, "Latitude must be between -90 and 90")
            }
            other => panic!("expected invalid location error, got {:?}", other),
        }
    }

    #[test]
    fn test_distance_bounds() {
        assert_eq!(
            validation_message(ResourceService::validate_distance(0.0)),
            "Distance must be greater than 0"
        );
        assert_eq!(
            validation_message(ResourceService::validate_distance(150.0)),
            "Distance cannot exceed 100 miles"
        );
        assert!(ResourceService::validate_distance(100.0).is_ok());
        assert!(ResourceService::validate_distance(0.5).is_ok());
    }

    #[test]
    fn test_miles_to_meters_factor() {
        assert_eq!(MILES_TO_METERS, 1609.34);
        assert_eq!(2.0 * MILES_TO_METERS, 3218.68);
    }

    #[test]
    fn test_boundary_coordinates_are_accepted() {
        assert!(ResourceService::validate_coordinates(-180.0, -90.0).is_ok());
        assert!(ResourceService::validate_coordinates(180.0, 90.0).is_ok());
        assert!(ResourceService::validate_coordinates(-180.1, 0.0).is_err());
        assert!(ResourceService::validate_coordinates(0.0, 90.1).is_err());
    }
}
