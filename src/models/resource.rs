// src/models/resource.rs
// DOCUMENTATION: Core data structures for community resources
// PURPOSE: Defines all serialization/deserialization models for API and database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents a complete resource record from the database
/// DOCUMENTATION: This struct maps directly to the resources table in PostgreSQL
/// Used for internal operations and database queries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resource {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// Resource name - required field for all resources
    pub name: String,

    /// Resource type: LIBRARY, CLINIC, HOSPITAL, PHARMACY, FOOD_BANK, SOCIAL_FACILITY
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub type_field: String,

    /// Geographic coordinates - longitude (extracted from PostGIS POINT)
    /// These will be populated from ST_X(location) and ST_Y(location) in queries
    #[sqlx(skip)]
    pub longitude: f64,

    /// Geographic coordinates - latitude (extracted from PostGIS POINT)
    #[sqlx(skip)]
    pub latitude: f64,

    /// Physical street address
    pub address: String,

    /// When record was created
    pub created_at: DateTime<Utc>,

    /// When record was last modified
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a new resource
/// DOCUMENTATION: Data transfer object for POST /api/resources endpoint
/// Also produced by the Overpass normalization pipeline before persistence
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateResourceRequest {
    /// Resource name (required)
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    /// Resource type (required)
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub type_: String,

    /// Physical street address (required)
    #[validate(length(min = 1, max = 200))]
    pub address: String,

    /// Geographic location [longitude, latitude]
    pub location: [f64; 2],
}

/// Response DTO for API responses
/// DOCUMENTATION: Data transfer object for GET endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub id: Uuid,
    pub name: String,

    /// Resource category (LIBRARY, CLINIC, FOOD_BANK, etc.)
    #[serde(rename = "type")]
    pub type_: String,

    /// Geographic coordinates
    pub longitude: f64,
    pub latitude: f64,

    /// Full address
    pub address: String,

    /// Timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Canonical resource categories
/// DOCUMENTATION: The closed set of types a stored resource may carry
/// String forms use the uppercase database convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Library,
    Clinic,
    Hospital,
    Pharmacy,
    FoodBank,
    SocialFacility,
}

impl ResourceType {
    /// Database/API string form of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Library => "LIBRARY",
            ResourceType::Clinic => "CLINIC",
            ResourceType::Hospital => "HOSPITAL",
            ResourceType::Pharmacy => "PHARMACY",
            ResourceType::FoodBank => "FOOD_BANK",
            ResourceType::SocialFacility => "SOCIAL_FACILITY",
        }
    }

    /// Resolve a user-supplied filter string to a canonical type
    /// DOCUMENTATION: Case-insensitive; accepts common aliases
    /// "all" and unrecognized values both mean "no filter"
    pub fn from_filter(value: &str) -> Option<ResourceType> {
        match value.to_lowercase().as_str() {
            "library" => Some(ResourceType::Library),
            "healthcare" | "clinic" => Some(ResourceType::Clinic),
            "hospital" => Some(ResourceType::Hospital),
            "pharmacy" => Some(ResourceType::Pharmacy),
            "food" | "food_bank" => Some(ResourceType::FoodBank),
            "social" | "social_facility" => Some(ResourceType::SocialFacility),
            _ => None,
        }
    }
}

/// Paginated listing response
/// DOCUMENTATION: DTO for returning page results with pagination metadata
#[derive(Debug, Serialize)]
pub struct PagedResponse {
    /// Array of resource results
    pub data: Vec<ResourceResponse>,

    /// Total number of rows (regardless of pagination)
    pub total_count: i64,

    /// Current page number (0-based)
    pub page: i64,

    /// Results per page
    pub size: i64,

    /// Whether more results exist on next page
    pub has_more: bool,
}

/// Query parameters for GET /api/resources/paginated
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Page number (0-based, default 0)
    pub page: Option<i64>,

    /// Results per page (default 10, max 100)
    pub size: Option<i64>,
}

/// Query parameters for GET /api/resources/search/nearby
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    /// Search center latitude
    pub lat: f64,

    /// Search center longitude
    pub lon: f64,

    /// Search radius in miles (default 1.0)
    pub dist: Option<f64>,
}

/// Query parameters for the Overpass fetch endpoints
#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    /// Search center latitude
    pub lat: f64,

    /// Search center longitude
    pub lon: f64,

    /// Search radius in kilometers (default 5.0)
    #[serde(rename = "radiusKm")]
    pub radius_km: Option<f64>,

    /// Optional type filter applied after the fetch
    #[serde(rename = "type")]
    pub type_: Option<String>,
}

impl Resource {
    /// Convert Resource to ResourceResponse for API
    /// DOCUMENTATION: Maps database model to API response DTO
    pub fn to_response(&self) -> ResourceResponse {
        ResourceResponse {
            id: self.id,
            name: self.name.clone(),
            type_: self.type_field.clone(),
            longitude: self.longitude,
            latitude: self.latitude,
            address: self.address.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
