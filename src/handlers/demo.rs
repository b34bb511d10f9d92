// src/handlers/demo.rs
// DOCUMENTATION: Demo and status handlers
// PURPOSE: Quick inspection endpoints for exploring the service

use crate::db::ResourceRepository;
use crate::errors::ResourceError;
use crate::models::CreateResourceRequest;
use crate::services::{FetchCache, ResourceService};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// Query parameters for GET /api/demo/nearby-demo
#[derive(Debug, Deserialize)]
pub struct NearbyDemoQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub distance: Option<f64>,
}

/// Query parameters for POST /api/demo/add-sample
#[derive(Debug, Deserialize)]
pub struct AddSampleQuery {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

/// Query parameters for GET /api/demo/search-demo
#[derive(Debug, Deserialize)]
pub struct SearchDemoQuery {
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub name: Option<String>,
}

/// Row shape for the type-count aggregation
#[derive(Debug, sqlx::FromRow)]
struct TypeCount {
    #[sqlx(rename = "type")]
    type_field: String,
    count: i64,
}

/// GET /api/demo/status
/// Service info, resource count, and cache statistics
pub async fn get_status(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<FetchCache>>,
) -> Result<impl Responder, ResourceError> {
    let total = ResourceRepository::count_all(pool.get_ref()).await?;
    let cache_stats = cache.stats().await;

    Ok(HttpResponse::Ok().json(json!({
        "application": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "total_resources": total,
        "cache": cache_stats,
        "features": [
            "Resource Management",
            "Geospatial Search",
            "Overpass Import",
            "RESTful API",
            "PostGIS Storage"
        ]
    })))
}

/// GET /api/demo/sample-data
/// Resource counts grouped by type
pub async fn get_sample_data_info(
    pool: web::Data<PgPool>,
) -> Result<impl Responder, ResourceError> {
    let counts = sqlx::query_as::<_, TypeCount>(
        "SELECT type, COUNT(*) as count FROM resources GROUP BY type ORDER BY type",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| ResourceError::DatabaseError(e.to_string()))?;

    let total: i64 = counts.iter().map(|c| c.count).sum();
    let resource_types: Vec<&str> = counts.iter().map(|c| c.type_field.as_str()).collect();
    let type_counts: serde_json::Map<String, serde_json::Value> = counts
        .iter()
        .map(|c| (c.type_field.clone(), json!(c.count)))
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "total_resources": total,
        "resource_types": resource_types,
        "type_counts": type_counts
    })))
}

/// GET /api/demo/nearby-demo
/// Nearby search with demo defaults (Dallas center, 5 miles)
pub async fn get_nearby_demo(
    pool: web::Data<PgPool>,
    query: web::Query<NearbyDemoQuery>,
) -> Result<impl Responder, ResourceError> {
    let lat = query.lat.unwrap_or(32.7767);
    let lon = query.lon.unwrap_or(-96.7970);
    let distance = query.distance.unwrap_or(5.0);

    log::info!(
        "Demo nearby search - lat: {}, lon: {}, distance: {}",
        lat,
        lon,
        distance
    );

    let resources = ResourceService::find_nearby(pool.get_ref(), lon, lat, distance).await?;

    Ok(HttpResponse::Ok().json(json!({
        "search_location": { "latitude": lat, "longitude": lon },
        "search_distance": format!("{} miles", distance),
        "found_resources": resources.len(),
        "resources": resources
    })))
}

/// POST /api/demo/add-sample
/// Create a resource from query parameters; type is upper-cased
pub async fn add_sample_resource(
    pool: web::Data<PgPool>,
    query: web::Query<AddSampleQuery>,
) -> impl Responder {
    let query = query.into_inner();
    log::info!("Adding sample resource: {} ({})", query.name, query.type_);

    let req = CreateResourceRequest {
        name: query.name,
        type_: query.type_.to_uppercase(),
        address: query.address,
        location: [query.lon, query.lat],
    };

    match ResourceService::create(pool.get_ref(), req).await {
        Ok(resource) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Resource added successfully",
            "resource": resource
        })),
        Err(e) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": format!("Failed to add resource: {}", e)
        })),
    }
}

/// GET /api/demo/search-demo
/// In-memory filter over the full listing by type and name substring
pub async fn search_demo(
    pool: web::Data<PgPool>,
    query: web::Query<SearchDemoQuery>,
) -> Result<impl Responder, ResourceError> {
    let all_resources = ResourceService::list(pool.get_ref()).await?;

    let filtered: Vec<_> = all_resources
        .iter()
        .filter(|resource| {
            let type_match = match query.type_.as_deref() {
                Some(t) if !t.is_empty() => resource.type_.eq_ignore_ascii_case(t),
                _ => true,
            };
            let name_match = match query.name.as_deref() {
                Some(n) if !n.is_empty() => {
                    resource.name.to_lowercase().contains(&n.to_lowercase())
                }
                _ => true,
            };
            type_match && name_match
        })
        .collect();

    let mut result = serde_json::Map::new();
    result.insert("total_resources".to_string(), json!(all_resources.len()));
    result.insert("filtered_resources".to_string(), json!(filtered.len()));
    result.insert("resources".to_string(), json!(filtered));
    if let Some(t) = &query.type_ {
        result.insert("search_type".to_string(), json!(t));
    }
    if let Some(n) = &query.name {
        result.insert("search_name".to_string(), json!(n));
    }

    Ok(HttpResponse::Ok().json(result))
}

/// Configuration for demo routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/demo")
            .route("/status", web::get().to(get_status))
            .route("/sample-data", web::get().to(get_sample_data_info))
            .route("/nearby-demo", web::get().to(get_nearby_demo))
            .route("/add-sample", web::post().to(add_sample_resource))
            .route("/search-demo", web::get().to(search_demo)),
    );
}
