// src/handlers/resources.rs
// DOCUMENTATION: HTTP handlers for resource operations
// PURPOSE: Parse requests, call services, return responses

use crate::config::Config;
use crate::errors::ResourceError;
use crate::models::{CreateResourceRequest, FetchQuery, NearbyQuery, PageQuery, ResourceType};
use crate::services::{FetchCache, ImportService, OverpassClient, ResourceService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Build an Overpass client from config and the shared cache
fn overpass_client(config: &Config, cache: &Arc<FetchCache>) -> OverpassClient {
    OverpassClient::new(
        config.overpass_api_url.clone(),
        config.overpass_timeout_secs,
        cache.clone(),
    )
}

/// GET /api/resources
/// List all resources
pub async fn get_all_resources(pool: web::Data<PgPool>) -> Result<impl Responder, ResourceError> {
    let resources = ResourceService::list(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(resources))
}

/// GET /api/resources/paginated
/// List one page of resources
pub async fn get_resources_paginated(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, ResourceError> {
    let page = query.page.unwrap_or(0);
    let size = query.size.unwrap_or(10);

    let result = ResourceService::list_paged(pool.get_ref(), page, size).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/resources/{id}
/// Retrieve a resource by ID
pub async fn get_resource_by_id(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ResourceError> {
    let resource = ResourceService::get(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(resource))
}

/// POST /api/resources
/// Create a new resource
pub async fn create_resource(
    pool: web::Data<PgPool>,
    req: web::Json<CreateResourceRequest>,
) -> Result<impl Responder, ResourceError> {
    // Validate request
    if let Err(e) = req.validate() {
        return Err(ResourceError::ValidationError(e.to_string()));
    }

    let resource = ResourceService::create(pool.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(resource))
}

/// PUT /api/resources/{id}
/// Replace an existing resource
pub async fn update_resource(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<CreateResourceRequest>,
) -> Result<impl Responder, ResourceError> {
    // Validate request
    if let Err(e) = req.validate() {
        return Err(ResourceError::ValidationError(e.to_string()));
    }

    let resource =
        ResourceService::update(pool.get_ref(), path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(resource))
}

/// DELETE /api/resources/{id}
/// Delete a resource
pub async fn delete_resource(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ResourceError> {
    ResourceService::delete(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/resources/search/nearby
/// Proximity search, distance in miles (default 1.0)
pub async fn get_nearby_resources(
    pool: web::Data<PgPool>,
    query: web::Query<NearbyQuery>,
) -> Result<impl Responder, ResourceError> {
    let distance = query.dist.unwrap_or(1.0);

    let resources =
        ResourceService::find_nearby(pool.get_ref(), query.lon, query.lat, distance).await?;
    Ok(HttpResponse::Ok().json(resources))
}

/// GET /api/resources/fetch/overpass
/// Fetch from the upstream source without persisting anything
pub async fn fetch_overpass_resources(
    config: web::Data<Config>,
    cache: web::Data<Arc<FetchCache>>,
    query: web::Query<FetchQuery>,
) -> Result<impl Responder, ResourceError> {
    let query = query.into_inner();
    let radius_km = query.radius_km.unwrap_or(5.0);
    let filter = query.type_.as_deref().and_then(ResourceType::from_filter);

    log::info!(
        "GET /api/resources/fetch/overpass - lat: {}, lon: {}, radius: {}km, type: {:?}",
        query.lat,
        query.lon,
        radius_km,
        query.type_
    );

    let client = overpass_client(&config, cache.get_ref());
    let resources =
        ImportService::fetch_preview(&client, query.lat, query.lon, radius_km, filter).await;
    Ok(HttpResponse::Ok().json(resources))
}

/// POST /api/resources/fetch-and-save
/// Fetch from the upstream source and persist the results
pub async fn fetch_and_save_resources(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<Arc<FetchCache>>,
    query: web::Query<FetchQuery>,
) -> Result<impl Responder, ResourceError> {
    let query = query.into_inner();
    let radius_km = query.radius_km.unwrap_or(5.0);
    let filter = query.type_.as_deref().and_then(ResourceType::from_filter);

    log::info!(
        "POST /api/resources/fetch-and-save - lat: {}, lon: {}, radius: {}km, type: {:?}",
        query.lat,
        query.lon,
        radius_km,
        query.type_
    );

    let client = overpass_client(&config, cache.get_ref());
    let outcome = ImportService::fetch_and_save(
        pool.get_ref(),
        &client,
        query.lat,
        query.lon,
        radius_km,
        filter,
    )
    .await;
    Ok(HttpResponse::Created().json(outcome))
}

/// Configuration for resource routes
/// Literal paths are registered before the `{id}` captures
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/resources")
            .route("", web::get().to(get_all_resources))
            .route("", web::post().to(create_resource))
            .route("/paginated", web::get().to(get_resources_paginated))
            .route("/search/nearby", web::get().to(get_nearby_resources))
            .route("/fetch/overpass", web::get().to(fetch_overpass_resources))
            .route("/fetch-and-save", web::post().to(fetch_and_save_resources))
            .route("/{id}", web::get().to(get_resource_by_id))
            .route("/{id}", web::put().to(update_resource))
            .route("/{id}", web::delete().to(delete_resource)),
    );
}
