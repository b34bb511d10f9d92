// src/services/import_service.rs
// DOCUMENTATION: Bulk import orchestration for Overpass data
// PURPOSE: Fetch, filter, and persist resources with per-item containment

use crate::models::{CreateResourceRequest, ResourceResponse, ResourceType};
use crate::services::overpass_client::OverpassClient;
use crate::services::overpass_query::SearchCategory;
use crate::services::resource_service::ResourceService;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::time::Instant;

/// Import statistics
/// DOCUMENTATION: Tracks results of one fetch-and-save operation so skip
/// counts are observable, not just log lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportStats {
    /// Type filter applied after the fetch ("ALL" when none)
    pub filter: String,
    /// Resources produced by the fetch
    pub fetched: u32,
    /// Resources dropped by the type filter
    pub filtered_out: u32,
    /// Resources successfully persisted
    pub saved: u32,
    /// Resources that failed to persist
    pub failed: u32,
    /// Error messages encountered
    pub errors: Vec<String>,
    /// Total import duration in seconds
    pub duration_seconds: u64,
    /// Timestamp when the import started
    pub started_at: String,
    /// Timestamp when the import completed
    pub completed_at: Option<String>,
}

impl ImportStats {
    /// Create new import statistics tracker
    pub fn new(filter: Option<ResourceType>) -> Self {
        Self {
            filter: filter
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| "ALL".to_string()),
            fetched: 0,
            filtered_out: 0,
            saved: 0,
            failed: 0,
            errors: Vec::new(),
            duration_seconds: 0,
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    /// Mark the import as completed
    pub fn complete(&mut self, duration: u64) {
        self.duration_seconds = duration;
        self.completed_at = Some(Utc::now().to_rfc3339());
    }
}

/// Result of one fetch-and-save call
#[derive(Debug, Serialize)]
pub struct ImportOutcome {
    pub saved: Vec<ResourceResponse>,
    pub stats: ImportStats,
}

/// Import service for the Overpass ingestion pipeline
/// DOCUMENTATION: Fetches under the combined category, applies the optional
/// type filter, and saves each item independently
pub struct ImportService;

impl ImportService {
    /// Fetch and normalize without persisting anything
    pub async fn fetch_preview(
        client: &OverpassClient,
        lat: f64,
        lon: f64,
        radius_km: f64,
        filter: Option<ResourceType>,
    ) -> Vec<CreateResourceRequest> {
        let fetched = client.fetch(SearchCategory::All, lat, lon, radius_km).await;
        Self::apply_filter(fetched, filter)
    }

    /// Fetch, filter, and persist resources
    /// DOCUMENTATION: Each save succeeds or fails independently; a failed
    /// item is logged, counted, and omitted from the saved set. Never
    /// fails the caller.
    pub async fn fetch_and_save(
        pool: &PgPool,
        client: &OverpassClient,
        lat: f64,
        lon: f64,
        radius_km: f64,
        filter: Option<ResourceType>,
    ) -> ImportOutcome {
        let start_time = Instant::now();
        let mut stats = ImportStats::new(filter);

        log::info!(
            "Starting import at ({}, {}) radius {}km, filter: {}",
            lat,
            lon,
            radius_km,
            stats.filter
        );

        let fetched = client.fetch(SearchCategory::All, lat, lon, radius_km).await;
        stats.fetched = fetched.len() as u32;

        let candidates = Self::apply_filter(fetched, filter);
        stats.filtered_out = stats.fetched - candidates.len() as u32;

        let mut saved = Vec::new();
        for candidate in candidates {
            match ResourceService::create(pool, candidate.clone()).await {
                Ok(resource) => {
                    stats.saved += 1;
                    saved.push(resource);
                }
                Err(e) => {
                    log::warn!("Failed to save resource {}: {}", candidate.name, e);
                    stats.failed += 1;
                    stats.errors.push(format!("{}: {}", candidate.name, e));
                }
            }
        }

        stats.complete(start_time.elapsed().as_secs());
        log::info!(
            "Import complete: {} fetched, {} filtered out, {} saved, {} failed",
            stats.fetched,
            stats.filtered_out,
            stats.saved,
            stats.failed
        );

        ImportOutcome { saved, stats }
    }

    /// Keep only resources of the requested canonical type
    fn apply_filter(
        resources: Vec<CreateResourceRequest>,
        filter: Option<ResourceType>,
    ) -> Vec<CreateResourceRequest> {
        match filter {
            Some(resource_type) => resources
                .into_iter()
                .filter(|r| r.type_ == resource_type.as_str())
                .collect(),
            None => resources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, type_: &str) -> CreateResourceRequest {
        CreateResourceRequest {
            name: name.to_string(),
            type_: type_.to_string(),
            address: "Address not available".to_string(),
            location: [-96.797, 32.7767],
        }
    }

    #[test]
    fn test_filter_keeps_only_matching_type() {
        let fetched = vec![
            resource("Central Library", "LIBRARY"),
            resource("Parkland", "CLINIC"),
            resource("Oak Lawn Branch", "LIBRARY"),
            resource("North Texas Food Bank", "FOOD_BANK"),
        ];

        let filtered = ImportService::apply_filter(fetched, Some(ResourceType::Library));

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.type_ == "LIBRARY"));
    }

    #[test]
    fn test_no_filter_passes_everything_through() {
        let fetched = vec![
            resource("Central Library", "LIBRARY"),
            resource("Parkland", "CLINIC"),
        ];

        let filtered = ImportService::apply_filter(fetched, None);

        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_stats_label_and_completion() {
        let mut stats = ImportStats::new(Some(ResourceType::FoodBank));
        assert_eq!(stats.filter, "FOOD_BANK");
        assert!(stats.completed_at.is_none());

        stats.complete(3);
        assert_eq!(stats.duration_seconds, 3);
        assert!(stats.completed_at.is_some());

        let unfiltered = ImportStats::new(None);
        assert_eq!(unfiltered.filter, "ALL");
    }
}
