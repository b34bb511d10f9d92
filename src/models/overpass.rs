// src/models/overpass.rs
// DOCUMENTATION: Wire types for the Overpass API JSON response
// PURPOSE: Tolerant decoding of OpenStreetMap elements

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level Overpass response envelope
/// DOCUMENTATION: Elements are kept as raw JSON so that one malformed
/// element can be skipped without failing the whole batch
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<serde_json::Value>,
}

/// A single OSM element (node, way or relation)
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    /// Element kind: "node", "way" or "relation"
    #[serde(rename = "type")]
    pub element_type: String,

    /// OSM element id
    pub id: u64,

    /// Direct coordinates (nodes only)
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Computed centroid (ways and relations, requires `out center`)
    pub center: Option<OverpassCenter>,

    /// OSM tags; absent on untagged member elements
    pub tags: Option<HashMap<String, String>>,
}

/// Centroid block emitted by `out center`
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassCenter {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}
