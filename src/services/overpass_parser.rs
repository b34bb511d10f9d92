// src/services/overpass_parser.rs
// DOCUMENTATION: Overpass response parsing and element normalization
// PURPOSE: Turn raw upstream JSON into canonical resource requests

use crate::models::{CreateResourceRequest, OverpassElement, OverpassResponse, ResourceType};
use crate::services::overpass_query::SearchCategory;
use geo_types::Point;
use std::collections::HashMap;

/// Amenity tag value to canonical resource type
const AMENITY_TYPES: &[(&str, ResourceType)] = &[
    ("library", ResourceType::Library),
    ("hospital", ResourceType::Clinic),
    ("clinic", ResourceType::Clinic),
    ("doctors", ResourceType::Clinic),
    ("pharmacy", ResourceType::Clinic),
    ("food_bank", ResourceType::FoodBank),
    ("social_facility", ResourceType::FoodBank),
];

/// Amenity tag value to synthesized display name
const AMENITY_NAMES: &[(&str, &str)] = &[
    ("library", "Public Library"),
    ("hospital", "Hospital"),
    ("clinic", "Medical Clinic"),
    ("doctors", "Doctor's Office"),
    ("pharmacy", "Pharmacy"),
    ("food_bank", "Food Bank"),
    ("social_facility", "Social Services"),
];

/// Name tag keys in priority order, first non-blank wins
const NAME_KEYS: &[&str] = &[
    "name",
    "brand",
    "operator",
    "ref",
    "official_name",
    "alt_name",
    "short_name",
];

/// Address tag keys in concatenation order
const ADDRESS_KEYS: &[&str] = &[
    "addr:housenumber",
    "addr:street",
    "addr:city",
    "addr:state",
    "addr:postcode",
];

/// Why an element was dropped during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Element JSON did not match the expected shape
    Malformed,
    /// Neither direct nor center coordinates were usable
    MissingCoordinates,
    /// No amenity mapping and no fallback type for the category
    Unclassifiable,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Malformed => "malformed",
            SkipReason::MissingCoordinates => "missing coordinates",
            SkipReason::Unclassifiable => "unclassifiable",
        }
    }
}

/// One dropped element, with enough context to trace it upstream
#[derive(Debug, Clone)]
pub struct SkippedElement {
    pub element_id: Option<u64>,
    pub reason: SkipReason,
}

/// Result of parsing one upstream response body
/// DOCUMENTATION: Skips are recorded per element instead of silently
/// swallowed, so batch quality is observable
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub resources: Vec<CreateResourceRequest>,
    pub skipped: Vec<SkippedElement>,
}

/// Parse a raw Overpass response body into normalized resource requests
/// DOCUMENTATION: A body without an element list yields an empty outcome;
/// a bad element is skipped, never failing the rest of the batch
pub fn parse_response(body: &str, category: SearchCategory) -> ParseOutcome {
    match serde_json::from_str::<OverpassResponse>(body) {
        Ok(response) => parse_elements(response.elements, category),
        Err(e) => {
            log::warn!("Overpass response body is not valid JSON: {}", e);
            ParseOutcome::default()
        }
    }
}

/// Normalize a decoded element list
pub fn parse_elements(elements: Vec<serde_json::Value>, category: SearchCategory) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for raw in elements {
        let element_id = raw.get("id").and_then(serde_json::Value::as_u64);

        let element: OverpassElement = match serde_json::from_value(raw) {
            Ok(element) => element,
            Err(e) => {
                log::warn!("Skipping malformed element (id {:?}): {}", element_id, e);
                outcome.skipped.push(SkippedElement {
                    element_id,
                    reason: SkipReason::Malformed,
                });
                continue;
            }
        };

        match normalize_element(&element, category) {
            Ok(req) => outcome.resources.push(req),
            Err(reason) => {
                log::debug!(
                    "Skipping {} {}: {}",
                    element.element_type,
                    element.id,
                    reason.as_str()
                );
                outcome.skipped.push(SkippedElement {
                    element_id: Some(element.id),
                    reason,
                });
            }
        }
    }

    log::info!(
        "Parsed {} resources for {} ({} skipped)",
        outcome.resources.len(),
        category.label(),
        outcome.skipped.len()
    );

    outcome
}

/// Convert one decoded element into a resource request
fn normalize_element(
    element: &OverpassElement,
    category: SearchCategory,
) -> Result<CreateResourceRequest, SkipReason> {
    let point = resolve_coordinates(element).ok_or(SkipReason::MissingCoordinates)?;

    let empty = HashMap::new();
    let tags = element.tags.as_ref().unwrap_or(&empty);
    let amenity = tags.get("amenity").map(String::as_str);

    let resource_type = classify_amenity(amenity, category).ok_or(SkipReason::Unclassifiable)?;

    Ok(CreateResourceRequest {
        name: extract_name(tags, amenity),
        type_: resource_type.as_str().to_string(),
        address: extract_address(tags),
        location: [point.x(), point.y()],
    })
}

/// Extract a usable point from an element
/// DOCUMENTATION: Direct lat/lon first (nodes), then the computed center
/// (ways and relations); no further fallback
pub fn resolve_coordinates(element: &OverpassElement) -> Option<Point<f64>> {
    if let (Some(lat), Some(lon)) = (element.lat, element.lon) {
        return Some(Point::new(lon, lat));
    }

    if let Some(center) = &element.center {
        if let (Some(lat), Some(lon)) = (center.lat, center.lon) {
            return Some(Point::new(lon, lat));
        }
    }

    None
}

/// Map an amenity tag value to a canonical type
/// DOCUMENTATION: Unknown or absent amenity falls back to the searched
/// category's default type; the combined category has none, so the
/// element is reported unclassifiable
pub fn classify_amenity(amenity: Option<&str>, category: SearchCategory) -> Option<ResourceType> {
    amenity
        .and_then(|value| {
            AMENITY_TYPES
                .iter()
                .find(|(key, _)| *key == value)
                .map(|(_, resource_type)| *resource_type)
        })
        .or_else(|| category.fallback_type())
}

/// Derive a display name from element tags
/// DOCUMENTATION: First non-blank name-like tag wins; otherwise a label
/// is synthesized from the amenity value
pub fn extract_name(tags: &HashMap<String, String>, amenity: Option<&str>) -> String {
    for key in NAME_KEYS {
        if let Some(value) = tags.get(*key) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }

    amenity
        .and_then(|value| {
            AMENITY_NAMES
                .iter()
                .find(|(key, _)| *key == value)
                .map(|(_, label)| (*label).to_string())
        })
        .unwrap_or_else(|| "Community Resource".to_string())
}

/// Derive a display address from element tags
/// DOCUMENTATION: Space-joined addr:* parts, then addr:full, then a
/// fixed placeholder
pub fn extract_address(tags: &HashMap<String, String>) -> String {
    let parts: Vec<&str> = ADDRESS_KEYS
        .iter()
        .filter_map(|key| tags.get(*key))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect();

    if !parts.is_empty() {
        return parts.join(" ");
    }

    match tags.get("addr:full").map(|value| value.trim()) {
        Some(full) if !full.is_empty() => full.to_string(),
        _ => "Address not available".to_string(),
    }
}
