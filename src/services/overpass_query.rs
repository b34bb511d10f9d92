// src/services/overpass_query.rs
// DOCUMENTATION: Overpass QL query construction
// PURPOSE: Translate a search category and area into upstream query text

use crate::models::ResourceType;

/// Search categories accepted by the fetch pipeline
/// DOCUMENTATION: Each category expands to a fixed amenity filter set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchCategory {
    Library,
    Healthcare,
    Food,
    All,
}

impl SearchCategory {
    /// Amenity filter clause placed after node/way/relation
    pub fn amenity_filter(&self) -> &'static str {
        match self {
            SearchCategory::Library => r#"["amenity"="library"]"#,
            SearchCategory::Healthcare => r#"["amenity"~"^(hospital|clinic|doctors|pharmacy)$"]"#,
            SearchCategory::Food => r#"["amenity"~"^(food_bank|social_facility)$"]"#,
            SearchCategory::All => {
                r#"["amenity"~"^(library|hospital|clinic|doctors|pharmacy|food_bank|social_facility)$"]"#
            }
        }
    }

    /// Server-side evaluation timeout declared in the QL header
    /// The combined query gets a little more headroom
    pub fn ql_timeout(&self) -> u32 {
        match self {
            SearchCategory::All => 30,
            _ => 25,
        }
    }

    /// Canonical type assigned to elements whose amenity tag is missing
    /// or not in the classification table
    /// DOCUMENTATION: The combined category has no single sensible default,
    /// so such elements are skipped instead (see overpass_parser)
    pub fn fallback_type(&self) -> Option<ResourceType> {
        match self {
            SearchCategory::Library => Some(ResourceType::Library),
            SearchCategory::Healthcare => Some(ResourceType::Clinic),
            SearchCategory::Food => Some(ResourceType::FoodBank),
            SearchCategory::All => None,
        }
    }

    /// Label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            SearchCategory::Library => "LIBRARY",
            SearchCategory::Healthcare => "HEALTHCARE",
            SearchCategory::Food => "FOOD",
            SearchCategory::All => "ALL",
        }
    }
}

/// Build a complete Overpass QL query for one category and search area
/// DOCUMENTATION: Matches nodes, ways and relations around the point and
/// requests computed centers for non-point geometries
/// Radius is truncated to whole meters, matching the stored convention
pub fn build_query(category: SearchCategory, lat: f64, lon: f64, radius_km: f64) -> String {
    let radius_m = (radius_km * 1000.0) as u32;
    let filter = category.amenity_filter();

    let mut query = format!("[out:json][timeout:{}];\n(\n", category.ql_timeout());
    for kind in ["node", "way", "relation"] {
        query.push_str(&format!(
            "  {}{}(around:{},{},{});\n",
            kind, filter, radius_m, lat, lon
        ));
    }
    query.push_str(");\nout center;\n");
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_query_shape() {
        let query = build_query(SearchCategory::Library, 32.7767, -96.7970, 5.0);

        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.contains(r#"node["amenity"="library"](around:5000,32.7767,-96.797);"#));
        assert!(query.contains(r#"way["amenity"="library"](around:5000,"#));
        assert!(query.contains(r#"relation["amenity"="library"](around:5000,"#));
        assert!(query.ends_with(");\nout center;\n"));
    }

    #[test]
    fn test_radius_is_truncated_not_rounded() {
        let query = build_query(SearchCategory::Library, 32.7767, -96.7970, 5.004);

        assert!(query.contains("around:5004,"));
        assert!(!query.contains("around:5000,"));
        assert!(!query.contains("around:5005,"));
    }

    #[test]
    fn test_healthcare_filter_lists_all_amenities() {
        let query = build_query(SearchCategory::Healthcare, 32.0, -96.0, 2.0);

        assert!(query.contains(r#"["amenity"~"^(hospital|clinic|doctors|pharmacy)$"]"#));
    }

    #[test]
    fn test_food_filter_lists_all_amenities() {
        let query = build_query(SearchCategory::Food, 32.0, -96.0, 2.0);

        assert!(query.contains(r#"["amenity"~"^(food_bank|social_facility)$"]"#));
    }

    #[test]
    fn test_combined_query_unions_filters_with_longer_timeout() {
        let query = build_query(SearchCategory::All, 32.0, -96.0, 2.0);

        assert!(query.starts_with("[out:json][timeout:30];"));
        assert!(query.contains(
            r#"["amenity"~"^(library|hospital|clinic|doctors|pharmacy|food_bank|social_facility)$"]"#
        ));
    }

    #[test]
    fn test_fallback_types() {
        assert_eq!(
            SearchCategory::Library.fallback_type(),
            Some(ResourceType::Library)
        );
        assert_eq!(
            SearchCategory::Healthcare.fallback_type(),
            Some(ResourceType::Clinic)
        );
        assert_eq!(
            SearchCategory::Food.fallback_type(),
            Some(ResourceType::FoodBank)
        );
        assert_eq!(SearchCategory::All.fallback_type(), None);
    }
}
