// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache;
pub mod import_service;
pub mod overpass_client;
pub mod overpass_parser;
pub mod overpass_query;
pub mod resource_service;

pub use cache::*;
pub use import_service::*;
pub use overpass_client::*;
pub use overpass_parser::*;
pub use overpass_query::*;
pub use resource_service::*;
