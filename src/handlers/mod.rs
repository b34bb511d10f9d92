// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod demo;
pub mod health;
pub mod resources;

pub use demo::config as demo_config;
pub use health::config as health_config;
pub use resources::config as resources_config;
