// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod overpass;
pub mod resource;

pub use overpass::*;
pub use resource::*;
