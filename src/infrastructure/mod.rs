// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod json_mapper;
pub mod nominatim_search;
pub mod osrm_routing;
pub mod static_source;
