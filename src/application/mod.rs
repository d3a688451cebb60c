// Application layer - use cases and the capabilities they depend on
pub mod dataset_service;
pub mod dataset_source;
pub mod map_service;
pub mod routing;
pub mod search;
pub mod session;
