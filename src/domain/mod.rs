// Domain layer - ward datasets, derived statistics and map interaction state
pub mod dataset;
pub mod format;
pub mod geometry;
pub mod hotspot;
pub mod layer;
pub mod route;
pub mod selection;
pub mod summary;
pub mod ward;
