// Routing capability - external route computation between two points
use crate::domain::geometry::LatLng;
use crate::domain::route::Route;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoutingError {
    #[error("routing service unavailable: {0}")]
    Unavailable(String),
    #[error("no route found between the selected points")]
    NoRoute,
    #[error("routing service returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl RoutingError {
    /// Message suitable for showing to the user as-is.
    pub fn alert(&self) -> String {
        match self {
            RoutingError::NoRoute => "No route could be found between these points.".to_string(),
            _ => "Routing is currently unavailable. Please try again later.".to_string(),
        }
    }
}

#[async_trait]
pub trait RoutingService: Send + Sync {
    async fn route(&self, from: LatLng, to: LatLng) -> Result<Route, RoutingError>;
}
