// Route domain model - a driving route between two map points
use super::geometry::LatLng;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub from: LatLng,
    pub to: LatLng,
    pub distance_m: f64,
    pub duration_s: f64,
    pub geometry: geojson::Geometry,
}

/// A place returned by the external search service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: String,
    pub location: LatLng,
}
