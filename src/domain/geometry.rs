// Geometry helpers - centroids and bounds over GeoJSON geometries
use geo::{BoundingRect, Centroid};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            south_west: LatLng::new(
                self.south_west.lat.min(other.south_west.lat),
                self.south_west.lng.min(other.south_west.lng),
            ),
            north_east: LatLng::new(
                self.north_east.lat.max(other.north_east.lat),
                self.north_east.lng.max(other.north_east.lng),
            ),
        }
    }
}

fn to_geo(geometry: &geojson::Geometry) -> Option<geo::Geometry<f64>> {
    geo::Geometry::<f64>::try_from(geometry.clone()).ok()
}

/// Geometric centroid of a GeoJSON geometry, used as the popup anchor.
pub fn centroid(geometry: &geojson::Geometry) -> Option<LatLng> {
    let point = to_geo(geometry)?.centroid()?;
    Some(LatLng::new(point.y(), point.x()))
}

pub fn bounds(geometry: &geojson::Geometry) -> Option<Bounds> {
    let rect = to_geo(geometry)?.bounding_rect()?;
    Some(Bounds {
        south_west: LatLng::new(rect.min().y, rect.min().x),
        north_east: LatLng::new(rect.max().y, rect.max().x),
    })
}
