// OSRM routing client
use crate::application::routing::{RoutingError, RoutingService};
use crate::domain::geometry::LatLng;
use crate::domain::route::Route;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct OsrmRouting {
    client: reqwest::Client,
    base_url: String,
    profile: String,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: geojson::Geometry,
}

impl OsrmRouting {
    pub fn new(base_url: String, profile: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            profile,
        }
    }

    fn build_route_url(&self, from: LatLng, to: LatLng) -> String {
        // OSRM takes lng,lat pairs
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, self.profile, from.lng, from.lat, to.lng, to.lat
        )
    }
}

fn into_route(response: OsrmResponse, from: LatLng, to: LatLng) -> Result<Route, RoutingError> {
    match response.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(RoutingError::NoRoute),
        other => {
            return Err(RoutingError::InvalidResponse(
                response.message.unwrap_or_else(|| other.to_string()),
            ));
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(RoutingError::NoRoute)?;

    Ok(Route {
        from,
        to,
        distance_m: route.distance,
        duration_s: route.duration,
        geometry: route.geometry,
    })
}

#[async_trait]
impl RoutingService for OsrmRouting {
    async fn route(&self, from: LatLng, to: LatLng) -> Result<Route, RoutingError> {
        let url = self.build_route_url(from, to);
        tracing::debug!("Requesting route: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RoutingError::Unavailable(e.to_string()))?;

        // OSRM reports NoRoute with a 400 and a JSON body, so parse regardless
        let status = response.status();
        let body = response
            .json::<OsrmResponse>()
            .await
            .map_err(|e| RoutingError::InvalidResponse(format!("status {}: {}", status, e)))?;

        into_route(body, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> OsrmResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_build_route_url() {
        let osrm = OsrmRouting::new("https://router.example.org/".to_string(), "driving".to_string());
        let url = osrm.build_route_url(LatLng::new(27.7, 85.3), LatLng::new(27.8, 85.4));
        assert_eq!(
            url,
            "https://router.example.org/route/v1/driving/85.3,27.7;85.4,27.8?overview=full&geometries=geojson"
        );
    }

    #[test]
    fn test_ok_response_becomes_route() {
        let body = parse(
            r#"{"code":"Ok","routes":[{"distance":1534.2,"duration":212.5,
                "geometry":{"type":"LineString","coordinates":[[85.3,27.7],[85.4,27.8]]}}]}"#,
        );
        let route = into_route(body, LatLng::new(27.7, 85.3), LatLng::new(27.8, 85.4)).unwrap();
        assert_eq!(route.distance_m, 1534.2);
        assert_eq!(route.duration_s, 212.5);
    }

    #[test]
    fn test_error_codes() {
        let a = LatLng::new(0.0, 0.0);
        assert_eq!(
            into_route(parse(r#"{"code":"NoRoute","routes":[]}"#), a, a).unwrap_err(),
            RoutingError::NoRoute
        );
        assert_eq!(
            into_route(parse(r#"{"code":"Ok","routes":[]}"#), a, a).unwrap_err(),
            RoutingError::NoRoute
        );
        assert_eq!(
            into_route(
                parse(r#"{"code":"InvalidQuery","message":"Query string malformed"}"#),
                a,
                a
            )
            .unwrap_err(),
            RoutingError::InvalidResponse("Query string malformed".to_string())
        );
    }
}
