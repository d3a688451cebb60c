// Nominatim place search client
use crate::application::search::{PlaceSearch, SearchError};
use crate::domain::geometry::LatLng;
use crate::domain::route::Place;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct NominatimSearch {
    client: reqwest::Client,
    base_url: String,
    viewbox: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimSearch {
    /// Nominatim's usage policy requires an identifying User-Agent.
    pub fn new(base_url: String, viewbox: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build Nominatim HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            viewbox,
        })
    }

    fn build_search_url(&self, query: &str, limit: usize) -> String {
        let mut url = format!(
            "{}/search?q={}&format=json&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );
        if let Some(viewbox) = &self.viewbox {
            url.push_str(&format!("&viewbox={}&bounded=1", urlencoding::encode(viewbox)));
        }
        url
    }
}

/// Hits with unparsable coordinates are skipped.
fn into_places(hits: Vec<NominatimHit>) -> Vec<Place> {
    hits.into_iter()
        .filter_map(|hit| {
            let lat = hit.lat.parse::<f64>().ok()?;
            let lng = hit.lon.parse::<f64>().ok()?;
            Some(Place {
                name: hit.display_name,
                location: LatLng::new(lat, lng),
            })
        })
        .collect()
}

#[async_trait]
impl PlaceSearch for NominatimSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, SearchError> {
        let url = self.build_search_url(query, limit);
        tracing::debug!("Searching places: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let hits = response
            .json::<Vec<NominatimHit>>()
            .await
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;

        let places = into_places(hits);
        if places.is_empty() {
            return Err(SearchError::NoMatch(query.to_string()));
        }
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_url() {
        let search =
            NominatimSearch::new("https://nominatim.example.org/".to_string(), None).unwrap();
        assert_eq!(
            search.build_search_url("Patan Durbar Square", 5),
            "https://nominatim.example.org/search?q=Patan%20Durbar%20Square&format=json&limit=5"
        );

        let bounded = NominatimSearch::new(
            "https://nominatim.example.org".to_string(),
            Some("85.2,27.8,85.5,27.6".to_string()),
        )
        .unwrap();
        assert!(bounded
            .build_search_url("Thamel", 3)
            .ends_with("&viewbox=85.2%2C27.8%2C85.5%2C27.6&bounded=1"));
    }

    #[test]
    fn test_into_places_skips_bad_coordinates() {
        let hits: Vec<NominatimHit> = serde_json::from_str(
            r#"[
                {"display_name":"Thamel, Kathmandu","lat":"27.7154","lon":"85.3123"},
                {"display_name":"Broken","lat":"north","lon":"85.0"}
            ]"#,
        )
        .unwrap();

        let places = into_places(hits);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Thamel, Kathmandu");
        assert_eq!(places[0].location, LatLng::new(27.7154, 85.3123));
    }
}
