// Static GeoJSON source - datasets served over HTTP or read from disk
use crate::application::dataset_source::DatasetSource;
use crate::domain::dataset::DatasetProfile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use geojson::{FeatureCollection, GeoJson};

#[derive(Debug, Clone)]
pub struct StaticDatasetSource {
    client: reqwest::Client,
}

impl StaticDatasetSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_remote(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/geo+json, application/json")
            .send()
            .await
            .context("Failed to send dataset request")?;

        if !response.status().is_success() {
            anyhow::bail!("Dataset request to {} failed with status {}", url, response.status());
        }

        response.text().await.context("Failed to read dataset body")
    }
}

#[async_trait]
impl DatasetSource for StaticDatasetSource {
    async fn fetch(&self, profile: &DatasetProfile) -> Result<FeatureCollection> {
        let body = if is_remote(&profile.source) {
            self.fetch_remote(&profile.source).await?
        } else {
            tokio::fs::read_to_string(&profile.source)
                .await
                .with_context(|| format!("Failed to read {}", profile.source))?
        };

        parse_collection(&body).with_context(|| format!("Invalid GeoJSON for {}", profile.key))
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Accepts a FeatureCollection, or a lone Feature as a one-element collection.
pub fn parse_collection(body: &str) -> Result<FeatureCollection> {
    match body.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(feature) => Ok(FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }),
        GeoJson::Geometry(_) => anyhow::bail!("expected a FeatureCollection, got a bare geometry"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::Dataset;
    use crate::infrastructure::config::load_datasets_config;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.org/no2.geojson"));
        assert!(!is_remote("data/no2.geojson"));
    }

    #[test]
    fn test_parse_collection_variants() {
        let fc = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,"properties":{"fid":1,"_mean":2.5}}
        ]}"#;
        assert_eq!(parse_collection(fc).unwrap().features.len(), 1);

        let feature = r#"{"type":"Feature","geometry":null,"properties":{"fid":1}}"#;
        assert_eq!(parse_collection(feature).unwrap().features.len(), 1);

        let geometry = r#"{"type":"Point","coordinates":[85.3,27.7]}"#;
        assert!(parse_collection(geometry).is_err());
        assert!(parse_collection("not json").is_err());
    }

    #[tokio::test]
    async fn test_fetch_from_disk() {
        let path = std::env::temp_dir().join("ward_airmap_static_source_test.geojson");
        tokio::fs::write(&path, r#"{"type":"FeatureCollection","features":[]}"#)
            .await
            .unwrap();

        let mut profile = DatasetProfile::for_tests("NO2");
        profile.source = path.to_string_lossy().to_string();

        let collection = StaticDatasetSource::new().fetch(&profile).await.unwrap();
        assert!(collection.features.is_empty());

        profile.source = "does/not/exist.geojson".to_string();
        assert!(StaticDatasetSource::new().fetch(&profile).await.is_err());
    }

    #[tokio::test]
    async fn test_bundled_datasets_load() {
        let config = load_datasets_config().unwrap();
        assert_eq!(config.datasets.len(), 4);

        let source = StaticDatasetSource::new();
        for profile in config.datasets {
            let collection = source.fetch(&profile).await.unwrap();
            let dataset = Dataset::build(profile, collection);
            assert!(dataset.summary.is_some(), "{} has no readings", dataset.key());
        }
    }
}
