// Source trait for raw dataset collections
use crate::domain::dataset::DatasetProfile;
use async_trait::async_trait;
use geojson::FeatureCollection;

#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch the raw feature collection described by `profile`
    async fn fetch(&self, profile: &DatasetProfile) -> anyhow::Result<FeatureCollection>;
}
