// Dataset service - loads every configured layer and keeps one slot per key
use crate::application::dataset_source::DatasetSource;
use crate::domain::dataset::{Dataset, DatasetProfile};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub enum DatasetSlot {
    /// Not loaded yet, or the load failed. There is no retry.
    Loading,
    Ready {
        dataset: Arc<Dataset>,
        loaded_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct DatasetStatus {
    pub key: String,
    pub label: String,
    pub supports_detail: bool,
    pub loaded_at: Option<DateTime<Utc>>,
    pub feature_count: usize,
    pub qualifying_count: usize,
}

#[derive(Clone)]
pub struct DatasetService {
    source: Arc<dyn DatasetSource>,
    profiles: Arc<Vec<DatasetProfile>>,
    slots: Arc<RwLock<HashMap<String, DatasetSlot>>>,
}

impl DatasetService {
    pub fn new(source: Arc<dyn DatasetSource>, profiles: Vec<DatasetProfile>) -> Self {
        let slots = profiles
            .iter()
            .map(|p| (p.key.clone(), DatasetSlot::Loading))
            .collect();

        Self {
            source,
            profiles: Arc::new(profiles),
            slots: Arc::new(RwLock::new(slots)),
        }
    }

    pub fn profiles(&self) -> &[DatasetProfile] {
        &self.profiles
    }

    pub fn contains(&self, key: &str) -> bool {
        self.profiles.iter().any(|p| p.key == key)
    }

    /// Start one independent load per profile. Loads race freely; each one
    /// only ever writes its own slot.
    pub fn load_all(&self) -> Vec<JoinHandle<()>> {
        self.profiles
            .iter()
            .cloned()
            .map(|profile| {
                let service = self.clone();
                tokio::spawn(async move { service.load(profile).await })
            })
            .collect()
    }

    /// Fetch and build one dataset. Failures are logged and leave the slot
    /// as it was.
    pub async fn load(&self, profile: DatasetProfile) {
        let key = profile.key.clone();
        tracing::debug!("Fetching dataset {} from {}", key, profile.source);

        let collection = match self.source.fetch(&profile).await {
            Ok(collection) => collection,
            Err(e) => {
                tracing::error!("Failed to load dataset {}: {:#}", key, e);
                return;
            }
        };

        let dataset = Dataset::build(profile, collection);
        let dropped = dataset.collection.features.len() - dataset.readings.len();
        if dropped > 0 {
            tracing::debug!("Dataset {}: {} features without a usable value", key, dropped);
        }
        tracing::info!(
            "Loaded dataset {} ({} wards, {} ranked)",
            key,
            dataset.collection.features.len(),
            dataset.readings.len()
        );

        // Last write wins if the same key is loaded twice.
        self.slots.write().await.insert(
            key,
            DatasetSlot::Ready {
                dataset: Arc::new(dataset),
                loaded_at: Utc::now(),
            },
        );
    }

    pub async fn slot(&self, key: &str) -> Option<DatasetSlot> {
        self.slots.read().await.get(key).cloned()
    }

    pub async fn ready(&self, key: &str) -> Option<Arc<Dataset>> {
        match self.slot(key).await? {
            DatasetSlot::Ready { dataset, .. } => Some(dataset),
            DatasetSlot::Loading => None,
        }
    }

    pub async fn statuses(&self) -> Vec<DatasetStatus> {
        let slots = self.slots.read().await;

        self.profiles
            .iter()
            .map(|profile| {
                let (loaded_at, feature_count, qualifying_count) = match slots.get(&profile.key) {
                    Some(DatasetSlot::Ready { dataset, loaded_at }) => (
                        Some(*loaded_at),
                        dataset.collection.features.len(),
                        dataset.readings.len(),
                    ),
                    _ => (None, 0, 0),
                };

                DatasetStatus {
                    key: profile.key.clone(),
                    label: profile.label.clone(),
                    supports_detail: profile.supports_detail,
                    loaded_at,
                    feature_count,
                    qualifying_count,
                }
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::ward::tests::{collection, ward};
    use async_trait::async_trait;
    use geojson::FeatureCollection;
    use serde_json::json;

    /// Serves canned collections; keys without one fail.
    pub(crate) struct FakeSource {
        pub(crate) collections: HashMap<String, FeatureCollection>,
    }

    #[async_trait]
    impl DatasetSource for FakeSource {
        async fn fetch(&self, profile: &DatasetProfile) -> anyhow::Result<FeatureCollection> {
            match self.collections.get(&profile.key) {
                Some(c) => Ok(c.clone()),
                None => anyhow::bail!("404 for {}", profile.source),
            }
        }
    }

    pub(crate) fn service_with(loaded: &[&str], profiles: &[&str]) -> DatasetService {
        let collections = loaded
            .iter()
            .map(|key| {
                (
                    key.to_string(),
                    collection(json!([
                        ward(1, json!(5), "Low"),
                        ward(2, json!(9), "High"),
                        ward(3, json!(9), "Very High"),
                    ])),
                )
            })
            .collect();

        DatasetService::new(
            Arc::new(FakeSource { collections }),
            profiles.iter().map(|k| DatasetProfile::for_tests(k)).collect(),
        )
    }

    #[tokio::test]
    async fn test_slots_start_loading() {
        let service = service_with(&[], &["NO2"]);
        assert!(matches!(service.slot("NO2").await, Some(DatasetSlot::Loading)));
        assert!(service.slot("PM25").await.is_none());
        assert!(service.contains("NO2"));
        assert!(!service.contains("PM25"));
    }

    #[tokio::test]
    async fn test_failed_load_only_affects_its_slot() {
        let service = service_with(&["NO2", "CO"], &["NO2", "SO2", "CO"]);

        for result in futures::future::join_all(service.load_all()).await {
            result.unwrap();
        }

        assert!(service.ready("NO2").await.is_some());
        assert!(service.ready("CO").await.is_some());
        assert!(matches!(service.slot("SO2").await, Some(DatasetSlot::Loading)));

        let statuses = service.statuses().await;
        let so2 = statuses.iter().find(|s| s.key == "SO2").unwrap();
        assert!(so2.loaded_at.is_none());
        let no2 = statuses.iter().find(|s| s.key == "NO2").unwrap();
        assert_eq!(no2.feature_count, 3);
        assert_eq!(no2.qualifying_count, 3);
    }

    #[tokio::test]
    async fn test_reload_replaces_slot() {
        let service = service_with(&["NO2"], &["NO2"]);
        service.load(DatasetProfile::for_tests("NO2")).await;
        let first = service.ready("NO2").await.unwrap();

        service.load(DatasetProfile::for_tests("NO2")).await;
        let second = service.ready("NO2").await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.summary.unwrap().high_ward_count, 2);
    }
}
