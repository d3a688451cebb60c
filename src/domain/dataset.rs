// Dataset domain model - one gas layer with its derived statistics
use super::geometry::{self, Bounds};
use super::hotspot::{self, Hotspots};
use super::summary::{self, Summary};
use super::ward::{self, WardReading};
use geojson::FeatureCollection;
use serde::Deserialize;

/// Per-dataset configuration: where to load it from and which properties
/// carry which attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetProfile {
    pub key: String,
    pub label: String,
    pub source: String,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default = "default_name_field")]
    pub name_field: String,
    #[serde(default = "default_value_field")]
    pub value_field: String,
    #[serde(default = "default_max_field")]
    pub max_field: String,
    pub category_field: String,
    #[serde(default = "default_exposure_field")]
    pub exposure_field: String,
    #[serde(default = "default_population_field")]
    pub population_field: String,
    /// Ozone-style layers expose geometry only, no per-ward popups.
    #[serde(default = "default_supports_detail")]
    pub supports_detail: bool,
    pub guideline: Option<f64>,
}

fn default_id_field() -> String {
    "fid".to_string()
}

fn default_name_field() -> String {
    "WARD_NAME".to_string()
}

fn default_value_field() -> String {
    "_mean".to_string()
}

fn default_max_field() -> String {
    "_max".to_string()
}

fn default_exposure_field() -> String {
    "Exposure_idx".to_string()
}

fn default_population_field() -> String {
    "BYO_population".to_string()
}

fn default_supports_detail() -> bool {
    true
}

#[cfg(test)]
impl DatasetProfile {
    pub(crate) fn for_tests(key: &str) -> Self {
        Self {
            key: key.to_string(),
            label: format!("{} concentration", key),
            source: format!("data/{}.geojson", key.to_lowercase()),
            id_field: default_id_field(),
            name_field: default_name_field(),
            value_field: default_value_field(),
            max_field: default_max_field(),
            category_field: "Category".to_string(),
            exposure_field: default_exposure_field(),
            population_field: default_population_field(),
            supports_detail: true,
            guideline: None,
        }
    }
}

/// Built once per successful load and never modified afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub profile: DatasetProfile,
    pub collection: FeatureCollection,
    pub readings: Vec<WardReading>,
    pub summary: Option<Summary>,
    hotspots: Hotspots,
}

impl Dataset {
    pub fn build(profile: DatasetProfile, collection: FeatureCollection) -> Self {
        let readings = ward::normalize(&collection, &profile);
        let summary = summary::summarize(&readings);
        let hotspots = hotspot::rank(&readings);

        Self {
            profile,
            collection,
            readings,
            summary,
            hotspots,
        }
    }

    pub fn key(&self) -> &str {
        &self.profile.key
    }

    pub fn supports_detail(&self) -> bool {
        self.profile.supports_detail
    }

    pub fn hotspots_by_mean(&self) -> impl Iterator<Item = &WardReading> {
        self.hotspots.by_mean.iter().map(|&i| &self.readings[i])
    }

    pub fn hotspots_by_exposure(&self) -> impl Iterator<Item = &WardReading> {
        self.hotspots.by_exposure.iter().map(|&i| &self.readings[i])
    }

    pub fn find(&self, feature_id: &str) -> Option<&WardReading> {
        self.readings.iter().find(|r| r.id == feature_id)
    }

    /// Exact ward-name lookup, ignoring case and surrounding whitespace.
    pub fn find_by_name(&self, term: &str) -> Option<&WardReading> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }
        self.readings
            .iter()
            .find(|r| r.display_name().to_lowercase() == term)
    }

    /// Ward names containing `prefix` (case-insensitive); names that start
    /// with it come first.
    pub fn autocomplete(&self, prefix: &str, limit: usize) -> Vec<&WardReading> {
        let needle = prefix.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(bool, &WardReading)> = self
            .readings
            .iter()
            .filter_map(|r| {
                let name = r.display_name().to_lowercase();
                name.contains(&needle).then(|| (!name.starts_with(&needle), r))
            })
            .collect();
        matches.sort_by_key(|(later, _)| *later);
        matches.into_iter().take(limit).map(|(_, r)| r).collect()
    }

    /// Bounds of any feature in the collection, including ones without a
    /// usable primary value.
    pub fn feature_bounds(&self, feature_id: &str) -> Option<Bounds> {
        self.collection
            .features
            .iter()
            .enumerate()
            .find(|(i, f)| ward::feature_id(*i, f, &self.profile) == feature_id)
            .and_then(|(_, f)| f.geometry.as_ref())
            .and_then(geometry::bounds)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.collection
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref().and_then(geometry::bounds))
            .reduce(Bounds::union)
    }
}
