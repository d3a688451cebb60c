// Mapper to convert domain models to JSON response bodies
use crate::application::dataset_service::{DatasetSlot, DatasetStatus};
use crate::domain::dataset::{Dataset, DatasetProfile};
use crate::domain::format::{format_concentration, format_exposure, format_population};
use crate::domain::geometry::Bounds;
use crate::domain::selection::{Popup, SelectOutcome};
use crate::domain::summary::Summary;
use crate::domain::ward::WardReading;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready,
}

#[derive(Debug, Serialize)]
pub struct DatasetStatusBody {
    pub key: String,
    pub label: String,
    pub status: LoadState,
    pub supports_detail: bool,
    pub loaded_at: Option<DateTime<Utc>>,
    pub feature_count: usize,
    pub qualifying_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryBody {
    pub max_mean: f64,
    pub min_mean: f64,
    pub max_mean_display: String,
    pub min_mean_display: String,
    pub high_ward_count: usize,
}

#[derive(Debug, Serialize)]
pub struct HotspotRow {
    pub rank: usize,
    pub feature_id: String,
    pub name: String,
    pub value: f64,
    pub display: String,
    pub population: String,
}

#[derive(Debug, Serialize)]
pub struct DatasetOverviewBody {
    pub key: String,
    pub label: String,
    pub status: LoadState,
    pub supports_detail: bool,
    pub guideline: Option<f64>,
    pub summary: Option<SummaryBody>,
    pub bounds: Option<Bounds>,
    pub hotspots_by_mean: Vec<HotspotRow>,
    pub hotspots_by_exposure: Vec<HotspotRow>,
}

#[derive(Debug, Serialize)]
pub struct WardSuggestion {
    pub feature_id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectOutcomeBody {
    Popup { popup: Popup },
    FitBounds { bounds: Bounds },
}

pub fn status_to_body(status: DatasetStatus) -> DatasetStatusBody {
    DatasetStatusBody {
        status: if status.loaded_at.is_some() {
            LoadState::Ready
        } else {
            LoadState::Loading
        },
        key: status.key,
        label: status.label,
        supports_detail: status.supports_detail,
        loaded_at: status.loaded_at,
        feature_count: status.feature_count,
        qualifying_count: status.qualifying_count,
    }
}

/// Overview for a slot; a loading slot yields an empty placeholder.
pub fn slot_to_overview(profile: &DatasetProfile, slot: &DatasetSlot) -> DatasetOverviewBody {
    match slot {
        DatasetSlot::Ready { dataset, .. } => dataset_to_overview(dataset),
        DatasetSlot::Loading => DatasetOverviewBody {
            key: profile.key.clone(),
            label: profile.label.clone(),
            status: LoadState::Loading,
            supports_detail: profile.supports_detail,
            guideline: profile.guideline,
            summary: None,
            bounds: None,
            hotspots_by_mean: Vec::new(),
            hotspots_by_exposure: Vec::new(),
        },
    }
}

pub fn dataset_to_overview(dataset: &Dataset) -> DatasetOverviewBody {
    DatasetOverviewBody {
        key: dataset.profile.key.clone(),
        label: dataset.profile.label.clone(),
        status: LoadState::Ready,
        supports_detail: dataset.supports_detail(),
        guideline: dataset.profile.guideline,
        summary: dataset.summary.map(summary_to_body),
        bounds: dataset.bounds(),
        hotspots_by_mean: hotspot_rows(dataset.hotspots_by_mean(), |r| {
            (r.mean, format_concentration(Some(r.mean)))
        }),
        hotspots_by_exposure: hotspot_rows(dataset.hotspots_by_exposure(), |r| {
            let exposure = r.exposure.unwrap_or(f64::NAN);
            (exposure, format_exposure(r.exposure))
        }),
    }
}

fn summary_to_body(summary: Summary) -> SummaryBody {
    SummaryBody {
        max_mean: summary.max_mean,
        min_mean: summary.min_mean,
        max_mean_display: format_concentration(Some(summary.max_mean)),
        min_mean_display: format_concentration(Some(summary.min_mean)),
        high_ward_count: summary.high_ward_count,
    }
}

fn hotspot_rows<'a, I, F>(readings: I, value: F) -> Vec<HotspotRow>
where
    I: Iterator<Item = &'a WardReading>,
    F: Fn(&WardReading) -> (f64, String),
{
    readings
        .enumerate()
        .map(|(i, reading)| {
            let (value, display) = value(reading);
            HotspotRow {
                rank: i + 1,
                feature_id: reading.id.clone(),
                name: reading.display_name().to_string(),
                value,
                display,
                population: format_population(reading.population),
            }
        })
        .collect()
}

pub fn suggestions(readings: Vec<&WardReading>) -> Vec<WardSuggestion> {
    readings
        .into_iter()
        .map(|r| WardSuggestion {
            feature_id: r.id.clone(),
            name: r.display_name().to_string(),
        })
        .collect()
}

pub fn outcome_to_body(outcome: SelectOutcome) -> SelectOutcomeBody {
    match outcome {
        SelectOutcome::Selected(popup) => SelectOutcomeBody::Popup { popup },
        SelectOutcome::FitBounds(bounds) => SelectOutcomeBody::FitBounds { bounds },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ward::tests::{collection, ward};
    use serde_json::json;

    #[test]
    fn test_overview_lists_formatted_hotspots() {
        let dataset = Dataset::build(
            DatasetProfile::for_tests("NO2"),
            collection(json!([
                ward(1, json!(5), "Low"),
                ward(2, json!(9), "High"),
                ward(3, json!(0.000003), "Very High"),
            ])),
        );

        let body = dataset_to_overview(&dataset);
        let summary = body.summary.unwrap();
        assert_eq!(summary.max_mean_display, "9.00000000");
        assert_eq!(summary.min_mean_display, "3.00e-6");
        assert_eq!(summary.high_ward_count, 2);

        let names: Vec<&str> = body.hotspots_by_mean.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Ward 2", "Ward 1", "Ward 3"]);
        assert_eq!(body.hotspots_by_mean[0].rank, 1);
        assert_eq!(body.hotspots_by_exposure[0].display, "0.250");
        assert_eq!(body.hotspots_by_exposure[0].population, "12,345");
    }

    #[test]
    fn test_loading_slot_is_placeholder() {
        let profile = DatasetProfile::for_tests("SO2");
        let body = slot_to_overview(&profile, &DatasetSlot::Loading);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["status"], "loading");
        assert!(value["summary"].is_null());
        assert_eq!(value["hotspots_by_mean"], json!([]));
    }
}
