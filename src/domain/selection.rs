// Selection controller - the single highlighted ward and its info popup
use super::dataset::Dataset;
use super::format::{format_concentration, format_exposure, format_population, NOT_AVAILABLE};
use super::geometry::{self, Bounds, LatLng};
use super::summary::GuidelineStatus;
use super::ward::WardReading;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visual highlight side effects, kept behind a port so the controller does
/// not depend on a map library.
pub trait HighlightPort {
    fn apply_highlight(&mut self, feature_id: &str);
    fn clear_highlight(&mut self, feature_id: &str);
}

/// Where a selection request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionChannel {
    Map,
    Hotspot,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectionState {
    Idle,
    Selected {
        feature_id: String,
        dataset_key: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupContent {
    pub name: String,
    pub mean: String,
    pub max: String,
    pub category: String,
    pub population: String,
    pub exposure: String,
    pub guideline: Option<GuidelineStatus>,
}

impl PopupContent {
    pub fn for_ward(reading: &WardReading, guideline: Option<f64>) -> Self {
        Self {
            name: reading.display_name().to_string(),
            mean: format_concentration(Some(reading.mean)),
            max: format_concentration(reading.max),
            category: reading
                .category
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            population: format_population(reading.population),
            exposure: format_exposure(reading.exposure),
            guideline: guideline.map(|t| GuidelineStatus::classify(reading.mean, t)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub anchor: Option<LatLng>,
    pub content: PopupContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    Selected(Popup),
    /// Detail-less layer: the client should only fit the map to the feature.
    FitBounds(Bounds),
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("ward {0} is not part of the active layer")]
    UnknownFeature(String),
    #[error("no ward matches \"{0}\"")]
    NoMatch(String),
    #[error("layer {0} is not the active layer")]
    InactiveDataset(String),
    #[error("the active layer is hidden")]
    LayerHidden,
    #[error("layer {0} is still loading")]
    DatasetLoading(String),
}

#[derive(Debug, Default)]
pub struct SelectionController {
    /// (feature id, dataset key)
    selected: Option<(String, String)>,
    last_popup: Option<Popup>,
    popup_open: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        match &self.selected {
            None => SelectionState::Idle,
            Some((feature_id, dataset_key)) => SelectionState::Selected {
                feature_id: feature_id.clone(),
                dataset_key: dataset_key.clone(),
            },
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|(id, _)| id.as_str())
    }

    /// The popup currently shown, if any.
    pub fn open_popup(&self) -> Option<&Popup> {
        self.last_popup.as_ref().filter(|_| self.popup_open)
    }

    /// Select a ward by id. Replaces any previous selection in one step: the
    /// old highlight is cleared before the new one is applied.
    pub fn select(
        &mut self,
        dataset: &Dataset,
        feature_id: &str,
        channel: SelectionChannel,
        port: &mut dyn HighlightPort,
    ) -> Result<SelectOutcome, SelectionError> {
        if !dataset.supports_detail() {
            tracing::debug!(
                "Layer {} has no ward detail; fitting bounds for {} ({:?})",
                dataset.key(),
                feature_id,
                channel
            );
            return dataset
                .feature_bounds(feature_id)
                .map(SelectOutcome::FitBounds)
                .ok_or_else(|| SelectionError::UnknownFeature(feature_id.to_string()));
        }

        let reading = dataset
            .find(feature_id)
            .ok_or_else(|| SelectionError::UnknownFeature(feature_id.to_string()))?;

        let popup = Popup {
            anchor: reading.geometry.as_ref().and_then(geometry::centroid),
            content: PopupContent::for_ward(reading, dataset.profile.guideline),
        };

        if let Some(previous) = self.selected_id() {
            if previous != reading.id {
                port.clear_highlight(previous);
            }
        }
        port.apply_highlight(&reading.id);

        self.selected = Some((reading.id.clone(), dataset.key().to_string()));
        self.last_popup = Some(popup.clone());
        self.popup_open = true;

        tracing::debug!("Selected ward {} on {} via {:?}", reading.id, dataset.key(), channel);
        Ok(SelectOutcome::Selected(popup))
    }

    /// Select the ward whose name matches `term`. No state change on a miss.
    pub fn select_by_name(
        &mut self,
        dataset: &Dataset,
        term: &str,
        port: &mut dyn HighlightPort,
    ) -> Result<SelectOutcome, SelectionError> {
        let id = dataset
            .find_by_name(term)
            .map(|r| r.id.clone())
            .ok_or_else(|| SelectionError::NoMatch(term.trim().to_string()))?;
        self.select(dataset, &id, SelectionChannel::Search, port)
    }

    pub fn clear(&mut self, port: &mut dyn HighlightPort) {
        if let Some((feature_id, _)) = self.selected.take() {
            port.clear_highlight(&feature_id);
        }
        self.last_popup = None;
        self.popup_open = false;
    }

    /// Close the popup but keep the selection and the cached content.
    pub fn close_popup(&mut self) {
        self.popup_open = false;
    }

    pub fn reopen_last_popup(&mut self) -> Option<&Popup> {
        if self.last_popup.is_some() {
            self.popup_open = true;
        }
        self.last_popup.as_ref()
    }
}
