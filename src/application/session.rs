// Map session - process-wide interaction state and its transitions
use crate::application::routing::RoutingError;
use crate::domain::dataset::Dataset;
use crate::domain::geometry::LatLng;
use crate::domain::layer::{ActiveLayer, LayerChange};
use crate::domain::route::Route;
use crate::domain::selection::{
    HighlightPort, Popup, SelectOutcome, SelectionChannel, SelectionController, SelectionError,
    SelectionState,
};
use serde::Serialize;
use std::collections::BTreeSet;

/// Highlight port backed by a set of ids, reported to clients so they can
/// style the matching features.
#[derive(Debug, Default)]
pub struct HighlightSet {
    ids: BTreeSet<String>,
}

impl HighlightSet {
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

impl HighlightPort for HighlightSet {
    fn apply_highlight(&mut self, feature_id: &str) {
        self.ids.insert(feature_id.to_string());
    }

    fn clear_highlight(&mut self, feature_id: &str) {
        self.ids.remove(feature_id);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteState {
    Empty,
    Pending { from: LatLng, to: LatLng },
    Ready(Route),
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub layer: ActiveLayer,
    pub selection: SelectionState,
    pub popup: Option<Popup>,
    pub highlighted: Vec<String>,
    pub route: Option<Route>,
    pub route_pending: bool,
}

pub struct MapSession {
    layer: ActiveLayer,
    selection: SelectionController,
    highlights: HighlightSet,
    route: RouteState,
}

impl MapSession {
    pub fn new(default_key: String) -> Self {
        Self {
            layer: ActiveLayer::new(default_key),
            selection: SelectionController::new(),
            highlights: HighlightSet::default(),
            route: RouteState::Empty,
        }
    }

    pub fn layer(&self) -> &ActiveLayer {
        &self.layer
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn route(&self) -> &RouteState {
        &self.route
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (route, route_pending) = match self.route() {
            RouteState::Empty => (None, false),
            RouteState::Pending { .. } => (None, true),
            RouteState::Ready(route) => (Some(route.clone()), false),
        };

        SessionSnapshot {
            layer: self.layer.clone(),
            selection: self.selection(),
            popup: self.selection.open_popup().cloned(),
            highlighted: self.highlights.ids(),
            route,
            route_pending,
        }
    }

    /// Switching to another dataset drops the selection and its popup cache
    /// before anything of the new dataset is shown.
    pub fn choose_layer(&mut self, key: &str) -> LayerChange {
        let change = self.layer.choose(key);
        if let LayerChange::Switched { from, to } = &change {
            tracing::info!("Switched layer {} -> {}", from, to);
            self.selection.clear(&mut self.highlights);
        }
        change
    }

    pub fn set_layer_visible(&mut self, visible: bool) {
        if self.layer.set_visible(visible) {
            self.selection.clear(&mut self.highlights);
        }
    }

    pub fn select(
        &mut self,
        dataset: &Dataset,
        feature_id: &str,
        channel: SelectionChannel,
    ) -> Result<SelectOutcome, SelectionError> {
        self.ensure_active(dataset)?;
        self.selection
            .select(dataset, feature_id, channel, &mut self.highlights)
    }

    pub fn select_by_name(
        &mut self,
        dataset: &Dataset,
        term: &str,
    ) -> Result<SelectOutcome, SelectionError> {
        self.ensure_active(dataset)?;
        self.selection
            .select_by_name(dataset, term, &mut self.highlights)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.highlights);
    }

    pub fn close_popup(&mut self) {
        self.selection.close_popup();
    }

    pub fn reopen_popup(&mut self) -> Option<Popup> {
        self.selection.reopen_last_popup().cloned()
    }

    pub fn begin_route(&mut self, from: LatLng, to: LatLng) {
        self.route = RouteState::Pending { from, to };
    }

    /// Store a finished route request. A failure discards whatever route
    /// state exists; a result for a request that was superseded is dropped.
    pub fn finish_route(
        &mut self,
        from: LatLng,
        to: LatLng,
        result: Result<Route, RoutingError>,
    ) -> Result<Route, RoutingError> {
        let current = matches!(
            self.route,
            RouteState::Pending { from: f, to: t } if f == from && t == to
        );

        match result {
            Ok(route) => {
                if current {
                    self.route = RouteState::Ready(route.clone());
                }
                Ok(route)
            }
            Err(e) => {
                if current {
                    self.route = RouteState::Empty;
                }
                Err(e)
            }
        }
    }

    pub fn discard_route(&mut self) {
        self.route = RouteState::Empty;
    }

    fn ensure_active(&self, dataset: &Dataset) -> Result<(), SelectionError> {
        if dataset.key() != self.layer.key {
            return Err(SelectionError::InactiveDataset(dataset.key().to_string()));
        }
        if !self.layer.visible {
            return Err(SelectionError::LayerHidden);
        }
        Ok(())
    }
}
