// Map service - use cases behind the map dashboard endpoints
use crate::application::dataset_service::{DatasetService, DatasetSlot};
use crate::application::routing::{RoutingError, RoutingService};
use crate::application::search::{PlaceSearch, SearchError};
use crate::application::session::{MapSession, SessionSnapshot};
use crate::domain::dataset::Dataset;
use crate::domain::geometry::LatLng;
use crate::domain::route::{Place, Route};
use crate::domain::selection::{Popup, SelectOutcome, SelectionChannel, SelectionError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("unknown dataset {0}")]
    UnknownDataset(String),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

#[derive(Clone)]
pub struct MapService {
    datasets: DatasetService,
    session: Arc<Mutex<MapSession>>,
    routing: Arc<dyn RoutingService>,
    search: Arc<dyn PlaceSearch>,
}

impl MapService {
    pub fn new(
        datasets: DatasetService,
        default_key: String,
        routing: Arc<dyn RoutingService>,
        search: Arc<dyn PlaceSearch>,
    ) -> Self {
        Self {
            datasets,
            session: Arc::new(Mutex::new(MapSession::new(default_key))),
            routing,
            search,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn choose_layer(&self, key: &str) -> Result<SessionSnapshot, MapError> {
        if !self.datasets.contains(key) {
            return Err(MapError::UnknownDataset(key.to_string()));
        }
        let mut session = self.session.lock().await;
        session.choose_layer(key);
        Ok(session.snapshot())
    }

    pub async fn set_layer_visible(&self, visible: bool) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        session.set_layer_visible(visible);
        session.snapshot()
    }

    pub async fn select(
        &self,
        feature_id: &str,
        channel: SelectionChannel,
    ) -> Result<SelectOutcome, MapError> {
        let mut session = self.session.lock().await;
        let dataset = self.active_dataset(&session).await?;
        Ok(session.select(&dataset, feature_id, channel)?)
    }

    pub async fn select_by_name(&self, term: &str) -> Result<SelectOutcome, MapError> {
        let mut session = self.session.lock().await;
        let dataset = self.active_dataset(&session).await?;
        Ok(session.select_by_name(&dataset, term)?)
    }

    pub async fn clear_selection(&self) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        session.clear_selection();
        session.snapshot()
    }

    pub async fn close_popup(&self) {
        self.session.lock().await.close_popup();
    }

    pub async fn reopen_popup(&self) -> Option<Popup> {
        self.session.lock().await.reopen_popup()
    }

    /// The session lock is not held while the routing service runs.
    pub async fn plan_route(&self, from: LatLng, to: LatLng) -> Result<Route, RoutingError> {
        self.session.lock().await.begin_route(from, to);

        let result = self.routing.route(from, to).await;
        if let Err(e) = &result {
            tracing::warn!("Route request failed: {}", e);
        }

        self.session.lock().await.finish_route(from, to, result)
    }

    pub async fn discard_route(&self) {
        self.session.lock().await.discard_route();
    }

    pub async fn search_places(&self, query: &str, limit: usize) -> Result<Vec<Place>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::NoMatch(String::new()));
        }
        self.search.search(query, limit).await
    }

    async fn active_dataset(&self, session: &MapSession) -> Result<Arc<Dataset>, MapError> {
        let key = &session.layer().key;
        match self.datasets.slot(key).await {
            Some(DatasetSlot::Ready { dataset, .. }) => Ok(dataset),
            Some(DatasetSlot::Loading) => Err(SelectionError::DatasetLoading(key.clone()).into()),
            None => Err(MapError::UnknownDataset(key.clone())),
        }
    }
}
