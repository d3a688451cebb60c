// HTTP request handlers
use crate::application::session::SessionSnapshot;
use crate::domain::geometry::LatLng;
use crate::domain::route::{Place, Route};
use crate::domain::selection::{Popup, SelectionChannel, SelectionError};
use crate::infrastructure::json_mapper::{
    outcome_to_body, slot_to_overview, status_to_body, suggestions, DatasetOverviewBody,
    DatasetStatusBody, SelectOutcomeBody, WardSuggestion,
};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use geojson::FeatureCollection;
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_SUGGESTIONS: usize = 8;
const DEFAULT_PLACE_RESULTS: usize = 5;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct ChooseLayerRequest {
    pub key: String,
}

#[derive(Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Deserialize)]
pub struct SelectRequest {
    pub feature_id: String,
    #[serde(default = "default_channel")]
    pub channel: SelectionChannel,
}

fn default_channel() -> SelectionChannel {
    SelectionChannel::Map
}

#[derive(Deserialize)]
pub struct SelectByNameRequest {
    pub term: String,
}

#[derive(Deserialize)]
pub struct RouteRequest {
    pub from: LatLng,
    pub to: LatLng,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Load state of every configured dataset
pub async fn list_datasets(State(state): State<Arc<AppState>>) -> Json<Vec<DatasetStatusBody>> {
    let statuses = state.dataset_service.statuses().await;
    Json(statuses.into_iter().map(status_to_body).collect())
}

/// Summary and hotspot lists; a placeholder while the dataset is loading
pub async fn dataset_overview(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatasetOverviewBody>, ApiError> {
    let profile = state
        .dataset_service
        .profiles()
        .iter()
        .find(|p| p.key == key)
        .ok_or_else(|| ApiError::UnknownDataset(key.clone()))?;
    let slot = state
        .dataset_service
        .slot(&key)
        .await
        .ok_or_else(|| ApiError::UnknownDataset(key.clone()))?;

    Ok(Json(slot_to_overview(profile, &slot)))
}

/// Raw features for rendering, including ones left out of the statistics
pub async fn dataset_features(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<FeatureCollection>, ApiError> {
    if !state.dataset_service.contains(&key) {
        return Err(ApiError::UnknownDataset(key));
    }
    let dataset = state
        .dataset_service
        .ready(&key)
        .await
        .ok_or_else(|| ApiError::from(SelectionError::DatasetLoading(key)))?;

    Ok(Json(dataset.collection.clone()))
}

/// Ward-name autocomplete for the search box
pub async fn search_wards(
    Path(key): Path<String>,
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WardSuggestion>>, ApiError> {
    if !state.dataset_service.contains(&key) {
        return Err(ApiError::UnknownDataset(key));
    }
    let limit = query.limit.unwrap_or(DEFAULT_SUGGESTIONS);

    // A loading dataset has nothing to suggest yet
    let found = match state.dataset_service.ready(&key).await {
        Some(dataset) => suggestions(dataset.autocomplete(&query.q, limit)),
        None => Vec::new(),
    };
    Ok(Json(found))
}

pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.map_service.snapshot().await)
}

pub async fn choose_layer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChooseLayerRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.map_service.choose_layer(&request.key).await?))
}

pub async fn set_layer_visibility(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VisibilityRequest>,
) -> Json<SessionSnapshot> {
    Json(state.map_service.set_layer_visible(request.visible).await)
}

pub async fn select_ward(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectOutcomeBody>, ApiError> {
    let outcome = state
        .map_service
        .select(&request.feature_id, request.channel)
        .await?;
    Ok(Json(outcome_to_body(outcome)))
}

pub async fn select_ward_by_name(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectByNameRequest>,
) -> Result<Json<SelectOutcomeBody>, ApiError> {
    let outcome = state.map_service.select_by_name(&request.term).await?;
    Ok(Json(outcome_to_body(outcome)))
}

pub async fn clear_selection(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.map_service.clear_selection().await)
}

pub async fn reopen_popup(State(state): State<Arc<AppState>>) -> Result<Json<Popup>, ApiError> {
    state
        .map_service
        .reopen_popup()
        .await
        .map(Json)
        .ok_or(ApiError::NoPopup)
}

pub async fn close_popup(State(state): State<Arc<AppState>>) -> StatusCode {
    state.map_service.close_popup().await;
    StatusCode::NO_CONTENT
}

pub async fn plan_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<Route>, ApiError> {
    let route = state
        .map_service
        .plan_route(request.from, request.to)
        .await?;
    Ok(Json(route))
}

pub async fn discard_route(State(state): State<Arc<AppState>>) -> StatusCode {
    state.map_service.discard_route().await;
    StatusCode::NO_CONTENT
}

/// Free-text place search through the external geocoder
pub async fn search_places(
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Place>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_PLACE_RESULTS);
    Ok(Json(state.map_service.search_places(&query.q, limit).await?))
}
