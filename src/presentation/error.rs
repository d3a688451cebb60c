// Error responses - status code plus a user-facing alert message
use crate::application::map_service::MapError;
use crate::application::routing::RoutingError;
use crate::application::search::SearchError;
use crate::domain::selection::SelectionError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown dataset {0}")]
    UnknownDataset(String),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("nothing to reopen")]
    NoPopup,
}

impl From<MapError> for ApiError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::UnknownDataset(key) => ApiError::UnknownDataset(key),
            MapError::Selection(e) => ApiError::Selection(e),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownDataset(_) | ApiError::NoPopup => StatusCode::NOT_FOUND,
            ApiError::Selection(SelectionError::DatasetLoading(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Selection(SelectionError::UnknownFeature(_) | SelectionError::NoMatch(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Selection(_) => StatusCode::CONFLICT,
            ApiError::Routing(_) => StatusCode::BAD_GATEWAY,
            ApiError::Search(SearchError::NoMatch(_)) => StatusCode::NOT_FOUND,
            ApiError::Search(SearchError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
        }
    }

    fn alert(&self) -> String {
        match self {
            ApiError::Routing(e) => e.alert(),
            ApiError::Search(e) => e.alert(),
            ApiError::Selection(SelectionError::NoMatch(term)) => {
                format!("No ward named \"{}\" was found.", term)
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(json!({ "alert": self.alert() }))).into_response()
    }
}
