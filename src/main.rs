// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dataset_service::DatasetService;
use crate::application::map_service::MapService;
use crate::infrastructure::config::{load_datasets_config, load_server_config};
use crate::infrastructure::nominatim_search::NominatimSearch;
use crate::infrastructure::osrm_routing::OsrmRouting;
use crate::infrastructure::static_source::StaticDatasetSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    choose_layer, clear_selection, close_popup, dataset_features, dataset_overview,
    discard_route, get_session, health_check, list_datasets, plan_route, reopen_popup,
    search_places, search_wards, select_ward, select_ward_by_name, set_layer_visibility,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let server_config = load_server_config()?;
    let datasets_config = load_datasets_config()?;

    let default_dataset = server_config.server.default_dataset.clone();
    if !datasets_config.datasets.iter().any(|d| d.key == default_dataset) {
        anyhow::bail!("default dataset {} is not configured", default_dataset);
    }

    // Adapters (infrastructure layer)
    let source = Arc::new(StaticDatasetSource::new());
    let routing = Arc::new(OsrmRouting::new(
        server_config.routing.base_url,
        server_config.routing.profile,
    ));
    let search = Arc::new(NominatimSearch::new(
        server_config.search.base_url,
        server_config.search.viewbox,
    )?);

    // Services (application layer)
    let dataset_service = DatasetService::new(source, datasets_config.datasets);
    let map_service = MapService::new(dataset_service.clone(), default_dataset, routing, search);

    // Loads run in the background; the API serves placeholders until they land
    let _loads = dataset_service.load_all();

    let state = Arc::new(AppState {
        dataset_service,
        map_service,
    });

    let router = build_router(state);

    let addr: SocketAddr = server_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", server_config.server.bind))?;
    tracing::info!("Starting ward-airmap service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/datasets", get(list_datasets))
        .route("/datasets/:key", get(dataset_overview))
        .route("/datasets/:key/features", get(dataset_features))
        .route("/datasets/:key/search", get(search_wards))
        .route("/session", get(get_session))
        .route("/session/layer", post(choose_layer))
        .route("/session/layer/visibility", put(set_layer_visibility))
        .route("/session/selection", post(select_ward).delete(clear_selection))
        .route("/session/selection/search", post(select_ward_by_name))
        .route("/session/popup", post(reopen_popup).delete(close_popup))
        .route("/route", post(plan_route).delete(discard_route))
        .route("/places", get(search_places))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
