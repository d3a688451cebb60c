// Application state for HTTP handlers
use crate::application::dataset_service::DatasetService;
use crate::application::map_service::MapService;

#[derive(Clone)]
pub struct AppState {
    pub dataset_service: DatasetService,
    pub map_service: MapService,
}
