// Place search capability - free-text lookup against an external geocoder
use crate::domain::route::Place;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("no place matches \"{0}\"")]
    NoMatch(String),
    #[error("search service unavailable: {0}")]
    Unavailable(String),
}

impl SearchError {
    pub fn alert(&self) -> String {
        match self {
            SearchError::NoMatch(term) => format!("No results found for \"{}\".", term),
            SearchError::Unavailable(_) => "Search is currently unavailable.".to_string(),
        }
    }
}

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Never returns an empty list: a query with no hits is `NoMatch`.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, SearchError>;
}
