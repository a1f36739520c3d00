use std::sync::Arc;

use tracing::info;

use crate::{
    dao::{
        catalogue::{CatalogueSource, FileCatalogue},
        kv_store::KeyValueStore,
    },
    error::ServiceError,
    state::{GameSession, game::Catalogue},
};

/// Pick the catalogue source for `location`: HTTP(S) URLs are fetched, anything else is a path.
pub fn source_for(location: &str) -> Result<Box<dyn CatalogueSource>, ServiceError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return http_source(location);
    }
    if location.trim().is_empty() {
        return Err(ServiceError::UnsupportedSource("empty location".into()));
    }
    Ok(Box::new(FileCatalogue::new(location)))
}

#[cfg(feature = "http-catalogue")]
fn http_source(location: &str) -> Result<Box<dyn CatalogueSource>, ServiceError> {
    use crate::dao::catalogue::HttpCatalogue;

    Ok(Box::new(HttpCatalogue::new(location)?))
}

#[cfg(not(feature = "http-catalogue"))]
fn http_source(location: &str) -> Result<Box<dyn CatalogueSource>, ServiceError> {
    Err(ServiceError::UnsupportedSource(format!(
        "`{location}` requires the `http-catalogue` feature"
    )))
}

/// Fetch the catalogue once and build a session over it.
///
/// A failed fetch returns before the store is consulted, so saved progress is
/// never touched by a session that could not start.
pub async fn bootstrap(
    source: &dyn CatalogueSource,
    store: Arc<dyn KeyValueStore>,
) -> Result<GameSession, ServiceError> {
    let entity = source.fetch().await?;
    let catalogue = Catalogue::prepare(entity);
    info!(
        songs = catalogue.songs.len(),
        possibilities = catalogue.possibilities.len(),
        "catalogue ready"
    );

    Ok(GameSession::new(catalogue, store))
}
