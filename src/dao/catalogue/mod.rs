//! One-shot sources for the catalogue document (songs and possibilities).

mod error;
mod file;
#[cfg(feature = "http-catalogue")]
mod http;

pub use self::error::{FetchError, FetchResult};
pub use self::file::FileCatalogue;
#[cfg(feature = "http-catalogue")]
pub use self::http::HttpCatalogue;

use futures::future::BoxFuture;

use crate::dao::models::CatalogueEntity;

/// Abstraction over where the catalogue document comes from.
pub trait CatalogueSource: Send + Sync {
    /// Fetch and decode the catalogue. An empty song list is an error.
    fn fetch(&self) -> BoxFuture<'static, FetchResult<CatalogueEntity>>;
}

/// Reject catalogues that cannot start a game.
fn ensure_playable(catalogue: CatalogueEntity, origin: &str) -> FetchResult<CatalogueEntity> {
    if catalogue.songs.is_empty() {
        return Err(FetchError::EmptyCatalogue {
            origin: origin.to_owned(),
        });
    }
    Ok(catalogue)
}
