use std::path::PathBuf;

use futures::{FutureExt, future::BoxFuture};
use tracing::info;

use crate::dao::models::CatalogueEntity;

use super::{CatalogueSource, FetchError, FetchResult, ensure_playable};

/// Catalogue read from a JSON document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileCatalogue {
    path: PathBuf,
}

impl FileCatalogue {
    /// Build a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogueSource for FileCatalogue {
    fn fetch(&self) -> BoxFuture<'static, FetchResult<CatalogueEntity>> {
        let path = self.path.clone();
        async move {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| FetchError::ReadFile {
                    path: path.clone(),
                    source,
                })?;
            let catalogue = serde_json::from_str::<CatalogueEntity>(&contents).map_err(
                |source| FetchError::ParseFile {
                    path: path.clone(),
                    source,
                },
            )?;

            info!(
                path = %path.display(),
                songs = catalogue.songs.len(),
                "catalogue loaded from file"
            );
            ensure_playable(catalogue, &path.display().to_string())
        }
        .boxed()
    }
}
