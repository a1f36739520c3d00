use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};
use reqwest::Client;
use tracing::info;

use crate::dao::models::CatalogueEntity;

use super::{CatalogueSource, FetchError, FetchResult, ensure_playable};

/// Catalogue served as a static JSON document over HTTP.
#[derive(Clone)]
pub struct HttpCatalogue {
    client: Client,
    url: Arc<str>,
}

impl HttpCatalogue {
    /// Build a source fetching `url`.
    pub fn new(url: impl Into<String>) -> FetchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| FetchError::ClientBuilder { source })?;

        Ok(Self {
            client,
            url: Arc::from(url.into()),
        })
    }

    async fn fetch_document(client: Client, url: Arc<str>) -> FetchResult<CatalogueEntity> {
        let response = client
            .get(&*url)
            .send()
            .await
            .map_err(|source| FetchError::RequestSend {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::RequestStatus {
                url: url.to_string(),
                status,
            });
        }

        let catalogue = response
            .json::<CatalogueEntity>()
            .await
            .map_err(|source| FetchError::DecodeResponse {
                url: url.to_string(),
                source,
            })?;

        info!(
            url = %url,
            songs = catalogue.songs.len(),
            possibilities = catalogue.possibilities.len(),
            "catalogue fetched"
        );
        ensure_playable(catalogue, &url)
    }
}

impl CatalogueSource for HttpCatalogue {
    fn fetch(&self) -> BoxFuture<'static, FetchResult<CatalogueEntity>> {
        Self::fetch_document(self.client.clone(), self.url.clone()).boxed()
    }
}
