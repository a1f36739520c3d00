use thiserror::Error;

use crate::dao::catalogue::FetchError;

/// Errors that can occur while bootstrapping a game session.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The catalogue could not be fetched; no session can start.
    #[error("failed to load the song catalogue")]
    Catalogue(#[from] FetchError),
    /// The catalogue location is not usable with the enabled features.
    #[error("unsupported catalogue location: {0}")]
    UnsupportedSource(String),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn catalogue_errors_keep_their_source() {
        let err: ServiceError = FetchError::EmptyCatalogue {
            origin: "data.json".into(),
        }
        .into();

        assert_eq!(err.to_string(), "failed to load the song catalogue");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("catalogue from `data.json` contains no songs")
        );
    }
}
