//! Error types shared by the catalogue sources.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias returning [`FetchError`] failures.
pub type FetchResult<T> = Result<T, FetchError>;

/// Failures that can occur while loading the catalogue document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[cfg(feature = "http-catalogue")]
    #[error("failed to build HTTP client")]
    ClientBuilder {
        /// Client construction failure.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent.
    #[cfg(feature = "http-catalogue")]
    #[error("failed to send catalogue request to `{url}`")]
    RequestSend {
        /// Catalogue URL.
        url: String,
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[cfg(feature = "http-catalogue")]
    #[error("unexpected response status {status} for `{url}`")]
    RequestStatus {
        /// Catalogue URL.
        url: String,
        /// Status returned by the server.
        status: reqwest::StatusCode,
    },
    /// The response body was not a valid catalogue document.
    #[cfg(feature = "http-catalogue")]
    #[error("failed to decode catalogue from `{url}`")]
    DecodeResponse {
        /// Catalogue URL.
        url: String,
        /// Decoding failure.
        #[source]
        source: reqwest::Error,
    },
    /// The catalogue file could not be read.
    #[error("failed to read catalogue file `{}`", path.display())]
    ReadFile {
        /// Catalogue file.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The catalogue file was not a valid catalogue document.
    #[error("failed to parse catalogue file `{}`", path.display())]
    ParseFile {
        /// Catalogue file.
        path: PathBuf,
        /// JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// The document decoded fine but lists no songs.
    #[error("catalogue from `{origin}` contains no songs")]
    EmptyCatalogue {
        /// URL or path the catalogue came from.
        origin: String,
    },
}
