/// One-shot sources for the song catalogue document.
pub mod catalogue;
/// Narrow key-value store abstraction standing in for client-local storage.
pub mod kv_store;
/// Serialized shapes of the catalogue and the saved game.
pub mod models;
/// Error types shared by the storage backends.
pub mod storage;
