/// Catalogue bootstrap and session construction.
pub mod game_service;
/// Saved-game encoding, loading and song list reconciliation.
pub mod persistence;
/// Terminal front end.
pub mod terminal;
