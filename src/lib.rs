//! Library crate for ostguess, exposing the game core to the binary and to tests.

/// Runtime configuration loaded from disk.
pub mod config;
/// Storage and catalogue access.
pub mod dao;
/// Errors raised while bootstrapping a session.
pub mod error;
/// Persistence, session bootstrap and the terminal front end.
pub mod services;
/// Game session and round state machine.
pub mod state;
/// Shuffle, dedup and suggestion helpers.
pub mod utils;
