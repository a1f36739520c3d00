use serde::{Deserialize, Serialize};

/// Song entry as it appears in the catalogue document and in the saved game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SongEntity {
    /// Path of the audio resource, relative to the asset base URL.
    pub uri: String,
    /// Accepted answer for this song.
    pub display_name: String,
    /// Label shown alongside the audio.
    pub name: String,
}

/// Catalogue document fetched once at session start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogueEntity {
    /// Songs to be guessed.
    pub songs: Vec<SongEntity>,
    /// Every valid answer, offered as suggestions. The wire name is misspelled upstream.
    #[serde(rename = "posibilities", default)]
    pub possibilities: Vec<String>,
}

/// Snapshot of game progress persisted in the key-value store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavedGameEntity {
    /// Schema version of the record.
    pub version: u32,
    /// Current streak.
    pub points: u32,
    /// Position of the current song in `songs`.
    pub song_index: usize,
    /// Number of songs guessed over the whole game.
    pub total_guessed: u32,
    /// Remaining lives for the current song.
    pub lives: u8,
    /// Song order the game was started with.
    pub songs: Vec<SongEntity>,
}
