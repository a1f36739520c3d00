//! Saved-game persistence on top of a [`KeyValueStore`].

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    dao::{
        kv_store::KeyValueStore,
        models::SavedGameEntity,
        storage::{StorageError, StorageResult},
    },
    state::{
        game::Song,
        state_machine::{MAX_LIVES, Outcome, RoundState},
    },
};

/// Key under which the saved game is stored.
pub const SAVED_GAME_KEY: &str = "ostguess.savedGame";
/// Schema version written with every saved game.
pub const SAVED_GAME_VERSION: u32 = 1;

/// Progress recovered from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredGame {
    /// Round state to resume from; always hidden with an empty input.
    pub state: RoundState,
    /// Song order the saved game was played with.
    pub songs: Vec<Song>,
}

/// Build the record persisted for `state`.
///
/// Revealed rounds are written in their settled form, so reloading never
/// replays a round that was already decided.
pub fn snapshot(state: &RoundState, songs: &[Song]) -> SavedGameEntity {
    let settled = state.settled();
    SavedGameEntity {
        version: SAVED_GAME_VERSION,
        points: settled.points,
        song_index: settled.song_index,
        total_guessed: settled.total_guessed,
        lives: settled.lives,
        songs: songs.iter().cloned().map(Into::into).collect(),
    }
}

/// Serialize `saved` into the store.
pub fn save(store: &dyn KeyValueStore, saved: &SavedGameEntity) -> StorageResult<()> {
    let payload = serde_json::to_string(saved)
        .map_err(|err| StorageError::corrupted("failed to encode saved game".into(), err))?;
    store.set(SAVED_GAME_KEY, payload)?;
    debug!(
        song_index = saved.song_index,
        points = saved.points,
        total_guessed = saved.total_guessed,
        "saved game written"
    );
    Ok(())
}

/// Read the saved game, treating unreadable, malformed or outdated records as absent.
pub fn load(store: &dyn KeyValueStore) -> Option<RestoredGame> {
    let raw = match store.get(SAVED_GAME_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(error = %err, "saved game unreadable; starting fresh");
            return None;
        }
    };

    let saved = match serde_json::from_str::<SavedGameEntity>(&raw) {
        Ok(saved) => saved,
        Err(err) => {
            warn!(error = %err, "saved game malformed; starting fresh");
            return None;
        }
    };

    if saved.version != SAVED_GAME_VERSION {
        warn!(
            found = saved.version,
            expected = SAVED_GAME_VERSION,
            "saved game version mismatch; starting fresh"
        );
        return None;
    }

    // Failed rounds are saved settled, so a hidden round always has a life left.
    let lives_in_range = (1..=MAX_LIVES).contains(&saved.lives);
    if !lives_in_range || saved.song_index > saved.songs.len() {
        warn!(
            lives = saved.lives,
            song_index = saved.song_index,
            songs = saved.songs.len(),
            "saved game out of range; starting fresh"
        );
        return None;
    }

    let state = RoundState {
        points: saved.points,
        total_guessed: saved.total_guessed,
        song_index: saved.song_index,
        lives: saved.lives,
        input: String::new(),
        outcome: Outcome::Hidden,
    };

    Some(RestoredGame {
        state,
        songs: saved.songs.into_iter().map(Into::into).collect(),
    })
}

/// Append to `saved` every song of `fresh` whose uri it does not contain yet.
///
/// The saved order is preserved so a saved song index keeps pointing at the
/// same song.
pub fn reconcile(mut saved: Vec<Song>, fresh: &[Song]) -> Vec<Song> {
    let known: HashSet<String> = saved.iter().map(|song| song.uri.clone()).collect();
    let before = saved.len();

    saved.extend(
        fresh
            .iter()
            .filter(|song| !known.contains(&song.uri))
            .cloned(),
    );

    if saved.len() > before {
        debug!(added = saved.len() - before, "new songs appended to saved game");
    }
    saved
}

/// Load the saved game and merge the freshly fetched songs into it.
pub fn restore(store: &dyn KeyValueStore, fresh: &[Song]) -> Option<RestoredGame> {
    let RestoredGame { state, songs } = load(store)?;
    Some(RestoredGame {
        state,
        songs: reconcile(songs, fresh),
    })
}
