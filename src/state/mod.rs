/// Runtime songs and the prepared catalogue.
pub mod game;
/// Round state, events and the pure transition function.
pub mod state_machine;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    dao::kv_store::KeyValueStore,
    services::persistence::{self, RestoredGame},
    utils::suggestions,
};

use self::{
    game::{Catalogue, Song},
    state_machine::{Effect, IgnoredEvent, RoundEvent, RoundState, transition},
};

/// What a dispatched event produced, minus the effects already handled by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Effects left for the caller to run (reveal timers).
    pub effects: Vec<Effect>,
    /// Set when the event was dropped.
    pub ignored: Option<IgnoredEvent>,
}

/// One player's game: catalogue, round progress and the store it is saved to.
pub struct GameSession {
    catalogue: Catalogue,
    round: RoundState,
    store: Arc<dyn KeyValueStore>,
    started: bool,
    restored: bool,
}

impl GameSession {
    /// Build a session over a freshly prepared catalogue, resuming saved progress when present.
    ///
    /// Nothing is written to the store until [`GameSession::start`] is called.
    pub fn new(catalogue: Catalogue, store: Arc<dyn KeyValueStore>) -> Self {
        let Catalogue {
            songs: fresh_songs,
            possibilities,
        } = catalogue;

        let (songs, round, restored) = match persistence::restore(store.as_ref(), &fresh_songs) {
            Some(RestoredGame { state, songs }) => {
                info!(
                    song_index = state.song_index,
                    songs = songs.len(),
                    points = state.points,
                    "resuming saved game"
                );
                (songs, state, true)
            }
            None => (fresh_songs, RoundState::new(), false),
        };

        Self {
            catalogue: Catalogue {
                songs,
                possibilities,
            },
            round,
            store,
            started: false,
            restored,
        }
    }

    /// Mark the game as started and write the initial saved game.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.persist();
    }

    /// Whether [`GameSession::start`] has been called.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether progress was recovered from the store.
    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// Current round progress.
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// Songs in play order.
    pub fn songs(&self) -> &[Song] {
        &self.catalogue.songs
    }

    /// Distinct valid answers.
    pub fn possibilities(&self) -> &[String] {
        &self.catalogue.possibilities
    }

    /// The song being played, if the game is not complete.
    pub fn current_song(&self) -> Option<&Song> {
        self.round.current_song(&self.catalogue.songs)
    }

    /// Whether every song has been played.
    pub fn is_complete(&self) -> bool {
        self.round.is_complete(&self.catalogue.songs)
    }

    /// Apply `event`, saving progress when the transition asks for it.
    ///
    /// This is the only place the round state is replaced.
    pub fn dispatch(&mut self, event: RoundEvent) -> Dispatched {
        let result = transition(&self.round, &self.catalogue.songs, event);

        if let Some(ignored) = &result.ignored {
            debug!(%ignored, "event ignored");
        }
        self.round = result.state;

        let mut effects = Vec::new();
        for effect in result.effects {
            match effect {
                Effect::Persist => {
                    if self.started {
                        self.persist();
                    }
                }
                other => effects.push(other),
            }
        }

        Dispatched {
            effects,
            ignored: result.ignored,
        }
    }

    /// Full URL of the current song's audio, resolved against `base_url`.
    pub fn audio_url(&self, base_url: &str) -> Option<String> {
        self.current_song()
            .map(|song| format!("{}/{}", base_url.trim_end_matches('/'), song.uri))
    }

    /// Possibilities matching `query`, capped at `limit`.
    pub fn suggestions(&self, query: &str, limit: usize) -> Vec<&str> {
        suggestions(&self.catalogue.possibilities, query, limit)
    }

    /// One-line summary of streak, total and position.
    pub fn status_line(&self) -> String {
        format!(
            "Current strike: {} | total guessed: {} | current song: {}/{}",
            self.round.points,
            self.round.total_guessed,
            self.round.song_index + 1,
            self.catalogue.songs.len()
        )
    }

    fn persist(&self) {
        let saved = persistence::snapshot(&self.round, &self.catalogue.songs);
        if let Err(err) = persistence::save(self.store.as_ref(), &saved) {
            warn!(error = %err, "failed to persist saved game");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        dao::kv_store::{FileStore, MemoryStore},
        services::persistence::{self as saved_game, SAVED_GAME_KEY},
        state::state_machine::{MAX_LIVES, Outcome},
    };

    use super::*;

    fn song(uri: &str, display_name: &str) -> Song {
        Song {
            uri: uri.into(),
            display_name: display_name.into(),
            name: format!("{display_name} OST"),
        }
    }

    fn catalogue() -> Catalogue {
        Catalogue {
            songs: vec![
                song("classic/moonlight.mp3", "Moonlight Sonata"),
                song("zelda/gerudo.mp3", "Gerudo Valley"),
            ],
            possibilities: vec!["Moonlight Sonata".into(), "Gerudo Valley".into()],
        }
    }

    fn guess(session: &mut GameSession, text: &str) -> Dispatched {
        session.dispatch(RoundEvent::Input(text.into()));
        session.dispatch(RoundEvent::Guess)
    }

    #[test]
    fn nothing_is_saved_before_start() {
        let store = Arc::new(MemoryStore::new());
        let mut session = GameSession::new(catalogue(), store.clone());

        guess(&mut session, "wrong");
        assert_eq!(session.round().lives, MAX_LIVES - 1);
        assert!(store.is_empty());

        session.start();
        assert!(store.get(SAVED_GAME_KEY).unwrap().is_some());
    }

    #[test]
    fn unreadable_save_file_is_replaced_on_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        std::fs::write(&path, "garbage").unwrap();
        let store = Arc::new(FileStore::new(&path));

        let mut session = GameSession::new(catalogue(), store.clone());
        assert!(!session.is_restored());

        session.start();
        let restored = saved_game::load(store.as_ref()).unwrap();
        assert_eq!(restored.state, RoundState::new());
    }

    #[test]
    fn success_schedules_advance_and_persists_settled_state() {
        let store = Arc::new(MemoryStore::new());
        let mut session = GameSession::new(catalogue(), store.clone());
        session.start();

        let dispatched = guess(&mut session, "moonlight sonata");
        assert_eq!(session.round().outcome, Outcome::Success);
        assert_eq!(
            dispatched.effects,
            vec![Effect::ScheduleAdvance {
                song_index: 0,
                from: Outcome::Success
            }]
        );

        let resumed = GameSession::new(catalogue(), store);
        assert!(resumed.is_restored());
        assert_eq!(resumed.round().song_index, 1);
        assert_eq!(resumed.round().total_guessed, 1);
    }

    #[test]
    fn resumed_session_appends_new_songs() {
        let store = Arc::new(MemoryStore::new());
        let mut first = GameSession::new(catalogue(), store.clone());
        first.start();
        guess(&mut first, "nope");

        let mut grown = catalogue();
        grown.songs.insert(0, song("ff7/aerith.mp3", "Aerith's Theme"));
        let resumed = GameSession::new(grown, store);

        let uris: Vec<&str> = resumed.songs().iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec!["classic/moonlight.mp3", "zelda/gerudo.mp3", "ff7/aerith.mp3"]
        );
        assert_eq!(resumed.round().lives, MAX_LIVES - 1);
        assert_eq!(resumed.current_song().unwrap().uri, "classic/moonlight.mp3");
    }

    #[test]
    fn completes_after_last_song() {
        let store = Arc::new(MemoryStore::new());
        let mut session = GameSession::new(catalogue(), store);
        session.start();

        for (index, answer) in ["Moonlight Sonata", "Gerudo Valley"].iter().enumerate() {
            guess(&mut session, answer);
            session.dispatch(RoundEvent::Advance {
                song_index: index,
                from: Outcome::Success,
            });
        }

        assert!(session.is_complete());
        assert!(session.current_song().is_none());
        assert!(session.audio_url("https://cdn.example/").is_none());
        assert_eq!(session.round().points, 2);
    }

    #[test]
    fn audio_url_and_status_line() {
        let session = GameSession::new(catalogue(), Arc::new(MemoryStore::new()));

        assert_eq!(
            session.audio_url("https://cdn.example/ost/").as_deref(),
            Some("https://cdn.example/ost/classic/moonlight.mp3")
        );
        assert_eq!(
            session.status_line(),
            "Current strike: 0 | total guessed: 0 | current song: 1/2"
        );
        assert_eq!(session.suggestions("valley", 5), vec!["Gerudo Valley"]);
    }
}
