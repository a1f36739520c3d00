use std::fmt;

use thiserror::Error;

use crate::state::game::Song;

/// Number of wrong guesses allowed per song.
pub const MAX_LIVES: u8 = 3;

/// Result of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Answer hidden, guesses accepted.
    Hidden,
    /// Correct guess; answer revealed until the round advances.
    Success,
    /// Lives exhausted; answer revealed until the round advances.
    Failed,
}

impl Outcome {
    /// Whether the answer is currently shown.
    pub fn is_revealed(self) -> bool {
        !matches!(self, Outcome::Hidden)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Hidden => "hidden",
            Outcome::Success => "success",
            Outcome::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Progress of the player through the song list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    /// Current streak of correct guesses.
    pub points: u32,
    /// Correct guesses over the whole game; never decreases.
    pub total_guessed: u32,
    /// Index of the current song.
    pub song_index: usize,
    /// Remaining wrong guesses for the current song, in `0..=MAX_LIVES`.
    pub lives: u8,
    /// Text currently typed by the player.
    pub input: String,
    /// Result of the current round.
    pub outcome: Outcome,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            points: 0,
            total_guessed: 0,
            song_index: 0,
            lives: MAX_LIVES,
            input: String::new(),
            outcome: Outcome::Hidden,
        }
    }
}

impl RoundState {
    /// Create the state of a fresh game.
    pub fn new() -> Self {
        Self::default()
    }

    /// The song being played, or `None` once every song has been played.
    pub fn current_song<'a>(&self, songs: &'a [Song]) -> Option<&'a Song> {
        songs.get(self.song_index)
    }

    /// Whether the song list has been exhausted.
    pub fn is_complete(&self, songs: &[Song]) -> bool {
        self.song_index >= songs.len()
    }

    /// The state a revealed round advances to; hidden rounds are returned as-is.
    pub fn settled(&self) -> RoundState {
        match self.outcome {
            Outcome::Hidden => self.clone(),
            from => self.advanced(from),
        }
    }

    fn advanced(&self, from: Outcome) -> RoundState {
        RoundState {
            points: if from == Outcome::Failed { 0 } else { self.points },
            total_guessed: self.total_guessed,
            song_index: self.song_index + 1,
            lives: MAX_LIVES,
            input: String::new(),
            outcome: Outcome::Hidden,
        }
    }
}

/// Events driving the round state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    /// The player edited the guess field.
    Input(String),
    /// The player submitted the current input.
    Guess,
    /// The reveal delay of a decided round elapsed.
    Advance {
        /// Song the timer was started for.
        song_index: usize,
        /// Outcome the timer was started from.
        from: Outcome,
    },
}

/// Side effects requested by a transition, executed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Start the reveal timer; when it fires, dispatch the matching [`RoundEvent::Advance`].
    ScheduleAdvance {
        /// Song the round was decided on.
        song_index: usize,
        /// Outcome of the round.
        from: Outcome,
    },
    /// Write the saved game.
    Persist,
}

/// Why an event left the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{event:?} ignored at song {song_index} while {outcome}: {reason}")]
pub struct IgnoredEvent {
    /// Outcome the machine was in.
    pub outcome: Outcome,
    /// Song index the machine was at.
    pub song_index: usize,
    /// The event that was dropped.
    pub event: RoundEvent,
    /// Short explanation.
    pub reason: &'static str,
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the event.
    pub state: RoundState,
    /// Effects to run, in order.
    pub effects: Vec<Effect>,
    /// Set when the event was a no-op.
    pub ignored: Option<IgnoredEvent>,
}

impl Transition {
    fn applied(state: RoundState, effects: Vec<Effect>) -> Self {
        Self {
            state,
            effects,
            ignored: None,
        }
    }

    fn ignored(state: &RoundState, event: RoundEvent, reason: &'static str) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
            ignored: Some(IgnoredEvent {
                outcome: state.outcome,
                song_index: state.song_index,
                event,
                reason,
            }),
        }
    }
}

/// Compute the next state for `event`. Pure: `state` is never modified.
pub fn transition(state: &RoundState, songs: &[Song], event: RoundEvent) -> Transition {
    match event {
        RoundEvent::Input(text) => {
            if state.outcome.is_revealed() {
                return Transition::ignored(state, RoundEvent::Input(text), "input is locked");
            }
            let next = RoundState {
                input: text,
                ..state.clone()
            };
            Transition::applied(next, Vec::new())
        }
        RoundEvent::Guess => guess(state, songs),
        RoundEvent::Advance { song_index, from } => {
            if !from.is_revealed() {
                return Transition::ignored(state, event, "only revealed rounds advance");
            }
            if state.outcome != from || state.song_index != song_index {
                return Transition::ignored(state, event, "stale reveal timer");
            }
            Transition::applied(state.advanced(from), vec![Effect::Persist])
        }
    }
}

fn guess(state: &RoundState, songs: &[Song]) -> Transition {
    if state.outcome.is_revealed() {
        return Transition::ignored(state, RoundEvent::Guess, "round already decided");
    }
    if state.input.trim().is_empty() {
        return Transition::ignored(state, RoundEvent::Guess, "empty input");
    }
    let Some(song) = state.current_song(songs) else {
        return Transition::ignored(state, RoundEvent::Guess, "game complete");
    };

    let mut next = state.clone();
    if song.is_answered_by(&state.input) {
        next.outcome = Outcome::Success;
        next.points += 1;
        next.total_guessed += 1;
    } else {
        next.lives = next.lives.saturating_sub(1);
        if next.lives == 0 {
            next.outcome = Outcome::Failed;
        }
    }

    let mut effects = Vec::with_capacity(2);
    if next.outcome.is_revealed() {
        effects.push(Effect::ScheduleAdvance {
            song_index: next.song_index,
            from: next.outcome,
        });
    }
    effects.push(Effect::Persist);

    Transition::applied(next, effects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs() -> Vec<Song> {
        vec![
            Song {
                uri: "classic/moonlight.mp3".into(),
                display_name: "Moonlight Sonata".into(),
                name: "Beethoven".into(),
            },
            Song {
                uri: "zelda/gerudo.mp3".into(),
                display_name: "Gerudo Valley".into(),
                name: "Ocarina of Time".into(),
            },
        ]
    }

    fn apply(state: &RoundState, songs: &[Song], event: RoundEvent) -> Transition {
        transition(state, songs, event)
    }

    fn guess_text(state: &RoundState, songs: &[Song], text: &str) -> Transition {
        let typed = apply(state, songs, RoundEvent::Input(text.into())).state;
        apply(&typed, songs, RoundEvent::Guess)
    }

    #[test]
    fn initial_state_is_hidden_with_full_lives() {
        let state = RoundState::new();
        assert_eq!(state.outcome, Outcome::Hidden);
        assert_eq!(state.lives, MAX_LIVES);
        assert_eq!(state.current_song(&songs()).unwrap().uri, "classic/moonlight.mp3");
    }

    #[test]
    fn case_insensitive_match_succeeds() {
        let songs = songs();
        let result = guess_text(&RoundState::new(), &songs, "moonlight sonata");

        assert_eq!(result.state.outcome, Outcome::Success);
        assert_eq!(result.state.points, 1);
        assert_eq!(result.state.total_guessed, 1);
        assert_eq!(result.state.lives, MAX_LIVES);
        assert_eq!(
            result.effects,
            vec![
                Effect::ScheduleAdvance {
                    song_index: 0,
                    from: Outcome::Success
                },
                Effect::Persist
            ]
        );
    }

    #[test]
    fn wrong_guess_costs_a_life_and_keeps_input() {
        let songs = songs();
        let result = guess_text(&RoundState::new(), &songs, "Gerudo Valley");

        assert_eq!(result.state.outcome, Outcome::Hidden);
        assert_eq!(result.state.lives, MAX_LIVES - 1);
        assert_eq!(result.state.input, "Gerudo Valley");
        assert_eq!(result.effects, vec![Effect::Persist]);
    }

    #[test]
    fn three_misses_fail_the_round_and_advance_resets() {
        let songs = songs();
        let mut state = RoundState {
            points: 4,
            total_guessed: 4,
            ..RoundState::new()
        };

        for _ in 0..3 {
            state = guess_text(&state, &songs, "nope").state;
        }
        assert_eq!(state.lives, 0);
        assert_eq!(state.outcome, Outcome::Failed);
        assert_eq!(state.points, 4);

        let advanced = apply(
            &state,
            &songs,
            RoundEvent::Advance {
                song_index: 0,
                from: Outcome::Failed,
            },
        );
        assert!(advanced.ignored.is_none());
        assert_eq!(advanced.state.outcome, Outcome::Hidden);
        assert_eq!(advanced.state.lives, MAX_LIVES);
        assert_eq!(advanced.state.points, 0);
        assert_eq!(advanced.state.total_guessed, 4);
        assert_eq!(advanced.state.song_index, 1);
        assert!(advanced.state.input.is_empty());
        assert_eq!(advanced.effects, vec![Effect::Persist]);
    }

    #[test]
    fn success_advance_keeps_streak() {
        let songs = songs();
        let won = guess_text(&RoundState::new(), &songs, "MOONLIGHT SONATA").state;
        let next = apply(
            &won,
            &songs,
            RoundEvent::Advance {
                song_index: 0,
                from: Outcome::Success,
            },
        )
        .state;

        assert_eq!(next.points, 1);
        assert_eq!(next.song_index, 1);
        assert_eq!(next.outcome, Outcome::Hidden);
    }

    #[test]
    fn guess_while_revealed_is_a_noop() {
        let songs = songs();
        let won = guess_text(&RoundState::new(), &songs, "moonlight sonata").state;

        let result = apply(&won, &songs, RoundEvent::Guess);
        assert_eq!(result.state, won);
        assert!(result.effects.is_empty());
        assert!(result.ignored.is_some());

        let typed = apply(&won, &songs, RoundEvent::Input("other".into()));
        assert_eq!(typed.state, won);
    }

    #[test]
    fn blank_guess_is_a_noop() {
        let songs = songs();
        let state = RoundState::new();

        for text in ["", "   "] {
            let result = guess_text(&state, &songs, text);
            assert_eq!(result.state.lives, state.lives);
            assert_eq!(result.state.outcome, Outcome::Hidden);
            assert!(result.effects.is_empty());
        }
    }

    #[test]
    fn stale_timer_is_ignored() {
        let songs = songs();
        let won = guess_text(&RoundState::new(), &songs, "moonlight sonata").state;
        let event = RoundEvent::Advance {
            song_index: 0,
            from: Outcome::Success,
        };
        let advanced = apply(&won, &songs, event.clone()).state;

        let replay = apply(&advanced, &songs, event);
        assert_eq!(replay.state, advanced);
        assert_eq!(
            replay.ignored.map(|ignored| ignored.reason),
            Some("stale reveal timer")
        );
    }

    #[test]
    fn guess_after_last_song_is_a_noop() {
        let songs = songs();
        let state = RoundState {
            song_index: songs.len(),
            input: "Moonlight Sonata".into(),
            ..RoundState::new()
        };

        assert!(state.is_complete(&songs));
        assert!(state.current_song(&songs).is_none());
        let result = apply(&state, &songs, RoundEvent::Guess);
        assert_eq!(result.state, state);
    }

    #[test]
    fn settled_state_of_failed_round_is_next_hidden_round() {
        let failed = RoundState {
            points: 2,
            total_guessed: 5,
            song_index: 3,
            lives: 0,
            input: "wrong".into(),
            outcome: Outcome::Failed,
        };

        let settled = failed.settled();
        assert_eq!(settled.song_index, 4);
        assert_eq!(settled.points, 0);
        assert_eq!(settled.lives, MAX_LIVES);
        assert_eq!(settled.outcome, Outcome::Hidden);
    }
}
