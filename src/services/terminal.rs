//! Line-oriented terminal front end driving a [`GameSession`] on the tokio event loop.

use std::{io, time::Duration};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
    time::sleep,
};
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    state::{
        Dispatched, GameSession,
        state_machine::{Effect, MAX_LIVES, Outcome, RoundEvent},
    },
};

const SUGGESTION_LIMIT: usize = 8;

/// Presentation settings for the terminal loop.
#[derive(Debug, Clone)]
pub struct TerminalSettings {
    /// Base URL audio uris are resolved against.
    pub asset_base_url: String,
    /// Time the answer stays on screen before the next song.
    pub reveal_delay: Duration,
}

impl From<&AppConfig> for TerminalSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            asset_base_url: config.asset_base_url().to_owned(),
            reveal_delay: config.reveal_delay(),
        }
    }
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Quit,
    Status,
    Help,
    Suggest(String),
    Guess(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim_end_matches(['\r', '\n']) {
            "/quit" | "/exit" => Command::Quit,
            "/status" => Command::Status,
            "/help" => Command::Help,
            other => match other.strip_prefix('?') {
                Some(query) => Command::Suggest(query.to_owned()),
                None => Command::Guess(other.to_owned()),
            },
        }
    }
}

/// Run the game until the song list is exhausted, the player quits or input ends.
///
/// Reveal timers are detached tasks feeding [`RoundEvent::Advance`] back into
/// the loop; they cannot be cancelled, so a late timer is simply ignored by
/// the state machine.
pub async fn run<R, W>(
    mut session: GameSession,
    settings: TerminalSettings,
    input: R,
    output: &mut W,
) -> io::Result<GameSession>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel::<RoundEvent>();
    let mut lines = input.lines();

    if session.is_restored() {
        write_line(output, "Resuming your saved game.").await?;
    }
    if !render_round(&session, &settings, output).await? {
        return Ok(session);
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("input closed");
                    break;
                };
                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Status => write_line(output, &session.status_line()).await?,
                    Command::Help => write_line(output, HELP).await?,
                    Command::Suggest(query) => {
                        let matches = session.suggestions(&query, SUGGESTION_LIMIT);
                        if matches.is_empty() {
                            write_line(output, "No suggestions.").await?;
                        }
                        for suggestion in matches {
                            write_line(output, &format!("  {suggestion}")).await?;
                        }
                    }
                    Command::Guess(text) => {
                        session.dispatch(RoundEvent::Input(text));
                        let dispatched = session.dispatch(RoundEvent::Guess);
                        schedule(&dispatched, &timer_tx, settings.reveal_delay);
                        render_guess(&session, &dispatched, output).await?;
                    }
                }
            }
            Some(event) = timer_rx.recv() => {
                let dispatched = session.dispatch(event);
                if dispatched.ignored.is_none() && !render_round(&session, &settings, output).await? {
                    break;
                }
            }
        }
    }

    output.flush().await?;
    Ok(session)
}

const HELP: &str = "Type a title and press Enter to guess. \
`?text` lists matching titles, `/status` shows your score, `/quit` leaves.";

fn schedule(
    dispatched: &Dispatched,
    timer_tx: &mpsc::UnboundedSender<RoundEvent>,
    delay: Duration,
) {
    for effect in &dispatched.effects {
        if let Effect::ScheduleAdvance { song_index, from } = *effect {
            let tx = timer_tx.clone();
            tokio::spawn(async move {
                sleep(delay).await;
                // The loop may already be gone when the player quit.
                let _ = tx.send(RoundEvent::Advance { song_index, from });
            });
        }
    }
}

/// Print the current round; returns `false` once the game is finished.
async fn render_round<W>(
    session: &GameSession,
    settings: &TerminalSettings,
    output: &mut W,
) -> io::Result<bool>
where
    W: AsyncWrite + Unpin,
{
    let Some(url) = session.audio_url(&settings.asset_base_url) else {
        info!(
            total_guessed = session.round().total_guessed,
            songs = session.songs().len(),
            "game finished"
        );
        write_line(output, "Game finished.").await?;
        write_line(output, &session.status_line()).await?;
        return Ok(false);
    };

    write_line(output, "").await?;
    write_line(output, &session.status_line()).await?;
    write_line(output, &format!("Listen: {url}")).await?;
    write_line(output, &guess_prompt(session)).await?;
    Ok(true)
}

async fn render_guess<W>(
    session: &GameSession,
    dispatched: &Dispatched,
    output: &mut W,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if let Some(ignored) = &dispatched.ignored {
        if ignored.outcome.is_revealed() {
            write_line(output, "Hold on, the next song is coming.").await?;
        }
        return Ok(());
    }

    let round = session.round();
    let answer = session
        .current_song()
        .map(|song| format!("{} ({})", song.display_name, song.name))
        .unwrap_or_default();

    match round.outcome {
        Outcome::Success => write_line(output, &format!("Correct! {answer}")).await,
        Outcome::Failed => write_line(output, &format!("Out of lives. It was {answer}")).await,
        Outcome::Hidden => {
            write_line(output, "Wrong.").await?;
            write_line(output, &guess_prompt(session)).await
        }
    }
}

fn guess_prompt(session: &GameSession) -> String {
    format!("Guess ({}/{MAX_LIVES}):", session.round().lives)
}

async fn write_line<W>(output: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
