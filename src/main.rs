//! OSTGuess binary entrypoint: loads the catalogue, resumes saved progress and runs the terminal game.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{BufReader, stdin, stdout};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ostguess::{
    config::AppConfig,
    dao::kv_store::{FileStore, KeyValueStore, MemoryStore},
    services::{
        game_service,
        terminal::{self, TerminalSettings},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store: Arc<dyn KeyValueStore> = match config.save_path() {
        Some(path) => {
            info!(path = %path.display(), "saving progress to file");
            Arc::new(FileStore::new(path.clone()))
        }
        None => Arc::new(MemoryStore::new()),
    };

    let source = game_service::source_for(config.data_url())
        .with_context(|| format!("resolving catalogue location `{}`", config.data_url()))?;
    let mut session = game_service::bootstrap(source.as_ref(), store)
        .await
        .context("starting a game session")?;
    session.start();

    let mut output = stdout();
    let session = terminal::run(
        session,
        TerminalSettings::from(&config),
        BufReader::new(stdin()),
        &mut output,
    )
    .await
    .context("running the game")?;

    info!(
        song_index = session.round().song_index,
        total_guessed = session.round().total_guessed,
        "session ended"
    );
    Ok(())
}

/// Configure tracing so logs go to stderr and stay out of the game text by default.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
