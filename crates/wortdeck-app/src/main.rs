use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wortdeck_anki::AnkiConnectClient;
use wortdeck_core::{GenerationEvent, OrchestratorSettings, ProfileOrchestrator};
use wortdeck_generator::{GenerationBackend, OpenAiClient};
use wortdeck_media::MediaStore;
use wortdeck_types::GenerationRequest;

mod events;
mod presenter;
mod settings;

#[derive(Parser)]
#[command(name = "wortdeck", about = "Generate AI vocabulary cards for Anki")]
struct Cli {
    /// German word to build a profile for
    word: String,

    /// Language the learner wants translations in
    #[arg(short, long, default_value = "English")]
    language: String,

    /// CEFR proficiency level
    #[arg(long, default_value = "B1")]
    level: String,

    /// Also generate pronunciation audio
    #[arg(long)]
    audio: bool,

    /// Also generate an illustrative image
    #[arg(long)]
    image: bool,

    /// Add the finished card to this Anki deck
    #[arg(long)]
    deck: Option<String>,

    /// Path to the config file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = settings::load_config(&cli.config)?;

    if !config.language_levels.iter().any(|level| level == &cli.level) {
        anyhow::bail!(
            "unknown proficiency level '{}', expected one of {}",
            cli.level,
            config.language_levels.join(", ")
        );
    }
    if !config.source_languages.iter().any(|lang| lang == &cli.language) {
        tracing::warn!(language = %cli.language, "language is not in the configured list");
    }

    let media = Arc::new(MediaStore::new(&config.media.dir)?);
    let backend: Arc<dyn GenerationBackend> =
        Arc::new(OpenAiClient::new(config.generator.clone()));

    let (events_tx, events_rx) = kanal::bounded_async::<GenerationEvent>(16);

    let mut orchestrator = ProfileOrchestrator::new(
        backend,
        media.clone(),
        events_tx,
        OrchestratorSettings {
            max_examples: config.generator.max_examples,
            image_canvas: config.generator.image_canvas,
        },
    );

    orchestrator.submit(GenerationRequest {
        word: cli.word,
        source_language: cli.language,
        level: cli.level,
        want_audio: cli.audio,
        want_image: cli.image,
    })?;

    events::run_generation(&mut orchestrator, &events_rx).await?;

    if !orchestrator.can_persist() {
        anyhow::bail!("profile generation failed, nothing to add");
    }

    let Some(deck) = cli.deck else {
        tracing::info!("no deck given, skipping Anki");
        return Ok(());
    };

    if !config.anki.enabled {
        tracing::warn!("Anki integration disabled in config, skipping");
        return Ok(());
    }

    let client = AnkiConnectClient::new(config.anki.url.clone());
    client
        .check_connection()
        .await
        .context("AnkiConnect is not reachable, is Anki running?")?;

    let profile = orchestrator
        .take_profile()
        .context("no finished profile to persist")?;

    let note_id =
        wortdeck_anki::add_word_note(&client, &deck, &config.anki.model, &profile, media.root())
            .await?;

    tracing::info!(note_id, deck = %deck, "card added to Anki");
    println!("Added '{}' to deck '{}'.", profile.word, deck);

    Ok(())
}
