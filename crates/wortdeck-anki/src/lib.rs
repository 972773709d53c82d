mod client;
mod note;

pub use client::AnkiConnectClient;
pub use note::{CARD_TEMPLATES, CardTemplate, MODEL_FIELDS, text_fields};

use std::path::Path;

use anyhow::{Context, Result};
use wortdeck_types::WordProfile;

/// Prefix for media stored in the collection, so generated files are easy to
/// spot and never collide with the user's own media
const MEDIA_PREFIX: &str = "wortdeck_";

/// Create the note model if the collection doesn't have it yet
pub async fn ensure_model(client: &AnkiConnectClient, model: &str) -> Result<()> {
    let existing = client.model_names().await?;
    if existing.iter().any(|name| name == model) {
        return Ok(());
    }

    client
        .create_model(model, &note::MODEL_FIELDS, &note::CARD_TEMPLATES)
        .await
        .with_context(|| format!("Failed to create note model '{model}'"))
}

/// Persist one finished word profile as a note. Media files referenced by
/// the profile are copied into the collection first; absent references
/// simply leave their fields empty.
pub async fn add_word_note(
    client: &AnkiConnectClient,
    deck: &str,
    model: &str,
    profile: &WordProfile,
    media_root: &Path,
) -> Result<u64> {
    ensure_model(client, model).await?;

    let mut fields = note::text_fields(profile);

    if let Some(audio) = &profile.audio {
        let stored = client
            .store_media_file(
                &format!("{MEDIA_PREFIX}{}", audio.file_name),
                &audio.resolve(media_root),
            )
            .await
            .context("Failed to store word audio")?;
        fields.insert("Audio_Wort".to_string(), format!("[sound:{stored}]"));
    }

    for (i, example) in profile.examples.iter().take(3).enumerate() {
        if let Some(audio) = &example.audio {
            let stored = client
                .store_media_file(
                    &format!("{MEDIA_PREFIX}{}", audio.file_name),
                    &audio.resolve(media_root),
                )
                .await
                .with_context(|| format!("Failed to store audio for example {}", i + 1))?;
            fields.insert(format!("Audio_S{}", i + 1), format!("[sound:{stored}]"));
        }
    }

    if let Some(image) = &profile.image {
        let stored = client
            .store_media_file(
                &format!("{MEDIA_PREFIX}{}", image.file_name),
                &image.resolve(media_root),
            )
            .await
            .context("Failed to store image")?;
        fields.insert("Picture".to_string(), format!("<img src=\"{stored}\">"));
    }

    client.add_note(deck, model, &fields, &["wortdeck"]).await
}
