use std::sync::Arc;

use kanal::AsyncSender;
use wortdeck_generator::{GenerationBackend, ImagePayload};
use wortdeck_media::{AudioSlot, MediaStore};
use wortdeck_types::{GenerationRequest, MediaRef};

use crate::events::{AudioBundle, GenerationEvent, JobError};

// Jobs only ever receive cloned inputs and return freshly allocated
// payloads; orchestrator state is mutated exclusively by the coordination
// loop that consumes the events.

pub(crate) fn spawn_profile_job(
    backend: Arc<dyn GenerationBackend>,
    events_tx: AsyncSender<GenerationEvent>,
    request_id: u64,
    request: GenerationRequest,
) {
    tokio::spawn(async move {
        let result = backend
            .generate_profile(&request.word, &request.source_language, &request.level)
            .await
            .map_err(JobError::from);

        deliver(
            &events_tx,
            GenerationEvent::ProfileFinished { request_id, result },
        )
        .await;
    });
}

pub(crate) fn spawn_audio_job(
    backend: Arc<dyn GenerationBackend>,
    media: Arc<MediaStore>,
    events_tx: AsyncSender<GenerationEvent>,
    request_id: u64,
    word: String,
    sentences: Vec<String>,
) {
    tokio::spawn(async move {
        let result = run_audio(backend, media, &word, &sentences).await;

        deliver(
            &events_tx,
            GenerationEvent::AudioFinished { request_id, result },
        )
        .await;
    });
}

pub(crate) fn spawn_image_job(
    backend: Arc<dyn GenerationBackend>,
    media: Arc<MediaStore>,
    events_tx: AsyncSender<GenerationEvent>,
    request_id: u64,
    word: String,
    canvas: u32,
) {
    tokio::spawn(async move {
        let result = run_image(backend, media, &word, canvas).await;

        deliver(
            &events_tx,
            GenerationEvent::ImageFinished { request_id, result },
        )
        .await;
    });
}

async fn run_audio(
    backend: Arc<dyn GenerationBackend>,
    media: Arc<MediaStore>,
    word: &str,
    sentences: &[String],
) -> Result<AudioBundle, JobError> {
    let bytes = backend.synthesize_speech(word).await?;
    let word_audio = media.save_audio(word, AudioSlot::Word, &bytes).await?;

    let mut examples = Vec::with_capacity(sentences.len());
    for (index, sentence) in sentences.iter().enumerate() {
        let bytes = backend.synthesize_speech(sentence).await?;
        examples.push(
            media
                .save_audio(word, AudioSlot::Example(index), &bytes)
                .await?,
        );
    }

    Ok(AudioBundle { word: word_audio, examples })
}

async fn run_image(
    backend: Arc<dyn GenerationBackend>,
    media: Arc<MediaStore>,
    word: &str,
    canvas: u32,
) -> Result<MediaRef, JobError> {
    let payload = backend.generate_image(&image_prompt(word)).await?;

    let bytes = match payload {
        ImagePayload::Bytes(bytes) => bytes,
        ImagePayload::Url(url) => backend.fetch_bytes(&url).await?,
    };

    Ok(media.save_image(word, &bytes, canvas).await?)
}

fn image_prompt(word: &str) -> String {
    format!(
        "Create a clear, simple illustration representing the word '{word}'. \
         The image should be easily recognizable and suitable for language \
         learning. Focus on the word itself, not on example sentences, and \
         do not include any lettering."
    )
}

/// A job reports its terminal result exactly once. If the coordination loop
/// is already gone the result is simply dropped.
async fn deliver(events_tx: &AsyncSender<GenerationEvent>, event: GenerationEvent) {
    if events_tx.send(event).await.is_err() {
        tracing::warn!("event channel closed, dropping job result");
    }
}
