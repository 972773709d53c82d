use std::sync::Arc;

use kanal::AsyncSender;
use wortdeck_generator::GenerationBackend;
use wortdeck_media::MediaStore;
use wortdeck_types::{Facet, FacetState, GenerationRequest, MediaRef, WordProfile};

use crate::events::{AudioBundle, GenerationEvent, JobError};
use crate::jobs;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("enter a word to generate a profile for")]
    EmptyWord,
}

#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    pub max_examples: usize,
    /// Square canvas (px) generated images are resized to
    pub image_canvas: u32,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self { max_examples: 3, image_canvas: 256 }
    }
}

/// Per-facet states of the current request, for presentation
#[derive(Debug, Clone, Copy)]
pub struct FacetSnapshot {
    pub profile: FacetState,
    pub audio: FacetState,
    pub image: FacetState,
}

struct ActiveRequest {
    id: u64,
    request: GenerationRequest,
    profile: Option<WordProfile>,
    profile_state: FacetState,
    audio_state: FacetState,
    image_state: FacetState,
    profile_error: Option<String>,
    audio_error: Option<String>,
    image_error: Option<String>,
}

impl ActiveRequest {
    fn new(id: u64, request: GenerationRequest) -> Self {
        Self {
            id,
            request,
            profile: None,
            profile_state: FacetState::Pending,
            audio_state: FacetState::NotRequested,
            image_state: FacetState::NotRequested,
            profile_error: None,
            audio_error: None,
            image_error: None,
        }
    }
}

/// Coordinates the three generation jobs for one request at a time.
///
/// All methods must be called from the single coordination context that owns
/// this value; background jobs never touch it and only report back through
/// the event channel. Submitting a new request supersedes the previous one:
/// its jobs run to completion but their results arrive tagged with a stale
/// request id and are discarded here.
pub struct ProfileOrchestrator {
    backend: Arc<dyn GenerationBackend>,
    media: Arc<MediaStore>,
    events_tx: AsyncSender<GenerationEvent>,
    settings: OrchestratorSettings,
    request_seq: u64,
    current: Option<ActiveRequest>,
}

impl ProfileOrchestrator {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        media: Arc<MediaStore>,
        events_tx: AsyncSender<GenerationEvent>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            backend,
            media,
            events_tx,
            settings,
            request_seq: 0,
            current: None,
        }
    }

    /// Start a new generation. Any in-flight request is superseded: facet
    /// states reset and later results for it no longer match the current id.
    pub fn submit(&mut self, request: GenerationRequest) -> Result<u64, SubmitError> {
        if request.word.trim().is_empty() {
            return Err(SubmitError::EmptyWord);
        }

        self.request_seq += 1;
        let request_id = self.request_seq;

        tracing::info!(
            request_id,
            word = %request.word,
            level = %request.level,
            want_audio = request.want_audio,
            want_image = request.want_image,
            "starting profile generation"
        );

        self.current = Some(ActiveRequest::new(request_id, request.clone()));
        jobs::spawn_profile_job(
            self.backend.clone(),
            self.events_tx.clone(),
            request_id,
            request,
        );

        Ok(request_id)
    }

    /// Route one delivered event to the matching result handler
    pub fn handle_event(&mut self, event: GenerationEvent) {
        match event {
            GenerationEvent::ProfileFinished { request_id, result } => {
                self.on_profile_result(request_id, result);
            }
            GenerationEvent::AudioFinished { request_id, result } => {
                self.on_audio_result(request_id, result);
            }
            GenerationEvent::ImageFinished { request_id, result } => {
                self.on_image_result(request_id, result);
            }
        }
    }

    pub fn on_profile_result(
        &mut self,
        request_id: u64,
        result: Result<WordProfile, JobError>,
    ) {
        let Some(active) = self.current.as_mut() else {
            return;
        };
        if active.id != request_id {
            tracing::debug!(request_id, current = active.id, "discarding stale profile result");
            return;
        }

        match result {
            Ok(mut profile) => {
                profile.examples.truncate(self.settings.max_examples);

                let word = profile.word.clone();
                let sentences: Vec<String> =
                    profile.examples.iter().map(|e| e.sentence.clone()).collect();

                active.profile_state = FacetState::Ready;
                active.profile = Some(profile);
                tracing::info!(request_id, word = %word, "profile ready");

                // Dependent jobs: synthesis input text comes from the
                // profile, so these can only start now.
                if active.request.want_audio {
                    active.audio_state = FacetState::Pending;
                    jobs::spawn_audio_job(
                        self.backend.clone(),
                        self.media.clone(),
                        self.events_tx.clone(),
                        request_id,
                        word.clone(),
                        sentences,
                    );
                }
                if active.request.want_image {
                    active.image_state = FacetState::Pending;
                    jobs::spawn_image_job(
                        self.backend.clone(),
                        self.media.clone(),
                        self.events_tx.clone(),
                        request_id,
                        word,
                        self.settings.image_canvas,
                    );
                }
            }
            Err(e) => {
                // Terminal for the whole request: no profile means no input
                // text for audio or image. The user has to resubmit.
                tracing::warn!(request_id, error = %e, "profile generation failed");
                active.profile_state = FacetState::Failed;
                active.profile_error = Some(e.to_string());
            }
        }
    }

    pub fn on_audio_result(&mut self, request_id: u64, result: Result<AudioBundle, JobError>) {
        let Some(active) = self.current.as_mut() else {
            return;
        };
        if active.id != request_id {
            tracing::debug!(request_id, current = active.id, "discarding stale audio result");
            return;
        }

        match result {
            Ok(bundle) => {
                active.audio_state = FacetState::Ready;
                if let Some(profile) = active.profile.as_mut() {
                    profile.audio = Some(bundle.word);
                    for (example, audio) in profile.examples.iter_mut().zip(bundle.examples) {
                        example.audio = Some(audio);
                    }
                }
                tracing::info!(request_id, "audio ready");
            }
            Err(e) => {
                // Non-fatal: the profile stays persistable, just without
                // audio. References are cleared, not left half-set.
                tracing::warn!(request_id, error = %e, "audio generation failed");
                active.audio_state = FacetState::Failed;
                active.audio_error = Some(e.to_string());
                if let Some(profile) = active.profile.as_mut() {
                    profile.audio = None;
                    for example in profile.examples.iter_mut() {
                        example.audio = None;
                    }
                }
            }
        }
    }

    pub fn on_image_result(&mut self, request_id: u64, result: Result<MediaRef, JobError>) {
        let Some(active) = self.current.as_mut() else {
            return;
        };
        if active.id != request_id {
            tracing::debug!(request_id, current = active.id, "discarding stale image result");
            return;
        }

        match result {
            Ok(image) => {
                active.image_state = FacetState::Ready;
                if let Some(profile) = active.profile.as_mut() {
                    profile.image = Some(image);
                }
                tracing::info!(request_id, "image ready");
            }
            Err(e) => {
                tracing::warn!(request_id, error = %e, "image generation failed");
                active.image_state = FacetState::Failed;
                active.image_error = Some(e.to_string());
                if let Some(profile) = active.profile.as_mut() {
                    profile.image = None;
                }
            }
        }
    }

    /// True once the profile is ready and every requested media facet
    /// reached a terminal outcome. A failed facet still unblocks persistence;
    /// the profile is just missing that reference.
    pub fn can_persist(&self) -> bool {
        let Some(active) = &self.current else {
            return false;
        };

        active.profile_state == FacetState::Ready
            && (!active.request.want_audio || active.audio_state.is_terminal())
            && (!active.request.want_image || active.image_state.is_terminal())
    }

    /// False exactly while any requested facet is still pending, so a new
    /// submission cannot overlap state mutation on the same profile.
    pub fn can_start_new_request(&self) -> bool {
        let Some(active) = &self.current else {
            return true;
        };

        !(active.profile_state.is_pending()
            || active.audio_state.is_pending()
            || active.image_state.is_pending())
    }

    /// True once the current request cannot change state anymore: either
    /// every requested facet settled, or the profile failed terminally.
    pub fn is_settled(&self) -> bool {
        let Some(active) = &self.current else {
            return true;
        };

        match active.profile_state {
            FacetState::Failed => true,
            FacetState::Ready => {
                (!active.request.want_audio || active.audio_state.is_terminal())
                    && (!active.request.want_image || active.image_state.is_terminal())
            }
            _ => false,
        }
    }

    pub fn current_request_id(&self) -> Option<u64> {
        self.current.as_ref().map(|active| active.id)
    }

    pub fn request(&self) -> Option<&GenerationRequest> {
        self.current.as_ref().map(|active| &active.request)
    }

    /// The profile as generated so far; partially populated while media jobs
    /// are in flight
    pub fn profile(&self) -> Option<&WordProfile> {
        self.current.as_ref().and_then(|active| active.profile.as_ref())
    }

    pub fn facets(&self) -> Option<FacetSnapshot> {
        self.current.as_ref().map(|active| FacetSnapshot {
            profile: active.profile_state,
            audio: active.audio_state,
            image: active.image_state,
        })
    }

    pub fn facet_error(&self, facet: Facet) -> Option<&str> {
        let active = self.current.as_ref()?;
        let error = match facet {
            Facet::Profile => &active.profile_error,
            Facet::Audio => &active.audio_error,
            Facet::Image => &active.image_error,
        };
        error.as_deref()
    }

    /// Hand the finished profile to persistence and retire the request.
    /// Returns None unless `can_persist()`.
    pub fn take_profile(&mut self) -> Option<WordProfile> {
        if !self.can_persist() {
            return None;
        }
        self.current.take().and_then(|active| active.profile)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use kanal::AsyncReceiver;
    use tokio::time::timeout;
    use wortdeck_generator::{GenerateError, GenerationBackend, ImagePayload};
    use wortdeck_types::{Example, GrammarInfo, NounInfo};

    use super::*;

    /// What a mock call should do
    #[derive(Clone, Copy, PartialEq)]
    enum Outcome {
        Succeed,
        FailSchema,
        FailApi,
    }

    struct MockBackend {
        profile: Outcome,
        speech: Outcome,
        image: Outcome,
        example_count: usize,
        profile_calls: AtomicUsize,
        speech_calls: AtomicUsize,
        image_calls: AtomicUsize,
    }

    impl MockBackend {
        fn new() -> Self {
            Self {
                profile: Outcome::Succeed,
                speech: Outcome::Succeed,
                image: Outcome::Succeed,
                example_count: 3,
                profile_calls: AtomicUsize::new(0),
                speech_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
            }
        }

        fn error(outcome: Outcome) -> GenerateError {
            match outcome {
                Outcome::FailSchema => {
                    GenerateError::Schema("missing field `german_word`".to_string())
                }
                _ => GenerateError::Api {
                    status: 503,
                    message: "upstream unavailable".to_string(),
                },
            }
        }

        fn sample_profile(word: &str, example_count: usize) -> WordProfile {
            let examples = (0..example_count)
                .map(|i| Example {
                    sentence: format!("Das {word} ist Beispiel {}.", i + 1),
                    translation: format!("The {word} is example {}.", i + 1),
                    audio: None,
                })
                .collect();

            WordProfile {
                word: word.to_string(),
                translation: "house".to_string(),
                classification: "noun".to_string(),
                grammar: GrammarInfo {
                    noun: Some(NounInfo {
                        article: Some("das".to_string()),
                        plural_form: Some("Häuser".to_string()),
                    }),
                    verb: None,
                },
                examples,
                audio: None,
                image: None,
            }
        }

        fn sample_image_bytes() -> Vec<u8> {
            let img = image::RgbImage::from_pixel(8, 8, image::Rgb([10, 20, 30]));
            let mut encoded = Cursor::new(Vec::new());
            image::DynamicImage::ImageRgb8(img)
                .write_to(&mut encoded, image::ImageFormat::Png)
                .unwrap();
            encoded.into_inner()
        }
    }

    #[async_trait::async_trait]
    impl GenerationBackend for MockBackend {
        async fn generate_profile(
            &self,
            word: &str,
            _source_language: &str,
            _level: &str,
        ) -> Result<WordProfile, GenerateError> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            match self.profile {
                Outcome::Succeed => Ok(Self::sample_profile(word, self.example_count)),
                outcome => Err(Self::error(outcome)),
            }
        }

        async fn synthesize_speech(&self, _text: &str) -> Result<Vec<u8>, GenerateError> {
            self.speech_calls.fetch_add(1, Ordering::SeqCst);
            match self.speech {
                Outcome::Succeed => Ok(b"mp3".to_vec()),
                outcome => Err(Self::error(outcome)),
            }
        }

        async fn generate_image(&self, _prompt: &str) -> Result<ImagePayload, GenerateError> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            match self.image {
                Outcome::Succeed => Ok(ImagePayload::Bytes(Self::sample_image_bytes())),
                outcome => Err(Self::error(outcome)),
            }
        }

        async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>, GenerateError> {
            Ok(Self::sample_image_bytes())
        }
    }

    struct Fixture {
        orchestrator: ProfileOrchestrator,
        events_rx: AsyncReceiver<GenerationEvent>,
        backend: Arc<MockBackend>,
        _media_dir: tempfile::TempDir,
    }

    fn fixture(backend: MockBackend) -> Fixture {
        let backend = Arc::new(backend);
        let (events_tx, events_rx) = kanal::bounded_async(16);
        let media_dir = tempfile::tempdir().unwrap();
        let media = Arc::new(MediaStore::new(media_dir.path()).unwrap());

        let orchestrator = ProfileOrchestrator::new(
            backend.clone(),
            media,
            events_tx,
            OrchestratorSettings::default(),
        );

        Fixture {
            orchestrator,
            events_rx,
            backend,
            _media_dir: media_dir,
        }
    }

    fn request(word: &str, want_audio: bool, want_image: bool) -> GenerationRequest {
        GenerationRequest {
            word: word.to_string(),
            source_language: "English".to_string(),
            level: "A1".to_string(),
            want_audio,
            want_image,
        }
    }

    async fn next_event(events_rx: &AsyncReceiver<GenerationEvent>) -> GenerationEvent {
        timeout(Duration::from_secs(2), events_rx.recv())
            .await
            .expect("timed out waiting for a job event")
            .expect("event channel closed")
    }

    async fn drive_until_settled(fixture: &mut Fixture) {
        while !fixture.orchestrator.is_settled() {
            let event = next_event(&fixture.events_rx).await;
            fixture.orchestrator.handle_event(event);
        }
    }

    #[tokio::test]
    async fn text_only_request_is_persistable_at_profile_ready() {
        let mut f = fixture(MockBackend::new());

        f.orchestrator.submit(request("Haus", false, false)).unwrap();
        assert!(!f.orchestrator.can_persist());

        drive_until_settled(&mut f).await;

        assert!(f.orchestrator.can_persist());
        let facets = f.orchestrator.facets().unwrap();
        assert_eq!(facets.profile, FacetState::Ready);
        assert_eq!(facets.audio, FacetState::NotRequested);
        assert_eq!(facets.image, FacetState::NotRequested);

        // No media job was ever started
        assert_eq!(f.backend.speech_calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.backend.image_calls.load(Ordering::SeqCst), 0);

        let profile = f.orchestrator.profile().unwrap();
        assert_eq!(profile.word, "Haus");
        assert_eq!(
            profile.grammar.noun.as_ref().unwrap().article.as_deref(),
            Some("das")
        );
        assert!(profile.audio.is_none());
        assert!(profile.image.is_none());
    }

    #[tokio::test]
    async fn audio_request_gates_persistence_until_audio_settles() {
        let mut f = fixture(MockBackend::new());

        f.orchestrator.submit(request("gehen", true, false)).unwrap();

        let event = next_event(&f.events_rx).await;
        f.orchestrator.handle_event(event);

        // Profile is ready but the audio facet is still pending
        let facets = f.orchestrator.facets().unwrap();
        assert_eq!(facets.profile, FacetState::Ready);
        assert_eq!(facets.audio, FacetState::Pending);
        assert!(!f.orchestrator.can_persist());
        assert!(!f.orchestrator.can_start_new_request());

        drive_until_settled(&mut f).await;

        assert!(f.orchestrator.can_persist());
        assert!(f.orchestrator.can_start_new_request());

        // Headword plus one file per example, merged in generation order
        let profile = f.orchestrator.profile().unwrap();
        assert_eq!(profile.audio.as_ref().unwrap().file_name, "gehen.mp3");
        assert_eq!(profile.examples.len(), 3);
        for (i, example) in profile.examples.iter().enumerate() {
            assert_eq!(
                example.audio.as_ref().unwrap().file_name,
                format!("gehen_example_{}.mp3", i + 1)
            );
        }
        assert_eq!(f.backend.speech_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn failed_audio_still_unblocks_persistence() {
        let mut backend = MockBackend::new();
        backend.speech = Outcome::FailApi;
        let mut f = fixture(backend);

        f.orchestrator.submit(request("gehen", true, true)).unwrap();
        drive_until_settled(&mut f).await;

        let facets = f.orchestrator.facets().unwrap();
        assert_eq!(facets.audio, FacetState::Failed);
        assert_eq!(facets.image, FacetState::Ready);
        assert!(f.orchestrator.can_persist());

        // Degraded profile: audio reference absent, image reference present
        let profile = f.orchestrator.profile().unwrap();
        assert!(profile.audio.is_none());
        assert!(profile.examples.iter().all(|e| e.audio.is_none()));
        assert_eq!(
            profile.image.as_ref().unwrap().file_name,
            "gehen_image.jpg"
        );
        assert!(f.orchestrator.facet_error(Facet::Audio).is_some());
    }

    #[tokio::test]
    async fn profile_failure_is_terminal_and_starts_no_media_jobs() {
        let mut backend = MockBackend::new();
        backend.profile = Outcome::FailSchema;
        let mut f = fixture(backend);

        f.orchestrator.submit(request("xyz123", true, true)).unwrap();
        drive_until_settled(&mut f).await;

        assert!(!f.orchestrator.can_persist());
        assert!(f.orchestrator.can_start_new_request());

        let facets = f.orchestrator.facets().unwrap();
        assert_eq!(facets.profile, FacetState::Failed);
        assert_eq!(facets.audio, FacetState::NotRequested);
        assert_eq!(facets.image, FacetState::NotRequested);

        assert_eq!(f.backend.speech_calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.backend.image_calls.load(Ordering::SeqCst), 0);

        let message = f.orchestrator.facet_error(Facet::Profile).unwrap();
        assert!(message.contains("expected shape"));
    }

    #[tokio::test]
    async fn stale_results_leave_current_state_unchanged() {
        let mut f = fixture(MockBackend::new());

        let first = f.orchestrator.submit(request("Haus", true, false)).unwrap();
        let event = next_event(&f.events_rx).await;
        f.orchestrator.handle_event(event);

        // Supersede before the first request's audio settles
        let second = f.orchestrator.submit(request("Baum", true, false)).unwrap();
        assert_ne!(first, second);
        assert_eq!(f.orchestrator.current_request_id(), Some(second));

        let before = f.orchestrator.facets().unwrap();

        // Late results from the superseded request must be discarded
        f.orchestrator.on_audio_result(
            first,
            Ok(AudioBundle {
                word: MediaRef::new("Haus.mp3"),
                examples: vec![],
            }),
        );
        f.orchestrator
            .on_profile_result(first, Ok(MockBackend::sample_profile("Haus", 3)));

        let after = f.orchestrator.facets().unwrap();
        assert_eq!(before.profile, after.profile);
        assert_eq!(before.audio, after.audio);
        assert_eq!(before.image, after.image);
        assert_eq!(f.orchestrator.current_request_id(), Some(second));

        drive_until_settled(&mut f).await;
        assert_eq!(f.orchestrator.profile().unwrap().word, "Baum");
    }

    #[tokio::test]
    async fn empty_word_is_rejected_without_touching_state() {
        let mut f = fixture(MockBackend::new());

        let result = f.orchestrator.submit(request("   ", true, true));
        assert!(matches!(result, Err(SubmitError::EmptyWord)));

        assert!(f.orchestrator.can_start_new_request());
        assert!(f.orchestrator.facets().is_none());
        assert_eq!(f.backend.profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn examples_are_capped_at_the_configured_maximum() {
        let mut backend = MockBackend::new();
        backend.example_count = 5;
        let mut f = fixture(backend);

        f.orchestrator.submit(request("Haus", false, false)).unwrap();
        drive_until_settled(&mut f).await;

        assert_eq!(f.orchestrator.profile().unwrap().examples.len(), 3);
    }

    #[tokio::test]
    async fn each_job_delivers_exactly_one_event() {
        let mut f = fixture(MockBackend::new());

        f.orchestrator.submit(request("gehen", true, true)).unwrap();

        let mut delivered = 0;
        while !f.orchestrator.is_settled() {
            let event = next_event(&f.events_rx).await;
            f.orchestrator.handle_event(event);
            delivered += 1;
        }
        assert_eq!(delivered, 3);

        // Nothing trails in after the terminal results
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(f.events_rx.try_recv().unwrap().is_none());
    }

    #[tokio::test]
    async fn take_profile_retires_the_request() {
        let mut f = fixture(MockBackend::new());

        f.orchestrator.submit(request("Haus", false, false)).unwrap();

        // Not ready yet, nothing to take
        assert!(f.orchestrator.take_profile().is_none());

        drive_until_settled(&mut f).await;

        let profile = f.orchestrator.take_profile().unwrap();
        assert_eq!(profile.word, "Haus");
        assert!(f.orchestrator.profile().is_none());
        assert!(f.orchestrator.can_start_new_request());
        assert!(!f.orchestrator.can_persist());
    }
}
