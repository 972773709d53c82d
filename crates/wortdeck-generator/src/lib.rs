mod error;
mod openai;
mod voice;

pub use error::GenerateError;
pub use openai::OpenAiClient;
pub use voice::{FixedVoice, RandomVoice, RoundRobinVoice, VoiceSelector};

use wortdeck_types::WordProfile;

/// Image synthesis output: some providers return the rendered bytes
/// directly, others a URL the caller must fetch.
#[derive(Debug, Clone)]
pub enum ImagePayload {
    Bytes(Vec<u8>),
    Url(String),
}

/// Remote generation provider interface. One method per job type; each call
/// issues exactly one request and performs no retries.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate the structured word profile for one word
    async fn generate_profile(
        &self,
        word: &str,
        source_language: &str,
        level: &str,
    ) -> Result<WordProfile, GenerateError>;

    /// Synthesize pronunciation audio for a word or sentence
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, GenerateError>;

    /// Synthesize an illustrative image from a descriptive prompt
    async fn generate_image(&self, prompt: &str) -> Result<ImagePayload, GenerateError>;

    /// Resolve a URL payload to its bytes
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, GenerateError>;
}
