use serde_json::{Value, json};
use wortdeck_config::generator::GeneratorConfig;
use wortdeck_types::WordProfile;

use crate::voice::{RandomVoice, VoiceSelector};
use crate::{GenerateError, GenerationBackend, ImagePayload};

const FALLBACK_VOICE: &str = "alloy";

/// Stateless adapter for an OpenAI-compatible API. Owns request construction
/// and response parsing only; retry policy and state tracking live in the
/// orchestrator.
pub struct OpenAiClient {
    client: reqwest::Client,
    settings: GeneratorConfig,
    voices: Box<dyn VoiceSelector>,
}

impl OpenAiClient {
    pub fn new(settings: GeneratorConfig) -> Self {
        Self::with_voice_selector(settings, Box::new(RandomVoice))
    }

    pub fn with_voice_selector(
        settings: GeneratorConfig,
        voices: Box<dyn VoiceSelector>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
            voices,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.api_url.trim_end_matches('/'), path)
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerateError> {
        let status = response.status();

        if status == 401 || status == 403 {
            return Err(GenerateError::Auth);
        }

        if status == 429 {
            return Err(GenerateError::RateLimited);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl GenerationBackend for OpenAiClient {
    async fn generate_profile(
        &self,
        word: &str,
        source_language: &str,
        level: &str,
    ) -> Result<WordProfile, GenerateError> {
        if word.trim().is_empty() {
            return Err(GenerateError::EmptyInput);
        }

        if self.settings.api_key.is_empty() {
            return Err(GenerateError::Auth);
        }

        let prompt = self.settings.render_prompt(source_language, level);
        let body = json!({
            "model": self.settings.text_model,
            "messages": [
                { "role": "system", "content": prompt },
                { "role": "user", "content": word }
            ],
            "functions": [{
                "name": "generate_word_profile",
                "description": "Generates a word profile with translations and examples.",
                "parameters": self.settings.response_schema
            }],
            "function_call": { "name": "generate_word_profile" }
        });

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        // Parse the envelope by hand so a malformed body is reported as a
        // schema problem, not a transport one.
        let body = response.text().await?;
        let envelope: Value = serde_json::from_str(&body)
            .map_err(|e| GenerateError::Schema(format!("invalid JSON in response: {e}")))?;

        let arguments = envelope["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["function_call"]["arguments"].as_str())
            .ok_or_else(|| {
                GenerateError::Schema("no function call in model response".to_string())
            })?;

        serde_json::from_str(arguments).map_err(|e| GenerateError::Schema(e.to_string()))
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, GenerateError> {
        if text.trim().is_empty() {
            return Err(GenerateError::EmptyInput);
        }

        if self.settings.api_key.is_empty() {
            return Err(GenerateError::Auth);
        }

        let voice = self
            .voices
            .pick(&self.settings.voices)
            .unwrap_or(FALLBACK_VOICE);

        let body = json!({
            "model": self.settings.tts_model,
            "input": text,
            "voice": voice
        });

        let response = self
            .client
            .post(self.endpoint("audio/speech"))
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        Ok(response.bytes().await?.to_vec())
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImagePayload, GenerateError> {
        if prompt.trim().is_empty() {
            return Err(GenerateError::EmptyInput);
        }

        if self.settings.api_key.is_empty() {
            return Err(GenerateError::Auth);
        }

        let body = json!({
            "model": self.settings.image_model,
            "prompt": prompt,
            "n": 1,
            "size": self.settings.image_size
        });

        let response = self
            .client
            .post(self.endpoint("images/generations"))
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body = response.text().await?;
        let envelope: Value = serde_json::from_str(&body)
            .map_err(|e| GenerateError::Schema(format!("invalid JSON in response: {e}")))?;

        let url = envelope["data"]
            .get(0)
            .and_then(|item| item["url"].as_str())
            .ok_or_else(|| GenerateError::Schema("no image URL in response".to_string()))?;

        Ok(ImagePayload::Url(url.to_string()))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, GenerateError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;

        Ok(response.bytes().await?.to_vec())
    }
}
