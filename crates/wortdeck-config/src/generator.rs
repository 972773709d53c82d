use std::env;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

fn default_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_text_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_image_canvas() -> u32 {
    256
}

fn default_max_examples() -> usize {
    3
}

fn default_voices() -> Vec<String> {
    ["alloy", "echo", "fable", "onyx", "nova", "shimmer"]
        .map(String::from)
        .to_vec()
}

fn default_prompt_template() -> String {
    "You are a German language teacher. The user gives you a single German \
     word (correct obvious spelling or capitalization mistakes). Produce a \
     word profile for a {source_language}-speaking learner at CEFR level \
     {language_level}: the {source_language} translation, the word \
     classification, the article and plural form for nouns, the Präsens, \
     Präteritum and Perfekt forms for irregular verbs, and three short \
     example sentences with {source_language} translations suited to the \
     level."
        .to_string()
}

/// JSON schema the text model's function-call response must conform to.
/// Kept in config so the profile shape can be tuned without a rebuild.
fn default_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "german_word": { "type": "string" },
            "source_language_translation": { "type": "string" },
            "classification": { "type": "string" },
            "additional_grammatical_info": {
                "type": "object",
                "properties": {
                    "noun": {
                        "type": "object",
                        "properties": {
                            "article": { "type": "string" },
                            "plural_form": { "type": "string" }
                        }
                    },
                    "verb": {
                        "type": "object",
                        "properties": {
                            "irregular_verb": { "type": "boolean" },
                            "praesens": { "type": "array", "items": { "type": "string" } },
                            "praeteritum": { "type": "array", "items": { "type": "string" } },
                            "perfekt": { "type": "array", "items": { "type": "string" } }
                        }
                    }
                }
            },
            "examples": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "german_example": { "type": "string" },
                        "source_example_translation": { "type": "string" }
                    },
                    "required": ["german_example", "source_example_translation"]
                }
            }
        },
        "required": [
            "german_word",
            "source_language_translation",
            "classification",
            "examples"
        ]
    })
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeneratorConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Filled from OPENAI_API_KEY when not set in the config file
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Size requested from the image API
    #[serde(default = "default_image_size")]
    pub image_size: String,
    /// Square canvas (px) images are resized to before persisting
    #[serde(default = "default_image_canvas")]
    pub image_canvas: u32,
    #[serde(default = "default_max_examples")]
    pub max_examples: usize,
    #[serde(default = "default_voices")]
    pub voices: Vec<String>,
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
    #[serde(default = "default_response_schema")]
    pub response_schema: Value,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        let api_url = env::var("OPENAI_API_URL").unwrap_or_else(|_| default_api_url());
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();

        Self {
            api_url,
            api_key,
            text_model: default_text_model(),
            tts_model: default_tts_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            image_canvas: default_image_canvas(),
            max_examples: default_max_examples(),
            voices: default_voices(),
            prompt_template: default_prompt_template(),
            response_schema: default_response_schema(),
        }
    }

    /// System prompt with the request's language pair substituted in
    pub fn render_prompt(&self, source_language: &str, language_level: &str) -> String {
        self.prompt_template
            .replace("{source_language}", source_language)
            .replace("{language_level}", language_level)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}
