use serde::{Deserialize, Serialize};

use self::anki::AnkiConfig;
use self::generator::GeneratorConfig;
use self::media::MediaConfig;

pub mod anki;
pub mod generator;
pub mod media;

fn default_source_languages() -> Vec<String> {
    ["English", "Russian", "Turkish", "Spanish", "Arabic"]
        .map(String::from)
        .to_vec()
}

fn default_language_levels() -> Vec<String> {
    ["A1", "A2", "B1", "B2", "C1", "C2"].map(String::from).to_vec()
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub media: MediaConfig,
    pub anki: AnkiConfig,

    /// Languages the learner may translate into
    #[serde(default = "default_source_languages")]
    pub source_languages: Vec<String>,
    /// CEFR levels offered for generation
    #[serde(default = "default_language_levels")]
    pub language_levels: Vec<String>,
}

impl Config {
    pub fn new() -> Self {
        Config {
            generator: GeneratorConfig::new(),
            media: MediaConfig::new(),
            anki: AnkiConfig::new(),

            source_languages: default_source_languages(),
            language_levels: default_language_levels(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
