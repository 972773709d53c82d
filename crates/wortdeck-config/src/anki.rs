use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AnkiConfig {
    /// Enable Anki persistence
    pub enabled: bool,
    /// AnkiConnect URL
    pub url: String,
    /// Default deck name
    pub deck: String,
    /// Note model used for generated cards
    pub model: String,
}

impl AnkiConfig {
    pub fn new() -> Self {
        Self {
            enabled: true,
            url: "http://localhost:8765".to_string(),
            deck: "Default".to_string(),
            model: "Wortdeck".to_string(),
        }
    }
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self::new()
    }
}
