use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use wortdeck_config::Config;

/// Load the config file when present, otherwise fall back to the built-in
/// defaults. The API key is never required in the file; OPENAI_API_KEY
/// fills it in either way.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let mut config = if path.exists() {
        tracing::info!("Loading config from {}", path.display());
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)?
    } else {
        tracing::info!("No config file at {}, using defaults", path.display());
        Config::new()
    };

    if config.generator.api_key.is_empty() {
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            config.generator.api_key = key;
        }
    }

    Ok(config)
}
