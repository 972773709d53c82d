use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_dir() -> PathBuf {
    PathBuf::from("media_files")
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MediaConfig {
    /// Root directory generated audio and images are written to
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl MediaConfig {
    pub fn new() -> Self {
        let dir = env::var("WORTDECK_MEDIA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_dir());

        Self { dir }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self::new()
    }
}
