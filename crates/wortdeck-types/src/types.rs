use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Structured linguistic record for one word at one proficiency level.
///
/// The serde shape mirrors the structured-response schema the text model is
/// asked to satisfy. Media references are merged in by the orchestrator after
/// the audio/image jobs finish and are never part of the remote response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordProfile {
    #[serde(rename = "german_word")]
    pub word: String,
    #[serde(rename = "source_language_translation")]
    pub translation: String,
    /// Part of speech: "noun", "verb" or another classification string.
    pub classification: String,
    #[serde(rename = "additional_grammatical_info", default)]
    pub grammar: GrammarInfo,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(skip)]
    pub audio: Option<MediaRef>,
    #[serde(skip)]
    pub image: Option<MediaRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrammarInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noun: Option<NounInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<VerbInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NounInfo {
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub plural_form: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerbInfo {
    #[serde(default)]
    pub irregular_verb: bool,
    #[serde(default)]
    pub praesens: Vec<String>,
    #[serde(default)]
    pub praeteritum: Vec<String>,
    #[serde(default)]
    pub perfekt: Vec<String>,
}

/// Example sentence in display order. Ordering is significant: the position
/// in `WordProfile::examples` is the position on the card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    #[serde(rename = "german_example")]
    pub sentence: String,
    #[serde(rename = "source_example_translation")]
    pub translation: String,
    #[serde(skip)]
    pub audio: Option<MediaRef>,
}

/// File name relative to the media root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub file_name: String,
}

impl MediaRef {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self { file_name: file_name.into() }
    }

    pub fn resolve(&self, media_root: &Path) -> PathBuf {
        media_root.join(&self.file_name)
    }
}

/// One generation attempt as submitted by the user. Immutable after submit;
/// toggling the want flags afterwards only affects the next request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub word: String,
    pub source_language: String,
    pub level: String,
    pub want_audio: bool,
    pub want_image: bool,
}

/// The three independently generated parts of a word profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Profile,
    Audio,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacetState {
    #[default]
    NotRequested,
    Pending,
    Ready,
    Failed,
}

impl FacetState {
    pub fn is_pending(self) -> bool {
        matches!(self, FacetState::Pending)
    }

    /// Ready or Failed: the facet reached a terminal outcome. A failed facet
    /// still unblocks persistence, the profile is just degraded.
    pub fn is_terminal(self) -> bool {
        matches!(self, FacetState::Ready | FacetState::Failed)
    }
}
