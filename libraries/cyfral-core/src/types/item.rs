//! Playable catalog entries
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of release an item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// The long-form interview episode
    Podcast,
    /// A released track with cover art and platform links
    Track,
    /// An unreleased demo
    Demo,
}

impl ItemKind {
    /// Wire name used by the page (`podcast`, `track`, `demo`)
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Podcast => "podcast",
            ItemKind::Track => "track",
            ItemKind::Demo => "demo",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry in the master playlist
///
/// Immutable once built: the queue reorders clones of these, it never edits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    /// Stable identifier (`podcast`, a track slug, or `demo-<n>`)
    pub id: String,

    /// Display name
    pub name: String,

    /// Artist credit as shown in the player
    pub artist: String,

    /// Audio file locator handed to the audio element
    pub audio_src: String,

    /// Cover image locator
    pub cover: Option<String>,

    /// Release kind
    #[serde(rename = "type")]
    pub kind: ItemKind,
}

impl PlaylistItem {
    /// Create a new item without cover art
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        artist: impl Into<String>,
        audio_src: impl Into<String>,
        kind: ItemKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artist: artist.into(),
            audio_src: audio_src.into(),
            cover: None,
            kind,
        }
    }

    /// Attach a cover image
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }
}
