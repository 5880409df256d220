//! Static site catalog
//!
//! The catalog is compiled into the binary (`data/catalog.toml`) and turned
//! into the master playlist once at startup: the podcast first, then every
//! track in catalog order, then every demo in catalog order.

use crate::error::{CyfralError, Result};
use crate::types::{ItemKind, PlaylistItem};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

/// Identifier of the podcast entry in the master playlist
pub const PODCAST_ID: &str = "podcast";

/// Streaming/lyrics pages for a released track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalLinks {
    pub yandex: Option<String>,
    pub spotify: Option<String>,
    pub apple: Option<String>,
    pub vk: Option<String>,
    pub ytmusic: Option<String>,
    pub rutube: Option<String>,
    pub genius: Option<String>,
}

impl ExternalLinks {
    /// Platform name and URL for every link that is present, in display order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("yandex", self.yandex.as_deref()),
            ("spotify", self.spotify.as_deref()),
            ("apple", self.apple.as_deref()),
            ("vk", self.vk.as_deref()),
            ("ytmusic", self.ytmusic.as_deref()),
            ("rutube", self.rutube.as_deref()),
            ("genius", self.genius.as_deref()),
        ]
        .into_iter()
        .filter_map(|(platform, url)| url.map(|url| (platform, url)))
    }
}

/// A released track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: String,
    pub cover: String,
    pub audio: String,

    /// Directory holding the track's timings file, if it has one
    #[serde(default)]
    pub folder: Option<String>,

    #[serde(default)]
    pub links: ExternalLinks,
}

/// An unreleased demo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demo {
    pub name: String,
    pub file: String,
}

/// The podcast episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    pub name: String,
    pub artist: String,
    pub audio: String,
}

/// Everything the site can play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Directory demo files are served from
    pub demo_dir: String,

    /// Artist credited on every demo
    pub demo_artist: String,

    pub podcast: Podcast,

    #[serde(default)]
    pub tracks: Vec<Track>,

    #[serde(default)]
    pub demos: Vec<Demo>,
}

impl Catalog {
    /// The catalog shipped with the site
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog definition
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(source)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check that every playlist id is unique
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for item in self.build_playlist() {
            if !seen.insert(item.id.clone()) {
                return Err(CyfralError::catalog(format!(
                    "duplicate playlist id '{}'",
                    item.id
                )));
            }
        }
        Ok(())
    }

    /// Build the master playlist: podcast, tracks, demos
    pub fn build_playlist(&self) -> Vec<PlaylistItem> {
        let mut items = Vec::with_capacity(1 + self.tracks.len() + self.demos.len());

        items.push(PlaylistItem::new(
            PODCAST_ID,
            &self.podcast.name,
            &self.podcast.artist,
            &self.podcast.audio,
            ItemKind::Podcast,
        ));

        items.extend(self.tracks.iter().map(|t| {
            PlaylistItem::new(&t.id, &t.name, &t.artists, &t.audio, ItemKind::Track)
                .with_cover(&t.cover)
        }));

        let demo_dir = self.demo_dir.trim_end_matches('/');
        items.extend(self.demos.iter().enumerate().map(|(i, d)| {
            PlaylistItem::new(
                format!("demo-{i}"),
                &d.name,
                &self.demo_artist,
                format!("{demo_dir}/{}", d.file),
                ItemKind::Demo,
            )
        }));

        items
    }

    /// Track id to timings folder, for tracks that have one
    pub fn timing_folders(&self) -> HashMap<String, String> {
        self.tracks
            .iter()
            .filter_map(|t| t.folder.as_ref().map(|f| (t.id.clone(), f.clone())))
            .collect()
    }

    /// Look up a released track by id
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.tracks.len(), 8);
        assert_eq!(catalog.demos.len(), 26);
        assert_eq!(catalog.timing_folders().len(), 8);
    }

    #[test]
    fn playlist_order_is_podcast_tracks_demos() {
        let catalog = Catalog::builtin().unwrap();
        let playlist = catalog.build_playlist();

        assert_eq!(playlist.len(), 35);
        assert_eq!(playlist[0].id, PODCAST_ID);
        assert_eq!(playlist[1].id, "dermo");
        assert_eq!(playlist[8].id, "molodesh-cypher");
        assert_eq!(playlist[9].id, "demo-0");
        assert_eq!(playlist[9].audio_src, "Cyfral-site/демки/babos.mp3");
        assert_eq!(playlist[9].artist, "Lil Cyfral");
        assert!(playlist[9].cover.is_none());
        assert!(playlist[1].cover.is_some());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let source = r#"
            demo_dir = "d"
            demo_artist = "a"
            [podcast]
            name = "p"
            artist = "a"
            audio = "p.mp3"
            [[tracks]]
            id = "podcast"
            name = "clash"
            artists = "a"
            cover = "c.jpg"
            audio = "t.mp3"
        "#;

        let err = Catalog::from_toml_str(source).unwrap_err();
        assert!(matches!(err, CyfralError::Catalog(_)));
    }

    #[test]
    fn links_iterate_present_platforms_only() {
        let catalog = Catalog::builtin().unwrap();
        let track = catalog.track("lil-cyfral-is").unwrap();
        let links: Vec<_> = track.links.iter().collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0, "genius");
    }
}
