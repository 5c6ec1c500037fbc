//! Song-side types produced by a resolver.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Display fields of the resolved song.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongInfo {
    pub title: String,
    pub artist_name: String,
    pub thumbnail_url: String,
}

/// What kind of catalog item an entity describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Song,
    Album,
}

/// The aggregation service's record of a song, keyed by its unique id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalEntity {
    /// Service-assigned unique id (e.g. `SPOTIFY_SONG::abc`).
    pub id: String,
    pub kind: EntityKind,
    pub title: String,
    pub artist_name: String,
    pub thumbnail_url: String,
    pub thumbnail_width: Option<u32>,
    pub thumbnail_height: Option<u32>,
    /// Upstream provider that supplied this record.
    pub api_provider: Option<String>,
    /// Platform keys that reported this entity.
    pub platforms: Vec<String>,
}

impl CanonicalEntity {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Song,
            title: title.into(),
            artist_name: artist_name.into(),
            thumbnail_url: String::new(),
            thumbnail_width: None,
            thumbnail_height: None,
            api_provider: None,
            platforms: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = url.into();
        self
    }

    /// Read-only display view.
    pub fn song_info(&self) -> SongInfo {
        SongInfo {
            title: self.title.clone(),
            artist_name: self.artist_name.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
        }
    }
}

/// A link to the song on one platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformLink {
    pub platform_key: String,
    pub url: String,
    pub native_app_uri_mobile: Option<String>,
    pub native_app_uri_desktop: Option<String>,
    pub entity_unique_id: Option<String>,
}

impl PlatformLink {
    pub fn new(platform_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            platform_key: platform_key.into(),
            url: url.into(),
            native_app_uri_mobile: None,
            native_app_uri_desktop: None,
            entity_unique_id: None,
        }
    }
}

/// Links keyed by platform key.
pub type PlatformLinks = HashMap<String, PlatformLink>;

/// Everything a resolver learned about one input URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    /// The entity chosen to represent the input.
    pub entity: CanonicalEntity,
    /// Every link the service returned, not filtered by any registry.
    pub links: PlatformLinks,
    /// Shareable landing page, when the service provides one.
    pub page_url: Option<String>,
}

impl Resolution {
    pub fn song_info(&self) -> SongInfo {
        self.entity.song_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_info_from_entity() {
        let entity = CanonicalEntity::new("SPOTIFY_SONG::abc", "Song X", "Artist Y")
            .with_thumbnail("https://i.scdn.co/image/abc");
        let info = entity.song_info();

        assert_eq!(info.title, "Song X");
        assert_eq!(info.artist_name, "Artist Y");
        assert_eq!(info.thumbnail_url, "https://i.scdn.co/image/abc");
    }
}
