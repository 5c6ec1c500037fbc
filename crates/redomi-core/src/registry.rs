//! Catalog of music platforms Redomi knows how to link to.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{Error, PlatformDescriptor, Result};

/// Built-in catalog in display order: (title, matching key, package name).
const BUILTIN: &[(&str, &str, &str)] = &[
    ("Amazon Music", "amazonMusic", "com.amazon.mp3"),
    ("Anghami", "anghami", "com.anghami"),
    ("Apple Music", "appleMusic", "com.apple.android.music"),
    ("Audiomack", "audiomack", "com.audiomack"),
    ("Audius", "audius", "co.audius.app"),
    ("Boomplay", "boomplay", "com.afmobi.boomplayer"),
    ("Deezer", "deezer", "deezer.android.app"),
    ("Napster", "napster", "com.rhapsody"),
    ("Pandora", "pandora", "com.pandora.android"),
    ("SoundCloud", "soundcloud", "com.soundcloud.android"),
    ("Spotify", "spotify", "com.spotify.music"),
    ("Tidal", "tidal", "com.aspiro.tidal"),
    ("Yandex Music", "yandex", "ru.yandex.music"),
    ("YouTube", "youtube", "com.google.android.youtube"),
    ("YouTube Music", "youtubeMusic", "com.google.android.apps.youtube.music"),
];

/// Immutable, ordered set of platform descriptors.
///
/// Cloning is cheap and shares the underlying table.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    platforms: Arc<[PlatformDescriptor]>,
    by_key: Arc<HashMap<String, usize>>,
}

impl PlatformRegistry {
    /// Build a registry from descriptors in display order.
    ///
    /// Matching keys must be non-empty and unique.
    pub fn new(platforms: Vec<PlatformDescriptor>) -> Result<Self> {
        let mut by_key = HashMap::with_capacity(platforms.len());

        for (index, platform) in platforms.iter().enumerate() {
            if platform.matching_key.is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "platform '{}' has an empty matching key",
                    platform.title
                )));
            }
            if by_key.insert(platform.matching_key.clone(), index).is_some() {
                return Err(Error::InvalidArgument(format!(
                    "duplicate matching key '{}'",
                    platform.matching_key
                )));
            }
        }

        Ok(Self {
            platforms: platforms.into(),
            by_key: Arc::new(by_key),
        })
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        let platforms: Vec<_> = BUILTIN
            .iter()
            .map(|(title, key, package)| {
                PlatformDescriptor::new(*title, format!("ic_{key}"), *key).with_package(*package)
            })
            .collect();
        let by_key = platforms
            .iter()
            .enumerate()
            .map(|(index, p)| (p.matching_key.clone(), index))
            .collect();

        Self {
            platforms: platforms.into(),
            by_key: Arc::new(by_key),
        }
    }

    /// All platforms in display order.
    pub fn list_platforms(&self) -> &[PlatformDescriptor] {
        &self.platforms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlatformDescriptor> {
        self.platforms.iter()
    }

    /// Look up a platform by its exact matching key.
    pub fn get(&self, matching_key: &str) -> Option<&PlatformDescriptor> {
        self.by_key
            .get(matching_key)
            .map(|&index| &self.platforms[index])
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a PlatformRegistry {
    type Item = &'a PlatformDescriptor;
    type IntoIter = std::slice::Iter<'a, PlatformDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
