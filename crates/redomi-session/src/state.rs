//! Observable resolution state.

use redomi_core::{ErrorKind, ResolvedPlatform, SongInfo};
use serde::Serialize;

/// Where the current request is in its lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Resolving,
    Ready,
    Failed,
}

/// Snapshot published to observers after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResolutionState {
    /// Id of the request this snapshot belongs to; grows with every request.
    pub request_id: u64,
    pub phase: Phase,
    pub input_url: Option<String>,
    pub song_info: Option<SongInfo>,
    /// Resolved platforms in registry order.
    pub platforms: Vec<ResolvedPlatform>,
    pub page_url: Option<String>,
    pub is_loading: bool,
    /// Why the last request failed, when `phase` is `Failed`.
    pub error: Option<ErrorKind>,
}

impl ResolutionState {
    pub(crate) fn resolving(request_id: u64, input_url: &str) -> Self {
        Self {
            request_id,
            phase: Phase::Resolving,
            input_url: Some(input_url.to_string()),
            is_loading: true,
            ..Self::default()
        }
    }

    pub(crate) fn ready(&mut self, song: &ResolvedSong) {
        self.phase = Phase::Ready;
        self.song_info = Some(song.song_info.clone());
        self.platforms = song.platforms.clone();
        self.page_url = song.page_url.clone();
        self.is_loading = false;
        self.error = None;
    }

    pub(crate) fn failed(&mut self, error: Option<ErrorKind>) {
        self.phase = Phase::Failed;
        self.song_info = None;
        self.platforms.clear();
        self.page_url = None;
        self.is_loading = false;
        self.error = error;
    }

    pub(crate) fn idle(&mut self) {
        *self = Self {
            request_id: self.request_id,
            ..Self::default()
        };
    }

    /// Loading finished and produced nothing to show.
    pub fn is_empty_result(&self) -> bool {
        !self.is_loading && self.platforms.is_empty()
    }
}

/// Result of one successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSong {
    pub song_info: SongInfo,
    pub platforms: Vec<ResolvedPlatform>,
    pub page_url: Option<String>,
}
