//! Single-flight resolution orchestrator.

use std::sync::Arc;

use parking_lot::Mutex;
use redomi_core::{
    map_links, Error, PlatformRegistry, PlatformSelector, Result, SongResolver,
};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::state::{ResolutionState, ResolvedSong};

/// Runs resolutions one at a time and publishes their state.
///
/// A new request supersedes the previous one: the older request keeps running
/// until it notices, but its result is never published.
#[derive(Clone)]
pub struct ResolutionSession {
    inner: Arc<Inner>,
}

struct Inner {
    resolver: Arc<dyn SongResolver>,
    registry: PlatformRegistry,
    state: watch::Sender<ResolutionState>,
    /// Task spawned by the last `request_resolution` call.
    in_flight: Mutex<Option<AbortHandle>>,
}

impl ResolutionSession {
    pub fn new(resolver: Arc<dyn SongResolver>, registry: PlatformRegistry) -> Self {
        let (state, _) = watch::channel(ResolutionState::default());
        Self {
            inner: Arc::new(Inner {
                resolver,
                registry,
                state,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Observe every published state.
    pub fn subscribe(&self) -> watch::Receiver<ResolutionState> {
        self.inner.state.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> ResolutionState {
        self.inner.state.borrow().clone()
    }

    /// Resolve `input_url` and publish the outcome.
    ///
    /// Returns [`Error::Cancelled`] when a newer request superseded this one
    /// before it finished.
    pub async fn resolve(
        &self,
        input_url: &str,
        selector: &dyn PlatformSelector,
    ) -> Result<ResolvedSong> {
        let pending = Pending::begin(&self.inner, input_url);
        pending.run(input_url, selector).await
    }

    /// Spawn a resolution onto the runtime, aborting the previous spawned one.
    pub fn request_resolution<S>(
        &self,
        input_url: impl Into<String>,
        selector: S,
    ) -> JoinHandle<Result<ResolvedSong>>
    where
        S: PlatformSelector + 'static,
    {
        let input_url = input_url.into();

        // Held across begin and spawn so concurrent callers leave the newest
        // request id paired with the newest abort handle.
        let mut in_flight = self.inner.in_flight.lock();
        let pending = Pending::begin(&self.inner, &input_url);
        let handle = tokio::spawn(async move { pending.run(&input_url, &selector).await });

        if let Some(previous) = in_flight.replace(handle.abort_handle()) {
            previous.abort();
        }
        handle
    }

    /// Drop the current request and go back to idle.
    pub fn cancel(&self) {
        let mut in_flight = self.inner.in_flight.lock();
        if let Some(previous) = in_flight.take() {
            previous.abort();
        }
        self.inner.state.send_modify(|state| {
            state.request_id += 1;
            state.idle();
        });
        debug!("Resolution cancelled");
    }
}

impl Inner {
    /// Publish `outcome` if `request_id` is still the latest request.
    fn publish(
        &self,
        request_id: u64,
        input_url: &str,
        outcome: Result<ResolvedSong>,
    ) -> Result<ResolvedSong> {
        let published = self.state.send_if_modified(|state| {
            if state.request_id != request_id {
                return false;
            }
            match &outcome {
                Ok(song) => state.ready(song),
                Err(e) => state.failed(e.kind()),
            }
            true
        });

        if !published {
            debug!("Discarding result of superseded request {request_id} for {input_url}");
            return Err(Error::Cancelled);
        }

        match &outcome {
            Ok(song) => info!(
                "Request {request_id}: '{}' available on {} platforms",
                song.song_info.title,
                song.platforms.len()
            ),
            Err(e) => warn!("Request {request_id} for {input_url} failed: {e}"),
        }
        outcome
    }
}

/// One started request.
///
/// Resets the state to idle if it is dropped before publishing, including when
/// its task is aborted before the first poll.
struct Pending {
    inner: Arc<Inner>,
    request_id: u64,
    done: bool,
}

impl Pending {
    /// Allocate the next request id and publish `Resolving`.
    fn begin(inner: &Arc<Inner>, input_url: &str) -> Self {
        let mut request_id = 0;
        inner.state.send_modify(|state| {
            request_id = state.request_id + 1;
            *state = ResolutionState::resolving(request_id, input_url);
        });
        debug!("Request {request_id} started for {input_url}");
        Self {
            inner: Arc::clone(inner),
            request_id,
            done: false,
        }
    }

    async fn run(
        mut self,
        input_url: &str,
        selector: &dyn PlatformSelector,
    ) -> Result<ResolvedSong> {
        let inner = Arc::clone(&self.inner);
        let outcome = inner.resolver.resolve(input_url).await.map(|resolution| {
            let platforms = map_links(&resolution.links, &inner.registry, selector);
            ResolvedSong {
                song_info: resolution.song_info(),
                platforms,
                page_url: resolution.page_url,
            }
        });
        self.done = true;

        inner.publish(self.request_id, input_url, outcome)
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let request_id = self.request_id;
        let reset = self.inner.state.send_if_modified(|state| {
            if state.request_id != request_id {
                return false;
            }
            state.idle();
            true
        });
        if reset {
            debug!("Request {request_id} dropped before completion");
        }
    }
}
