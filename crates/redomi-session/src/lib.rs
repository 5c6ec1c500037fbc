//! # redomi-session
//!
//! Coordinates song-link resolutions for a UI.
//!
//! [`ResolutionSession`] runs one logical resolution at a time, publishes a
//! [`ResolutionState`] after every transition and makes sure a slow, older
//! request can never overwrite the result of a newer one.

pub mod session;
pub mod state;

pub use session::ResolutionSession;
pub use state::{Phase, ResolutionState, ResolvedSong};
