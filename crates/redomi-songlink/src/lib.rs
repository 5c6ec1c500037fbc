//! # redomi-songlink
//!
//! Client for the [song.link](https://song.link) (Odesli) aggregation API.
//!
//! The client sends a song URL from any supported platform and turns the
//! response into a [`redomi_core::Resolution`]: the canonical entity plus every
//! platform link the service found.

pub mod client;
pub mod config;
pub mod parser;
pub mod types;

pub use client::SongLinkClient;
pub use config::{SongLinkConfig, DEFAULT_API_URL};
