//! # redomi-core
//!
//! Core types, platform registry and link mapping for Redomi.
//!
//! Given the links an aggregation service found for a song, this crate decides
//! which of the known platforms are shown to the user and in what order.

pub mod error;
pub mod mapping;
pub mod registry;
pub mod resolver;
pub mod selector;
pub mod types;

pub use error::{Error, ErrorKind, HttpError, Result};
pub use mapping::map_links;
pub use registry::PlatformRegistry;
pub use resolver::SongResolver;
pub use selector::{
    AllPlatforms, AppList, AppSelection, InstalledAppQuery, InstalledApps, PlatformKeys,
    PlatformSelector,
};
pub use types::*;
