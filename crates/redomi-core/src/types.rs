//! Core domain types for Redomi.

pub mod platform;
pub mod song;

pub use platform::{IconRef, PlatformDescriptor, ResolvedPlatform};
pub use song::{CanonicalEntity, EntityKind, PlatformLink, PlatformLinks, Resolution, SongInfo};
