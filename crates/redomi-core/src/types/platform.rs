//! Platform descriptors and resolved platform links.

use serde::{Deserialize, Serialize};

/// Opaque reference to an icon resource, resolved by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct IconRef(pub String);

impl IconRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A music service known to the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PlatformDescriptor {
    /// Display title.
    pub title: String,
    pub icon: IconRef,
    /// Exact key used by the aggregation service for this platform.
    pub matching_key: String,
    /// Mobile application id, used when checking whether the app is installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
}

impl PlatformDescriptor {
    pub fn new(
        title: impl Into<String>,
        icon: impl Into<String>,
        matching_key: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            icon: IconRef::new(icon),
            matching_key: matching_key.into(),
            package_name: None,
        }
    }

    #[must_use]
    pub fn with_package(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = Some(package_name.into());
        self
    }
}

/// A registry platform paired with the song's link on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedPlatform {
    pub descriptor: PlatformDescriptor,
    /// Absolute, non-empty URL.
    pub link: String,
}

impl ResolvedPlatform {
    pub fn title(&self) -> &str {
        &self.descriptor.title
    }

    pub fn key(&self) -> &str {
        &self.descriptor.matching_key
    }
}
