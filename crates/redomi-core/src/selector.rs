//! Policies deciding which platforms are shown to the user.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::PlatformDescriptor;

/// Decides whether a platform should be offered.
pub trait PlatformSelector: Send + Sync {
    fn is_eligible(&self, descriptor: &PlatformDescriptor) -> bool;
}

impl<F> PlatformSelector for F
where
    F: Fn(&PlatformDescriptor) -> bool + Send + Sync,
{
    fn is_eligible(&self, descriptor: &PlatformDescriptor) -> bool {
        self(descriptor)
    }
}

/// Every platform is eligible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPlatforms;

impl PlatformSelector for AllPlatforms {
    fn is_eligible(&self, _descriptor: &PlatformDescriptor) -> bool {
        true
    }
}

/// Platforms whose matching key is in a fixed set.
#[derive(Debug, Clone, Default)]
pub struct PlatformKeys(HashSet<String>);

impl PlatformKeys {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }
}

impl PlatformSelector for PlatformKeys {
    fn is_eligible(&self, descriptor: &PlatformDescriptor) -> bool {
        self.contains(&descriptor.matching_key)
    }
}

/// Host-provided check for installed applications.
pub trait InstalledAppQuery: Send + Sync {
    fn is_installed(&self, package_name: &str) -> bool;
}

/// Platforms whose application is installed on the device.
#[derive(Debug, Clone)]
pub struct InstalledApps<Q> {
    query: Q,
}

impl<Q: InstalledAppQuery> InstalledApps<Q> {
    pub const fn new(query: Q) -> Self {
        Self { query }
    }
}

impl<Q: InstalledAppQuery> PlatformSelector for InstalledApps<Q> {
    fn is_eligible(&self, descriptor: &PlatformDescriptor) -> bool {
        descriptor
            .package_name
            .as_deref()
            .is_some_and(|package| self.query.is_installed(package))
    }
}

/// Which list the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppList {
    #[default]
    Installed,
    All,
}

/// The user's saved platform choices for both lists.
///
/// Each list filters by its own stored set of matching keys.
#[derive(Debug, Clone, Default)]
pub struct AppSelection {
    pub list: AppList,
    pub installed: PlatformKeys,
    pub all: PlatformKeys,
}

impl AppSelection {
    pub const fn new(list: AppList, installed: PlatformKeys, all: PlatformKeys) -> Self {
        Self {
            list,
            installed,
            all,
        }
    }

    fn active(&self) -> &PlatformKeys {
        match self.list {
            AppList::Installed => &self.installed,
            AppList::All => &self.all,
        }
    }
}

impl PlatformSelector for AppSelection {
    fn is_eligible(&self, descriptor: &PlatformDescriptor) -> bool {
        self.active().is_eligible(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spotify() -> PlatformDescriptor {
        PlatformDescriptor::new("Spotify", "ic_spotify", "spotify").with_package("com.spotify.music")
    }

    fn tidal() -> PlatformDescriptor {
        PlatformDescriptor::new("Tidal", "ic_tidal", "tidal")
    }

    struct Installed(&'static [&'static str]);

    impl InstalledAppQuery for Installed {
        fn is_installed(&self, package_name: &str) -> bool {
            self.0.contains(&package_name)
        }
    }

    #[test]
    fn test_all_platforms() {
        assert!(AllPlatforms.is_eligible(&spotify()));
        assert!(AllPlatforms.is_eligible(&tidal()));
    }

    #[test]
    fn test_platform_keys() {
        let keys = PlatformKeys::new(["spotify"]);
        assert!(keys.is_eligible(&spotify()));
        assert!(!keys.is_eligible(&tidal()));
    }

    #[test]
    fn test_installed_apps_needs_package() {
        let selector = InstalledApps::new(Installed(&["com.spotify.music", "com.aspiro.tidal"]));
        assert!(selector.is_eligible(&spotify()));
        // no package name on this descriptor
        assert!(!selector.is_eligible(&tidal()));
    }

    #[test]
    fn test_app_selection_switches_set() {
        let mut selection = AppSelection::new(
            AppList::Installed,
            PlatformKeys::new(["spotify"]),
            PlatformKeys::new(["tidal"]),
        );
        assert!(selection.is_eligible(&spotify()));
        assert!(!selection.is_eligible(&tidal()));

        selection.list = AppList::All;
        assert!(!selection.is_eligible(&spotify()));
        assert!(selection.is_eligible(&tidal()));
    }

    #[test]
    fn test_closure_selector() {
        let selector = |d: &PlatformDescriptor| d.title.starts_with('T');
        assert!(selector.is_eligible(&tidal()));
        assert!(!selector.is_eligible(&spotify()));
    }
}
