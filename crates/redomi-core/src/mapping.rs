//! Joins resolver links with the platform registry.

use std::collections::HashSet;

use url::Url;

use crate::{PlatformDescriptor, PlatformLinks, PlatformSelector, ResolvedPlatform};

/// Map resolver links onto `registry`, in registry order.
///
/// A platform is emitted iff `selector` accepts it and `links` holds an
/// absolute web URL for its matching key. Ineligible or unresolved platforms are
/// skipped, never replaced with placeholders.
pub fn map_links<'a, I>(
    links: &PlatformLinks,
    registry: I,
    selector: &dyn PlatformSelector,
) -> Vec<ResolvedPlatform>
where
    I: IntoIterator<Item = &'a PlatformDescriptor>,
{
    let mut seen: HashSet<&str> = HashSet::new();

    registry
        .into_iter()
        .filter(|descriptor| selector.is_eligible(descriptor))
        .filter_map(|descriptor| {
            let link = usable_link(&links.get(&descriptor.matching_key)?.url)?;
            seen.insert(descriptor.matching_key.as_str())
                .then(|| ResolvedPlatform {
                    descriptor: descriptor.clone(),
                    link: link.to_string(),
                })
        })
        .collect()
}

/// Trimmed link if it is an absolute http(s) URL with a host.
fn usable_link(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Url::parse(trimmed)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .map(|_| trimmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{AllPlatforms, PlatformKeys, PlatformLink, PlatformRegistry};
    use proptest::prelude::*;

    fn links(pairs: &[(&str, &str)]) -> PlatformLinks {
        pairs
            .iter()
            .map(|(key, url)| ((*key).to_string(), PlatformLink::new(*key, *url)))
            .collect()
    }

    fn registry() -> PlatformRegistry {
        PlatformRegistry::new(vec![
            PlatformDescriptor::new("Spotify", "ic_spotify", "spotify"),
            PlatformDescriptor::new("Apple Music", "ic_apple_music", "appleMusic"),
            PlatformDescriptor::new("YouTube Music", "ic_youtube_music", "youtubeMusic"),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_link_excluded() {
        let links = links(&[
            ("spotify", "https://open.spotify.com/track/abc"),
            ("appleMusic", "https://music.apple.com/us/album/x?i=1"),
            ("youtubeMusic", ""),
        ]);

        let resolved = map_links(&links, &registry(), &AllPlatforms);

        let keys: Vec<_> = resolved.iter().map(ResolvedPlatform::key).collect();
        assert_eq!(keys, ["spotify", "appleMusic"]);
        assert_eq!(resolved[0].link, "https://open.spotify.com/track/abc");
        assert_eq!(resolved[1].title(), "Apple Music");
    }

    #[test]
    fn test_registry_order_wins() {
        let links = links(&[
            ("youtubeMusic", "https://music.youtube.com/watch?v=1"),
            ("spotify", "https://open.spotify.com/track/abc"),
        ]);

        let resolved = map_links(&links, &registry(), &AllPlatforms);

        let keys: Vec<_> = resolved.iter().map(ResolvedPlatform::key).collect();
        assert_eq!(keys, ["spotify", "youtubeMusic"]);
    }

    #[test]
    fn test_ineligible_and_unknown_skipped() {
        let links = links(&[
            ("spotify", "https://open.spotify.com/track/abc"),
            ("appleMusic", "https://music.apple.com/us/album/x?i=1"),
            ("napster", "https://play.napster.com/track/1"),
        ]);

        let resolved = map_links(&links, &registry(), &PlatformKeys::new(["appleMusic"]));

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].key(), "appleMusic");
    }

    #[test]
    fn test_relative_or_blank_links_rejected() {
        let links = links(&[
            ("spotify", "   "),
            ("appleMusic", "/us/album/x"),
            ("youtubeMusic", " https://music.youtube.com/watch?v=1 "),
        ]);

        let resolved = map_links(&links, &registry(), &AllPlatforms);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].link, "https://music.youtube.com/watch?v=1");
    }

    #[test]
    fn test_non_web_schemes_rejected() {
        let links = links(&[
            ("spotify", "ftp://files.example.com/x"),
            ("appleMusic", "javascript://music.apple.com/%0Aalert(1)"),
            ("youtubeMusic", "http://music.youtube.com/watch?v=1"),
        ]);

        let resolved = map_links(&links, &registry(), &AllPlatforms);

        let keys: Vec<_> = resolved.iter().map(ResolvedPlatform::key).collect();
        assert_eq!(keys, ["youtubeMusic"]);
    }

    #[test]
    fn test_duplicate_descriptors_emitted_once() {
        let spotify = PlatformDescriptor::new("Spotify", "ic_spotify", "spotify");
        let table = [spotify.clone(), spotify];
        let links = links(&[("spotify", "https://open.spotify.com/track/abc")]);

        let resolved = map_links(&links, &table, &AllPlatforms);

        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_no_eligible_platforms_is_empty() {
        let links = links(&[("spotify", "https://open.spotify.com/track/abc")]);
        let resolved = map_links(&links, &registry(), &PlatformKeys::default());
        assert!(resolved.is_empty());
    }

    fn arb_case() -> impl Strategy<Value = (Vec<bool>, Vec<Option<bool>>)> {
        let n = PlatformRegistry::builtin().len();
        (
            prop::collection::vec(any::<bool>(), n),
            prop::collection::vec(prop::option::of(any::<bool>()), n),
        )
    }

    proptest! {
        #[test]
        fn prop_output_matches_eligibility_and_order((eligible, present) in arb_case()) {
            let registry = PlatformRegistry::builtin();
            let mut links = PlatformLinks::new();
            for (descriptor, link) in registry.iter().zip(&present) {
                if let Some(non_empty) = link {
                    let url = if *non_empty {
                        format!("https://example.com/{}", descriptor.matching_key)
                    } else {
                        String::new()
                    };
                    links.insert(
                        descriptor.matching_key.clone(),
                        PlatformLink::new(descriptor.matching_key.clone(), url),
                    );
                }
            }
            let allowed = PlatformKeys::new(
                registry
                    .iter()
                    .zip(&eligible)
                    .filter(|(_, e)| **e)
                    .map(|(d, _)| d.matching_key.clone()),
            );

            let first = map_links(&links, &registry, &allowed);
            let second = map_links(&links, &registry, &allowed);
            prop_assert_eq!(&first, &second);

            let expected: Vec<&str> = registry
                .iter()
                .zip(eligible.iter().zip(&present))
                .filter(|(_, (e, p))| **e && **p == Some(true))
                .map(|(d, _)| d.matching_key.as_str())
                .collect();
            let actual: Vec<&str> = first.iter().map(ResolvedPlatform::key).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
