//! Conversion from song.link responses to domain types.

use redomi_core::{
    CanonicalEntity, EntityKind, Error, PlatformLink, PlatformLinks, Resolution, Result,
};

use crate::types::{RawEntity, RawLinksResponse, RawPlatformLink};

/// Build a [`Resolution`] from a decoded response.
///
/// The canonical entity is the first one in document order. The service may
/// list several entities for one input; the first is kept even when another
/// matches `entityUniqueId`.
pub fn parse_links_response(input_url: &str, response: RawLinksResponse) -> Result<Resolution> {
    let Some((id, raw)) = response.entities_by_unique_id.0.into_iter().next() else {
        return Err(Error::NotFound(input_url.to_string()));
    };

    let entity = parse_entity(id, raw)?;
    let links = parse_links(response.links_by_platform);

    Ok(Resolution {
        entity,
        links,
        page_url: response.page_url,
    })
}

fn parse_entity(id: String, raw: RawEntity) -> Result<CanonicalEntity> {
    let title = raw
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::Decode(format!("entity {id} has no title")))?;

    let kind = match raw.kind.as_deref() {
        Some("album") => EntityKind::Album,
        _ => EntityKind::Song,
    };

    Ok(CanonicalEntity {
        id: raw.id.unwrap_or(id),
        kind,
        title,
        artist_name: raw.artist_name.unwrap_or_default(),
        thumbnail_url: raw.thumbnail_url.unwrap_or_default(),
        thumbnail_width: raw.thumbnail_width,
        thumbnail_height: raw.thumbnail_height,
        api_provider: raw.api_provider,
        platforms: raw.platforms,
    })
}

fn parse_links(raw: impl IntoIterator<Item = (String, RawPlatformLink)>) -> PlatformLinks {
    raw.into_iter()
        .map(|(key, link)| {
            let parsed = PlatformLink {
                platform_key: key.clone(),
                url: link.url,
                native_app_uri_mobile: link.native_app_uri_mobile,
                native_app_uri_desktop: link.native_app_uri_desktop,
                entity_unique_id: link.entity_unique_id,
            };
            (key, parsed)
        })
        .collect()
}
