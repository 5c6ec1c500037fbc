//! song.link response structures.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Body of `GET /links`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLinksResponse {
    /// Entity the service matched the input to.
    pub entity_unique_id: Option<String>,
    pub user_country: Option<String>,
    pub page_url: Option<String>,
    pub entities_by_unique_id: OrderedEntries<RawEntity>,
    pub links_by_platform: HashMap<String, RawPlatformLink>,
}

/// A JSON object decoded as key/value pairs in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedEntries<T>(pub Vec<(String, T)>);

impl<T> OrderedEntries<T> {
    pub fn first(&self) -> Option<&(String, T)> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedEntries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = OrderedEntries<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map keyed by unique id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// One entry of `entitiesByUniqueId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntity {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub artist_name: Option<String>,
    pub thumbnail_url: Option<String>,
    pub thumbnail_width: Option<u32>,
    pub thumbnail_height: Option<u32>,
    pub api_provider: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// One entry of `linksByPlatform`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlatformLink {
    pub url: String,
    pub native_app_uri_mobile: Option<String>,
    pub native_app_uri_desktop: Option<String>,
    pub entity_unique_id: Option<String>,
}

/// Error body returned alongside 4xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct RawErrorResponse {
    /// Machine-readable reason, e.g. `could_not_resolve_entity`.
    pub code: Option<String>,
    pub message: Option<String>,
}

impl RawErrorResponse {
    pub fn reason(&self) -> Option<&str> {
        self.code.as_deref().or(self.message.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_keep_document_order() {
        let json = r#"{"b": 2, "c": 3, "a": 1}"#;
        let entries: OrderedEntries<u32> = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = entries.0.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "c", "a"]);
        assert_eq!(entries.first().unwrap().1, 2);
    }

    #[test]
    fn test_entities_reject_non_map() {
        let result: Result<OrderedEntries<u32>, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }
}
