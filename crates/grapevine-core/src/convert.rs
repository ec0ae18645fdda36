// ── Wire-to-domain conversions ──
//
// Pure functions from `grapevine_api` response types into the client model.
// Inputs are borrowed and never modified; every call builds a fresh value.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tracing::debug;

use grapevine_api::types::{FeedResponse, ItemFeedResponse, ItemImageResponse, ItemResponse};

use crate::model::{Feed, Item, ItemFeed, ItemImage};

/// Offset-less layouts, read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

// ── Helpers ────────────────────────────────────────────────────────

/// Drop empty strings.
fn non_empty(raw: Option<&String>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).cloned()
}

/// Drop empty lists.
fn non_empty_list(raw: Option<&Vec<String>>) -> Option<Vec<String>> {
    raw.filter(|v| !v.is_empty()).cloned()
}

/// Parse a wire date string into a timezone-aware datetime.
///
/// Accepts RFC 3339 / ISO 8601 with offset, RFC 2822, ISO 8601 without an
/// offset (UTC) and a bare `YYYY-MM-DD` (midnight UTC). Anything else maps
/// to `None` rather than an error.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

    let parsed = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .or_else(|| parse_naive_utc(raw));

    if parsed.is_none() {
        debug!(raw, "unparseable item timestamp");
    }
    parsed
}

fn parse_naive_utc(raw: &str) -> Option<DateTime<FixedOffset>> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().fixed_offset())
}

// ── Feed ───────────────────────────────────────────────────────────

pub fn feed(wire: &FeedResponse) -> Feed {
    Feed {
        id: wire.id,
        title: wire.title.clone(),
        url: wire.url.clone(),
        added_on: wire.added_on,
        last_updated: wire.last_updated,
    }
}

impl From<&FeedResponse> for Feed {
    fn from(wire: &FeedResponse) -> Self {
        feed(wire)
    }
}

// ── Item ───────────────────────────────────────────────────────────

impl From<&ItemFeedResponse> for ItemFeed {
    fn from(wire: &ItemFeedResponse) -> Self {
        Self {
            id: wire.id,
            title: wire.title.clone(),
        }
    }
}

impl From<&ItemImageResponse> for ItemImage {
    fn from(wire: &ItemImageResponse) -> Self {
        Self {
            title: wire.title.clone(),
            url: wire.url.clone(),
        }
    }
}

/// Normalize an item: prune empty optional fields and parse both dates.
///
/// An image object is kept whenever the server sent one, even without
/// a title or URL.
pub fn item(wire: &ItemResponse) -> Item {
    Item {
        id: wire.id,
        guid: wire.guid.clone(),
        feed: ItemFeed::from(&wire.feed),
        read: wire.read,
        starred: wire.starred,
        published: parse_timestamp(wire.published.as_deref()),
        updated: parse_timestamp(wire.updated.as_deref()),
        author: non_empty(wire.author.as_ref()),
        categories: non_empty_list(wire.categories.as_ref()),
        comments: non_empty(wire.comments.as_ref()),
        description: non_empty(wire.description.as_ref()),
        enclosures: non_empty_list(wire.enclosures.as_ref()),
        image: wire.image.as_ref().map(ItemImage::from),
        link: non_empty(wire.link.as_ref()),
        summary: non_empty(wire.summary.as_ref()),
        title: non_empty(wire.title.as_ref()),
    }
}

impl From<&ItemResponse> for Item {
    fn from(wire: &ItemResponse) -> Self {
        item(wire)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, TimeZone, Timelike, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn wire_item(extra: serde_json::Value) -> ItemResponse {
        let mut base = json!({
            "id": 42,
            "guid": "urn:uuid:42",
            "feed": { "id": 1, "title": "Example Feed" },
            "read": false,
            "starred": true,
            "published": "2024-06-15T10:30:00Z",
            "updated": "2024-06-15T11:00:00+02:00"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn feed_renames_timestamps() {
        let wire = FeedResponse {
            id: 1,
            title: "T".into(),
            url: "U".into(),
            added_on: 100,
            last_updated: 200,
        };

        let converted = feed(&wire);

        assert_eq!(
            converted,
            Feed {
                id: 1,
                title: "T".into(),
                url: "U".into(),
                added_on: 100,
                last_updated: 200,
            }
        );
        assert_eq!(
            serde_json::to_value(&converted).unwrap(),
            json!({ "id": 1, "title": "T", "url": "U", "addedOn": 100, "lastUpdated": 200 })
        );
    }

    #[test]
    fn item_prunes_falsy_optionals() {
        let wire = wire_item(json!({
            "author": "",
            "categories": [],
            "comments": null,
            "enclosures": [],
            "link": "",
            "summary": ""
        }));

        let converted = item(&wire);

        assert_eq!(converted.author, None);
        assert_eq!(converted.categories, None);
        assert_eq!(converted.comments, None);
        assert_eq!(converted.description, None);
        assert_eq!(converted.enclosures, None);
        assert_eq!(converted.image, None);
        assert_eq!(converted.link, None);
        assert_eq!(converted.summary, None);
        assert_eq!(converted.title, None);

        let serialized = serde_json::to_value(&converted).unwrap();
        let keys: Vec<&str> = serialized
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        for absent in ["author", "categories", "comments", "enclosures", "link", "summary"] {
            assert!(!keys.contains(&absent), "{absent} should be omitted");
        }
    }

    #[test]
    fn item_copies_truthy_values_verbatim() {
        let wire = wire_item(json!({
            "author": "Ada",
            "categories": ["rust", "rss"],
            "description": "<p>Hello</p>",
            "enclosures": ["https://example.org/a.mp3"],
            "image": { "url": "https://example.org/a.png" },
            "link": "https://example.org/post",
            "title": "Hello"
        }));

        let converted = item(&wire);

        assert_eq!(converted.id, 42);
        assert_eq!(converted.guid, "urn:uuid:42");
        assert_eq!(
            converted.feed,
            ItemFeed {
                id: 1,
                title: "Example Feed".into(),
            }
        );
        assert!(!converted.read);
        assert!(converted.starred);
        assert_eq!(converted.author.as_deref(), Some("Ada"));
        assert_eq!(converted.categories, Some(vec!["rust".into(), "rss".into()]));
        assert_eq!(converted.description.as_deref(), Some("<p>Hello</p>"));
        assert_eq!(
            converted.image,
            Some(ItemImage {
                title: None,
                url: Some("https://example.org/a.png".into()),
            })
        );
        assert_eq!(converted.link.as_deref(), Some("https://example.org/post"));
        assert_eq!(converted.title.as_deref(), Some("Hello"));
    }

    #[test]
    fn item_conversion_leaves_input_untouched() {
        let wire = wire_item(json!({ "author": "", "title": "Kept" }));
        let before = wire.clone();

        let _ = item(&wire);

        assert_eq!(wire, before);
    }

    #[test]
    fn item_parses_timezone_aware_dates() {
        let converted = item(&wire_item(json!({})));

        let published = converted.published.unwrap();
        assert_eq!(
            published,
            Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
        );

        let updated = converted.updated.unwrap();
        assert_eq!(updated.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(updated.hour(), 11);
    }

    #[test]
    fn parse_timestamp_accepts_common_layouts() {
        let rfc2822 = parse_timestamp(Some("Sat, 15 Jun 2024 10:30:00 +0000"));
        assert_eq!(
            rfc2822.unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
        );

        let naive = parse_timestamp(Some("2024-06-15T10:30:00.250")).unwrap();
        assert_eq!(naive.offset().local_minus_utc(), 0);
        assert_eq!(naive.nanosecond(), 250_000_000);

        let spaced = parse_timestamp(Some("2024-06-15 10:30:00")).unwrap();
        assert_eq!(spaced.minute(), 30);

        let date_only = parse_timestamp(Some("2024-06-15")).unwrap();
        assert_eq!(date_only.day(), 15);
        assert_eq!(date_only.hour(), 0);
    }

    #[test]
    fn parse_timestamp_maps_garbage_to_none() {
        assert_eq!(parse_timestamp(None), None);
        assert_eq!(parse_timestamp(Some("")), None);
        assert_eq!(parse_timestamp(Some("   ")), None);
        assert_eq!(parse_timestamp(Some("not a date")), None);
        assert_eq!(parse_timestamp(Some("2024-13-45")), None);
    }

    #[test]
    fn unparseable_dates_do_not_fail_conversion() {
        let wire = wire_item(json!({ "published": "yesterday", "updated": null }));
        let converted = item(&wire);
        assert_eq!(converted.published, None);
        assert_eq!(converted.updated, None);
        assert_eq!(converted.id, 42);
    }
}
