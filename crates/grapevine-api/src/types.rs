//! Wire types for the Grapevine API.
//!
//! Response types mirror the JSON the server sends (snake_case, string
//! timestamps) and are lenient: optional descriptive fields accept absence
//! and `null`, and status flags also accept `0`/`1`. Normalization into
//! the client-facing model happens in `grapevine-core`.
//!
//! Request payloads borrow from the caller and are `Serialize`-only.

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

// ── Flags ────────────────────────────────────────────────────────────

/// Item status flag, used both as a query filter and a mutation target.
///
/// `read`/`unread` and `starred`/`unstarred` pair up semantically, but
/// nothing stops a caller from sending contradictory combinations; the
/// server decides what they mean.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemFlag {
    Unread,
    Read,
    Starred,
    Unstarred,
}

// ── Groups ───────────────────────────────────────────────────────────

/// Group as returned by `GET /api/v1/group`. Needs no renaming, so the
/// client model reuses it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: i64,
    pub name: String,
}

/// `GET /api/v1/feed/{id}/groups` wraps its list.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupsEnvelope {
    pub groups: Vec<GroupResponse>,
}

// ── Feeds ────────────────────────────────────────────────────────────

/// Feed as returned by `GET /api/v1/feed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedResponse {
    pub id: i64,
    pub title: String,
    pub url: String,
    /// Epoch timestamp.
    pub added_on: i64,
    /// Epoch timestamp.
    pub last_updated: i64,
}

/// `GET /api/v1/group/{id}/feeds` wraps its list.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedsEnvelope {
    pub feeds: Vec<FeedResponse>,
}

// ── Items ────────────────────────────────────────────────────────────

/// Snapshot of the owning feed embedded in every item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFeedResponse {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemImageResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Item as returned by the `/api/v1/items` family of endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: i64,
    pub guid: String,
    pub feed: ItemFeedResponse,
    #[serde(default, deserialize_with = "bool_like")]
    pub read: bool,
    #[serde(default, deserialize_with = "bool_like")]
    pub starred: bool,
    /// Date string, format chosen by the server.
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enclosures: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<ItemImageResponse>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Status flags arrive as booleans, `0`/`1`, or `null` (unset).
fn bool_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Int(i64),
    }

    match Option::<BoolLike>::deserialize(deserializer)? {
        None | Some(BoolLike::Bool(false) | BoolLike::Int(0)) => Ok(false),
        Some(BoolLike::Bool(true) | BoolLike::Int(1)) => Ok(true),
        Some(BoolLike::Int(other)) => {
            let unexpected = Unexpected::Signed(other);
            Err(D::Error::invalid_value(unexpected, &"a boolean, 0 or 1"))
        }
    }
}

// ── Request payloads ─────────────────────────────────────────────────

/// `POST /api/v1/item/{id}/status`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ItemStatusPayload {
    pub flag: ItemFlag,
}

/// `PATCH /api/v1/items/status`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ItemsStatusPayload<'a> {
    pub flag: ItemFlag,
    pub ids: &'a [i64],
}

/// `POST /api/v1/feed`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AddFeedPayload<'a> {
    pub title: &'a str,
    pub url: &'a str,
}

/// `POST /api/v1/group`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AddGroupPayload<'a> {
    pub name: &'a str,
}

/// `POST` / `DELETE /api/v1/feed-group`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeedGroupPayload {
    pub feed_id: i64,
    pub group_id: i64,
}
