// REST path templates
//
// Every path is relative to the caller-supplied endpoint. `{id}` and
// `{flags}` are replaced literally, first occurrence only; ids are not
// range-checked.

use url::Url;

use crate::error::Error;
use crate::types::ItemFlag;

pub const VERIFY: &str = "/api/v1/account/verify";
pub const GROUPS: &str = "/api/v1/group";
pub const FEED_GROUP: &str = "/api/v1/feed-group";
pub const FEEDS: &str = "/api/v1/feed";
pub const FEED_WITH_ID: &str = "/api/v1/feed/{id}";
pub const FEEDS_IN_GROUP: &str = "/api/v1/group/{id}/feeds";
pub const GROUPS_FOR_FEED: &str = "/api/v1/feed/{id}/groups";
pub const FEED_ITEMS: &str = "/api/v1/items/feed/{id}{flags}";
pub const ITEMS: &str = "/api/v1/items{flags}";
pub const ITEM_STATUS: &str = "/api/v1/item/{id}/status";
pub const ITEMS_STATUS: &str = "/api/v1/items/status";

/// Substitute the `{id}` placeholder.
pub fn with_id(template: &str, id: i64) -> String {
    template.replacen("{id}", &id.to_string(), 1)
}

/// Substitute the `{flags}` placeholder.
pub fn with_flags(template: &str, flags: &[ItemFlag]) -> String {
    template.replacen("{flags}", &flags_segment(flags), 1)
}

/// `""` for no flags, otherwise `/flag1/flag2/...` in the order given.
pub fn flags_segment(flags: &[ItemFlag]) -> String {
    flags.iter().fold(String::new(), |mut segment, flag| {
        segment.push('/');
        segment.push_str(flag.as_ref());
        segment
    })
}

/// Concatenate an endpoint and an expanded path into a URL.
pub fn join(endpoint: &str, path: &str) -> Result<Url, Error> {
    Ok(Url::parse(&format!("{endpoint}{path}"))?)
}
