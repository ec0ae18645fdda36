// Grapevine client facade
//
// One async method per logical operation. Each call expands a path
// template, takes a snapshot of the stored credentials, issues a single
// request and interprets the status. Anything but 200 maps to the
// operation's sentinel (empty list, `false`, or `()` plus an error log);
// `Err` is reserved for transport faults and malformed 200 bodies.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use grapevine_api::paths;
use grapevine_api::types::{
    AddFeedPayload, AddGroupPayload, FeedGroupPayload, FeedResponse, FeedsEnvelope, GroupsEnvelope,
    ItemResponse, ItemStatusPayload, ItemsStatusPayload,
};
use grapevine_api::{
    Credentials, Error, HttpClient, ItemFlag, ReqwestTransport, Transport, TransportConfig,
};

use crate::convert;
use crate::model::{Feed, Group, Item};

/// Outcome of checking a username/password pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// `200` with `verification: true`.
    Verified,
    /// `200`, but the server did not confirm the credentials.
    Rejected,
    /// The server answered with a non-200 status.
    Unavailable { status: u16 },
}

impl Verification {
    pub fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// Async client for a Grapevine instance.
///
/// Credentials live behind an [`ArcSwapOption`]: every operation loads one
/// snapshot up front, so a concurrent [`authenticate`](Self::authenticate)
/// is observed either entirely or not at all. Until the first successful
/// `authenticate`, requests go out without an `Authorization` header.
pub struct GrapevineClient<T = ReqwestTransport> {
    endpoint: String,
    http: HttpClient<T>,
    credentials: ArcSwapOption<Credentials>,
}

impl GrapevineClient<ReqwestTransport> {
    /// Client over `reqwest` with the default [`TransportConfig`].
    pub fn new(endpoint: &str) -> Result<Self, Error> {
        Self::with_config(endpoint, &TransportConfig::default())
    }

    pub fn with_config(endpoint: &str, config: &TransportConfig) -> Result<Self, Error> {
        Self::with_transport(endpoint, ReqwestTransport::new(config)?)
    }
}

impl<T: Transport> GrapevineClient<T> {
    /// Client over any [`Transport`].
    ///
    /// `endpoint` is the instance root (e.g. `https://rss.example.org`);
    /// a trailing slash is ignored.
    pub fn with_transport(endpoint: &str, transport: T) -> Result<Self, Error> {
        let base = Url::parse(endpoint)?;
        Ok(Self {
            endpoint: base.as_str().trim_end_matches('/').to_owned(),
            http: HttpClient::new(transport),
            credentials: ArcSwapOption::empty(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        self.http.transport()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.load().is_some()
    }

    /// Username of the stored credentials, if any.
    pub fn username(&self) -> Option<String> {
        self.credentials
            .load()
            .as_deref()
            .map(|creds| creds.username().to_owned())
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        paths::join(&self.endpoint, path)
    }

    fn session(&self) -> Option<Arc<Credentials>> {
        self.credentials.load_full()
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Check a username/password pair without storing it.
    ///
    /// `GET /api/v1/account/verify`
    pub async fn verify(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Verification, Error> {
        let creds = Arc::new(Credentials::new(username, password.clone()));
        self.check(creds).await
    }

    /// Verify the credentials and, on success, use them for every later call.
    ///
    /// Returns `false` both for rejected credentials and for a non-200
    /// answer; previously stored credentials are kept in either case.
    /// Use [`verify`](Self::verify) to tell the two apart.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<bool, Error> {
        let creds = Arc::new(Credentials::new(username, password.clone()));
        let verification = self.check(Arc::clone(&creds)).await?;

        if verification.is_verified() {
            self.credentials.store(Some(creds));
            debug!(username, "authenticated");
            return Ok(true);
        }

        debug!(username, ?verification, "authentication failed");
        Ok(false)
    }

    async fn check(&self, creds: Arc<Credentials>) -> Result<Verification, Error> {
        let url = self.url(paths::VERIFY)?;
        let response = self.http.get(url, Some(creds)).await?;

        if !response.is_ok() {
            warn!(
                status = response.status,
                "verification endpoint returned an error"
            );
            return Ok(Verification::Unavailable {
                status: response.status,
            });
        }

        let verified = response.data.get("verification").and_then(Value::as_bool);
        Ok(if verified == Some(true) {
            Verification::Verified
        } else {
            Verification::Rejected
        })
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// GET a path and decode the body, or `None` on a non-200 status.
    async fn fetch<W: DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
    ) -> Result<Option<W>, Error> {
        let response = self.http.get(self.url(path)?, self.session()).await?;

        if !response.is_ok() {
            warn!(status = response.status, "unable to retrieve {what}");
            return Ok(None);
        }

        response.json().map(Some)
    }

    /// `GET /api/v1/group`
    pub async fn all_groups(&self) -> Result<Vec<Group>, Error> {
        Ok(self
            .fetch::<Vec<Group>>(paths::GROUPS, "groups")
            .await?
            .unwrap_or_default())
    }

    /// `GET /api/v1/feed`
    pub async fn all_feeds(&self) -> Result<Vec<Feed>, Error> {
        Ok(self
            .fetch::<Vec<FeedResponse>>(paths::FEEDS, "feeds")
            .await?
            .map(|wire| wire.iter().map(convert::feed).collect())
            .unwrap_or_default())
    }

    /// `GET /api/v1/group/{id}/feeds`
    pub async fn feeds_for_group(&self, group_id: i64) -> Result<Vec<Feed>, Error> {
        let path = paths::with_id(paths::FEEDS_IN_GROUP, group_id);
        Ok(self
            .fetch::<FeedsEnvelope>(&path, "feeds for group")
            .await?
            .map(|wire| wire.feeds.iter().map(convert::feed).collect())
            .unwrap_or_default())
    }

    /// `GET /api/v1/feed/{id}/groups`
    pub async fn groups_for_feed(&self, feed_id: i64) -> Result<Vec<Group>, Error> {
        let path = paths::with_id(paths::GROUPS_FOR_FEED, feed_id);
        Ok(self
            .fetch::<GroupsEnvelope>(&path, "groups for feed")
            .await?
            .map(|wire| wire.groups)
            .unwrap_or_default())
    }

    /// `GET /api/v1/items/feed/{id}{flags}`
    ///
    /// An empty `flags` slice leaves filtering to the server's default.
    pub async fn items_for_feed(
        &self,
        feed_id: i64,
        flags: &[ItemFlag],
    ) -> Result<Vec<Item>, Error> {
        let path = paths::with_flags(&paths::with_id(paths::FEED_ITEMS, feed_id), flags);
        self.fetch_items(&path).await
    }

    /// `GET /api/v1/items{flags}`
    pub async fn items(&self, flags: &[ItemFlag]) -> Result<Vec<Item>, Error> {
        let path = paths::with_flags(paths::ITEMS, flags);
        self.fetch_items(&path).await
    }

    async fn fetch_items(&self, path: &str) -> Result<Vec<Item>, Error> {
        Ok(self
            .fetch::<Vec<ItemResponse>>(path, "items")
            .await?
            .map(|wire| wire.iter().map(convert::item).collect())
            .unwrap_or_default())
    }

    // ── Item status ──────────────────────────────────────────────────

    /// `POST /api/v1/item/{id}/status`
    ///
    /// A non-200 answer is only logged.
    pub async fn set_item_status(&self, item_id: i64, status: ItemFlag) -> Result<(), Error> {
        let url = self.url(&paths::with_id(paths::ITEM_STATUS, item_id))?;
        let response = self
            .http
            .post(url, self.session(), &ItemStatusPayload { flag: status })
            .await?;

        if !response.is_ok() {
            error!(item_id, %status, status_code = response.status, "unable to set item status");
        }
        Ok(())
    }

    /// `PATCH /api/v1/items/status`
    ///
    /// A non-200 answer is only logged.
    pub async fn set_items_status(&self, item_ids: &[i64], status: ItemFlag) -> Result<(), Error> {
        let url = self.url(paths::ITEMS_STATUS)?;
        let payload = ItemsStatusPayload {
            flag: status,
            ids: item_ids,
        };
        let response = self.http.patch(url, self.session(), &payload).await?;

        if !response.is_ok() {
            error!(
                count = item_ids.len(),
                %status,
                status_code = response.status,
                "unable to set items status"
            );
        }
        Ok(())
    }

    // ── Feeds & groups ───────────────────────────────────────────────

    /// `POST /api/v1/feed`
    pub async fn add_feed(&self, title: &str, feed_url: &str) -> Result<bool, Error> {
        let url = self.url(paths::FEEDS)?;
        let payload = AddFeedPayload {
            title,
            url: feed_url,
        };
        let response = self.http.post(url, self.session(), &payload).await?;

        if !response.is_ok() {
            error!(
                status_code = response.status,
                feed_url,
                "unable to add feed"
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// `DELETE /api/v1/feed/{id}`
    ///
    /// A non-200 answer is only logged.
    pub async fn delete_feed(&self, feed_id: i64) -> Result<(), Error> {
        let url = self.url(&paths::with_id(paths::FEED_WITH_ID, feed_id))?;
        let response = self.http.delete(url, self.session()).await?;

        if !response.is_ok() {
            error!(
                feed_id,
                status_code = response.status,
                "unable to delete feed"
            );
        }
        Ok(())
    }

    /// `POST /api/v1/group`
    pub async fn add_group(&self, name: &str) -> Result<bool, Error> {
        let url = self.url(paths::GROUPS)?;
        let response = self
            .http
            .post(url, self.session(), &AddGroupPayload { name })
            .await?;

        if !response.is_ok() {
            error!(status_code = response.status, name, "unable to add group");
            return Ok(false);
        }
        Ok(true)
    }

    // ── Feed-group membership ────────────────────────────────────────

    /// `POST /api/v1/feed-group`
    pub async fn add_feed_to_group(&self, feed_id: i64, group_id: i64) -> Result<bool, Error> {
        let url = self.url(paths::FEED_GROUP)?;
        let payload = FeedGroupPayload { feed_id, group_id };
        let response = self.http.post(url, self.session(), &payload).await?;

        if !response.is_ok() {
            error!(
                feed_id,
                group_id,
                status_code = response.status,
                "unable to add feed to group"
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// `DELETE /api/v1/feed-group` with the membership in the body.
    pub async fn remove_feed_from_group(&self, feed_id: i64, group_id: i64) -> Result<bool, Error> {
        let url = self.url(paths::FEED_GROUP)?;
        let payload = FeedGroupPayload { feed_id, group_id };
        let response = self
            .http
            .delete_with_body(url, self.session(), &payload)
            .await?;

        if !response.is_ok() {
            error!(
                feed_id,
                group_id,
                status_code = response.status,
                "unable to remove feed from group"
            );
            return Ok(false);
        }
        Ok(true)
    }
}
