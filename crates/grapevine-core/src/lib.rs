//! Typed async client for the Grapevine RSS aggregation service.
//!
//! - **[`GrapevineClient`]** — Facade with one method per logical
//!   operation. [`authenticate()`](GrapevineClient::authenticate) verifies
//!   and stores Basic-Auth credentials; every later call reads a consistent
//!   snapshot of them. Non-200 responses come back as empty lists, `false`,
//!   or `()` plus a log line; only transport faults surface as `Err`.
//!
//! - **Domain model** ([`model`]) — Client-facing [`Feed`], [`Group`] and
//!   [`Item`] types. They serialize in camelCase and omit absent optional
//!   fields.
//!
//! - **Conversions** ([`convert`]) — Pure functions from `grapevine_api`
//!   wire types into the domain model.

pub mod client;
pub mod convert;
pub mod model;

pub use client::{GrapevineClient, Verification};
pub use model::{Feed, Group, Item, ItemFeed, ItemImage};

// Re-export the transport surface so most callers need only this crate.
pub use grapevine_api::{
    Credentials, Error, ItemFlag, ReqwestTransport, TlsMode, Transport, TransportConfig,
};
