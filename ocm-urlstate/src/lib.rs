//! Shareable URL state.
//!
//! The dashboard mirrors part of its state into the address bar so a view
//! can be bookmarked or sent to someone else. This crate converts between
//! that query string and a flat [`ShareableState`], and from there into
//! typed [`UrlParams`].
//!
//! The functions here are pure: they take the current query and return a new
//! one. Writing it back to the browser is up to the caller.
//!
//! # Usage
//!
//! ```rust
//! use ocm_urlstate::{decode, encode, keys, remove, ShareableState};
//!
//! let raw = encode(&ShareableState::new().with(keys::AREAS, "456"), "?a=123&start=2010");
//! assert_eq!(decode(&raw).get_list(keys::AREAS), &["123", "456"]);
//!
//! let raw = remove(&ShareableState::new().with(keys::AREAS, "123"), &raw);
//! assert_eq!(raw, "a=456&start=2010");
//! ```

pub mod codec;
pub mod keys;
pub mod params;
pub mod state;

pub use codec::{decode, encode, remove, to_query};
pub use params::{UrlParams, UrlStateError};
pub use state::{ShareableState, UrlValue};
