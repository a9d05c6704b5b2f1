//! Core types shared by every ocm crate: resolution levels, geographic
//! bounds, coverage regions, area metadata, raw period data, and the
//! backend API client (behind the `api` feature).

#[cfg(feature = "api")]
pub mod api;
pub mod area;
pub mod bounds;
pub mod config;
pub mod error;
pub mod geometry;
pub mod period;
pub mod projection;
pub mod resolution;
pub mod viewport;
