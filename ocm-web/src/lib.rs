//! Browser side of the open carbon map dashboard.
//!
//! This crate provides:
//! - `dashboard`: the `Dashboard` object exported to the page script
//! - `js_bridge`: Leaflet map and chart hooks via `js_sys::eval()`
//! - `history`: the address bar as a `UrlHistory`
//! - `logger`: a `log` backend for the browser console

pub mod dashboard;
pub mod history;
pub mod js_bridge;
pub mod logger;

pub use dashboard::Dashboard;
