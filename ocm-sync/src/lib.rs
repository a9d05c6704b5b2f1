//! Drives the dashboard: map moves, area selection, time range changes and
//! the shareable URL all go through [`Synchronizer`].
//!
//! The map widget, the address bar and the backend are reached through the
//! traits in [`collaborators`], so the same logic runs in the browser, in
//! the CLI and against in-memory fakes in tests.

pub mod collaborators;
pub mod headless;
pub mod notice;
pub mod synchronizer;

pub use collaborators::{DashboardApi, MapWidget, UrlHistory};
pub use notice::Notice;
pub use synchronizer::{initial_view, Synchronizer};
