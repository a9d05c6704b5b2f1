//! In-memory collaborators for the CLI and tests.

use crate::collaborators::{MapWidget, UrlHistory};
use ocm_core::bounds::{GeoBounds, LngLat};
use ocm_core::projection::{Projection, WebMercator};
use std::cell::{Cell, RefCell};

/// A map widget backed by a [`WebMercator`] viewport.
#[derive(Debug)]
pub struct HeadlessMap {
    view: RefCell<WebMercator>,
    max_zoom: u32,
}

impl HeadlessMap {
    pub fn new(view: WebMercator, max_zoom: u32) -> Self {
        Self {
            view: RefCell::new(view),
            max_zoom,
        }
    }

    pub fn view(&self) -> WebMercator {
        *self.view.borrow()
    }

    pub fn pan_to(&self, center: LngLat) {
        self.view.borrow_mut().center = center;
    }

    pub fn set_zoom(&self, zoom: u32) {
        self.view.borrow_mut().zoom = zoom.min(self.max_zoom);
    }
}

impl Projection for HeadlessMap {
    fn container_point_to_lng_lat(&self, x: f64, y: f64) -> Option<LngLat> {
        self.view.borrow().container_point_to_lng_lat(x, y)
    }
}

impl MapWidget for HeadlessMap {
    fn zoom(&self) -> u32 {
        self.view.borrow().zoom
    }

    fn bounds(&self) -> GeoBounds {
        self.view.borrow().bounds()
    }

    fn center(&self) -> LngLat {
        self.view.borrow().center
    }

    fn fit_bounds(&self, bounds: &GeoBounds) {
        self.view.borrow_mut().fit_bounds(bounds, self.max_zoom);
    }

    fn fly_to(&self, center: LngLat, zoom: u32) {
        let mut view = self.view.borrow_mut();
        view.center = center;
        view.zoom = zoom.min(self.max_zoom);
    }
}

/// Address bar kept in a string.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    query: RefCell<String>,
    replacements: Cell<usize>,
}

impl MemoryHistory {
    pub fn new(query: &str) -> Self {
        Self {
            query: RefCell::new(query.to_string()),
            replacements: Cell::new(0),
        }
    }

    /// Number of times the query has been replaced.
    pub fn replacements(&self) -> usize {
        self.replacements.get()
    }
}

impl UrlHistory for MemoryHistory {
    fn search(&self) -> String {
        self.query.borrow().clone()
    }

    fn replace(&self, query: &str) {
        *self.query.borrow_mut() = query.to_string();
        self.replacements.set(self.replacements.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fly_to_respects_max_zoom() {
        let map = HeadlessMap::new(WebMercator::new(LngLat::new(-3.0, 56.0), 5, 800.0, 600.0), 15);
        map.fly_to(LngLat::new(-2.8, 56.3), 18);
        assert_eq!(map.zoom(), 15);
        assert_eq!(map.center(), LngLat::new(-2.8, 56.3));
    }

    #[test]
    fn test_memory_history_counts_replacements() {
        let history = MemoryHistory::new("?a=1");
        history.replace("a=1&zoom=5");
        assert_eq!(history.search(), "a=1&zoom=5");
        assert_eq!(history.replacements(), 1);
    }
}
