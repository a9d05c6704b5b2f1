//! Explicit state for the carbon map dashboard.
//!
//! The state tree is a plain value ([`AppState`]) and every change goes
//! through [`action::reduce`], a pure function from the old state and one
//! [`Action`] to the new state. [`Store`] is the single writer that holds
//! the current state and applies actions one at a time.
//!
//! # Architecture
//!
//! - [`global`]: resolution level, time range and charts per row
//! - [`map`]: geometry cache and the coverage region it was fetched for
//! - [`areas`]: selected areas and the shared maximum of their stacked totals
//! - [`action`]: the closed set of transitions and the reducer
//!
//! # Usage
//!
//! ```rust
//! use ocm_core::area::AreaInfo;
//! use ocm_core::period::{EnergyRecord, PeriodData};
//! use ocm_core::resolution::ResolutionLevel;
//! use ocm_store::{Action, Store};
//!
//! let store = Store::default();
//! let data: PeriodData = vec![("2010", EnergyRecord::new(Some(12.0), Some(8.0)))]
//!     .into_iter()
//!     .collect();
//! store.dispatch(Action::AddArea {
//!     code: "S12000047".to_string(),
//!     info: AreaInfo {
//!         name: "Fife".to_string(),
//!         code: "S12000047".to_string(),
//!         kind: "lau1".to_string(),
//!         resolution: ResolutionLevel::LocalAuthority,
//!     },
//!     data,
//! });
//! assert_eq!(store.read(|state| state.areas.max_value()), 20.0);
//! ```

pub mod action;
pub mod areas;
pub mod global;
pub mod map;

pub use action::{reduce, Action};

use areas::AreaAggregationStore;
use global::GlobalState;
use map::MapState;
use ocm_core::config::MapConfig;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// The whole dashboard state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub global: GlobalState,
    pub map: MapState,
    pub areas: AreaAggregationStore,
}

/// How the map should draw one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureStyle {
    Default,
    /// Selected, filled with the current resolution's colour
    Selected(&'static str),
}

impl AppState {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            global: GlobalState::from_config(config),
            map: MapState::default(),
            areas: AreaAggregationStore::new(),
        }
    }

    pub fn feature_style(&self, code: &str) -> FeatureStyle {
        if self.areas.contains(code) {
            FeatureStyle::Selected(self.global.resolution.colour())
        } else {
            FeatureStyle::Default
        }
    }
}

/// Single-writer handle on the current [`AppState`].
///
/// Cheaply cloneable (via `Rc`); clones share the same state. Each
/// [`dispatch`](Store::dispatch) runs the reducer to completion and installs
/// its result in one step, so readers never see a half-applied action.
#[derive(Clone, Default)]
pub struct Store {
    state: Rc<RefCell<AppState>>,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn dispatch(&self, action: Action) {
        log::debug!("Dispatching {}", action.name());
        let mut slot = self.state.borrow_mut();
        let current = std::mem::take(&mut *slot);
        *slot = reduce(current, action);
    }

    /// Run `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocm_core::area::AreaInfo;
    use ocm_core::period::{EnergyRecord, PeriodData};
    use ocm_core::resolution::ResolutionLevel;

    fn add(store: &Store, code: &str, total: f64) {
        let data: PeriodData = vec![("2010", EnergyRecord::new(Some(total), None))]
            .into_iter()
            .collect();
        store.dispatch(Action::AddArea {
            code: code.to_string(),
            info: AreaInfo {
                name: code.to_string(),
                code: code.to_string(),
                kind: "msoa".to_string(),
                resolution: ResolutionLevel::Intermediate,
            },
            data,
        });
    }

    #[test]
    fn test_clones_share_state() {
        let store = Store::default();
        let other = store.clone();
        add(&store, "A", 5.0);
        assert!(other.read(|s| s.areas.contains("A")));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = Store::default();
        let before = store.snapshot();
        add(&store, "A", 5.0);
        assert!(before.areas.is_empty());
        assert_eq!(store.snapshot().areas.len(), 1);
    }

    #[test]
    fn test_feature_style() {
        let store = Store::new(AppState::new(&MapConfig::default()));
        add(&store, "A", 5.0);
        store.dispatch(Action::SetResolution(ResolutionLevel::Intermediate));
        let state = store.snapshot();
        assert_eq!(state.feature_style("A"), FeatureStyle::Selected("#9c27b0"));
        assert_eq!(state.feature_style("B"), FeatureStyle::Default);
    }
}
