//! The object the page script talks to.
//!
//! Typical page wiring:
//!
//! ```text
//! const dashboard = new Dashboard(configJson);
//! const view = JSON.parse(dashboard.initialView());
//! window.ocmMap = L.map('map').setView([view.lat, view.lng], view.zoom);
//! window.ocmMap.on('moveend', () => dashboard.moveEnd());
//! dashboard.start();
//! ```

use crate::history::BrowserHistory;
use crate::js_bridge::{render_charts, render_geometries, show_notice, LeafletMap};
use log::{info, LevelFilter};
use ocm_core::api::ApiClient;
use ocm_core::config::MapConfig;
use ocm_core::resolution::ResolutionLevel;
use ocm_store::{AppState, Store};
use ocm_sync::{initial_view, Notice, Synchronizer, UrlHistory};
use ocm_urlstate::UrlParams;
use serde_json::json;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

type BrowserSync = Synchronizer<ApiClient, LeafletMap, BrowserHistory>;

struct Inner {
    sync: BrowserSync,
    /// Redraw counter and selection of the last geometry render
    rendered: RefCell<Option<(u64, Vec<String>)>>,
}

impl Inner {
    fn render(&self) {
        let state = self.sync.store().snapshot();
        let key = (state.map.redraw_counter, state.areas.codes());
        if self.rendered.borrow().as_ref() != Some(&key) {
            render_geometries(&state);
            *self.rendered.borrow_mut() = Some(key);
        }
        render_charts(&state);
    }

    fn report(&self, outcome: Result<(), Notice>) {
        if let Err(notice) = outcome {
            show_notice(&notice.message);
        }
        self.render();
    }
}

#[wasm_bindgen]
pub struct Dashboard {
    inner: Rc<Inner>,
}

impl Dashboard {
    fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(Rc<Inner>) -> Fut + 'static,
        Fut: Future<Output = Result<(), Notice>> + 'static,
    {
        let inner = Rc::clone(&self.inner);
        spawn_local(async move {
            let outcome = task(Rc::clone(&inner)).await;
            inner.report(outcome);
        });
    }
}

#[wasm_bindgen]
impl Dashboard {
    /// Build the dashboard from a JSON `MapConfig` (empty string for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Dashboard, JsValue> {
        if crate::logger::init(LevelFilter::Info).is_err() {
            log::debug!("Console logger already installed");
        }
        let config = if config_json.trim().is_empty() {
            MapConfig::default()
        } else {
            MapConfig::from_json_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        info!("Starting dashboard against '{}'", config.api_url);

        let store = Store::new(AppState::new(&config));
        let sync = Synchronizer::new(
            ApiClient::new(config.clone()),
            LeafletMap::default(),
            BrowserHistory,
            store,
            config,
        );
        Ok(Dashboard {
            inner: Rc::new(Inner {
                sync,
                rendered: RefCell::new(None),
            }),
        })
    }

    /// `{lat, lng, zoom}` to open the map at, as JSON.
    #[wasm_bindgen(js_name = initialView)]
    pub fn initial_view(&self) -> String {
        let sync = &self.inner.sync;
        let params = UrlParams::from_query(&sync.history().search(), sync.config());
        let (center, zoom) = initial_view(&params, sync.config());
        json!({"lat": center.lat, "lng": center.lng, "zoom": zoom}).to_string()
    }

    /// Restore the URL state, then load geometries for the initial view.
    pub fn start(&self) {
        self.spawn(|inner| async move {
            let restored = inner.sync.restore().await;
            let moved = inner.sync.on_move_end().await;
            restored.and(moved)
        });
    }

    #[wasm_bindgen(js_name = moveEnd)]
    pub fn move_end(&self) {
        self.spawn(|inner| async move { inner.sync.on_move_end().await });
    }

    #[wasm_bindgen(js_name = toggleArea)]
    pub fn toggle_area(&self, code: String) {
        self.spawn(|inner| async move { inner.sync.toggle_area(&code).await });
    }

    #[wasm_bindgen(js_name = setTimeRange)]
    pub fn set_time_range(&self, start: i32, end: i32) {
        self.spawn(move |inner| async move { inner.sync.set_time_range(start, end).await });
    }

    /// Returns false when `level` is not a valid resolution level.
    #[wasm_bindgen(js_name = setResolution)]
    pub fn set_resolution(&self, level: i32) -> bool {
        let Ok(resolution) = ResolutionLevel::try_from(i64::from(level)) else {
            log::warn!("Ignoring unknown resolution level {}", level);
            return false;
        };
        self.spawn(move |inner| async move {
            inner.sync.set_resolution(resolution).await.map(|_| ())
        });
        true
    }

    #[wasm_bindgen(js_name = setAreaScale)]
    pub fn set_area_scale(&self, scale: u32) {
        self.inner.sync.set_area_scale(scale);
        self.inner.render();
    }

    #[wasm_bindgen(js_name = zoomToArea)]
    pub fn zoom_to_area(&self, code: String) {
        self.spawn(|inner| async move { inner.sync.zoom_to_area(&code).await });
    }

    #[wasm_bindgen(js_name = goToLocation)]
    pub fn go_to_location(&self, location: String) {
        self.spawn(|inner| async move { inner.sync.go_to_location(&location).await });
    }

    /// Serialized state, for debugging from the console.
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.inner.sync.store().snapshot()).unwrap_or_default()
    }
}
