//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! The page owns the Leaflet map (`window.ocmMap` by default) and defines
//! three render hooks as globals:
//!
//! - `ocmRenderGeometries(featureCollection, styles)` where `styles` maps an
//!   area code to its fill colour
//! - `ocmRenderCharts(payload)` with `{areaScale, maxValue, areas: [...]}`
//! - `ocmShowNotice(message)`
//!
//! Everything crosses the boundary as JSON literals, so no escaping beyond
//! `serde_json` is needed.

use log::warn;
use ocm_core::bounds::{GeoBounds, LngLat};
use ocm_core::geometry::FeatureCollection;
use ocm_core::projection::Projection;
use ocm_store::{AppState, FeatureStyle};
use ocm_sync::MapWidget;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('OCM JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Wrap `expr` so it evaluates to its JSON text, or `null` on error.
pub fn json_expression(expr: &str) -> String {
    format!(
        "(function() {{ try {{ return JSON.stringify({}); }} catch(e) {{ console.warn('OCM JS call failed:', e); return null; }} }})()",
        expr
    )
}

/// Evaluate `expr` and deserialize its JSON form.
pub fn eval_json<T: DeserializeOwned>(expr: &str) -> Option<T> {
    let value = js_sys::eval(&json_expression(expr)).ok()?;
    let text = value.as_string()?;
    serde_json::from_str(&text).ok()
}

/// A JS literal for any serializable value.
pub fn js_literal<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Fill colour per selected area code.
pub fn feature_styles(state: &AppState) -> BTreeMap<String, &'static str> {
    let Some(geometries) = &state.map.geometries else {
        return BTreeMap::new();
    };
    geometries
        .features
        .iter()
        .filter_map(|feature| match state.feature_style(&feature.properties.code) {
            FeatureStyle::Selected(colour) => Some((feature.properties.code.clone(), colour)),
            FeatureStyle::Default => None,
        })
        .collect()
}

pub fn geometries_script(
    geometries: &FeatureCollection,
    styles: &BTreeMap<String, &'static str>,
) -> String {
    format!(
        "if (window.ocmRenderGeometries) {{ window.ocmRenderGeometries({}, {}); }}",
        js_literal(geometries),
        js_literal(styles)
    )
}

/// Chart payload: every selected area with its series, the shared y-axis
/// maximum and the number of charts per row.
pub fn charts_payload(state: &AppState) -> Value {
    let areas: Vec<Value> = state
        .areas
        .iter()
        .map(|(code, entry)| {
            json!({
                "code": code,
                "name": entry.info.name,
                "resolution": entry.info.resolution,
                "labels": entry.series.labels,
                "datasets": entry.series.datasets,
            })
        })
        .collect();
    json!({
        "areaScale": state.global.area_scale,
        "maxValue": state.areas.max_value(),
        "areas": areas,
    })
}

pub fn render_geometries(state: &AppState) {
    if let Some(geometries) = &state.map.geometries {
        call_js(&geometries_script(geometries, &feature_styles(state)));
    }
}

pub fn render_charts(state: &AppState) {
    call_js(&format!(
        "if (window.ocmRenderCharts) {{ window.ocmRenderCharts({}); }}",
        js_literal(&charts_payload(state))
    ));
}

pub fn show_notice(message: &str) {
    call_js(&format!(
        "if (window.ocmShowNotice) {{ window.ocmShowNotice({0}); }} else {{ console.warn({0}); }}",
        js_literal(message)
    ));
}

/// The Leaflet map living at a global JS expression.
#[derive(Debug, Clone)]
pub struct LeafletMap {
    handle: String,
}

impl Default for LeafletMap {
    fn default() -> Self {
        Self::new("window.ocmMap")
    }
}

impl LeafletMap {
    pub fn new(handle: &str) -> Self {
        Self {
            handle: handle.to_string(),
        }
    }

    pub fn bounds_expression(&self) -> String {
        format!(
            "(function(b) {{ return [b.getWest(), b.getSouth(), b.getEast(), b.getNorth()]; }})({}.getBounds())",
            self.handle
        )
    }
}

impl Projection for LeafletMap {
    fn container_point_to_lng_lat(&self, x: f64, y: f64) -> Option<LngLat> {
        let point = eval_json(&format!("{}.containerPointToLatLng([{}, {}])", self.handle, x, y));
        if point.is_none() {
            warn!("Could not project container point ({}, {})", x, y);
        }
        point
    }
}

impl MapWidget for LeafletMap {
    fn zoom(&self) -> u32 {
        eval_json::<f64>(&format!("{}.getZoom()", self.handle))
            .map(|zoom| zoom.round().max(0.0) as u32)
            .unwrap_or_else(|| {
                warn!("Could not read map zoom");
                0
            })
    }

    fn bounds(&self) -> GeoBounds {
        eval_json::<[f64; 4]>(&self.bounds_expression())
            .and_then(|rect| GeoBounds::from_rect(rect).ok())
            .unwrap_or_else(|| {
                warn!("Could not read map bounds, assuming the whole world");
                GeoBounds {
                    min_lng: -180.0,
                    min_lat: -85.0,
                    max_lng: 180.0,
                    max_lat: 85.0,
                }
            })
    }

    fn center(&self) -> LngLat {
        eval_json(&format!("{}.getCenter()", self.handle)).unwrap_or_else(|| {
            warn!("Could not read map centre");
            LngLat::new(0.0, 0.0)
        })
    }

    fn fit_bounds(&self, bounds: &GeoBounds) {
        call_js(&format!(
            "{}.fitBounds([[{}, {}], [{}, {}]]);",
            self.handle, bounds.min_lat, bounds.min_lng, bounds.max_lat, bounds.max_lng
        ));
    }

    fn fly_to(&self, center: LngLat, zoom: u32) {
        call_js(&format!(
            "{}.flyTo([{}, {}], {});",
            self.handle, center.lat, center.lng, zoom
        ));
    }
}
