//! Typed view of the shareable state.
//!
//! Fields that do not parse or fall outside their valid range are logged
//! and left as `None`, so the caller's default applies.

use crate::codec::decode;
use crate::keys;
use crate::state::ShareableState;
use log::warn;
use ocm_core::config::MapConfig;
use ocm_core::resolution::ResolutionLevel;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UrlStateError {
    #[error("Cannot parse {key}={value}")]
    Unparseable { key: String, value: String },

    #[error("Value out of range: {key}={value}")]
    OutOfRange { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlParams {
    pub areas: Vec<String>,
    pub period_start: Option<i32>,
    pub period_end: Option<i32>,
    pub area_scale: Option<u32>,
    pub resolution: Option<ResolutionLevel>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub zoom: Option<u32>,
}

fn parse_field<T: FromStr>(
    state: &ShareableState,
    key: &str,
    valid: impl Fn(&T) -> bool,
) -> Result<Option<T>, UrlStateError> {
    let Some(raw) = state.get_scalar(key) else {
        return Ok(None);
    };
    let value = raw.trim().parse::<T>().map_err(|_| UrlStateError::Unparseable {
        key: key.to_string(),
        value: raw.to_string(),
    })?;
    if valid(&value) {
        Ok(Some(value))
    } else {
        Err(UrlStateError::OutOfRange {
            key: key.to_string(),
            value: raw.to_string(),
        })
    }
}

fn or_default<T>(result: Result<Option<T>, UrlStateError>) -> Option<T> {
    result.unwrap_or_else(|e| {
        warn!("Ignoring URL parameter: {}", e);
        None
    })
}

impl UrlParams {
    pub fn from_state(state: &ShareableState, config: &MapConfig) -> Self {
        let periods = config.period_min..=config.period_max;
        let in_periods = |v: &i32| periods.contains(v);
        let period_start = or_default(parse_field(state, keys::START, in_periods));
        let period_end = or_default(parse_field(state, keys::END, in_periods));

        // Out-of-range chart scales are clamped rather than dropped
        let area_scale = or_default(parse_field::<i64>(state, keys::ROWGRAPHS, |_| true))
            .map(|v| v.clamp(1, i64::from(config.area_scale_max.max(1))) as u32);

        let resolution = or_default(
            parse_field::<i64>(state, keys::RESOLUTION, |v| ResolutionLevel::try_from(*v).is_ok())
                .map(|v| v.and_then(|v| ResolutionLevel::try_from(v).ok())),
        );

        let lat = or_default(parse_field::<f64>(state, keys::LAT, |v| {
            v.is_finite() && (-90.0..=90.0).contains(v)
        }));
        let lng = or_default(parse_field::<f64>(state, keys::LNG, |v| {
            v.is_finite() && (-180.0..=180.0).contains(v)
        }));
        let zoom = or_default(parse_field::<u32>(state, keys::ZOOM, |v| *v <= config.max_zoom));

        Self {
            areas: state.get_list(keys::AREAS).to_vec(),
            period_start,
            period_end,
            area_scale,
            resolution,
            lat,
            lng,
            zoom,
        }
    }

    pub fn from_query(raw: &str, config: &MapConfig) -> Self {
        Self::from_state(&decode(raw), config)
    }

    /// The set fields as a partial state, suitable for [`crate::encode`].
    pub fn to_state(&self) -> ShareableState {
        let mut state = ShareableState::new();
        for code in &self.areas {
            state.push(keys::AREAS, code.clone());
        }
        let scalars = [
            (keys::START, self.period_start.map(|v| v.to_string())),
            (keys::END, self.period_end.map(|v| v.to_string())),
            (keys::ROWGRAPHS, self.area_scale.map(|v| v.to_string())),
            (keys::RESOLUTION, self.resolution.map(|v| v.level().to_string())),
            (keys::LAT, self.lat.map(|v| v.to_string())),
            (keys::LNG, self.lng.map(|v| v.to_string())),
            (keys::ZOOM, self.zoom.map(|v| v.to_string())),
        ];
        for (key, value) in scalars {
            if let Some(value) = value {
                state.push(key, value);
            }
        }
        state
    }
}
