//! Offline viewport planning against a Web Mercator view.

use anyhow::Context;
use log::info;
use ocm_core::bounds::LngLat;
use ocm_core::config::MapConfig;
use ocm_core::projection::WebMercator;
use ocm_core::resolution::{resolution_for_zoom, ResolutionLevel};
use ocm_core::viewport::{next_coverage_region, CoverageRegion, ViewportObservation};
use serde::Serialize;

pub struct ViewportArgs {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u32,
    pub width: f64,
    pub height: f64,
    pub resolution: i64,
    pub last: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ViewportPlan {
    pub resolution: ResolutionLevel,
    /// `None` when the last region still covers the view
    pub fetch: Option<CoverageRegion>,
}

pub fn plan_viewport(args: &ViewportArgs, config: &MapConfig) -> anyhow::Result<ViewportPlan> {
    let current = ResolutionLevel::try_from(args.resolution)?;
    let last: Option<CoverageRegion> = args
        .last
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("Invalid --last coverage region")?;

    let zoom = args.zoom.min(config.max_zoom);
    let view = WebMercator::new(LngLat::new(args.lng, args.lat), zoom, args.width, args.height);
    let resolution = resolution_for_zoom(zoom, current, &config.zoom_thresholds);
    let observation = ViewportObservation {
        zoom,
        bounds: view.bounds(),
        resolution,
    };
    let fetch = next_coverage_region(&observation, last.as_ref(), config.pixel_padding, &view);
    Ok(ViewportPlan { resolution, fetch })
}

pub fn run_viewport(args: ViewportArgs, config: &MapConfig) -> anyhow::Result<()> {
    let plan = plan_viewport(&args, config)?;
    if plan.fetch.is_none() {
        info!("No fetch needed");
    }
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
