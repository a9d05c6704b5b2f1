//! Load the areas of a shareable URL and print or export their series.

use anyhow::Context;
use log::info;
use ocm_core::api::ApiClient;
use ocm_core::config::MapConfig;
use ocm_core::projection::WebMercator;
use ocm_data::series::Component;
use ocm_store::{AppState, Store};
use ocm_sync::headless::{HeadlessMap, MemoryHistory};
use ocm_sync::{initial_view, DashboardApi, Synchronizer};
use ocm_urlstate::UrlParams;
use std::io::Write;

/// Write one row per area and period: `area,period,gas,electricity`.
///
/// Missing component values are left blank.
pub fn write_csv<W: Write>(state: &AppState, writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["area", "period", "gas", "electricity"])?;
    for (code, entry) in state.areas.iter() {
        let series = &entry.series;
        let value = |component: Component, i: usize| -> String {
            series
                .dataset(component)
                .and_then(|dataset| dataset.data.get(i).copied().flatten())
                .map(|v| v.to_string())
                .unwrap_or_default()
        };
        for (i, period) in series.labels.iter().enumerate() {
            wtr.write_record([
                code.to_string(),
                period.clone(),
                value(Component::Gas, i),
                value(Component::Electricity, i),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Restore the areas listed in `query` through `api`.
pub async fn load_areas<A: DashboardApi>(
    api: A,
    query: &str,
    config: MapConfig,
) -> anyhow::Result<AppState> {
    let params = UrlParams::from_query(query, &config);
    let (center, zoom) = initial_view(&params, &config);
    let map = HeadlessMap::new(WebMercator::new(center, zoom, 800.0, 600.0), config.max_zoom);
    let sync = Synchronizer::new(
        api,
        map,
        MemoryHistory::new(query),
        Store::new(AppState::new(&config)),
        config,
    );

    sync.restore().await?;
    let state = sync.store().snapshot();
    info!(
        "Loaded {} of {} areas for {}-{}",
        state.areas.len(),
        params.areas.len(),
        state.global.period_start,
        state.global.period_end
    );
    Ok(state)
}

pub async fn run_areas(query: &str, csv_path: Option<&str>, config: MapConfig) -> anyhow::Result<()> {
    let state = load_areas(ApiClient::new(config.clone()), query, config).await?;

    for (code, entry) in state.areas.iter() {
        println!("{} ({}, level {})", entry.info.name, code, entry.info.resolution);
        for (period, total) in entry.series.labels.iter().zip(entry.series.period_totals()) {
            println!("  {period}: {total}");
        }
    }
    println!("Max value: {}", state.areas.max_value());

    if let Some(path) = csv_path {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {path}"))?;
        write_csv(&state, file)?;
        info!("Wrote area series to {}", path);
    }
    Ok(())
}
