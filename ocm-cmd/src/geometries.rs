use ocm_core::api::ApiClient;
use ocm_core::config::MapConfig;
use ocm_core::projection::WebMercator;
use ocm_store::{Action, AppState, Store};
use ocm_sync::headless::{HeadlessMap, MemoryHistory};
use ocm_sync::{initial_view, Synchronizer, UrlHistory};
use ocm_urlstate::UrlParams;

/// Fetch the geometry collection for the view stored in `query`.
pub async fn run_geometries(
    query: &str,
    width: f64,
    height: f64,
    config: MapConfig,
) -> anyhow::Result<()> {
    let params = UrlParams::from_query(query, &config);
    let (center, zoom) = initial_view(&params, &config);
    let map = HeadlessMap::new(WebMercator::new(center, zoom, width, height), config.max_zoom);
    let store = Store::new(AppState::new(&config));
    if let Some(resolution) = params.resolution {
        store.dispatch(Action::SetResolution(resolution));
    }
    let sync = Synchronizer::new(
        ApiClient::new(config.clone()),
        map,
        MemoryHistory::new(query),
        store,
        config,
    );

    sync.on_move_end().await?;

    let state = sync.store().snapshot();
    match (&state.map.coverage, &state.map.geometries) {
        (Some(region), Some(geometries)) => {
            println!(
                "{} features at zoom {} level {}",
                geometries.len(),
                region.zoom,
                region.resolution
            );
            println!("{}", serde_json::to_string(region)?);
        }
        _ => println!("No geometries returned"),
    }
    println!("?{}", sync.history().search());
    Ok(())
}
