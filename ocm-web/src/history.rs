use log::warn;
use ocm_sync::UrlHistory;
use wasm_bindgen::JsValue;

/// The browser address bar. Updates use `replaceState`, so they never add
/// a back-button entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHistory;

/// Relative URL for `query`: `?query`, or just the path when empty.
pub fn relative_url(pathname: &str, query: &str) -> String {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{query}")
    }
}

impl UrlHistory for BrowserHistory {
    fn search(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default()
    }

    fn replace(&self, query: &str) {
        let Some(window) = web_sys::window() else {
            warn!("No window, cannot update the URL");
            return;
        };
        let pathname = window.location().pathname().unwrap_or_default();
        let url = relative_url(&pathname, query);
        let result = window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&url)));
        if let Err(e) = result {
            warn!("Failed to replace URL with {}: {:?}", url, e);
        }
    }
}
