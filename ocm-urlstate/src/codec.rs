//! Query-string codec for [`ShareableState`].
//!
//! The wire format is a plain `application/x-www-form-urlencoded` query.
//! Array-valued keys are written as repeated pairs (`a=1&a=2`), keys are
//! emitted in sorted order and a leading `?` on input is ignored.

use crate::keys::is_array_key;
use crate::state::{ShareableState, UrlValue};

/// Parse a raw query string.
///
/// Every array key of the key table is present in the result, as an empty
/// list when the query does not mention it. A scalar key given more than
/// once keeps its last value.
pub fn decode(raw: &str) -> ShareableState {
    let query = raw.trim().trim_start_matches('?');
    let mut state = ShareableState::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        state.push(&key, value.into_owned());
    }
    state.fill_array_keys();
    state
}

/// Merge `partial` into the state held by `raw` and return the new query.
///
/// Scalar keys are overwritten. Array values are appended unless already
/// present. Nothing is ever removed.
pub fn encode(partial: &ShareableState, raw: &str) -> String {
    let mut state = decode(raw);
    for (key, value) in partial.iter() {
        if is_array_key(key) {
            for item in value.values() {
                state.push_unique(key, item);
            }
        } else if let Some(last) = value.values().last() {
            state.insert(key, UrlValue::Scalar(last.clone()));
        }
    }
    to_query(&state)
}

/// Delete entries from the state held by `raw` and return the new query.
///
/// For array keys the first occurrence of each value listed in `keys` is
/// dropped. Scalar keys are dropped whatever value `keys` carries for them.
pub fn remove(keys: &ShareableState, raw: &str) -> String {
    let mut state = decode(raw);
    for (key, value) in keys.iter() {
        if is_array_key(key) {
            for item in value.values() {
                state.remove_value(key, item);
            }
        } else {
            state.remove_key(key);
        }
    }
    to_query(&state)
}

/// Serialize without a leading `?`. Empty lists are omitted.
pub fn to_query(state: &ShareableState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in state.iter() {
        for item in value.values() {
            serializer.append_pair(key, item);
        }
    }
    serializer.finish()
}
