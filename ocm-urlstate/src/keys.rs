//! The fixed key table of the shareable URL.

/// Selected area codes (array-valued)
pub const AREAS: &str = "a";
pub const START: &str = "start";
pub const END: &str = "end";
/// Charts per row
pub const ROWGRAPHS: &str = "rowgraphs";
/// Resolution level, 1 to 3
pub const RESOLUTION: &str = "g";
pub const LAT: &str = "lat";
pub const LNG: &str = "lng";
pub const ZOOM: &str = "zoom";

pub const ARRAY_KEYS: [&str; 1] = [AREAS];

pub fn is_array_key(key: &str) -> bool {
    ARRAY_KEYS.contains(&key)
}
