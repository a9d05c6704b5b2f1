//! Shareable URL inspection and editing.

use anyhow::Context;
use ocm_core::config::MapConfig;
use ocm_urlstate::{decode, encode, remove, ShareableState, UrlParams};

fn parse_pairs(pairs: &[String]) -> anyhow::Result<ShareableState> {
    let mut state = ShareableState::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{pair}'"))?;
        if key.is_empty() {
            anyhow::bail!("Empty key in '{pair}'");
        }
        state.push(key, value.to_string());
    }
    Ok(state)
}

/// Apply `set` then `remove` to `query`.
pub fn apply_edits(query: &str, set: &[String], removals: &[String]) -> anyhow::Result<String> {
    let encoded = encode(&parse_pairs(set)?, query);
    Ok(remove(&parse_pairs(removals)?, &encoded))
}

pub fn run_decode_url(query: &str, config: &MapConfig) -> anyhow::Result<()> {
    let state = decode(query);
    println!("{}", serde_json::to_string_pretty(&state)?);
    println!("{:#?}", UrlParams::from_state(&state, config));
    Ok(())
}

pub fn run_encode_url(query: &str, set: &[String], removals: &[String]) -> anyhow::Result<()> {
    println!("?{}", apply_edits(query, set, removals)?);
    Ok(())
}
