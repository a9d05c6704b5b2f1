//! Selected areas and their shared y-axis ceiling.
//!
//! `max_value` is the largest stacked per-period total across every
//! selected area. Adding or updating an area can only raise it, so those
//! paths update it incrementally. Removing an area may take away the only
//! source of the current maximum, so removal recomputes it from scratch.

use ocm_core::area::AreaInfo;
use ocm_core::period::PeriodData;
use ocm_data::processing::process_period_data;
use ocm_data::series::ChartSeries;
use serde::Serialize;
use std::collections::BTreeMap;

/// One selected area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaEntry {
    pub info: AreaInfo,
    pub series: ChartSeries,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaAggregationStore {
    areas: BTreeMap<String, AreaEntry>,
    max_value: f64,
}

impl AreaAggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn get(&self, code: &str) -> Option<&AreaEntry> {
        self.areas.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.areas.contains_key(code)
    }

    pub fn codes(&self) -> Vec<String> {
        self.areas.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AreaEntry)> {
        self.areas.iter().map(|(code, entry)| (code.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Insert `code`, replacing any existing entry for it.
    pub fn add_or_replace_area(mut self, code: &str, info: AreaInfo, data: &PeriodData) -> Self {
        let processed = process_period_data(data, self.max_value);
        let replaced = self
            .areas
            .insert(
                code.to_string(),
                AreaEntry {
                    info,
                    series: processed.series,
                },
            )
            .is_some();
        self.max_value = processed.max_value;
        log::info!(
            "{} area {} ({} selected, max value {})",
            if replaced { "Replaced" } else { "Added" },
            code,
            self.areas.len(),
            self.max_value
        );
        self
    }

    /// Replace the series of an existing area, keeping its metadata.
    ///
    /// Unknown codes are ignored: a refresh may legitimately complete after
    /// the user deselected the area.
    pub fn update_area_data(mut self, code: &str, data: &PeriodData) -> Self {
        let Some(entry) = self.areas.get_mut(code) else {
            log::debug!("Ignoring data update for unselected area {}", code);
            return self;
        };
        let processed = process_period_data(data, self.max_value);
        entry.series = processed.series;
        self.max_value = processed.max_value;
        log::debug!("Updated area {} (max value {})", code, self.max_value);
        self
    }

    /// Remove `code` and recompute `max_value` over the remaining areas.
    pub fn remove_area(mut self, code: &str) -> Self {
        if self.areas.remove(code).is_none() {
            log::debug!("Remove requested for unselected area {}", code);
        }
        self.max_value = self.recompute_max();
        log::info!(
            "Removed area {} ({} selected, max value {})",
            code,
            self.areas.len(),
            self.max_value
        );
        self
    }

    /// Zero `max_value` ahead of a batch of [`update_area_data`](Self::update_area_data)
    /// calls so the batch is not floored by a stale maximum.
    pub fn reset_max_value(mut self) -> Self {
        self.max_value = 0.0;
        self
    }

    /// Set `max_value` from the current entries.
    ///
    /// Closes a reset batch in which some entries kept their old series.
    pub fn rebuild_max_value(mut self) -> Self {
        self.max_value = self.recompute_max();
        log::debug!("Rebuilt max value {}", self.max_value);
        self
    }

    /// Largest stacked total over all entries, from scratch.
    pub fn recompute_max(&self) -> f64 {
        self.areas
            .values()
            .map(|entry| entry.series.max_total())
            .fold(0.0, f64::max)
    }
}
