//! Data processing for area emissions.
//!
//! This crate turns the raw per-period records returned by the backend
//! into stacked bar chart series and keeps track of the largest stacked
//! total, which every chart shares as its y-axis ceiling.

/// Chart-ready series.
pub mod series {
    use ocm_core::period::EnergyRecord;
    use serde::{Deserialize, Serialize};

    /// One stacked component of the emissions chart.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum Component {
        Gas,
        Electricity,
    }

    impl Component {
        /// Stacking order: gas at the bottom, electricity on top.
        pub const ALL: [Component; 2] = [Component::Gas, Component::Electricity];

        pub fn label(self) -> &'static str {
            match self {
                Component::Gas => "Gas",
                Component::Electricity => "Elec",
            }
        }

        pub fn colour(self) -> &'static str {
            match self {
                Component::Gas => "#f44336",
                Component::Electricity => "rgb(54, 162, 235)",
            }
        }

        pub fn value(self, record: &EnergyRecord) -> Option<f64> {
            match self {
                Component::Gas => record.gas,
                Component::Electricity => record.electricity,
            }
        }
    }

    /// Values of one component, aligned with [`ChartSeries::labels`].
    /// `None` marks a period with no data, which is distinct from zero.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Dataset {
        pub label: String,
        #[serde(rename = "backgroundColor")]
        pub colour: String,
        pub data: Vec<Option<f64>>,
    }

    /// Period labels plus one dataset per component.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct ChartSeries {
        pub labels: Vec<String>,
        pub datasets: Vec<Dataset>,
    }

    impl ChartSeries {
        /// Stacked total per period, counting only present values.
        pub fn period_totals(&self) -> Vec<f64> {
            (0..self.labels.len())
                .map(|i| {
                    self.datasets
                        .iter()
                        .filter_map(|d| d.data.get(i).copied().flatten())
                        .sum()
                })
                .collect()
        }

        /// Largest stacked total over all periods, or 0 for an empty series.
        pub fn max_total(&self) -> f64 {
            self.period_totals().into_iter().fold(0.0, f64::max)
        }

        pub fn dataset(&self, component: Component) -> Option<&Dataset> {
            self.datasets.iter().find(|d| d.label == component.label())
        }
    }
}

/// Raw records to series.
pub mod processing {
    use crate::series::{ChartSeries, Component, Dataset};
    use ocm_core::period::PeriodData;

    /// Output of [`process_period_data`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct ProcessedData {
        pub series: ChartSeries,
        /// Never below the `current_max` passed in
        pub max_value: f64,
    }

    /// Build the chart series for one area and raise `current_max` to the
    /// largest stacked total found in `data`.
    ///
    /// Periods keep the order they arrived in. A missing component stays
    /// `None` in its dataset and contributes nothing to the total.
    pub fn process_period_data(data: &PeriodData, current_max: f64) -> ProcessedData {
        let labels = data.iter().map(|(period, _)| period.to_string()).collect();
        let datasets = Component::ALL
            .iter()
            .map(|&component| Dataset {
                label: component.label().to_string(),
                colour: component.colour().to_string(),
                data: data
                    .iter()
                    .map(|(_, record)| component.value(record))
                    .collect(),
            })
            .collect();
        let max_value = data
            .iter()
            .map(|(_, record)| record.total())
            .fold(current_max, f64::max);

        log::debug!(
            "Processed {} periods, max value {} (was {})",
            data.len(),
            max_value,
            current_max
        );

        ProcessedData {
            series: ChartSeries { labels, datasets },
            max_value,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::series::Component;
        use ocm_core::period::EnergyRecord;

        fn sample() -> PeriodData {
            vec![
                ("2012", EnergyRecord::new(Some(10.0), Some(5.0))),
                ("2010", EnergyRecord::new(None, Some(7.0))),
                ("2011", EnergyRecord::new(Some(3.0), Some(30.0))),
            ]
            .into_iter()
            .collect()
        }

        #[test]
        fn test_labels_keep_input_order() {
            let processed = process_period_data(&sample(), 0.0);
            assert_eq!(processed.series.labels, vec!["2012", "2010", "2011"]);
        }

        #[test]
        fn test_missing_component_is_not_zero() {
            let processed = process_period_data(&sample(), 0.0);
            let gas = processed.series.dataset(Component::Gas).unwrap();
            assert_eq!(gas.data, vec![Some(10.0), None, Some(3.0)]);
            let elec = processed.series.dataset(Component::Electricity).unwrap();
            assert_eq!(elec.data, vec![Some(5.0), Some(7.0), Some(30.0)]);
        }

        #[test]
        fn test_max_is_largest_stacked_total() {
            let processed = process_period_data(&sample(), 0.0);
            assert_eq!(processed.max_value, 33.0);
            assert_eq!(processed.series.period_totals(), vec![15.0, 7.0, 33.0]);
        }

        #[test]
        fn test_max_never_drops_below_floor() {
            let processed = process_period_data(&sample(), 100.0);
            assert_eq!(processed.max_value, 100.0);
        }

        #[test]
        fn test_primary_only_period_counts_present_value() {
            let data: PeriodData = vec![("2010", EnergyRecord::new(None, Some(42.0)))]
                .into_iter()
                .collect();
            let processed = process_period_data(&data, 0.0);
            assert_eq!(processed.max_value, 42.0);
            assert_eq!(
                processed.series.dataset(Component::Gas).unwrap().data,
                vec![None]
            );
        }

        #[test]
        fn test_empty_input() {
            let processed = process_period_data(&PeriodData::new(), 12.0);
            assert!(processed.series.labels.is_empty());
            assert_eq!(processed.series.datasets.len(), 2);
            assert_eq!(processed.max_value, 12.0);
        }

        #[test]
        fn test_series_json_shape() {
            let processed = process_period_data(&sample(), 0.0);
            let json = serde_json::to_value(&processed.series).unwrap();
            assert_eq!(json["datasets"][0]["label"], "Gas");
            assert_eq!(json["datasets"][0]["backgroundColor"], "#f44336");
            assert!(json["datasets"][0]["data"][1].is_null());
        }
    }
}
