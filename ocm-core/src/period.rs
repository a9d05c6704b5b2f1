//! Raw per-period energy records as returned by the area data endpoint.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Emissions for one period. Either component may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity: Option<f64>,
}

impl EnergyRecord {
    pub fn new(gas: Option<f64>, electricity: Option<f64>) -> Self {
        Self { gas, electricity }
    }

    /// Sum of the components that are present.
    pub fn total(&self) -> f64 {
        self.gas.unwrap_or(0.0) + self.electricity.unwrap_or(0.0)
    }
}

/// Period key to record, in the order the backend sent them.
///
/// Deserializes from a JSON object and keeps document order rather than
/// sorting keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodData(Vec<(String, EnergyRecord)>);

impl PeriodData {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or overwrite a period. A new period goes to the end.
    pub fn insert(&mut self, period: impl Into<String>, record: EnergyRecord) {
        let period = period.into();
        match self.0.iter_mut().find(|(p, _)| *p == period) {
            Some((_, existing)) => *existing = record,
            None => self.0.push((period, record)),
        }
    }

    pub fn get(&self, period: &str) -> Option<&EnergyRecord> {
        self.0.iter().find(|(p, _)| p == period).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnergyRecord)> {
        self.0.iter().map(|(p, r)| (p.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, EnergyRecord)> for PeriodData {
    fn from_iter<I: IntoIterator<Item = (K, EnergyRecord)>>(iter: I) -> Self {
        let mut data = PeriodData::new();
        for (period, record) in iter {
            data.insert(period, record);
        }
        data
    }
}

impl Serialize for PeriodData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (period, record) in &self.0 {
            map.serialize_entry(period, record)?;
        }
        map.end()
    }
}

struct PeriodDataVisitor;

impl<'de> Visitor<'de> for PeriodDataVisitor {
    type Value = PeriodData;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of period to energy record")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut data = PeriodData(Vec::with_capacity(access.size_hint().unwrap_or(0)));
        while let Some((period, record)) = access.next_entry::<String, EnergyRecord>()? {
            data.insert(period, record);
        }
        Ok(data)
    }
}

impl<'de> Deserialize<'de> for PeriodData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PeriodDataVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_order_preserved() {
        let json = r#"{"2015": {"gas": 1, "electricity": 2}, "2010": {"gas": 3}, "2012": {}}"#;
        let data: PeriodData = serde_json::from_str(json).unwrap();
        let periods = data.iter().map(|(p, _)| p).collect::<Vec<_>>();
        assert_eq!(periods, vec!["2015", "2010", "2012"]);
    }

    #[test]
    fn test_missing_components() {
        let json = r#"{"2010": {"electricity": 12.5}}"#;
        let data: PeriodData = serde_json::from_str(json).unwrap();
        let record = data.get("2010").unwrap();
        assert_eq!(record.gas, None);
        assert_eq!(record.electricity, Some(12.5));
        assert_eq!(record.total(), 12.5);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut data = PeriodData::new();
        data.insert("2010", EnergyRecord::new(Some(1.0), None));
        data.insert("2011", EnergyRecord::new(Some(2.0), None));
        data.insert("2010", EnergyRecord::new(Some(5.0), None));
        assert_eq!(data.len(), 2);
        assert_eq!(data.iter().next().unwrap(), ("2010", &EnergyRecord::new(Some(5.0), None)));
    }

    #[test]
    fn test_serialize_keeps_order() {
        let data: PeriodData = vec![
            ("2011", EnergyRecord::new(Some(1.0), None)),
            ("2010", EnergyRecord::new(None, Some(2.0))),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            serde_json::to_string(&data).unwrap(),
            r#"{"2011":{"gas":1.0},"2010":{"electricity":2.0}}"#
        );
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(serde_json::from_str::<PeriodData>("[1, 2]").is_err());
    }
}
