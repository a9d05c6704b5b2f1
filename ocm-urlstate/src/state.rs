use crate::keys::{is_array_key, ARRAY_KEYS};
use serde::Serialize;
use std::collections::BTreeMap;

/// Value of one query key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UrlValue {
    Scalar(String),
    List(Vec<String>),
}

impl UrlValue {
    pub fn values(&self) -> &[String] {
        match self {
            UrlValue::Scalar(value) => std::slice::from_ref(value),
            UrlValue::List(values) => values,
        }
    }
}

/// Flat key/value view of the shareable part of the dashboard state.
///
/// Array keys (see [`crate::keys::ARRAY_KEYS`]) always hold a
/// [`UrlValue::List`]; every other key holds a [`UrlValue::Scalar`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShareableState(BTreeMap<String, UrlValue>);

impl ShareableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.push(key, value.into());
        self
    }

    /// Append to an array key, or set a scalar key.
    pub fn push(&mut self, key: &str, value: String) {
        if is_array_key(key) {
            match self
                .0
                .entry(key.to_string())
                .or_insert_with(|| UrlValue::List(Vec::new()))
            {
                UrlValue::List(values) => values.push(value),
                slot => *slot = UrlValue::List(vec![value]),
            }
        } else {
            self.0.insert(key.to_string(), UrlValue::Scalar(value));
        }
    }

    /// Append to an array key unless the value is already there.
    pub(crate) fn push_unique(&mut self, key: &str, value: &str) {
        if !self.get_list(key).iter().any(|v| v == value) {
            self.push(key, value.to_string());
        }
    }

    pub(crate) fn insert(&mut self, key: &str, value: UrlValue) {
        self.0.insert(key.to_string(), value);
    }

    pub(crate) fn remove_key(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub(crate) fn remove_value(&mut self, key: &str, value: &str) {
        if let Some(UrlValue::List(values)) = self.0.get_mut(key) {
            if let Some(i) = values.iter().position(|v| v == value) {
                values.remove(i);
            }
        }
    }

    pub(crate) fn fill_array_keys(&mut self) {
        for key in ARRAY_KEYS {
            self.0
                .entry(key.to_string())
                .or_insert_with(|| UrlValue::List(Vec::new()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&UrlValue> {
        self.0.get(key)
    }

    /// Scalar value of `key`, `None` when unset.
    pub fn get_scalar(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            UrlValue::Scalar(value) => Some(value),
            UrlValue::List(values) => values.last().map(String::as_str),
        }
    }

    /// Values of `key`, empty when unset.
    pub fn get_list(&self, key: &str) -> &[String] {
        self.0.get(key).map(UrlValue::values).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UrlValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
