//! Named-column feature records.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Column names the trained pipeline expects, in fit order.
///
/// These match the reference dataset's column names, so the categorical
/// catalog and the feature record share one vocabulary.
pub mod columns {
    pub const COMPANY: &str = "Company";
    pub const TYPE_NAME: &str = "TypeName";
    pub const RAM: &str = "Ram";
    pub const WEIGHT: &str = "Weight";
    pub const TOUCHSCREEN: &str = "Touchscreen";
    pub const IPS: &str = "Ips";
    pub const PPI: &str = "ppi";
    pub const CPU_BRAND: &str = "Cpu brand";
    pub const HDD: &str = "HDD";
    pub const SSD: &str = "SSD";
    pub const GPU_BRAND: &str = "Gpu brand";
    pub const OS: &str = "os";

    pub const ALL: [&str; 12] = [
        COMPANY,
        TYPE_NAME,
        RAM,
        WEIGHT,
        TOUCHSCREEN,
        IPS,
        PPI,
        CPU_BRAND,
        HDD,
        SSD,
        GPU_BRAND,
        OS,
    ];
}

/// A single feature value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl FeatureValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FeatureValue::Number(_) => "numeric",
            FeatureValue::Text(_) => "categorical",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            FeatureValue::Number(_) => None,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<u32> for FeatureValue {
    fn from(value: u32) -> Self {
        FeatureValue::Number(f64::from(value))
    }
}

impl From<u8> for FeatureValue {
    fn from(value: u8) -> Self {
        FeatureValue::Number(f64::from(value))
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

/// An ordered set of named feature values. Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    fields: Vec<(String, FeatureValue)>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field, replacing any previous value stored under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
