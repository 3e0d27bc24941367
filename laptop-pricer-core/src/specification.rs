//! Laptop specifications: the raw boundary form and the validated value.
//!
//! `Specification::new` is the only way to obtain a [`Specification`], so any
//! value that reaches feature engineering has already passed every domain check.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Two-valued boundary enumeration for boolean hardware traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::No => "No",
            YesNo::Yes => "Yes",
        }
    }

    fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        match value {
            "No" => Ok(YesNo::No),
            "Yes" => Ok(YesNo::Yes),
            other => Err(ValidationError::not_in_set(
                field,
                other.to_string(),
                &["No".to_string(), "Yes".to_string()],
            )),
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display resolution in pixels, written `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Resolution {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedResolution(s.to_string());
        let (width, height) = s.split_once('x').ok_or_else(malformed)?;
        let width: u32 = width.parse().map_err(|_| malformed())?;
        let height: u32 = height.parse().map_err(|_| malformed())?;
        if width == 0 || height == 0 {
            return Err(malformed());
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for Resolution {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Domain constraints applied at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRules {
    pub ram_gb: Vec<u32>,
    pub hdd_gb: Vec<u32>,
    pub ssd_gb: Vec<u32>,
    pub screen_min_in: f64,
    pub screen_max_in: f64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        crate::config::PricerConfig::default().validation_rules()
    }
}

/// Unvalidated specification as it arrives at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationInput {
    pub company: String,
    #[serde(rename = "type", alias = "type_name")]
    pub type_name: String,
    pub ram: u32,
    pub weight: f64,
    pub touchscreen: String,
    pub ips: String,
    pub screen_size: f64,
    pub resolution: String,
    pub cpu: String,
    pub hdd: u32,
    pub ssd: u32,
    pub gpu: String,
    pub os: String,
}

/// A validated laptop specification.
///
/// Serializes with the boundary field names so it can be echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Specification {
    #[serde(rename = "company")]
    brand: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(rename = "ram")]
    ram_gb: u32,
    #[serde(rename = "weight")]
    weight_kg: f64,
    #[serde(rename = "touchscreen")]
    has_touchscreen: YesNo,
    #[serde(rename = "ips")]
    has_ips: YesNo,
    #[serde(rename = "screen_size")]
    screen_size_in: f64,
    resolution: Resolution,
    #[serde(rename = "cpu")]
    cpu_brand: String,
    #[serde(rename = "hdd")]
    storage_hdd_gb: u32,
    #[serde(rename = "ssd")]
    storage_ssd_gb: u32,
    #[serde(rename = "gpu")]
    gpu_brand: String,
    os: String,
}

impl Specification {
    /// Validate `input` against `rules`.
    pub fn new(input: SpecificationInput, rules: &ValidationRules) -> Result<Self, ValidationError> {
        if !rules.ram_gb.contains(&input.ram) {
            return Err(ValidationError::not_in_set("ram", input.ram, &rules.ram_gb));
        }
        if !(input.weight.is_finite() && input.weight > 0.0) {
            return Err(ValidationError::NotPositive {
                field: "weight",
                value: input.weight,
            });
        }
        let has_touchscreen = YesNo::parse("touchscreen", &input.touchscreen)?;
        let has_ips = YesNo::parse("ips", &input.ips)?;
        if !(rules.screen_min_in..=rules.screen_max_in).contains(&input.screen_size) {
            return Err(ValidationError::OutOfRange {
                field: "screen_size",
                value: input.screen_size,
                min: rules.screen_min_in,
                max: rules.screen_max_in,
            });
        }
        let resolution: Resolution = input.resolution.parse()?;
        if !rules.hdd_gb.contains(&input.hdd) {
            return Err(ValidationError::not_in_set("hdd", input.hdd, &rules.hdd_gb));
        }
        if !rules.ssd_gb.contains(&input.ssd) {
            return Err(ValidationError::not_in_set("ssd", input.ssd, &rules.ssd_gb));
        }

        Ok(Self {
            brand: input.company,
            type_name: input.type_name,
            ram_gb: input.ram,
            weight_kg: input.weight,
            has_touchscreen,
            has_ips,
            screen_size_in: input.screen_size,
            resolution,
            cpu_brand: input.cpu,
            storage_hdd_gb: input.hdd,
            storage_ssd_gb: input.ssd,
            gpu_brand: input.gpu,
            os: input.os,
        })
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn ram_gb(&self) -> u32 {
        self.ram_gb
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn has_touchscreen(&self) -> YesNo {
        self.has_touchscreen
    }

    pub fn has_ips(&self) -> YesNo {
        self.has_ips
    }

    pub fn screen_size_in(&self) -> f64 {
        self.screen_size_in
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn cpu_brand(&self) -> &str {
        &self.cpu_brand
    }

    pub fn storage_hdd_gb(&self) -> u32 {
        self.storage_hdd_gb
    }

    pub fn storage_ssd_gb(&self) -> u32 {
        self.storage_ssd_gb
    }

    pub fn gpu_brand(&self) -> &str {
        &self.gpu_brand
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    /// Human-readable summary, one line per attribute.
    pub fn summary(&self) -> Vec<String> {
        vec![
            format!("Brand: {}", self.brand),
            format!("Type: {}", self.type_name),
            format!("CPU: {}", self.cpu_brand),
            format!("GPU: {}", self.gpu_brand),
            format!("RAM: {} GB", self.ram_gb),
            format!(
                "Storage: {} GB HDD + {} GB SSD",
                self.storage_hdd_gb, self.storage_ssd_gb
            ),
            format!("Screen: {}\" {}", self.screen_size_in, self.resolution),
            format!("Touchscreen: {}", self.has_touchscreen),
            format!("IPS: {}", self.has_ips),
            format!("Weight: {} kg", self.weight_kg),
            format!("OS: {}", self.os),
        ]
    }
}

impl TryFrom<SpecificationInput> for Specification {
    type Error = ValidationError;

    fn try_from(input: SpecificationInput) -> Result<Self, Self::Error> {
        Self::new(input, &ValidationRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dell_input() -> SpecificationInput {
        SpecificationInput {
            company: "Dell".into(),
            type_name: "Notebook".into(),
            ram: 8,
            weight: 1.5,
            touchscreen: "No".into(),
            ips: "Yes".into(),
            screen_size: 15.6,
            resolution: "1920x1080".into(),
            cpu: "Intel Core i5".into(),
            hdd: 0,
            ssd: 256,
            gpu: "Intel".into(),
            os: "Windows".into(),
        }
    }

    #[test]
    fn test_valid_specification() {
        let spec = Specification::try_from(dell_input()).unwrap();
        assert_eq!(spec.brand(), "Dell");
        assert_eq!(spec.has_touchscreen(), YesNo::No);
        assert_eq!(spec.has_ips(), YesNo::Yes);
        assert_eq!(
            spec.resolution(),
            Resolution {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn test_ram_outside_set_rejected() {
        let mut input = dell_input();
        input.ram = 10;
        let err = Specification::try_from(input).unwrap_err();
        assert_eq!(err.field(), "ram");
    }

    #[test]
    fn test_screen_size_bounds() {
        let mut input = dell_input();
        input.screen_size = 9.9;
        assert!(matches!(
            Specification::try_from(input).unwrap_err(),
            ValidationError::OutOfRange { field: "screen_size", .. }
        ));

        for edge in [10.0, 18.0] {
            let mut input = dell_input();
            input.screen_size = edge;
            assert!(Specification::try_from(input).is_ok());
        }

        let mut input = dell_input();
        input.screen_size = f64::NAN;
        assert!(Specification::try_from(input).is_err());
    }

    #[test]
    fn test_malformed_resolutions_rejected() {
        for bad in ["1920-1080", "1920x", "x1080", "1920x1080x1", "0x1080", "axb", ""] {
            let mut input = dell_input();
            input.resolution = bad.into();
            assert_eq!(
                Specification::try_from(input).unwrap_err(),
                ValidationError::MalformedResolution(bad.into()),
                "resolution {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_weight_must_be_positive() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut input = dell_input();
            input.weight = bad;
            let err = Specification::try_from(input).unwrap_err();
            assert_eq!(err.field(), "weight");
        }
    }

    #[test]
    fn test_boolean_tokens_are_strict() {
        let mut input = dell_input();
        input.touchscreen = "yes".into();
        let err = Specification::try_from(input).unwrap_err();
        assert_eq!(err.field(), "touchscreen");
    }

    #[test]
    fn test_storage_sets() {
        let mut input = dell_input();
        input.hdd = 100;
        assert_eq!(Specification::try_from(input).unwrap_err().field(), "hdd");

        let mut input = dell_input();
        input.ssd = 2048;
        assert_eq!(Specification::try_from(input).unwrap_err().field(), "ssd");
    }

    #[test]
    fn test_custom_rules() {
        let rules = ValidationRules {
            ram_gb: vec![16],
            ..ValidationRules::default()
        };
        assert!(Specification::new(dell_input(), &rules).is_err());
    }

    #[test]
    fn test_echo_uses_boundary_names() {
        let spec = Specification::try_from(dell_input()).unwrap();
        let echoed = serde_json::to_value(&spec).unwrap();
        let original = serde_json::to_value(dell_input()).unwrap();
        assert_eq!(echoed, original);
    }

    #[test]
    fn test_input_accepts_type_name_alias() {
        let json = serde_json::json!({
            "company": "HP", "type_name": "Ultrabook", "ram": 16, "weight": 1.2,
            "touchscreen": "Yes", "ips": "Yes", "screen_size": 13.3,
            "resolution": "2560x1600", "cpu": "Intel Core i7", "hdd": 0,
            "ssd": 512, "gpu": "Intel", "os": "Windows"
        });
        let input: SpecificationInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.type_name, "Ultrabook");
    }

    #[test]
    fn test_summary_mentions_storage() {
        let spec = Specification::try_from(dell_input()).unwrap();
        let summary = spec.summary();
        assert!(summary.contains(&"Storage: 0 GB HDD + 256 GB SSD".to_string()));
        assert!(summary.contains(&"Screen: 15.6\" 1920x1080".to_string()));
    }
}
