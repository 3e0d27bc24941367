//! Valid categorical choices for building input forms.

use crate::config::{FormDefaults, PricerConfig, ScreenConfig, WeightConfig};
use crate::dataset::ReferenceDataset;
use crate::error::PricerError;
use crate::features::columns;
use serde::{Deserialize, Serialize};

/// Sorted distinct values of each categorical column in the reference dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureOptions {
    pub companies: Vec<String>,
    pub types: Vec<String>,
    pub cpu_brands: Vec<String>,
    pub gpu_brands: Vec<String>,
    pub operating_systems: Vec<String>,
}

impl FeatureOptions {
    pub const KEYS: [&'static str; 5] = [
        "companies",
        "types",
        "cpu_brands",
        "gpu_brands",
        "operating_systems",
    ];

    pub fn from_dataset(dataset: &ReferenceDataset) -> Result<Self, PricerError> {
        Ok(Self {
            companies: dataset.distinct_sorted(columns::COMPANY)?,
            types: dataset.distinct_sorted(columns::TYPE_NAME)?,
            cpu_brands: dataset.distinct_sorted(columns::CPU_BRAND)?,
            gpu_brands: dataset.distinct_sorted(columns::GPU_BRAND)?,
            operating_systems: dataset.distinct_sorted(columns::OS)?,
        })
    }

    /// Look up a category by its catalog key.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        match key {
            "companies" => Some(&self.companies),
            "types" => Some(&self.types),
            "cpu_brands" => Some(&self.cpu_brands),
            "gpu_brands" => Some(&self.gpu_brands),
            "operating_systems" => Some(&self.operating_systems),
            _ => None,
        }
    }
}

/// Everything a form needs to offer only valid specifications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    #[serde(flatten)]
    pub categories: FeatureOptions,
    pub ram_gb: Vec<u32>,
    pub hdd_gb: Vec<u32>,
    pub ssd_gb: Vec<u32>,
    pub resolutions: Vec<String>,
    pub boolean: Vec<String>,
    pub screen: ScreenConfig,
    pub weight: WeightConfig,
    pub defaults: FormDefaults,
}

impl FormSchema {
    pub fn new(categories: FeatureOptions, config: &PricerConfig) -> Self {
        Self {
            categories,
            ram_gb: config.options.ram_gb.clone(),
            hdd_gb: config.options.hdd_gb.clone(),
            ssd_gb: config.options.ssd_gb.clone(),
            resolutions: config.options.resolutions.clone(),
            boolean: config.options.boolean.clone(),
            screen: config.screen.clone(),
            weight: config.weight.clone(),
            defaults: config.defaults.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset() -> ReferenceDataset {
        ReferenceDataset::new(
            columns::ALL.iter().map(|c| c.to_string()).collect(),
            vec![
                vec![
                    json!("HP"), json!("Notebook"), json!(8), json!(1.9), json!(0), json!(0),
                    json!(141.2), json!("Intel Core i5"), json!(1000), json!(0),
                    json!("Intel"), json!("Windows"),
                ],
                vec![
                    json!("Apple"), json!("Ultrabook"), json!(8), json!(1.37), json!(0), json!(1),
                    json!(226.9), json!("Intel Core i5"), json!(0), json!(128),
                    json!("Intel"), json!("Mac"),
                ],
                vec![
                    json!("HP"), json!("Gaming"), json!(16), json!(2.5), json!(0), json!(1),
                    json!(141.2), json!("Intel Core i7"), json!(0), json!(256),
                    json!("Nvidia"), json!("Windows"),
                ],
            ],
        )
    }

    #[test]
    fn test_catalog_from_dataset() {
        let options = FeatureOptions::from_dataset(&dataset()).unwrap();
        assert_eq!(options.companies, vec!["Apple", "HP"]);
        assert_eq!(options.types, vec!["Gaming", "Notebook", "Ultrabook"]);
        assert_eq!(options.cpu_brands, vec!["Intel Core i5", "Intel Core i7"]);
        assert_eq!(options.gpu_brands, vec!["Intel", "Nvidia"]);
        assert_eq!(options.operating_systems, vec!["Mac", "Windows"]);
    }

    #[test]
    fn test_get_by_key_matches_serialized_names() {
        let options = FeatureOptions::from_dataset(&dataset()).unwrap();
        let json = serde_json::to_value(&options).unwrap();
        for key in FeatureOptions::KEYS {
            let listed: Vec<String> = serde_json::from_value(json[key].clone()).unwrap();
            assert_eq!(options.get(key).unwrap(), listed.as_slice());
        }
        assert!(options.get("ram").is_none());
    }

    #[test]
    fn test_missing_categorical_column() {
        let ds = ReferenceDataset::new(vec!["Company".into()], vec![vec![json!("HP")]]);
        assert!(FeatureOptions::from_dataset(&ds).is_err());
    }

    #[test]
    fn test_form_schema_flattens_categories() {
        let options = FeatureOptions::from_dataset(&dataset()).unwrap();
        let form = FormSchema::new(options, &PricerConfig::default());
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["companies"], json!(["Apple", "HP"]));
        assert_eq!(json["defaults"]["ram_gb"], json!(8));
        assert_eq!(json["screen"]["default_in"], json!(13.0));
    }
}
