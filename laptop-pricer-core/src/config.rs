//! Configuration system for the laptop pricer.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> overrides.
//! Configuration is loaded from `~/.config/laptop-pricer/config.toml` and/or
//! `.laptop-pricer/config.toml` in the workspace directory. The surrounding layer reads it once
//! at startup and hands the relevant pieces to the core.

use crate::error::PricerError;
use crate::specification::ValidationRules;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricerConfig {
    /// Locations of the persisted artifacts.
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    /// Closed-set option lists for the numeric and display fields.
    #[serde(default)]
    pub options: OptionsConfig,
    /// Screen size bounds.
    #[serde(default)]
    pub screen: ScreenConfig,
    /// Weight bounds offered by input forms.
    #[serde(default)]
    pub weight: WeightConfig,
    /// Preselected form values.
    #[serde(default)]
    pub defaults: FormDefaults,
    /// Service identity reported by health checks.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Artifact file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Serialized trained pipeline.
    #[serde(default = "default_pipeline_path")]
    pub pipeline_path: PathBuf,
    /// Serialized reference dataset.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            pipeline_path: default_pipeline_path(),
            dataset_path: default_dataset_path(),
        }
    }
}

impl ArtifactsConfig {
    /// Resolve relative artifact paths against `base`.
    pub fn resolved(&self, base: &Path) -> Self {
        let resolve = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };
        Self {
            pipeline_path: resolve(&self.pipeline_path),
            dataset_path: resolve(&self.dataset_path),
        }
    }
}

fn default_pipeline_path() -> PathBuf {
    PathBuf::from("artifacts/pipe.json")
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("artifacts/df.json")
}

/// Closed option sets accepted by the specification boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsConfig {
    #[serde(default = "default_ram_options")]
    pub ram_gb: Vec<u32>,
    #[serde(default = "default_hdd_options")]
    pub hdd_gb: Vec<u32>,
    #[serde(default = "default_ssd_options")]
    pub ssd_gb: Vec<u32>,
    /// Resolutions offered by forms. Specifications are only checked for format.
    #[serde(default = "default_resolution_options")]
    pub resolutions: Vec<String>,
    #[serde(default = "default_boolean_options")]
    pub boolean: Vec<String>,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            ram_gb: default_ram_options(),
            hdd_gb: default_hdd_options(),
            ssd_gb: default_ssd_options(),
            resolutions: default_resolution_options(),
            boolean: default_boolean_options(),
        }
    }
}

fn default_ram_options() -> Vec<u32> {
    vec![2, 4, 6, 8, 12, 16, 24, 32, 64]
}

fn default_hdd_options() -> Vec<u32> {
    vec![0, 128, 256, 512, 1024, 2048]
}

fn default_ssd_options() -> Vec<u32> {
    vec![0, 8, 128, 256, 512, 1024]
}

fn default_resolution_options() -> Vec<String> {
    [
        "1920x1080",
        "1366x768",
        "1600x900",
        "3840x2160",
        "3200x1800",
        "2880x1800",
        "2560x1600",
        "2560x1440",
        "2304x1440",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_boolean_options() -> Vec<String> {
    vec!["No".to_string(), "Yes".to_string()]
}

/// Screen size bounds in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default = "default_screen_min")]
    pub min_in: f64,
    #[serde(default = "default_screen_max")]
    pub max_in: f64,
    #[serde(default = "default_screen_default")]
    pub default_in: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            min_in: default_screen_min(),
            max_in: default_screen_max(),
            default_in: default_screen_default(),
        }
    }
}

fn default_screen_min() -> f64 {
    10.0
}

fn default_screen_max() -> f64 {
    18.0
}

fn default_screen_default() -> f64 {
    13.0
}

/// Weight bounds in kilograms. Only forms use the upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    #[serde(default = "default_weight_min")]
    pub min_kg: f64,
    #[serde(default = "default_weight_max")]
    pub max_kg: f64,
    #[serde(default = "default_weight_default")]
    pub default_kg: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            min_kg: default_weight_min(),
            max_kg: default_weight_max(),
            default_kg: default_weight_default(),
        }
    }
}

fn default_weight_min() -> f64 {
    0.5
}

fn default_weight_max() -> f64 {
    5.0
}

fn default_weight_default() -> f64 {
    2.0
}

/// Preselected values for the closed-set form fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefaults {
    #[serde(default = "default_ram")]
    pub ram_gb: u32,
    #[serde(default = "default_resolution")]
    pub resolution: String,
    #[serde(default)]
    pub hdd_gb: u32,
    #[serde(default = "default_ssd")]
    pub ssd_gb: u32,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            ram_gb: default_ram(),
            resolution: default_resolution(),
            hdd_gb: 0,
            ssd_gb: default_ssd(),
        }
    }
}

fn default_ram() -> u32 {
    8
}

fn default_resolution() -> String {
    "1920x1080".to_string()
}

fn default_ssd() -> u32 {
    256
}

/// Service identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_title")]
    pub title: String,
    #[serde(default = "default_api_version")]
    pub version: String,
    #[serde(default = "default_api_description")]
    pub description: String,
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
    /// Currency attached to every price estimate.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            title: default_api_title(),
            version: default_api_version(),
            description: default_api_description(),
            host: default_api_host(),
            port: default_api_port(),
            currency: default_currency(),
        }
    }
}

fn default_api_title() -> String {
    "Laptop Price Prediction API".to_string()
}

fn default_api_version() -> String {
    "1.0.0".to_string()
}

fn default_api_description() -> String {
    "API for predicting laptop prices based on specifications".to_string()
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8000
}

fn default_currency() -> String {
    "USD".to_string()
}

impl PricerConfig {
    /// Constraints enforced when constructing a specification.
    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            ram_gb: self.options.ram_gb.clone(),
            hdd_gb: self.options.hdd_gb.clone(),
            ssd_gb: self.options.ssd_gb.clone(),
            screen_min_in: self.screen.min_in,
            screen_max_in: self.screen.max_in,
        }
    }

    /// Check that the configuration is internally consistent.
    pub fn validate(&self) -> Result<(), PricerError> {
        if self.options.ram_gb.is_empty()
            || self.options.hdd_gb.is_empty()
            || self.options.ssd_gb.is_empty()
        {
            return Err(PricerError::config("option lists must not be empty"));
        }
        let screen = &self.screen;
        if !(screen.min_in > 0.0 && screen.min_in <= screen.max_in) {
            return Err(PricerError::config(format!(
                "screen bounds must satisfy 0 < min <= max, got [{}, {}]",
                screen.min_in, screen.max_in
            )));
        }
        if !(screen.min_in..=screen.max_in).contains(&screen.default_in) {
            return Err(PricerError::config(format!(
                "default screen size {} outside [{}, {}]",
                screen.default_in, screen.min_in, screen.max_in
            )));
        }
        let defaults = &self.defaults;
        if !self.options.ram_gb.contains(&defaults.ram_gb) {
            return Err(PricerError::config(format!(
                "default RAM {} is not an offered option",
                defaults.ram_gb
            )));
        }
        if !self.options.hdd_gb.contains(&defaults.hdd_gb) {
            return Err(PricerError::config(format!(
                "default HDD {} is not an offered option",
                defaults.hdd_gb
            )));
        }
        if !self.options.ssd_gb.contains(&defaults.ssd_gb) {
            return Err(PricerError::config(format!(
                "default SSD {} is not an offered option",
                defaults.ssd_gb
            )));
        }
        if !self.options.resolutions.contains(&defaults.resolution) {
            return Err(PricerError::config(format!(
                "default resolution '{}' is not an offered option",
                defaults.resolution
            )));
        }
        Ok(())
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `PRICER_`)
/// 3. Explicit config file (`config_file`)
/// 4. Workspace-local config (`.laptop-pricer/config.toml`)
/// 5. User config (`~/.config/laptop-pricer/config.toml`)
/// 6. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
    overrides: Option<&PricerConfig>,
) -> Result<PricerConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(PricerConfig::default()));

    if let Some(config_dir) = directories::ProjectDirs::from("dev", "laptop-pricer", "laptop-pricer")
    {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".laptop-pricer").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = config_file {
        figment = figment.merge(Toml::file(path));
    }

    // PRICER_ARTIFACTS__PIPELINE_PATH, PRICER_SCREEN__MAX_IN, etc.
    figment = figment.merge(Env::prefixed("PRICER_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}
