//! Pure feature derivations.
//!
//! `to_feature_record` is the single point of coupling to the trained
//! artifact's schema; it must change in lockstep with retraining.

use crate::error::ValidationError;
use crate::features::record::{FeatureRecord, columns};
use crate::specification::{Resolution, Specification};

/// Pixels per inch: `sqrt(width² + height²) / screen_size_in`.
pub fn pixel_density(resolution: &str, screen_size_in: f64) -> Result<f64, ValidationError> {
    let resolution: Resolution = resolution.parse()?;
    Ok(density(resolution, screen_size_in))
}

fn density(resolution: Resolution, screen_size_in: f64) -> f64 {
    f64::from(resolution.width).hypot(f64::from(resolution.height)) / screen_size_in
}

/// `"Yes"` encodes to 1, anything else to 0.
///
/// This is a permissive map, not a validator: strict checking of the two
/// tokens happens when the specification is constructed.
pub fn encode_boolean(value: &str) -> u8 {
    u8::from(value == "Yes")
}

/// Assemble the twelve model inputs in fit order.
pub fn to_feature_record(spec: &Specification) -> FeatureRecord {
    let ppi = density(spec.resolution(), spec.screen_size_in());

    FeatureRecord::new()
        .with(columns::COMPANY, spec.brand())
        .with(columns::TYPE_NAME, spec.type_name())
        .with(columns::RAM, spec.ram_gb())
        .with(columns::WEIGHT, spec.weight_kg())
        .with(
            columns::TOUCHSCREEN,
            encode_boolean(spec.has_touchscreen().as_str()),
        )
        .with(columns::IPS, encode_boolean(spec.has_ips().as_str()))
        .with(columns::PPI, ppi)
        .with(columns::CPU_BRAND, spec.cpu_brand())
        .with(columns::HDD, spec.storage_hdd_gb())
        .with(columns::SSD, spec.storage_ssd_gb())
        .with(columns::GPU_BRAND, spec.gpu_brand())
        .with(columns::OS, spec.os())
}
