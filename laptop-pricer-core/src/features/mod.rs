//! Feature engineering: turns a validated specification into the record the pipeline was fit on.

pub mod engineer;
pub mod record;

pub use engineer::{encode_boolean, pixel_density, to_feature_record};
pub use record::{FeatureRecord, FeatureValue, columns};
