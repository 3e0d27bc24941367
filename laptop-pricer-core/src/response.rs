//! Response bodies handed to the transport layer.

use crate::catalog::FeatureOptions;
use crate::error::{PricerError, StatusClass};
use crate::specification::Specification;
use serde::Serialize;

/// A successful price estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    /// Linear price rounded to two decimals.
    pub predicted_price: f64,
    pub currency: String,
    pub specifications: Specification,
}

impl PredictionResponse {
    pub fn new(price: f64, currency: impl Into<String>, specifications: Specification) -> Self {
        Self {
            predicted_price: round_cents(price),
            currency: currency.into(),
            specifications,
        }
    }
}

/// Round to two decimals. Magnitudes of 1e15 and above have no cent
/// resolution left and are returned unchanged, so scaling cannot overflow.
pub(crate) fn round_cents(price: f64) -> f64 {
    if price.abs() >= 1e15 {
        return price;
    }
    (price * 100.0).round() / 100.0
}

/// Feature option catalog wrapped for the options endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturesResponse {
    pub status: &'static str,
    pub data: FeatureOptions,
}

impl FeaturesResponse {
    pub fn success(data: FeatureOptions) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of a health probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub models_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            models_loaded: true,
            version: Some(version.into()),
            error: None,
        }
    }

    pub fn unhealthy(error: &PricerError) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            models_loaded: false,
            version: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }

    /// 200 when healthy, service-unavailable otherwise.
    pub fn http_status(&self) -> u16 {
        if self.is_healthy() {
            200
        } else {
            StatusClass::Unavailable.http_status()
        }
    }
}

/// Error body. `error` is a short class headline, `detail` the full cause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&PricerError> for ErrorResponse {
    fn from(err: &PricerError) -> Self {
        let headline = match err.status_class() {
            StatusClass::ClientError => "Invalid input",
            StatusClass::Unavailable => "Service unavailable",
            StatusClass::Internal => "Internal server error",
        };
        Self {
            error: headline.to_string(),
            detail: Some(err.to_string()),
        }
    }
}
