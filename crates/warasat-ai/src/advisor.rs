//! The advisory service seam: valuation estimates and free-text advice.
//!
//! Every method is infallible. Implementations catch their own failures and
//! answer with a fallback so the estate arithmetic never sees an error from
//! this side.

use async_trait::async_trait;
use serde::Serialize;
use warasat_core::{Inheritor, Location, Property, PropertyType, Valuation, ValuationSource};

/// Rate returned when no credential is configured.
pub const MOCK_RATE: f64 = 15_000.0;
/// Rate returned when the service fails or omits the rate.
pub const FALLBACK_RATE: f64 = 5_000.0;

pub const NO_KEY_ANALYSIS: &str = "API Key missing. Using mock valuation.";
pub const UNAVAILABLE_ANALYSIS: &str = "AI service unavailable. Please enter manually.";
pub const UNDETERMINED_ANALYSIS: &str = "Could not determine precise value.";

pub const NO_KEY_ADVICE: &str = "Please configure API Key for AI advice.";
pub const FAILED_ADVICE: &str = "Could not generate advice.";
pub const EMPTY_ADVICE: &str = "No advice generated.";

pub const NO_KEY_EXPLANATION: &str = "AI unavailable.";
pub const FAILED_EXPLANATION: &str = "Calculation explanation unavailable.";

#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRequest {
    pub area_sq_ft: f64,
    pub location: Location,
    pub kind: PropertyType,
    pub description: Option<String>,
}

/// A per-square-foot rate with a short explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub rate_per_sq_ft: f64,
    pub analysis: String,
    /// `Estimated` only when the rate really came from the service.
    pub source: ValuationSource,
}

impl Estimate {
    pub fn fallback(rate_per_sq_ft: f64, analysis: &str) -> Self {
        Self {
            rate_per_sq_ft,
            analysis: analysis.to_string(),
            source: ValuationSource::Manual,
        }
    }

    pub fn into_valuation(self) -> Valuation {
        Valuation {
            source: self.source,
            rate_per_sq_ft: self.rate_per_sq_ft,
            analysis: Some(self.analysis),
        }
    }
}

#[async_trait]
pub trait EstateAdvisor: Send + Sync {
    /// Market rate per square foot for a property.
    async fn estimate(&self, request: &EstimateRequest) -> Estimate;

    /// Pros and cons of giving `property` to `inheritor`.
    async fn advise(&self, property: &Property, inheritor: &Inheritor) -> String;

    /// Plain-language explanation of how the estate is distributed.
    async fn explain_distribution(&self, inheritors: &[Inheritor], total_value: f64) -> String;
}

/// Advisor for running without any service: always answers with the
/// missing-credential fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAdvisor;

#[async_trait]
impl EstateAdvisor for OfflineAdvisor {
    async fn estimate(&self, _request: &EstimateRequest) -> Estimate {
        Estimate::fallback(MOCK_RATE, NO_KEY_ANALYSIS)
    }

    async fn advise(&self, _property: &Property, _inheritor: &Inheritor) -> String {
        NO_KEY_ADVICE.to_string()
    }

    async fn explain_distribution(&self, _inheritors: &[Inheritor], _total_value: f64) -> String {
        NO_KEY_EXPLANATION.to_string()
    }
}
