//! Advisory layer: generative-AI property valuation and inheritance advice.
//!
//! The estate arithmetic in `warasat-core` never depends on this crate's
//! answers being available; every call here has an offline fallback.

mod advisor;
mod gemini;
pub mod prompts;

pub use advisor::{
    EstateAdvisor, Estimate, EstimateRequest, FALLBACK_RATE, MOCK_RATE, OfflineAdvisor,
};
pub use gemini::{
    AdvisorError, DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiAdvisor, GeminiClient, GeminiConfig,
};
