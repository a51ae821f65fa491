//! Global settings shared by every subcommand.

use clap::Args;
use warasat_ai::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiConfig};
use warasat_core::SettlementMatcher;
use warasat_core::settlement::DEFAULT_THRESHOLD;

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Gemini API key. Without it advisory commands answer with fallbacks.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Model used for valuation and advice.
    #[arg(long, env = "WARASAT_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Base URL of the generative-language API.
    #[arg(long, env = "WARASAT_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// Balances smaller than this (PKR) are treated as settled.
    #[arg(long, env = "WARASAT_SETTLEMENT_THRESHOLD", default_value_t = DEFAULT_THRESHOLD, global = true)]
    pub threshold: f64,
}

impl Settings {
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            ..GeminiConfig::default()
        }
    }

    pub fn matcher(&self) -> SettlementMatcher {
        SettlementMatcher::new(self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        settings: Settings,
    }

    #[test]
    fn defaults_apply_without_flags() {
        let h = Harness::parse_from(["warasat"]);
        assert_eq!(h.settings.model, DEFAULT_MODEL);
        assert_eq!(h.settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(h.settings.matcher().threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn flags_flow_into_configs() {
        let h = Harness::parse_from([
            "warasat",
            "--api-key",
            "k",
            "--model",
            "gemini-x",
            "--threshold",
            "500",
        ]);
        let gemini = h.settings.gemini();
        assert_eq!(gemini.api_key.as_deref(), Some("k"));
        assert_eq!(gemini.model, "gemini-x");
        assert_eq!(h.settings.matcher().threshold(), 500.0);
    }

    #[test]
    fn negative_threshold_is_clamped() {
        let h = Harness::parse_from(["warasat", "--threshold=-5"]);
        assert_eq!(h.settings.matcher().threshold(), 0.0);
    }
}
