//! Estate assets and how they are valued.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::numeric::parse_amount;

/// Square feet per square yard.
pub const SQ_FT_PER_SQ_YARD: f64 = 9.0;

/// Renegotiated totals within this many percentage points of the original
/// valuation are not reported as drift.
pub const DRIFT_TOLERANCE_PERCENT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Residential,
    Commercial,
    Agricultural,
    Plot,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Commercial => "Commercial",
            Self::Agricultural => "Agricultural",
            Self::Plot => "Plot",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic position of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    /// Used when no device location or typed coordinate is available (Lahore).
    pub const FALLBACK: Location = Location {
        lat: 31.5204,
        lng: 74.3587,
        address: None,
    };

    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            address: None,
        }
    }

    /// Build a location from typed coordinates.
    ///
    /// Each component falls back independently when it is blank, unparsable
    /// or zero.
    pub fn from_input(lat: &str, lng: &str) -> Self {
        Self::from_coordinates(parse_amount(lat), parse_amount(lng))
    }

    /// Like [`Location::from_input`] for already-parsed values: a zero
    /// component is treated as missing.
    pub fn from_coordinates(lat: f64, lng: f64) -> Self {
        let pick = |value: f64, fallback: f64| if value == 0.0 { fallback } else { value };
        Self::new(pick(lat, Self::FALLBACK.lat), pick(lng, Self::FALLBACK.lng))
    }

    /// Resolve an optional device fix, defaulting to [`Location::FALLBACK`].
    pub fn or_fallback(fix: Option<(f64, f64)>) -> Self {
        match fix {
            Some((lat, lng)) => Self::new(lat, lng),
            None => Self::FALLBACK,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Where a property's rate came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationSource {
    #[default]
    Manual,
    Estimated,
}

impl ValuationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Estimated => "estimated",
        }
    }
}

/// A per-square-foot rate together with its provenance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub source: ValuationSource,
    pub rate_per_sq_ft: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl Valuation {
    /// A manually typed rate; unparsable input becomes a zero rate.
    pub fn manual(rate: &str) -> Self {
        Self {
            source: ValuationSource::Manual,
            rate_per_sq_ft: parse_amount(rate),
            analysis: None,
        }
    }

    pub fn estimated(rate_per_sq_ft: f64, analysis: impl Into<String>) -> Self {
        Self {
            source: ValuationSource::Estimated,
            rate_per_sq_ft,
            analysis: Some(analysis.into()),
        }
    }
}

/// Everything needed to create a [`Property`]; the estate assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDraft {
    pub name: String,
    pub kind: PropertyType,
    pub area_sq_ft: f64,
    pub location: Location,
    pub valuation: Valuation,
    pub description: Option<String>,
}

/// A valued item of the estate that can be assigned to one inheritor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub kind: PropertyType,
    pub area_sq_ft: f64,
    pub location: Location,
    pub valuation: Valuation,
    /// Current deal value. Starts as `rate x area`; renegotiation replaces it
    /// without touching the rate.
    pub total_value: f64,
    /// Valuation at creation time, kept as the negotiation baseline.
    original_value: f64,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Property {
    pub fn from_draft(id: impl Into<String>, draft: PropertyDraft) -> Self {
        let total_value = draft.valuation.rate_per_sq_ft * draft.area_sq_ft;
        Self {
            id: id.into(),
            name: draft.name,
            kind: draft.kind,
            area_sq_ft: draft.area_sq_ft,
            location: draft.location,
            valuation: draft.valuation,
            total_value,
            original_value: total_value,
            assigned_to: None,
            description: draft.description,
        }
    }

    pub fn area_sq_yards(&self) -> f64 {
        self.area_sq_ft / SQ_FT_PER_SQ_YARD
    }

    pub fn rate_per_sq_ft(&self) -> f64 {
        self.valuation.rate_per_sq_ft
    }

    pub fn original_value(&self) -> f64 {
        self.original_value
    }

    /// Set a negotiated deal value. The per-unit rate stays as valued.
    pub fn renegotiate(&mut self, total_value: f64) {
        self.total_value = total_value;
    }

    /// Percentage change of the current value against the original valuation.
    pub fn drift_percent(&self) -> f64 {
        if self.original_value == 0.0 {
            return 0.0;
        }
        (self.total_value - self.original_value) / self.original_value * 100.0
    }

    pub fn has_drifted(&self) -> bool {
        self.drift_percent().abs() > DRIFT_TOLERANCE_PERCENT
    }

    pub fn is_assigned_to(&self, inheritor_id: &str) -> bool {
        self.assigned_to.as_deref() == Some(inheritor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(area: f64, rate: f64) -> PropertyDraft {
        PropertyDraft {
            name: "DHA Plot".into(),
            kind: PropertyType::Plot,
            area_sq_ft: area,
            location: Location::FALLBACK,
            valuation: Valuation {
                source: ValuationSource::Manual,
                rate_per_sq_ft: rate,
                analysis: None,
            },
            description: None,
        }
    }

    #[test]
    fn total_is_rate_times_area() {
        let prop = Property::from_draft("p1", draft(2000.0, 1000.0));
        assert_eq!(prop.total_value, 2_000_000.0);
        assert_eq!(prop.original_value(), 2_000_000.0);
    }

    #[test]
    fn renegotiation_decouples_total_from_rate() {
        let mut prop = Property::from_draft("p1", draft(2000.0, 1000.0));
        prop.renegotiate(1_800_000.0);
        assert_eq!(prop.total_value, 1_800_000.0);
        assert_eq!(prop.rate_per_sq_ft(), 1000.0);
        assert_eq!(prop.original_value(), 2_000_000.0);
        assert!((prop.drift_percent() + 10.0).abs() < 1e-9);
        assert!(prop.has_drifted());
    }

    #[test]
    fn repeated_renegotiation_keeps_first_baseline() {
        let mut prop = Property::from_draft("p1", draft(900.0, 100.0));
        prop.renegotiate(100_000.0);
        prop.renegotiate(90_050.0);
        assert_eq!(prop.original_value(), 90_000.0);
        assert!(!prop.has_drifted());
    }

    #[test]
    fn zero_valuation_has_no_drift() {
        let mut prop = Property::from_draft("p1", draft(0.0, 1000.0));
        assert_eq!(prop.total_value, 0.0);
        prop.renegotiate(500.0);
        assert_eq!(prop.drift_percent(), 0.0);
    }

    #[test]
    fn square_yards_are_derived() {
        let prop = Property::from_draft("p1", draft(4500.0, 1.0));
        assert_eq!(prop.area_sq_yards(), 500.0);
    }

    #[test]
    fn location_falls_back_per_component() {
        assert_eq!(Location::from_input("", ""), Location::FALLBACK);
        let loc = Location::from_input("24.8607", "abc");
        assert_eq!(loc.lat, 24.8607);
        assert_eq!(loc.lng, Location::FALLBACK.lng);
        assert_eq!(Location::from_input("0", "67.0011").lat, Location::FALLBACK.lat);
    }

    #[test]
    fn missing_device_fix_uses_fallback() {
        assert_eq!(Location::or_fallback(None), Location::FALLBACK);
        assert_eq!(Location::or_fallback(Some((33.6, 73.0))).lat, 33.6);
    }

    #[test]
    fn manual_valuation_parses_leniently() {
        let v = Valuation::manual("15,000");
        assert_eq!(v.rate_per_sq_ft, 15_000.0);
        assert_eq!(v.source, ValuationSource::Manual);
        assert_eq!(Valuation::manual("ask later").rate_per_sq_ft, 0.0);
    }

    #[test]
    fn property_json_roundtrip_keeps_baseline() {
        let mut prop = Property::from_draft("p1", draft(2000.0, 1000.0));
        prop.renegotiate(1_900_000.0);
        let json = serde_json::to_string(&prop).unwrap();
        let parsed: Property = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.original_value(), 2_000_000.0);
        assert_eq!(parsed.total_value, 1_900_000.0);
    }
}
