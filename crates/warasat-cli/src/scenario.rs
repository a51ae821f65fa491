//! Scenario files: the deceased, inheritors and properties as JSON.
//!
//! ```json
//! {
//!   "deceased_name": "Rashid Ahmed",
//!   "inheritors": [{ "id": "kamran", "name": "Kamran", "relation": "husband" }],
//!   "properties": [{
//!     "id": "house", "name": "Gulberg House", "kind": "residential",
//!     "area_sq_ft": "2,250", "rate_per_sq_ft": 20000,
//!     "negotiated_value": 42000000, "assigned_to": "kamran"
//!   }]
//! }
//! ```
//!
//! Numeric fields accept numbers or free text; unreadable values count as zero.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;
use warasat_ai::{EstateAdvisor, EstimateRequest};
use warasat_core::numeric::{lenient_f64, lenient_opt_f64};
use warasat_core::{
    Estate, Inheritor, Location, PropertyDraft, PropertyType, Relation, Valuation, ValuationSource,
};

#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub deceased_name: String,
    #[serde(default)]
    pub inheritors: Vec<InheritorEntry>,
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
}

#[derive(Debug, Deserialize)]
pub struct InheritorEntry {
    pub id: String,
    pub name: String,
    pub relation: Relation,
}

#[derive(Debug, Deserialize)]
pub struct PropertyEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub kind: PropertyType,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub area_sq_ft: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lng: f64,
    #[serde(default)]
    pub address: Option<String>,
    /// Absent means "not valued yet"; see [`Scenario::into_estate`].
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub rate_per_sq_ft: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub negotiated_value: Option<f64>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// Build the estate. Properties without a rate are valued through
    /// `advisor` when given, otherwise they enter at a zero manual rate.
    pub async fn into_estate(self, advisor: Option<&dyn EstateAdvisor>) -> anyhow::Result<Estate> {
        let mut estate = Estate::new(self.deceased_name);

        for entry in self.inheritors {
            estate
                .insert_inheritor(Inheritor::new(entry.id, entry.name, entry.relation))
                .context("adding inheritor")?;
        }

        for entry in self.properties {
            let mut location = Location::from_coordinates(entry.lat, entry.lng);
            location.address = entry.address;

            let valuation = match (entry.rate_per_sq_ft, advisor) {
                (Some(rate), _) => Valuation {
                    source: ValuationSource::Manual,
                    rate_per_sq_ft: rate,
                    analysis: None,
                },
                (None, Some(advisor)) => {
                    info!(property = %entry.name, "estimating missing rate");
                    advisor
                        .estimate(&EstimateRequest {
                            area_sq_ft: entry.area_sq_ft,
                            location: location.clone(),
                            kind: entry.kind,
                            description: entry.description.clone(),
                        })
                        .await
                        .into_valuation()
                }
                (None, None) => Valuation::default(),
            };

            let draft = PropertyDraft {
                name: entry.name,
                kind: entry.kind,
                area_sq_ft: entry.area_sq_ft,
                location,
                valuation,
                description: entry.description,
            };
            let id = match entry.id {
                Some(id) => {
                    estate.insert_property(id.clone(), draft)?;
                    id
                }
                None => estate.add_property(draft)?,
            };

            if let Some(total) = entry.negotiated_value {
                estate.renegotiate(&id, total)?;
            }
            if let Some(heir) = entry.assigned_to.as_deref() {
                estate
                    .assign(&id, Some(heir))
                    .with_context(|| format!("assigning property {id}"))?;
            }
        }

        Ok(estate)
    }
}
