//! Prompt templates and reply parsing for the valuation and advice calls.

use serde::Deserialize;
use warasat_core::{Inheritor, Location, Property, PropertyType};

pub fn valuation_prompt(
    area_sq_ft: f64,
    location: &Location,
    kind: PropertyType,
    description: Option<&str>,
) -> String {
    format!(
        "Act as a real estate expert in Pakistan.\n\
         Estimate the current market value per square foot (in PKR) for a {kind} property.\n\
         Location Coordinates: {lat}, {lng}.\n\
         Area: {area_sq_ft} sq ft.\n\
         Additional Details: {details}.\n\
         \n\
         Provide the output in valid JSON format ONLY with no markdown code blocks:\n\
         {{\n  \"ratePerSqFt\": number,\n  \"analysis\": \"Short 2-sentence explanation of the price based on location trends in Pakistan.\"\n}}",
        lat = location.lat,
        lng = location.lng,
        details = description.unwrap_or("Standard condition"),
    )
}

pub fn advice_prompt(property: &Property, inheritor: &Inheritor) -> String {
    format!(
        "Analyze the suitability of this property for the inheritor.\n\
         Property: {name} ({kind}), {area} sqft. Value: PKR {value}.\n\
         Inheritor: {heir} ({relation}).\n\
         \n\
         Suggest pros and cons considering:\n\
         - Rental income potential (if commercial/residential)\n\
         - Living needs (if residential)\n\
         - Liquidity (ease of selling)\n\
         - Long term appreciation vs Gold.\n\
         \n\
         Keep it concise (max 3 bullet points).",
        name = property.name,
        kind = property.kind,
        area = property.area_sq_ft,
        value = property.total_value,
        heir = inheritor.name,
        relation = inheritor.relation,
    )
}

pub fn distribution_prompt(inheritors: &[Inheritor], total_value: f64) -> String {
    let parties = inheritors
        .iter()
        .map(|h| format!("{} ({})", h.name, h.relation))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Given the following inheritors: {parties}.\n\
         Total Estate Value: PKR {total_value}.\n\
         Explain the Shariah distribution (Faraid) briefly.\n\
         Identify if there are any immediate blocking rules (e.g. inheritance denied due to specific complex family trees not shown).\n\
         Assume standard Hanafi Sunni jurisprudence unless otherwise implied.\n\
         Keep it very brief and reassuring."
    )
}

/// JSON body the valuation prompt asks for. Either field may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct ValuationReply {
    #[serde(rename = "ratePerSqFt", default)]
    pub rate_per_sq_ft: Option<f64>,
    #[serde(default)]
    pub analysis: Option<String>,
}

/// Remove a surrounding markdown code fence, if the model added one anyway.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

pub fn parse_valuation_reply(text: &str) -> Result<ValuationReply, serde_json::Error> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Ok(ValuationReply::default());
    }
    serde_json::from_str(body)
}
