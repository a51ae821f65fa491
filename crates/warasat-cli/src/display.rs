//! Terminal and JSON rendering for estate reports.
//!
//! Plain-text output uses the same layout throughout: a section header,
//! then indented rows with a fixed-width label column.

use serde::Serialize;
use warasat_core::history::{self, TrendPoint};
use warasat_core::{Allocation, Estate, PartyFinancials, SettlementPlan, Transfer};

// ── Formatting ──

/// Whole-rupee amount with thousands separators: `1234567.8` -> `1,234,568`.
pub fn format_pkr(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_percent(share: f64) -> String {
    format!("{share:.2}%")
}

// ── Sections ──

pub fn print_shares(estate: &Estate, allocation: &Allocation) {
    println!("=== Estate of {} ===", display_name(&estate.deceased_name));
    println!();
    println!("Shares");
    for (heir, basis) in allocation.inheritors().iter().zip(allocation.bases()) {
        println!(
            "  {:<26} {:<10} {:>8}  {}",
            heir.name,
            heir.relation.as_str(),
            format_percent(heir.share),
            basis
        );
    }
    if !allocation.is_complete() {
        println!(
            "  {:<26} {:>19}",
            "(unallocated)",
            format_percent(allocation.unallocated())
        );
    }
}

pub fn print_properties(estate: &Estate) {
    if estate.properties().is_empty() {
        return;
    }
    println!();
    println!("Properties");
    for prop in estate.properties() {
        let holder = prop
            .assigned_to
            .as_deref()
            .and_then(|id| estate.inheritor(id))
            .map_or("unassigned", |h| h.name.as_str());
        println!(
            "  {:<26} {:<12} {:>10} sq yd  PKR {:>14}  {}",
            prop.name,
            prop.kind.as_str(),
            format!("{:.1}", prop.area_sq_yards()),
            format_pkr(prop.total_value),
            holder
        );
        if prop.has_drifted() {
            println!(
                "  {:<26} was PKR {} ({:+.1}%)",
                "",
                format_pkr(prop.original_value()),
                prop.drift_percent()
            );
        }
    }
    println!("  {:<26} PKR {}", "Total", format_pkr(estate.total_value()));
}

pub fn print_financials(financials: &[PartyFinancials]) {
    println!();
    println!("Positions");
    for party in financials {
        println!(
            "  {:<26} target {:>14}  held {:>14}  balance {:>14}",
            party.name,
            format_pkr(party.target_value),
            format_pkr(party.assigned_value),
            format_pkr(party.balance())
        );
    }
}

pub fn transfer_line(transfer: &Transfer) -> String {
    format!(
        "{} pays {} PKR {}",
        transfer.from_name,
        transfer.to_name,
        format_pkr(transfer.amount)
    )
}

pub fn print_plan(plan: &SettlementPlan) {
    println!();
    println!("Transfers");
    if plan.transfers.is_empty() {
        println!("  nothing to settle");
    }
    for transfer in &plan.transfers {
        println!("  {}", transfer_line(transfer));
    }
    if plan.unsettled_payable > 0.0 || plan.unsettled_receivable > 0.0 {
        println!(
            "  {:<26} payable {}  receivable {}",
            "(unmatched)",
            format_pkr(plan.unsettled_payable),
            format_pkr(plan.unsettled_receivable)
        );
    }
}

pub fn print_trends() {
    println!("{:<6} {:>12} {:>10}", "Year", "Gold/tola", "Property");
    for TrendPoint {
        year,
        gold_rate,
        property_index,
    } in history::HISTORICAL_TRENDS.iter()
    {
        println!(
            "{:<6} {:>12} {:>10}",
            year,
            format_pkr(f64::from(*gold_rate)),
            format_pkr(f64::from(*property_index))
        );
    }
    let first = history::HISTORICAL_TRENDS[0].year;
    let last = history::HISTORICAL_TRENDS[history::HISTORICAL_TRENDS.len() - 1].year;
    if let Some((gold, property)) = history::growth_multiple(first, last) {
        println!();
        println!("{first}-{last}: gold x{gold:.1}, property x{property:.1}");
    }
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

// ── JSON ──

#[derive(Debug, Serialize)]
pub struct ShareRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub relation: &'static str,
    pub share: f64,
    pub basis: String,
}

/// Everything the `settle` command computes, for machine consumers.
#[derive(Debug, Serialize)]
pub struct SettlementReport<'a> {
    pub generated_at: String,
    pub deceased_name: &'a str,
    pub total_value: f64,
    pub unallocated_percent: f64,
    pub shares: Vec<ShareRow<'a>>,
    pub financials: Vec<PartyFinancials>,
    pub plan: SettlementPlan,
}

impl<'a> SettlementReport<'a> {
    pub fn new(
        estate: &'a Estate,
        allocation: &'a Allocation,
        financials: Vec<PartyFinancials>,
        plan: SettlementPlan,
    ) -> Self {
        let shares = allocation
            .inheritors()
            .iter()
            .zip(allocation.bases())
            .map(|(heir, basis)| ShareRow {
                id: &heir.id,
                name: &heir.name,
                relation: heir.relation.as_str(),
                share: heir.share,
                basis: basis.to_string(),
            })
            .collect();
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            deceased_name: &estate.deceased_name,
            total_value: estate.total_value(),
            unallocated_percent: allocation.unallocated(),
            shares,
            financials,
            plan,
        }
    }
}
