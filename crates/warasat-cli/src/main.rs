//! warasat: inheritance shares, property valuation and cash settlement for
//! an estate described in a JSON scenario file.

mod config;
mod display;
mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use warasat_ai::{EstateAdvisor, EstimateRequest, GeminiAdvisor};
use warasat_core::{Location, PropertyType, parse_amount};

use config::Settings;
use display::SettlementReport;
use scenario::Scenario;

#[derive(Parser)]
#[command(name = "warasat", version)]
#[command(about = "Islamic inheritance calculator and estate settlement planner")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show each inheritor's share of the estate.
    Shares { scenario: PathBuf },

    /// Compute positions and the cash transfers that balance them.
    Settle {
        scenario: PathBuf,
        /// Emit a JSON report instead of text.
        #[arg(long)]
        json: bool,
        /// Estimate rates for properties that have none.
        #[arg(long)]
        estimate: bool,
    },

    /// Estimate a per-square-foot rate for a property.
    Value {
        /// Area in square feet; free text such as "2,250" is accepted.
        #[arg(long)]
        area: String,
        #[arg(long, default_value = "")]
        lat: String,
        #[arg(long, default_value = "")]
        lng: String,
        #[arg(long, value_enum, default_value_t = KindArg::Residential)]
        kind: KindArg,
        #[arg(long)]
        description: Option<String>,
    },

    /// Ask whether a property suits a particular inheritor.
    Advise {
        scenario: PathBuf,
        #[arg(long)]
        property: String,
        #[arg(long)]
        inheritor: String,
    },

    /// Plain-language explanation of the distribution.
    Explain { scenario: PathBuf },

    /// Historical gold and property price table.
    Trends,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Residential,
    Commercial,
    Agricultural,
    Plot,
}

impl From<KindArg> for PropertyType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Residential => PropertyType::Residential,
            KindArg::Commercial => PropertyType::Commercial,
            KindArg::Agricultural => PropertyType::Agricultural,
            KindArg::Plot => PropertyType::Plot,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("warasat v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Shares { scenario } => {
            let estate = Scenario::load(&scenario)?.into_estate(None).await?;
            display::print_shares(&estate, &estate.allocation());
        }

        Command::Settle {
            scenario,
            json,
            estimate,
        } => {
            let advisor = if estimate {
                Some(GeminiAdvisor::new(cli.settings.gemini())?)
            } else {
                None
            };
            let estate = Scenario::load(&scenario)?
                .into_estate(advisor.as_ref().map(|a| a as &dyn EstateAdvisor))
                .await?;
            let matcher = cli.settings.matcher();
            let allocation = estate.allocation();
            let financials = estate.financials();
            let plan = matcher.plan(&financials);

            if json {
                let report = SettlementReport::new(&estate, &allocation, financials, plan);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                display::print_shares(&estate, &allocation);
                display::print_properties(&estate);
                display::print_financials(&financials);
                display::print_plan(&plan);
            }
        }

        Command::Value {
            area,
            lat,
            lng,
            kind,
            description,
        } => {
            let advisor = GeminiAdvisor::new(cli.settings.gemini())?;
            let request = EstimateRequest {
                area_sq_ft: parse_amount(&area),
                location: Location::from_input(&lat, &lng),
                kind: kind.into(),
                description,
            };
            let estimate = advisor.estimate(&request).await;
            println!(
                "  {:<26} PKR {}",
                "Rate per sq ft",
                display::format_pkr(estimate.rate_per_sq_ft)
            );
            println!(
                "  {:<26} PKR {}",
                "Total",
                display::format_pkr(estimate.rate_per_sq_ft * request.area_sq_ft)
            );
            println!("  {:<26} {}", "Source", estimate.source.as_str());
            println!("  {:<26} {}", "Analysis", estimate.analysis);
        }

        Command::Advise {
            scenario,
            property,
            inheritor,
        } => {
            let estate = Scenario::load(&scenario)?.into_estate(None).await?;
            let prop = estate
                .property(&property)
                .with_context(|| format!("no property with id {property}"))?;
            let heir = estate
                .inheritor(&inheritor)
                .with_context(|| format!("no inheritor with id {inheritor}"))?;
            let advisor = GeminiAdvisor::new(cli.settings.gemini())?;
            println!("{}", advisor.advise(prop, heir).await);
        }

        Command::Explain { scenario } => {
            let estate = Scenario::load(&scenario)?.into_estate(None).await?;
            let advisor = GeminiAdvisor::new(cli.settings.gemini())?;
            display::print_shares(&estate, &estate.allocation());
            println!();
            println!(
                "{}",
                advisor
                    .explain_distribution(estate.inheritors(), estate.total_value())
                    .await
            );
        }

        Command::Trends => display::print_trends(),
    }

    Ok(())
}
