//! # Cotiza CLI
//!
//! Terminal front end for the quote engine: quick estimates, detailed quotes,
//! rate tables, the option catalog and material prices. Every command prints
//! a boxed summary, or JSON with `--json`.

mod logging;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use quote_core::catalog;
use quote_core::engine::{EstimateResult, Quote, QuoteEngine};
use quote_core::file_io::{self, FileLock, QuoteRecord};
use quote_core::format::{format_multiplier, format_rate_per_m2};
use quote_core::materials::{MaterialList, MaterialSource};
use quote_core::rates::{RateStore, RateTable};
use quote_core::request::{ClientInfo, ConstructionType, FinishLevel, Location, ProjectRequest, UsageType};
use quote_core::settings::QuoteSettings;
use quote_core::validation::{validate_estimate_request, validate_quote_request};

const RULE: &str = "═══════════════════════════════════════";

#[derive(Parser)]
#[command(name = "cotiza")]
#[command(about = "Construction cost estimates and quotes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Rate table file (.json or .toml); the standard table if omitted
    #[arg(long, global = true, env = "COTIZA_RATES")]
    rates: Option<PathBuf>,

    /// Settings file (.toml); built-in defaults if omitted
    #[arg(long, global = true, env = "COTIZA_SETTINGS")]
    settings: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quick cost estimate
    Estimate {
        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        client: ClientArgs,

        /// Reject incomplete requests before pricing
        #[arg(long)]
        validate: bool,
    },

    /// Detailed, dated quote with cost breakdown
    Quote {
        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        client: ClientArgs,

        /// Reject incomplete requests before pricing
        #[arg(long)]
        validate: bool,

        /// Quote date (YYYY-MM-DD); today if omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Save the quote record to this JSON file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Show the rate table, or export it
    Rates {
        /// Write the active table to this file (.json or .toml)
        #[arg(long)]
        export: Option<PathBuf>,

        /// Identity recorded in the lock file while exporting
        #[arg(long, default_value = "cotiza-cli")]
        user: String,
    },

    /// Describe construction types, finish levels, usage types and regions
    Catalog,

    /// Material reference prices
    Materials {
        /// Price-feed payload (JSON); built-in defaults if omitted
        #[arg(long)]
        feed: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ProjectArgs {
    /// Request as a JSON file; the flags below are ignored when given
    #[arg(long)]
    request: Option<PathBuf>,

    /// Construction system (steel_frame, industrial, container, mixed)
    #[arg(long = "type", default_value = "steel_frame")]
    construction_type: String,

    /// Intended use (residential, commercial, industrial)
    #[arg(long, default_value = "residential")]
    usage: String,

    /// Finish level (basic, standard, premium)
    #[arg(long, default_value = "standard")]
    finish: String,

    /// Covered area in m²
    #[arg(long, default_value_t = 100.0)]
    area: f64,

    /// Number of storeys
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    floors: i32,

    /// Province
    #[arg(long, default_value = "mendoza")]
    location: String,
}

#[derive(Args)]
struct ClientArgs {
    /// Client name
    #[arg(long)]
    name: Option<String>,

    /// Client email
    #[arg(long)]
    email: Option<String>,

    /// Client phone
    #[arg(long)]
    phone: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json, cli.verbose);

    let engine = build_engine(cli.rates.as_deref(), cli.settings.as_deref())?;

    match cli.command {
        Commands::Estimate { project, client, validate } => {
            let request = build_request(&project, client)?;
            if validate {
                validate_estimate_request(&request).context("Request rejected")?;
            }
            let estimate = engine.quick_estimate(&request)?;
            if cli.json {
                print_json(&estimate)?;
            } else {
                print_estimate(&estimate)?;
            }
        }
        Commands::Quote { project, client, validate, date, save } => {
            let request = build_request(&project, client)?;
            if validate {
                validate_quote_request(&request).context("Request rejected")?;
            }
            let quote = match date {
                Some(date) => engine.detailed_quote_on(&request, date)?,
                None => engine.detailed_quote(&request)?,
            };
            if let Some(path) = save {
                file_io::save_quote(&QuoteRecord::new(quote.clone()), &path)
                    .with_context(|| format!("Failed to save quote to {}", path.display()))?;
            }
            if cli.json {
                print_json(&quote)?;
            } else {
                print_quote(&quote)?;
            }
        }
        Commands::Rates { export, user } => {
            let table = engine.rates().snapshot();
            if let Some(path) = export {
                export_rates(&table, &path, user)?;
            } else if cli.json {
                print_json(&*table)?;
            } else {
                print_rates(&table)?;
            }
        }
        Commands::Catalog => {
            let table = engine.rates().snapshot();
            if cli.json {
                print_json(&serde_json::json!({
                    "construction_types": catalog::construction_types(),
                    "finish_levels": catalog::finish_levels(),
                    "usage_types": catalog::usage_types(),
                    "regions": catalog::regions(&table),
                }))?;
            } else {
                print_catalog(&table);
            }
        }
        Commands::Materials { feed } => {
            let list = match feed {
                Some(path) => {
                    let payload = fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read material feed {}", path.display()))?;
                    MaterialList::from_feed_json(&payload)
                }
                None => MaterialList::fallback(),
            };
            if cli.json {
                print_json(&list)?;
            } else {
                print_materials(&list);
            }
        }
    }

    Ok(())
}

fn build_engine(rates: Option<&Path>, settings: Option<&Path>) -> Result<QuoteEngine> {
    let store = RateStore::standard();
    if let Some(path) = rates {
        if let Some(lock) = FileLock::check(path) {
            warn!(path = %path.display(), holder = %lock.user_id, "Rate table is being written by another user");
        }
        store
            .reload_from_file(path)
            .with_context(|| format!("Failed to load rate table {}", path.display()))?;
    }

    let settings = match settings {
        Some(path) => QuoteSettings::load(path).with_context(|| format!("Failed to load settings {}", path.display()))?,
        None => QuoteSettings::default(),
    };

    QuoteEngine::new(Arc::new(store), settings).context("Invalid quote settings")
}

fn build_request(project: &ProjectArgs, client: ClientArgs) -> Result<ProjectRequest> {
    let mut request = match &project.request {
        Some(path) => {
            let contents = fs::read_to_string(path).with_context(|| format!("Failed to read request {}", path.display()))?;
            serde_json::from_str(&contents).with_context(|| format!("Invalid request JSON in {}", path.display()))?
        }
        None => ProjectRequest::new(ConstructionType::from_key(&project.construction_type), project.area)
            .with_usage(UsageType::from_key(&project.usage))
            .with_finish(FinishLevel::from_key(&project.finish))
            .with_floors(project.floors)
            .with_location(Location::from_key(&project.location)),
    };

    let ClientArgs { name, email, phone } = client;
    if name.is_some() || email.is_some() || phone.is_some() {
        request = request.with_client(ClientInfo { name, email, phone });
    }

    for (field, unknown) in [
        ("type", request.construction_type.is_other()),
        ("usage", request.usage_type.is_other()),
        ("finish", request.finish_level.is_other()),
        ("location", request.location.is_other()),
    ] {
        if unknown {
            warn!(field, "Unknown value, default rates will apply");
        }
    }

    Ok(request)
}

fn export_rates(table: &RateTable, path: &Path, user: String) -> Result<()> {
    let _lock = FileLock::acquire(path, user).with_context(|| format!("Could not lock {}", path.display()))?;
    file_io::save_rate_table(table, path).with_context(|| format!("Failed to export rates to {}", path.display()))?;
    info!(path = %path.display(), "Exported rate table");
    println!("Rate table written to {}", path.display());
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_header(title: &str) {
    println!("{}", RULE);
    println!("  {}", title);
    println!("{}", RULE);
    println!();
}

fn print_estimate(estimate: &EstimateResult) -> Result<()> {
    let f = estimate.formatted()?;

    print_header("QUICK ESTIMATE");
    println!("Project:");
    println!("  System:   {}", f.construction_type);
    println!("  Use:      {}", f.usage_type);
    println!("  Finish:   {}", f.finish_level);
    println!("  Area:     {}", f.area);
    println!("  Floors:   {}", f.floors);
    println!("  Location: {}", f.location);
    println!();
    println!("Rates:");
    println!("  Base price:          {}", f.base_price_per_m2);
    println!("  Location multiplier: {}", f.location_multiplier);
    println!("  Floor multiplier:    {}", f.floor_multiplier);
    if estimate.used_fallback_rates() {
        println!("  (some rates not tabled, defaults applied)");
    }
    println!();
    println!("{}", RULE);
    println!("  ESTIMATED COST: {}", f.estimated_cost);
    println!("  ESTIMATED TIME: {}", f.estimated_time);
    println!("{}", RULE);
    Ok(())
}

fn print_quote(quote: &Quote) -> Result<()> {
    let f = quote.formatted()?;

    print_header("DETAILED QUOTE");
    println!("Quote {}", f.quote_id);
    println!("  Issued:      {}", f.quote_date);
    println!("  Valid until: {}", f.valid_until);
    println!();
    println!("Client:");
    println!("  {}", f.client_name);
    println!("  {}", f.client_email);
    println!("  {}", f.client_phone);
    println!();
    println!("Project:");
    println!("  {} / {} / {}", f.construction_type, f.usage_type, f.finish_level);
    println!("  {} on {} floor(s), {}", f.area, f.floors, f.location);
    println!();
    println!("Breakdown of {}:", f.base_cost);
    for line in &f.breakdown {
        println!("  {:<16} {:>16}  {:>4}", line.category, line.cost, line.percentage);
    }
    println!();
    println!("Additional costs:");
    println!("  {:<16} {:>16}", "Extra floors", f.extra_floors_cost);
    println!("  {:<16} {:>16}", "Permits", f.permits_cost);
    println!("  {:<16} {:>16}", "Subtotal", f.additional_costs);
    println!();
    println!("{}", RULE);
    println!("  TOTAL:          {}", f.total_cost);
    println!("  ESTIMATED TIME: {}", f.estimated_time);
    println!("{}", RULE);
    Ok(())
}

fn print_rates(table: &RateTable) -> Result<()> {
    print_header("RATE TABLE");
    println!("  Source:  {}", table.source);
    println!("  Version: {}", table.version);
    println!("  Updated: {}", table.updated_at.to_rfc3339());
    println!();
    println!("Base prices (USD/m²):");
    for (ct, by_usage) in &table.base_prices {
        for (ut, by_finish) in by_usage {
            for (fl, price) in by_finish {
                println!(
                    "  {:<20} {:<12} {:<9} {:>14}",
                    ct.display_name(),
                    ut.display_name(),
                    fl.display_name(),
                    format_rate_per_m2(*price)?
                );
            }
        }
    }
    println!();
    println!("Regional multipliers:");
    for (location, multiplier) in &table.regional_multipliers {
        println!("  {:<22} {}", location.display_name(), format_multiplier(*multiplier));
    }
    Ok(())
}

fn print_catalog(table: &RateTable) {
    print_header("CATALOG");
    println!("Construction types:");
    for info in catalog::construction_types() {
        println!("  {} - {}", info.name, info.description);
        println!("    {}", info.characteristics.join(", "));
    }
    println!();
    println!("Finish levels:");
    for info in catalog::finish_levels() {
        println!("  {:<10} {}  {}", info.name, format_multiplier(info.price_factor), info.description);
    }
    println!();
    println!("Usage types:");
    for info in catalog::usage_types() {
        println!("  {:<12} {}  {}", info.name, format_multiplier(info.price_factor), info.description);
    }
    println!();
    println!("Regions:");
    for region in catalog::regions(table) {
        println!("  {:<22} {}", region.name, format_multiplier(region.multiplier));
    }
}

fn print_materials(list: &MaterialList) {
    print_header("MATERIAL PRICES");
    if list.source == MaterialSource::Fallback {
        println!("  (price feed unavailable, showing reference prices)");
        println!();
    }
    for material in &list.materials {
        println!("  [{}] {} - {}", material.category, material.name, material.price_label());
        println!("      {}", material.description);
    }
}
