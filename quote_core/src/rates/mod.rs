//! # Rate Table
//!
//! Base prices per m², regional multipliers and construction durations.
//!
//! Lookups are total: a key missing at any level of the table resolves to a
//! documented fallback instead of an error, so a malformed or newly added key
//! still yields a reasonable estimate.
//!
//! | Lookup | Fallback |
//! |---|---|
//! | base price | [`DEFAULT_BASE_PRICE_PER_M2`] (1000 USD/m²) |
//! | regional multiplier | [`DEFAULT_REGIONAL_MULTIPLIER`] (1.0) |
//! | duration | [`DEFAULT_DURATION_MONTHS`] (3 months) |
//!
//! A table is an immutable snapshot. Price-feed refreshes build a whole new
//! table and swap it in through [`RateStore`].
//!
//! ## Example
//!
//! ```rust
//! use quote_core::rates::RateTable;
//! use quote_core::request::{ConstructionType, FinishLevel, Location, UsageType};
//!
//! let table = RateTable::standard();
//! let price = table.lookup_base_price(
//!     &ConstructionType::SteelFrame,
//!     &UsageType::Residential,
//!     &FinishLevel::Standard,
//! );
//! assert_eq!(price, 1200.0);
//! assert_eq!(table.lookup_multiplier(&Location::from_key("atlantis")), 1.0);
//! ```

pub mod store;

pub use store::RateStore;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{QuoteError, QuoteResult};
use crate::request::{ConstructionType, FinishLevel, Location, ProjectRequest, UsageType};
use crate::units::Months;

/// Current schema version for rate-table files
pub const RATE_SCHEMA_VERSION: &str = "0.1.0";

/// Base price used when the table has no entry (USD/m²)
pub const DEFAULT_BASE_PRICE_PER_M2: f64 = 1000.0;

/// Regional multiplier used for unknown locations
pub const DEFAULT_REGIONAL_MULTIPLIER: f64 = 1.0;

/// Duration used when the table has no entry (months)
pub const DEFAULT_DURATION_MONTHS: f64 = 3.0;

/// Base prices keyed construction type -> usage type -> finish level
pub type BasePriceTable = BTreeMap<ConstructionType, BTreeMap<UsageType, BTreeMap<FinishLevel, f64>>>;

/// Durations keyed construction type -> finish level
pub type DurationTable = BTreeMap<ConstructionType, BTreeMap<FinishLevel, Months>>;

/// Process-wide standard table built from the published price list.
pub static STANDARD_RATES: Lazy<Arc<RateTable>> = Lazy::new(|| Arc::new(RateTable::standard()));

/// A complete snapshot of pricing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Schema version (for file compatibility)
    pub version: String,

    /// Where this snapshot came from (e.g. "standard", a feed name or a file)
    pub source: String,

    /// When the snapshot was produced
    pub updated_at: DateTime<Utc>,

    /// USD per m² before regional or floor adjustments
    pub base_prices: BasePriceTable,

    /// Cost-of-construction scalar per location
    pub regional_multipliers: BTreeMap<Location, f64>,

    /// Estimated construction time
    pub durations: DurationTable,
}

/// The three rate values resolved for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRates {
    /// USD per m²
    pub base_price_per_m2: f64,
    /// True if the base price came from [`DEFAULT_BASE_PRICE_PER_M2`]
    pub base_price_fallback: bool,
    /// Regional multiplier
    pub regional_multiplier: f64,
    /// True if the multiplier came from [`DEFAULT_REGIONAL_MULTIPLIER`]
    pub multiplier_fallback: bool,
    /// Estimated duration
    pub duration: Months,
    /// True if the duration came from [`DEFAULT_DURATION_MONTHS`]
    pub duration_fallback: bool,
}

impl RateTable {
    /// Create an empty table. Every lookup on it returns the fallbacks.
    pub fn empty(source: impl Into<String>) -> Self {
        RateTable {
            version: RATE_SCHEMA_VERSION.to_string(),
            source: source.into(),
            updated_at: Utc::now(),
            base_prices: BTreeMap::new(),
            regional_multipliers: BTreeMap::new(),
            durations: BTreeMap::new(),
        }
    }

    /// The published price list (USD/m²), regional multipliers for the 24
    /// provinces, and durations in months.
    pub fn standard() -> Self {
        use ConstructionType as C;
        use UsageType as U;

        let mut table = RateTable::empty("standard");

        // (construction, usage, [basic, standard, premium])
        let prices: [(C, U, [f64; 3]); 12] = [
            (C::SteelFrame, U::Residential, [800.0, 1200.0, 1600.0]),
            (C::SteelFrame, U::Commercial, [900.0, 1300.0, 1700.0]),
            (C::SteelFrame, U::Industrial, [700.0, 1000.0, 1400.0]),
            (C::Industrial, U::Residential, [600.0, 900.0, 1200.0]),
            (C::Industrial, U::Commercial, [700.0, 1000.0, 1300.0]),
            (C::Industrial, U::Industrial, [500.0, 800.0, 1100.0]),
            (C::Container, U::Residential, [400.0, 600.0, 800.0]),
            (C::Container, U::Commercial, [500.0, 700.0, 900.0]),
            (C::Container, U::Industrial, [350.0, 550.0, 750.0]),
            (C::Mixed, U::Residential, [700.0, 1050.0, 1400.0]),
            (C::Mixed, U::Commercial, [800.0, 1150.0, 1500.0]),
            (C::Mixed, U::Industrial, [600.0, 900.0, 1250.0]),
        ];
        for (construction, usage, row) in prices {
            for (finish, price) in FinishLevel::ALL.into_iter().zip(row) {
                table.set_base_price(construction.clone(), usage.clone(), finish, price);
            }
        }

        let multipliers: [(Location, f64); 24] = [
            (Location::BuenosAires, 1.2),
            (Location::CiudadAutonomaBuenosAires, 1.3),
            (Location::Cordoba, 1.1),
            (Location::SantaFe, 1.1),
            (Location::Mendoza, 1.0),
            (Location::Tucuman, 0.9),
            (Location::Salta, 0.9),
            (Location::Jujuy, 0.9),
            (Location::Chaco, 0.8),
            (Location::Formosa, 0.8),
            (Location::Misiones, 0.9),
            (Location::Corrientes, 0.9),
            (Location::EntreRios, 1.0),
            (Location::LaPampa, 0.9),
            (Location::RioNegro, 0.9),
            (Location::Neuquen, 1.0),
            (Location::Chubut, 0.9),
            (Location::SantaCruz, 0.8),
            (Location::TierraDelFuego, 1.1),
            (Location::Catamarca, 0.9),
            (Location::LaRioja, 0.9),
            (Location::SanJuan, 0.9),
            (Location::SanLuis, 0.9),
            (Location::SantiagoDelEstero, 0.9),
        ];
        for (location, multiplier) in multipliers {
            table.set_multiplier(location, multiplier);
        }

        // (construction, [basic, standard, premium]) in months
        let durations: [(C, [f64; 3]); 4] = [
            (C::SteelFrame, [2.0, 3.0, 4.0]),
            (C::Industrial, [1.5, 2.5, 3.5]),
            (C::Container, [1.0, 1.5, 2.0]),
            (C::Mixed, [2.5, 3.5, 4.5]),
        ];
        for (construction, row) in durations {
            for (finish, months) in FinishLevel::ALL.into_iter().zip(row) {
                table.set_duration(construction.clone(), finish, Months(months));
            }
        }

        table
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    /// Insert or replace a base price
    pub fn set_base_price(
        &mut self,
        construction_type: ConstructionType,
        usage_type: UsageType,
        finish_level: FinishLevel,
        price_per_m2: f64,
    ) {
        self.base_prices
            .entry(construction_type)
            .or_default()
            .entry(usage_type)
            .or_default()
            .insert(finish_level, price_per_m2);
    }

    /// Insert or replace a regional multiplier
    pub fn set_multiplier(&mut self, location: Location, multiplier: f64) {
        self.regional_multipliers.insert(location, multiplier);
    }

    /// Insert or replace a duration
    pub fn set_duration(&mut self, construction_type: ConstructionType, finish_level: FinishLevel, months: Months) {
        self.durations
            .entry(construction_type)
            .or_default()
            .insert(finish_level, months);
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Tabled base price, if present
    pub fn try_base_price(
        &self,
        construction_type: &ConstructionType,
        usage_type: &UsageType,
        finish_level: &FinishLevel,
    ) -> Option<f64> {
        self.base_prices
            .get(construction_type)?
            .get(usage_type)?
            .get(finish_level)
            .copied()
    }

    /// Base price per m², or [`DEFAULT_BASE_PRICE_PER_M2`] if any key is missing.
    pub fn lookup_base_price(
        &self,
        construction_type: &ConstructionType,
        usage_type: &UsageType,
        finish_level: &FinishLevel,
    ) -> f64 {
        self.try_base_price(construction_type, usage_type, finish_level)
            .unwrap_or_else(|| {
                debug!(
                    construction_type = construction_type.key(),
                    usage_type = usage_type.key(),
                    finish_level = finish_level.key(),
                    fallback = DEFAULT_BASE_PRICE_PER_M2,
                    "No base price tabled, using fallback"
                );
                DEFAULT_BASE_PRICE_PER_M2
            })
    }

    /// Tabled regional multiplier, if present
    pub fn try_multiplier(&self, location: &Location) -> Option<f64> {
        self.regional_multipliers.get(location).copied()
    }

    /// Regional multiplier, or [`DEFAULT_REGIONAL_MULTIPLIER`] for unknown locations.
    pub fn lookup_multiplier(&self, location: &Location) -> f64 {
        self.try_multiplier(location).unwrap_or_else(|| {
            debug!(
                location = location.key(),
                fallback = DEFAULT_REGIONAL_MULTIPLIER,
                "No regional multiplier tabled, using fallback"
            );
            DEFAULT_REGIONAL_MULTIPLIER
        })
    }

    /// Tabled duration, if present
    pub fn try_duration(&self, construction_type: &ConstructionType, finish_level: &FinishLevel) -> Option<Months> {
        self.durations.get(construction_type)?.get(finish_level).copied()
    }

    /// Duration in months, or [`DEFAULT_DURATION_MONTHS`] if any key is missing.
    pub fn lookup_duration(&self, construction_type: &ConstructionType, finish_level: &FinishLevel) -> Months {
        self.try_duration(construction_type, finish_level)
            .unwrap_or_else(|| {
                debug!(
                    construction_type = construction_type.key(),
                    finish_level = finish_level.key(),
                    fallback = DEFAULT_DURATION_MONTHS,
                    "No duration tabled, using fallback"
                );
                Months(DEFAULT_DURATION_MONTHS)
            })
    }

    /// Resolve all three rates for a request, recording which ones fell back.
    pub fn resolve(&self, request: &ProjectRequest) -> ResolvedRates {
        let tabled_price = self.try_base_price(&request.construction_type, &request.usage_type, &request.finish_level);
        let tabled_multiplier = self.try_multiplier(&request.location);
        let tabled_duration = self.try_duration(&request.construction_type, &request.finish_level);

        ResolvedRates {
            base_price_per_m2: self.lookup_base_price(
                &request.construction_type,
                &request.usage_type,
                &request.finish_level,
            ),
            base_price_fallback: tabled_price.is_none(),
            regional_multiplier: self.lookup_multiplier(&request.location),
            multiplier_fallback: tabled_multiplier.is_none(),
            duration: self.lookup_duration(&request.construction_type, &request.finish_level),
            duration_fallback: tabled_duration.is_none(),
        }
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Check that every tabled value is finite and positive.
    ///
    /// Run before installing a table so a bad feed never reaches the engine.
    pub fn validate(&self) -> QuoteResult<()> {
        if self.version.trim().is_empty() {
            return Err(QuoteError::invalid_rate_table("version", "Version must not be empty"));
        }

        for (construction, by_usage) in &self.base_prices {
            for (usage, by_finish) in by_usage {
                for (finish, price) in by_finish {
                    check_positive(
                        format!("base_prices.{}.{}.{}", construction.key(), usage.key(), finish.key()),
                        *price,
                    )?;
                }
            }
        }

        for (location, multiplier) in &self.regional_multipliers {
            check_positive(format!("regional_multipliers.{}", location.key()), *multiplier)?;
        }

        for (construction, by_finish) in &self.durations {
            for (finish, months) in by_finish {
                check_positive(format!("durations.{}.{}", construction.key(), finish.key()), months.0)?;
            }
        }

        Ok(())
    }

    /// Number of tabled base-price entries
    pub fn base_price_count(&self) -> usize {
        self.base_prices
            .values()
            .flat_map(|by_usage| by_usage.values())
            .map(|by_finish| by_finish.len())
            .sum()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        RateTable::standard()
    }
}

fn check_positive(entry: String, value: f64) -> QuoteResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(QuoteError::invalid_rate_table(
            entry,
            format!("Value must be finite and positive, got {}", value),
        ));
    }
    Ok(())
}
