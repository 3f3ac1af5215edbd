//! # Detailed Quote
//!
//! Builds on the quick estimate:
//!
//! 1. Quick estimate against the same rate snapshot.
//! 2. [`CostBreakdown`] of the pre-floor base cost (40/30/20/10).
//! 3. Additional costs:
//!    - extra floors: `max(0, floors − 1) × area × 200`
//!    - permits: `(area × 1000) × 0.05`, a levy on a flat valuation of the
//!      area rather than on the resolved base price
//! 4. `total = estimate.total_cost + additional`
//! 5. Issued on `quote_date`, valid for 30 days.
//!
//! Step 4 adds the extra-floor surcharge on top of an estimate that already
//! carries the floor multiplier, so additional storeys are charged twice.
//! Stored quotes were issued this way; keep it until pricing is revised.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::breakdown::{CostBreakdown, FormattedBreakdownLine};
use super::estimate::{self, EstimateResult};
use super::{ensure_finite, CategoryLabels};
use crate::errors::{QuoteError, QuoteResult};
use crate::format::{format_area, format_date, format_months, format_usd};
use crate::rates::{RateTable, ResolvedRates};
use crate::request::{ClientInfo, ConstructionType, FinishLevel, Location, ProjectRequest, UsageType};
use crate::settings::QuoteSettings;
use crate::units::Months;

/// Surcharges outside the base price model (USD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdditionalCosts {
    /// Flat per-m² surcharge for each storey beyond the first
    pub extra_floors_usd: f64,
    /// Permit and management levy
    pub permits_usd: f64,
}

impl AdditionalCosts {
    /// Compute the surcharges for a request.
    ///
    /// Independent of construction type, location and the resolved base price.
    pub fn calculate(area_m2: f64, floors: i32, settings: &QuoteSettings) -> Self {
        let extra_floors = f64::from(floors.saturating_sub(1).max(0));
        let extra_floors_usd = extra_floors * area_m2 * settings.extra_floor_surcharge_per_m2;

        let flat_valuation = area_m2 * settings.permit_valuation_per_m2;
        let permits_usd = flat_valuation * settings.permit_rate;

        AdditionalCosts {
            extra_floors_usd,
            permits_usd,
        }
    }

    /// Sum of all surcharges
    pub fn total_usd(&self) -> f64 {
        self.extra_floors_usd + self.permits_usd
    }
}

/// Client identity with defaults applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedClient {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ResolvedClient {
    /// Fill missing fields: name from settings, email and phone empty.
    pub fn resolve(client: &ClientInfo, settings: &QuoteSettings) -> Self {
        ResolvedClient {
            name: client
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| settings.default_client_name.clone()),
            email: client.email.clone().unwrap_or_default(),
            phone: client.phone.clone().unwrap_or_default(),
        }
    }
}

/// A formal quote. Constructed once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier for persistence adapters
    pub id: Uuid,

    pub client: ResolvedClient,

    pub construction_type: ConstructionType,
    pub usage_type: UsageType,
    pub finish_level: FinishLevel,
    pub location: Location,
    pub labels: CategoryLabels,

    /// Covered area (m²)
    pub area_m2: f64,
    /// Storeys, as requested
    pub floors: i32,

    /// Rate values used, with fallback flags
    pub rates: ResolvedRates,
    /// Floor multiplier baked into `base_cost_usd`
    pub floor_multiplier: f64,

    /// Pre-floor base cost split by category
    pub breakdown: CostBreakdown,

    /// Floor-adjusted estimate total
    pub base_cost_usd: f64,

    /// Itemised surcharges
    pub additional_costs: AdditionalCosts,

    /// `base_cost_usd + additional_costs`
    pub total_cost_usd: f64,

    /// Estimated construction time
    pub duration: Months,

    /// Issuance date
    pub quote_date: NaiveDate,

    /// Expiration date (`quote_date` + validity period)
    pub valid_until: NaiveDate,
}

/// Display strings for a quote, with every field downstream renderers
/// (email body, PDF, persistence record) need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedQuote {
    pub quote_id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub construction_type: String,
    pub usage_type: String,
    pub finish_level: String,
    pub area: String,
    pub floors: i32,
    pub location: String,
    pub total_cost: String,
    pub estimated_time: String,
    pub breakdown: Vec<FormattedBreakdownLine>,
    pub extra_floors_cost: String,
    pub permits_cost: String,
    pub additional_costs: String,
    pub base_cost: String,
    pub quote_date: String,
    pub valid_until: String,
}

/// Compute a detailed quote against an explicit rate snapshot.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use quote_core::engine::quote::calculate;
/// use quote_core::rates::RateTable;
/// use quote_core::request::ProjectRequest;
/// use quote_core::settings::QuoteSettings;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
/// let quote = calculate(
///     &ProjectRequest::default(),
///     &RateTable::standard(),
///     &QuoteSettings::default(),
///     date,
/// ).unwrap();
///
/// assert_eq!(quote.total_cost_usd, 125_000.0);
/// assert_eq!(quote.valid_until, NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
/// ```
pub fn calculate(
    request: &ProjectRequest,
    rates: &RateTable,
    settings: &QuoteSettings,
    quote_date: NaiveDate,
) -> QuoteResult<Quote> {
    let estimate: EstimateResult = estimate::calculate(request, rates, settings)?;

    let breakdown = CostBreakdown::split(estimate.base_cost_usd);
    let additional_costs = AdditionalCosts::calculate(request.area_m2, request.floors, settings);
    ensure_finite("additional_costs", additional_costs.total_usd())?;

    let base_cost_usd = estimate.total_cost_usd;
    let total_cost_usd = ensure_finite("total_cost", base_cost_usd + additional_costs.total_usd())?;

    let valid_until = Duration::try_days(settings.validity_days)
        .and_then(|validity| quote_date.checked_add_signed(validity))
        .ok_or_else(|| QuoteError::Internal {
            message: format!(
                "Expiration date out of range: {} + {} days",
                quote_date, settings.validity_days
            ),
        })?;

    Ok(Quote {
        id: Uuid::new_v4(),
        client: ResolvedClient::resolve(&request.client, settings),
        construction_type: estimate.construction_type,
        usage_type: estimate.usage_type,
        finish_level: estimate.finish_level,
        location: estimate.location,
        labels: estimate.labels,
        area_m2: estimate.area_m2,
        floors: estimate.floors,
        rates: estimate.rates,
        floor_multiplier: estimate.floor_multiplier,
        breakdown,
        base_cost_usd,
        additional_costs,
        total_cost_usd,
        duration: estimate.duration,
        quote_date,
        valid_until,
    })
}

impl Quote {
    /// Days between issuance and expiration
    pub fn validity_days(&self) -> i64 {
        (self.valid_until - self.quote_date).num_days()
    }

    /// True if the quote has expired as of `today`
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        today > self.valid_until
    }

    /// Display strings. Fails if any amount is NaN or infinite.
    pub fn formatted(&self) -> QuoteResult<FormattedQuote> {
        Ok(FormattedQuote {
            quote_id: self.id.to_string(),
            client_name: self.client.name.clone(),
            client_email: self.client.email.clone(),
            client_phone: self.client.phone.clone(),
            construction_type: self.labels.construction_type.clone(),
            usage_type: self.labels.usage_type.clone(),
            finish_level: self.labels.finish_level.clone(),
            area: format_area(self.area_m2),
            floors: self.floors,
            location: self.labels.location.clone(),
            total_cost: format_usd(self.total_cost_usd)?,
            estimated_time: format_months(self.duration),
            breakdown: self.breakdown.formatted()?,
            extra_floors_cost: format_usd(self.additional_costs.extra_floors_usd)?,
            permits_cost: format_usd(self.additional_costs.permits_usd)?,
            additional_costs: format_usd(self.additional_costs.total_usd())?,
            base_cost: format_usd(self.base_cost_usd)?,
            quote_date: format_date(self.quote_date),
            valid_until: format_date(self.valid_until),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::breakdown::CostCategory;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn run(request: &ProjectRequest) -> Quote {
        calculate(request, &RateTable::standard(), &QuoteSettings::default(), date(2025, 6, 1)).unwrap()
    }

    #[test]
    fn test_two_floor_quote_double_counts_floors() {
        let quote = run(&ProjectRequest::default().with_floors(2));
        assert_eq!(quote.additional_costs.extra_floors_usd, 20_000.0);
        assert_eq!(quote.additional_costs.permits_usd, 5_000.0);
        assert_eq!(quote.additional_costs.total_usd(), 25_000.0);
        assert!((quote.base_cost_usd - 156_000.0).abs() < 1e-6);
        assert!((quote.total_cost_usd - 181_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_floor_has_no_floor_surcharge() {
        let quote = run(&ProjectRequest::default());
        assert_eq!(quote.additional_costs.extra_floors_usd, 0.0);
        assert_eq!(quote.additional_costs.permits_usd, 5_000.0);
        assert_eq!(quote.total_cost_usd, 125_000.0);
    }

    #[test]
    fn test_floor_surcharge_never_negative() {
        let costs = AdditionalCosts::calculate(100.0, 0, &QuoteSettings::default());
        assert_eq!(costs.extra_floors_usd, 0.0);
        let costs = AdditionalCosts::calculate(100.0, i32::MIN, &QuoteSettings::default());
        assert_eq!(costs.extra_floors_usd, 0.0);
    }

    #[test]
    fn test_permits_ignore_resolved_price() {
        // Premium commercial steel frame in CABA prices far above 1000/m²,
        // the levy stays on the flat valuation
        let request = ProjectRequest::default()
            .with_usage(UsageType::Commercial)
            .with_finish(FinishLevel::Premium)
            .with_location(Location::CiudadAutonomaBuenosAires)
            .with_area(200.0);
        let quote = run(&request);
        assert_eq!(quote.additional_costs.permits_usd, 10_000.0);
    }

    #[test]
    fn test_breakdown_partitions_pre_floor_base() {
        let quote = run(&ProjectRequest::default().with_floors(3).with_location(Location::Cordoba));
        assert_eq!(quote.breakdown.total_usd(), quote.breakdown.base_cost_usd);
        assert!((quote.breakdown.base_cost_usd - 132_000.0).abs() < 1e-6);
        assert!((quote.breakdown.cost_of(CostCategory::Structure) - 52_800.0).abs() < 1e-6);
        // Base cost on the quote is the floor-adjusted estimate
        assert!((quote.base_cost_usd - 132_000.0 * 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_validity_is_thirty_days() {
        let quote = calculate(
            &ProjectRequest::default(),
            &RateTable::standard(),
            &QuoteSettings::default(),
            date(2024, 2, 15),
        )
        .unwrap();
        assert_eq!(quote.valid_until, date(2024, 3, 16));
        assert_eq!(quote.validity_days(), 30);
        assert!(!quote.is_expired_on(date(2024, 3, 16)));
        assert!(quote.is_expired_on(date(2024, 3, 17)));

        let quote = run(&ProjectRequest::default());
        assert_eq!(quote.valid_until, date(2025, 7, 1));
    }

    #[test]
    fn test_client_defaults() {
        let quote = run(&ProjectRequest::default());
        assert_eq!(quote.client.name, "Client");
        assert_eq!(quote.client.email, "");

        let quote = run(&ProjectRequest::default().with_client(ClientInfo::new("Franco", "f@example.com", "+54")));
        assert_eq!(quote.client.name, "Franco");
        assert_eq!(quote.client.phone, "+54");
    }

    #[test]
    fn test_each_quote_gets_a_new_id() {
        let a = run(&ProjectRequest::default());
        let b = run(&ProjectRequest::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_formatted_quote() {
        let quote = run(&ProjectRequest::default().with_floors(2));
        let f = quote.formatted().unwrap();
        assert_eq!(f.total_cost, "U$D 181,000");
        assert_eq!(f.base_cost, "U$D 156,000");
        assert_eq!(f.additional_costs, "U$D 25,000");
        assert_eq!(f.extra_floors_cost, "U$D 20,000");
        assert_eq!(f.permits_cost, "U$D 5,000");
        assert_eq!(f.quote_date, "01/06/2025");
        assert_eq!(f.valid_until, "01/07/2025");
        assert_eq!(f.breakdown.len(), 4);
        assert_eq!(f.client_name, "Client");
        assert_eq!(f.estimated_time, "3 months");
    }

    #[test]
    fn test_infinite_area_fails() {
        let err = calculate(
            &ProjectRequest::default().with_area(f64::INFINITY),
            &RateTable::standard(),
            &QuoteSettings::default(),
            date(2025, 1, 1),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "NON_FINITE_AMOUNT");
    }

    #[test]
    fn test_out_of_range_validity_is_an_error() {
        let settings = QuoteSettings {
            validity_days: i64::MAX,
            ..Default::default()
        };
        let err = calculate(&ProjectRequest::default(), &RateTable::standard(), &settings, date(2025, 6, 1))
            .unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");

        let settings = QuoteSettings {
            validity_days: 3_000_000_000,
            ..Default::default()
        };
        assert!(calculate(&ProjectRequest::default(), &RateTable::standard(), &settings, date(2025, 6, 1)).is_err());
    }

    #[test]
    fn test_quote_json_roundtrip() {
        let quote = run(&ProjectRequest::default().with_floors(2));
        let json = serde_json::to_string(&quote).unwrap();
        let roundtrip: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, quote);
    }
}
