//! # Quick Estimate
//!
//! ```text
//! base_cost        = area × base_price × regional_multiplier
//! floor_multiplier = 1 + (floors − 1) × floor_increment     (0.3 by default)
//! total_cost       = base_cost × floor_multiplier
//! ```
//!
//! The floor multiplier is linear and uncapped. `floors` is not validated
//! here: zero or negative values shrink (or flip the sign of) the multiplier.
//! Callers that need to reject such requests use [`crate::validation`].

use serde::{Deserialize, Serialize};

use super::{ensure_finite, CategoryLabels};
use crate::errors::QuoteResult;
use crate::format::{format_area, format_months, format_multiplier, format_rate_per_m2, format_usd};
use crate::rates::{RateTable, ResolvedRates};
use crate::request::{ConstructionType, FinishLevel, Location, ProjectRequest, UsageType};
use crate::settings::QuoteSettings;
use crate::units::{Months, SquareMeters, Usd, UsdPerM2};

/// Result of a quick estimate. All amounts in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub construction_type: ConstructionType,
    pub usage_type: UsageType,
    pub finish_level: FinishLevel,
    pub location: Location,

    /// Display labels for the four categorical fields
    pub labels: CategoryLabels,

    /// Covered area (m²)
    pub area_m2: f64,

    /// Storeys, as requested
    pub floors: i32,

    /// Rate values used, with fallback flags
    pub rates: ResolvedRates,

    /// `1 + (floors − 1) × floor_increment`
    pub floor_multiplier: f64,

    /// `area × base_price × regional_multiplier`, before floors
    pub base_cost_usd: f64,

    /// `base_cost × floor_multiplier`
    pub total_cost_usd: f64,

    /// Estimated construction time
    pub duration: Months,
}

/// Display strings for an estimate, one per field shown to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedEstimate {
    pub area: String,
    pub construction_type: String,
    pub usage_type: String,
    pub finish_level: String,
    pub floors: i32,
    pub location: String,
    pub estimated_cost: String,
    pub estimated_time: String,
    pub base_price_per_m2: String,
    pub location_multiplier: String,
    pub floor_multiplier: String,
}

/// Multiplier applied for storeys beyond the first.
///
/// # Example
///
/// ```rust
/// use quote_core::engine::estimate::floor_multiplier;
///
/// assert_eq!(floor_multiplier(1, 0.3), 1.0);
/// assert_eq!(floor_multiplier(2, 0.3), 1.3);
/// assert!((floor_multiplier(0, 0.3) - 0.7).abs() < 1e-12);
/// ```
pub fn floor_multiplier(floors: i32, floor_increment: f64) -> f64 {
    1.0 + (f64::from(floors) - 1.0) * floor_increment
}

/// Pre-floor construction cost: `area × base_price × regional_multiplier`.
pub fn base_cost(area_m2: f64, base_price_per_m2: f64, regional_multiplier: f64) -> f64 {
    let cost: Usd = SquareMeters(area_m2) * UsdPerM2(base_price_per_m2);
    (cost * regional_multiplier).value()
}

/// Compute a quick estimate against an explicit rate snapshot.
///
/// Only fails if a computed amount is NaN or infinite (e.g. a NaN area),
/// which signals a contract violation upstream.
pub fn calculate(request: &ProjectRequest, rates: &RateTable, settings: &QuoteSettings) -> QuoteResult<EstimateResult> {
    let resolved = rates.resolve(request);

    let base_cost_usd = ensure_finite(
        "base_cost",
        base_cost(request.area_m2, resolved.base_price_per_m2, resolved.regional_multiplier),
    )?;
    let floor_multiplier = floor_multiplier(request.floors, settings.floor_increment);
    let total_cost_usd = ensure_finite("total_cost", base_cost_usd * floor_multiplier)?;

    Ok(EstimateResult {
        construction_type: request.construction_type.clone(),
        usage_type: request.usage_type.clone(),
        finish_level: request.finish_level.clone(),
        location: request.location.clone(),
        labels: CategoryLabels::for_request(request),
        area_m2: request.area_m2,
        floors: request.floors,
        rates: resolved,
        floor_multiplier,
        base_cost_usd,
        total_cost_usd,
        duration: resolved.duration,
    })
}

impl EstimateResult {
    /// Display strings (`U$D 156,000`, `1.3x`, `3 months`, ...).
    pub fn formatted(&self) -> QuoteResult<FormattedEstimate> {
        Ok(FormattedEstimate {
            area: format_area(self.area_m2),
            construction_type: self.labels.construction_type.clone(),
            usage_type: self.labels.usage_type.clone(),
            finish_level: self.labels.finish_level.clone(),
            floors: self.floors,
            location: self.labels.location.clone(),
            estimated_cost: format_usd(self.total_cost_usd)?,
            estimated_time: format_months(self.duration),
            base_price_per_m2: format_rate_per_m2(self.rates.base_price_per_m2)?,
            location_multiplier: format_multiplier(self.rates.regional_multiplier),
            floor_multiplier: format_multiplier(self.floor_multiplier),
        })
    }

    /// True if any rate came from a fallback rather than the table
    pub fn used_fallback_rates(&self) -> bool {
        self.rates.base_price_fallback || self.rates.multiplier_fallback || self.rates.duration_fallback
    }
}
