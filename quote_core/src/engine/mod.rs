//! # Quote Engine
//!
//! Turns a [`ProjectRequest`] into a quick estimate or a detailed quote.
//! Each computation follows the same pattern as the rest of the crate:
//!
//! - `*Result` / [`Quote`] - output with raw numbers (JSON-serializable)
//! - `calculate(request, rates, settings, ...)` - pure function over an
//!   explicit rate snapshot
//! - `formatted()` - display strings, produced once at the output boundary
//!
//! [`QuoteEngine`] bundles a [`RateStore`] and [`QuoteSettings`] and takes
//! one snapshot per call, so a concurrent price refresh never mixes two
//! tables inside a single quote.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use quote_core::engine::QuoteEngine;
//! use quote_core::request::ProjectRequest;
//!
//! let engine = QuoteEngine::standard();
//! let request = ProjectRequest::default().with_floors(2);
//!
//! let estimate = engine.quick_estimate(&request).unwrap();
//! assert_eq!(estimate.total_cost_usd, 156_000.0);
//!
//! let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! let quote = engine.detailed_quote_on(&request, date).unwrap();
//! assert_eq!(quote.additional_costs.total_usd(), 25_000.0);
//! assert_eq!(quote.total_cost_usd, 181_000.0);
//! ```

pub mod breakdown;
pub mod estimate;
pub mod quote;

pub use breakdown::{BreakdownLine, CostBreakdown, CostCategory};
pub use estimate::{EstimateResult, FormattedEstimate};
pub use quote::{AdditionalCosts, FormattedQuote, Quote, ResolvedClient};

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{QuoteError, QuoteResult};
use crate::rates::RateStore;
use crate::request::ProjectRequest;
use crate::settings::QuoteSettings;

/// Display labels for the categorical fields of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabels {
    pub construction_type: String,
    pub usage_type: String,
    pub finish_level: String,
    pub location: String,
}

impl CategoryLabels {
    /// Labels for a request, using the fixed mapping or the title-cased key.
    pub fn for_request(request: &ProjectRequest) -> Self {
        CategoryLabels {
            construction_type: request.construction_type.display_name(),
            usage_type: request.usage_type.display_name(),
            finish_level: request.finish_level.display_name(),
            location: request.location.display_name(),
        }
    }
}

/// Fail loudly on NaN or infinite amounts.
pub(crate) fn ensure_finite(field: &str, value: f64) -> QuoteResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(QuoteError::non_finite(field, value))
    }
}

/// Estimate and quote entry point bound to a rate store and settings.
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    rates: Arc<RateStore>,
    settings: QuoteSettings,
}

impl QuoteEngine {
    /// Create an engine over a shared rate store.
    ///
    /// Fails with [`QuoteError::InvalidInput`] if the settings are out of
    /// range, e.g. a negative floor increment or validity period.
    pub fn new(rates: Arc<RateStore>, settings: QuoteSettings) -> QuoteResult<Self> {
        settings.validate()?;
        Ok(QuoteEngine { rates, settings })
    }

    /// Engine over the standard rate table with default settings.
    pub fn standard() -> Self {
        QuoteEngine {
            rates: Arc::new(RateStore::standard()),
            settings: QuoteSettings::default(),
        }
    }

    /// The rate store (for refreshers)
    pub fn rates(&self) -> &Arc<RateStore> {
        &self.rates
    }

    /// Active settings
    pub fn settings(&self) -> &QuoteSettings {
        &self.settings
    }

    /// Quick estimate against the current rate snapshot.
    pub fn quick_estimate(&self, request: &ProjectRequest) -> QuoteResult<EstimateResult> {
        let rates = self.rates.snapshot();
        let result = estimate::calculate(request, &rates, &self.settings)?;

        info!(
            construction_type = request.construction_type.key(),
            location = request.location.key(),
            area_m2 = request.area_m2,
            floors = request.floors,
            total_cost_usd = result.total_cost_usd,
            "Quick estimate calculated"
        );
        Ok(result)
    }

    /// Detailed quote issued today (UTC).
    pub fn detailed_quote(&self, request: &ProjectRequest) -> QuoteResult<Quote> {
        self.detailed_quote_on(request, Utc::now().date_naive())
    }

    /// Detailed quote issued on `quote_date`.
    pub fn detailed_quote_on(&self, request: &ProjectRequest, quote_date: NaiveDate) -> QuoteResult<Quote> {
        let rates = self.rates.snapshot();
        let quote = quote::calculate(request, &rates, &self.settings, quote_date)?;

        info!(
            quote_id = %quote.id,
            construction_type = request.construction_type.key(),
            location = request.location.key(),
            base_cost_usd = quote.base_cost_usd,
            additional_usd = quote.additional_costs.total_usd(),
            total_cost_usd = quote.total_cost_usd,
            "Detailed quote calculated"
        );
        Ok(quote)
    }
}

impl Default for QuoteEngine {
    fn default() -> Self {
        QuoteEngine::standard()
    }
}
