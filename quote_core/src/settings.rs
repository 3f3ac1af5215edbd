//! # Quote Settings
//!
//! Tunable constants of the pricing model. The defaults reproduce the
//! published quoting rules exactly; a TOML file can override any subset.
//!
//! ```toml
//! # quote.toml
//! floor_increment = 0.3
//! extra_floor_surcharge_per_m2 = 200.0
//! permit_valuation_per_m2 = 1000.0
//! permit_rate = 0.05
//! validity_days = 30
//! default_client_name = "Client"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{QuoteError, QuoteResult};

/// Upper bound on the validity period (ten years)
pub const MAX_VALIDITY_DAYS: i64 = 3650;

/// Pricing-model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSettings {
    /// Cost increase per floor beyond the first (0.3 = +30 %)
    pub floor_increment: f64,

    /// Flat surcharge per m² for each floor beyond the first (USD)
    pub extra_floor_surcharge_per_m2: f64,

    /// Flat valuation per m² the permit levy is computed on (USD)
    pub permit_valuation_per_m2: f64,

    /// Permit and management levy as a share of the flat valuation
    pub permit_rate: f64,

    /// Days a quote stays valid after issuance
    pub validity_days: i64,

    /// Name shown on a quote when the request carries none
    pub default_client_name: String,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        QuoteSettings {
            floor_increment: 0.3,
            extra_floor_surcharge_per_m2: 200.0,
            permit_valuation_per_m2: 1000.0,
            permit_rate: 0.05,
            validity_days: 30,
            default_client_name: "Client".to_string(),
        }
    }
}

impl QuoteSettings {
    /// Parse settings from TOML. Absent keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> QuoteResult<Self> {
        let settings: QuoteSettings = toml::from_str(contents)
            .map_err(|e| QuoteError::serialization(format!("Invalid settings TOML: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> QuoteResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| QuoteError::file_error("read settings", path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    /// Reject non-finite or negative values.
    pub fn validate(&self) -> QuoteResult<()> {
        let amounts = [
            ("floor_increment", self.floor_increment),
            ("extra_floor_surcharge_per_m2", self.extra_floor_surcharge_per_m2),
            ("permit_valuation_per_m2", self.permit_valuation_per_m2),
            ("permit_rate", self.permit_rate),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(QuoteError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a finite, non-negative number",
                ));
            }
        }

        if !(0..=MAX_VALIDITY_DAYS).contains(&self.validity_days) {
            return Err(QuoteError::invalid_input(
                "validity_days",
                self.validity_days.to_string(),
                format!("Validity period must be between 0 and {} days", MAX_VALIDITY_DAYS),
            ));
        }

        Ok(())
    }
}
