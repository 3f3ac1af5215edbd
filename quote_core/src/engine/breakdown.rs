//! # Cost Breakdown
//!
//! Splits the pre-floor base cost into four fixed categories:
//!
//! | Category | Share |
//! |---|---|
//! | Structure | 40 % |
//! | Materials | 30 % |
//! | Labor | 20 % |
//! | Installations | 10 % |
//!
//! The shares do not depend on the construction type. Installations takes
//! the remainder so the four lines always sum exactly to the base cost.

use serde::{Deserialize, Serialize};

use crate::errors::QuoteResult;
use crate::format::{format_percent, format_usd};

/// One of the four fixed cost categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Structure,
    Materials,
    Labor,
    Installations,
}

impl CostCategory {
    /// All categories in breakdown order
    pub const ALL: [CostCategory; 4] = [
        CostCategory::Structure,
        CostCategory::Materials,
        CostCategory::Labor,
        CostCategory::Installations,
    ];

    /// Share of the base cost (0.0 - 1.0)
    pub fn share(&self) -> f64 {
        match self {
            CostCategory::Structure => 0.4,
            CostCategory::Materials => 0.3,
            CostCategory::Labor => 0.2,
            CostCategory::Installations => 0.1,
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CostCategory::Structure => "Basic Structure",
            CostCategory::Materials => "Materials",
            CostCategory::Labor => "Labor",
            CostCategory::Installations => "Installations",
        }
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single breakdown line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub category: CostCategory,
    pub cost_usd: f64,
    /// Share of the base cost (0.0 - 1.0)
    pub share: f64,
}

/// Display strings for one breakdown line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedBreakdownLine {
    pub category: String,
    pub cost: String,
    pub percentage: String,
}

/// Base cost split into the four categories, in [`CostCategory::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// The cost being split (area × base price × regional multiplier)
    pub base_cost_usd: f64,
    pub lines: Vec<BreakdownLine>,
}

impl CostBreakdown {
    /// Split `base_cost_usd` across the categories.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quote_core::engine::breakdown::{CostBreakdown, CostCategory};
    ///
    /// let breakdown = CostBreakdown::split(120_000.0);
    /// assert_eq!(breakdown.cost_of(CostCategory::Structure), 48_000.0);
    /// assert_eq!(breakdown.total_usd(), 120_000.0);
    /// ```
    pub fn split(base_cost_usd: f64) -> Self {
        let structure = base_cost_usd * CostCategory::Structure.share();
        let materials = base_cost_usd * CostCategory::Materials.share();
        let labor = base_cost_usd * CostCategory::Labor.share();
        // Remainder, summed in the same order as total_usd()
        let installations = base_cost_usd - (structure + materials + labor);

        let lines = CostCategory::ALL
            .into_iter()
            .zip([structure, materials, labor, installations])
            .map(|(category, cost_usd)| BreakdownLine {
                category,
                cost_usd,
                share: category.share(),
            })
            .collect();

        CostBreakdown { base_cost_usd, lines }
    }

    /// Sum of the category costs
    pub fn total_usd(&self) -> f64 {
        self.lines.iter().fold(0.0, |acc, line| acc + line.cost_usd)
    }

    /// Sum of the category shares
    pub fn total_share(&self) -> f64 {
        self.lines.iter().map(|line| line.share).sum()
    }

    /// Cost of a single category
    pub fn cost_of(&self, category: CostCategory) -> f64 {
        self.lines
            .iter()
            .find(|line| line.category == category)
            .map(|line| line.cost_usd)
            .unwrap_or(0.0)
    }

    /// Display strings per line
    pub fn formatted(&self) -> QuoteResult<Vec<FormattedBreakdownLine>> {
        self.lines
            .iter()
            .map(|line| {
                Ok(FormattedBreakdownLine {
                    category: line.category.display_name().to_string(),
                    cost: format_usd(line.cost_usd)?,
                    percentage: format_percent(line.share),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shares_sum_to_one() {
        let total: f64 = CostCategory::ALL.iter().map(|c| c.share()).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((CostBreakdown::split(1.0).total_share() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_split_standard_base() {
        let b = CostBreakdown::split(120_000.0);
        assert_eq!(b.lines.len(), 4);
        assert_eq!(b.cost_of(CostCategory::Structure), 48_000.0);
        assert_eq!(b.cost_of(CostCategory::Materials), 36_000.0);
        assert_eq!(b.cost_of(CostCategory::Labor), 24_000.0);
        assert!((b.cost_of(CostCategory::Installations) - 12_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_lines_sum_exactly_to_base() {
        for base in [0.0, 1.0, 0.1, 99_999.99, 120_000.0, 133_333.33, 1.0e9 + 0.7, 7.3e-3, -5_000.5] {
            let b = CostBreakdown::split(base);
            assert_eq!(b.total_usd(), base, "breakdown of {} does not sum exactly", base);
        }
    }

    #[test]
    fn test_order_is_fixed() {
        let b = CostBreakdown::split(10.0);
        let categories: Vec<_> = b.lines.iter().map(|l| l.category).collect();
        assert_eq!(categories, CostCategory::ALL.to_vec());
    }

    #[test]
    fn test_formatted_lines() {
        let lines = CostBreakdown::split(120_000.0).formatted().unwrap();
        assert_eq!(lines[0].category, "Basic Structure");
        assert_eq!(lines[0].cost, "U$D 48,000");
        assert_eq!(lines[0].percentage, "40%");
        assert_eq!(lines[3].category, "Installations");
        assert_eq!(lines[3].cost, "U$D 12,000");
        assert_eq!(lines[3].percentage, "10%");
    }

    #[test]
    fn test_formatted_fails_on_non_finite() {
        assert!(CostBreakdown::split(f64::NAN).formatted().is_err());
    }
}
