//! # Unit Types
//!
//! Lightweight newtype wrappers for the quantities the quote engine works
//! with. They keep area, money and duration from being mixed up while still
//! serializing as plain numbers.
//!
//! ## Units
//!
//! - Area: square metres (m²)
//! - Money: US dollars (USD), the single currency for every quoted figure
//! - Unit price: USD per square metre
//! - Duration: months (fractional values such as 1.5 are allowed)
//!
//! ## Example
//!
//! ```rust
//! use quote_core::units::{SquareMeters, UsdPerM2, Usd};
//!
//! let area = SquareMeters(100.0);
//! let price = UsdPerM2(1200.0);
//! let cost: Usd = area * price;
//! assert_eq!(cost.0, 120_000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Area
// ============================================================================

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

// ============================================================================
// Money
// ============================================================================

/// Amount in US dollars
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usd(pub f64);

/// Unit price in US dollars per square metre
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsdPerM2(pub f64);

impl Mul<UsdPerM2> for SquareMeters {
    type Output = Usd;
    fn mul(self, rhs: UsdPerM2) -> Usd {
        Usd(self.0 * rhs.0)
    }
}

impl Sum for Usd {
    fn sum<I: Iterator<Item = Usd>>(iter: I) -> Self {
        Usd(iter.map(|u| u.0).sum())
    }
}

// ============================================================================
// Duration
// ============================================================================

/// Duration in months
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Months(pub f64);

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }

            /// True if the value is neither NaN nor infinite
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }
    };
}

impl_arithmetic!(SquareMeters);
impl_arithmetic!(Usd);
impl_arithmetic!(UsdPerM2);
impl_arithmetic!(Months);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_times_unit_price() {
        let cost = SquareMeters(120.0) * UsdPerM2(1300.0);
        assert_eq!(cost, Usd(156_000.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Usd(10_000.0);
        let b = Usd(2_500.0);
        assert_eq!((a + b).0, 12_500.0);
        assert_eq!((a - b).0, 7_500.0);
        assert_eq!((a * 1.3).0, 13_000.0);
        assert_eq!((a / 4.0).0, 2_500.0);
    }

    #[test]
    fn test_usd_sum() {
        let total: Usd = [Usd(1.0), Usd(2.0), Usd(3.5)].into_iter().sum();
        assert_eq!(total, Usd(6.5));
    }

    #[test]
    fn test_serialization() {
        let months = Months(2.5);
        let json = serde_json::to_string(&months).unwrap();
        assert_eq!(json, "2.5");

        let roundtrip: Months = serde_json::from_str(&json).unwrap();
        assert_eq!(months, roundtrip);
    }
}
