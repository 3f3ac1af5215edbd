//! # quote_core - Construction Quote Engine
//!
//! `quote_core` prices prefabricated and dry-construction building projects
//! (steel frame, industrial, shipping container, mixed) across the 24
//! Argentine provinces. It produces a quick cost estimate or a detailed,
//! dated quote with a cost breakdown. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Explicit rates**: Every computation runs against a [`RateTable`]
//!   snapshot; nothing reads global mutable state
//! - **Total lookups**: Unknown categories fall back to documented defaults
//! - **Raw numbers inside**: Amounts stay `f64` until [`format`] renders them
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use quote_core::{ProjectRequest, QuoteEngine};
//! use quote_core::request::{ConstructionType, Location};
//!
//! let engine = QuoteEngine::standard();
//! let request = ProjectRequest::new(ConstructionType::SteelFrame, 100.0)
//!     .with_location(Location::Mendoza);
//!
//! let estimate = engine.quick_estimate(&request).unwrap();
//! assert_eq!(estimate.total_cost_usd, 120_000.0);
//! assert_eq!(estimate.formatted().unwrap().estimated_cost, "U$D 120,000");
//! ```
//!
//! ## Modules
//!
//! - [`request`] - Project request and its categorical enums
//! - [`rates`] - Rate tables and the swappable [`RateStore`]
//! - [`engine`] - Quick estimates and detailed quotes
//! - [`format`] - Currency and label formatting
//! - [`validation`] - Checks for the layer in front of the engine
//! - [`catalog`] - Descriptions of the selectable options
//! - [`materials`] - Reference material price list
//! - [`settings`] - Tunable pricing constants
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Rate-table and quote files with atomic saves and locking

pub mod catalog;
pub mod engine;
pub mod errors;
pub mod file_io;
pub mod format;
pub mod materials;
pub mod rates;
pub mod request;
pub mod settings;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use engine::{EstimateResult, Quote, QuoteEngine};
pub use errors::{QuoteError, QuoteResult};
pub use file_io::{load_quote, load_rate_table, save_quote, save_rate_table, FileLock, QuoteRecord};
pub use rates::{RateStore, RateTable};
pub use request::{ClientInfo, ProjectRequest};
pub use settings::QuoteSettings;
