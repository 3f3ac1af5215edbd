//! Atomically swappable rate-table snapshot.
//!
//! Readers call [`RateStore::snapshot`] and work against that `Arc` for the
//! whole computation. A refresher builds a complete new [`RateTable`] and
//! installs it with [`RateStore::replace`]; readers see either the old or the
//! new table, never a mix. A table that fails validation is rejected and the
//! current one stays in place.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{info, warn};

use super::{RateTable, STANDARD_RATES};
use crate::errors::QuoteResult;
use crate::file_io::load_rate_table;

/// Shared holder for the current rate table.
#[derive(Debug)]
pub struct RateStore {
    current: ArcSwap<RateTable>,
}

impl RateStore {
    /// Create a store holding `table`, after validating it.
    pub fn new(table: RateTable) -> QuoteResult<Self> {
        table.validate()?;
        Ok(RateStore {
            current: ArcSwap::from_pointee(table),
        })
    }

    /// Create a store holding the process-wide standard table.
    pub fn standard() -> Self {
        RateStore {
            current: ArcSwap::new(Arc::clone(&STANDARD_RATES)),
        }
    }

    /// Current table. Hold on to the returned `Arc` for the duration of one
    /// computation.
    pub fn snapshot(&self) -> Arc<RateTable> {
        self.current.load_full()
    }

    /// Validate `table` and install it.
    pub fn replace(&self, table: RateTable) -> QuoteResult<()> {
        if let Err(e) = table.validate() {
            warn!(source = %table.source, error = %e, "Rejecting rate table, keeping current snapshot");
            return Err(e);
        }

        info!(
            source = %table.source,
            base_prices = table.base_price_count(),
            regions = table.regional_multipliers.len(),
            "Installing new rate table"
        );
        self.current.store(Arc::new(table));
        Ok(())
    }

    /// Load a rate-table file and install it.
    ///
    /// On any failure (I/O, parse, version, validation) the current table
    /// stays installed and the error is returned.
    pub fn reload_from_file(&self, path: &Path) -> QuoteResult<()> {
        let table = load_rate_table(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to load rate table");
            e
        })?;
        self.replace(table)
    }
}

impl Default for RateStore {
    fn default() -> Self {
        RateStore::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ConstructionType, FinishLevel, Location, UsageType};
    use std::thread;

    #[test]
    fn test_standard_store_shares_static_table() {
        let store = RateStore::standard();
        assert!(Arc::ptr_eq(&store.snapshot(), &STANDARD_RATES));
    }

    #[test]
    fn test_replace_swaps_whole_table() {
        let store = RateStore::standard();
        let before = store.snapshot();

        let mut table = RateTable::standard();
        table.source = "feed".to_string();
        table.set_multiplier(Location::Mendoza, 1.5);
        store.replace(table).unwrap();

        let after = store.snapshot();
        assert_eq!(after.source, "feed");
        assert_eq!(after.lookup_multiplier(&Location::Mendoza), 1.5);
        // Snapshots taken earlier are unaffected
        assert_eq!(before.lookup_multiplier(&Location::Mendoza), 1.0);
    }

    #[test]
    fn test_invalid_table_is_rejected_and_old_one_kept() {
        let store = RateStore::standard();
        let mut table = RateTable::standard();
        table.set_base_price(ConstructionType::SteelFrame, UsageType::Residential, FinishLevel::Standard, -5.0);

        assert!(store.replace(table).is_err());
        assert_eq!(store.snapshot().source, "standard");
    }

    #[test]
    fn test_new_validates() {
        let mut table = RateTable::empty("bad");
        table.set_multiplier(Location::Salta, f64::INFINITY);
        assert!(RateStore::new(table).is_err());
        assert!(RateStore::new(RateTable::empty("ok")).is_ok());
    }

    #[test]
    fn test_reload_from_missing_file_keeps_table() {
        let store = RateStore::standard();
        let err = store.reload_from_file(Path::new("/nonexistent/rates.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert_eq!(store.snapshot().source, "standard");
    }

    #[test]
    fn test_concurrent_readers_see_complete_tables() {
        let store = Arc::new(RateStore::standard());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = store.snapshot();
                        // Either every multiplier is from the old table or every one is doubled
                        let mendoza = snapshot.lookup_multiplier(&Location::Mendoza);
                        let cordoba = snapshot.lookup_multiplier(&Location::Cordoba);
                        assert!(
                            (mendoza == 1.0 && cordoba == 1.1) || (mendoza == 2.0 && cordoba == 2.2),
                            "torn snapshot: {} {}",
                            mendoza,
                            cordoba
                        );
                    }
                })
            })
            .collect();

        for round in 0..50 {
            let mut table = RateTable::standard();
            if round % 2 == 0 {
                for loc in Location::ALL {
                    let m = table.lookup_multiplier(&loc);
                    table.set_multiplier(loc, m * 2.0);
                }
            }
            store.replace(table).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
