//! End-to-end pricing scenarios against the standard rate table.

use chrono::{Duration, NaiveDate};
use quote_core::engine::{CostCategory, QuoteEngine};
use quote_core::format::{format_usd, parse_usd};
use quote_core::rates::{RateStore, RateTable, DEFAULT_BASE_PRICE_PER_M2};
use quote_core::request::{ClientInfo, ConstructionType, FinishLevel, Location, ProjectRequest, UsageType};
use quote_core::settings::QuoteSettings;
use std::sync::Arc;

fn steel_frame_mendoza() -> ProjectRequest {
    ProjectRequest::new(ConstructionType::SteelFrame, 100.0)
        .with_usage(UsageType::Residential)
        .with_finish(FinishLevel::Standard)
        .with_location(Location::Mendoza)
        .with_floors(1)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn single_floor_steel_frame() {
    let estimate = QuoteEngine::standard().quick_estimate(&steel_frame_mendoza()).unwrap();

    assert_eq!(estimate.rates.base_price_per_m2, 1200.0);
    assert_eq!(estimate.rates.regional_multiplier, 1.0);
    assert_eq!(estimate.base_cost_usd, 120_000.0);
    assert_eq!(estimate.floor_multiplier, 1.0);
    assert_eq!(estimate.total_cost_usd, 120_000.0);
    assert_eq!(estimate.duration.value(), 3.0);

    let f = estimate.formatted().unwrap();
    assert_eq!(f.estimated_cost, "U$D 120,000");
    assert_eq!(f.estimated_time, "3 months");
}

#[test]
fn two_floor_steel_frame() {
    let estimate = QuoteEngine::standard()
        .quick_estimate(&steel_frame_mendoza().with_floors(2))
        .unwrap();

    assert_eq!(estimate.floor_multiplier, 1.3);
    assert_eq!(estimate.total_cost_usd, 156_000.0);
}

#[test]
fn unknown_location_uses_neutral_multiplier() {
    let request = steel_frame_mendoza().with_location(Location::from_key("atlantis"));
    let estimate = QuoteEngine::standard().quick_estimate(&request).unwrap();

    assert_eq!(estimate.rates.regional_multiplier, 1.0);
    assert!(estimate.rates.multiplier_fallback);
    assert_eq!(estimate.total_cost_usd, 120_000.0);
}

#[test]
fn detailed_quote_two_floors() {
    let client = ClientInfo::new("Lucía Pérez", "lucia@example.com", "+54 261 555 0101");
    let request = steel_frame_mendoza().with_floors(2).with_client(client);
    let quote = QuoteEngine::standard().detailed_quote_on(&request, date(2025, 6, 1)).unwrap();

    assert_eq!(quote.base_cost_usd, 156_000.0);
    assert_eq!(quote.additional_costs.extra_floors_usd, 20_000.0);
    assert_eq!(quote.additional_costs.permits_usd, 5_000.0);
    assert_eq!(quote.additional_costs.total_usd(), 25_000.0);
    assert_eq!(quote.total_cost_usd, 181_000.0);

    // Breakdown covers the pre-floor base cost
    assert_eq!(quote.breakdown.base_cost_usd, 120_000.0);
    assert_eq!(quote.breakdown.cost_of(CostCategory::Structure), 48_000.0);
    assert_eq!(quote.breakdown.total_usd(), 120_000.0);

    let f = quote.formatted().unwrap();
    assert_eq!(f.total_cost, "U$D 181,000");
    assert_eq!(f.client_name, "Lucía Pérez");
    assert_eq!(f.quote_date, "01/06/2025");
    assert_eq!(f.valid_until, "01/07/2025");
}

#[test]
fn every_tabled_combination_has_positive_price() {
    let table = RateTable::standard();
    for ct in ConstructionType::ALL {
        for ut in UsageType::ALL {
            for fl in FinishLevel::ALL {
                let price = table.lookup_base_price(&ct, &ut, &fl);
                assert!(price.is_finite() && price > 0.0, "{ct}/{ut}/{fl}: {price}");
                assert!(table.try_base_price(&ct, &ut, &fl).is_some());
            }
        }
    }

    let odd = ConstructionType::from_key("geodesic_dome");
    assert_eq!(
        table.lookup_base_price(&odd, &UsageType::Residential, &FinishLevel::Standard),
        DEFAULT_BASE_PRICE_PER_M2
    );
}

#[test]
fn total_is_monotonic_in_area_floors_and_region() {
    let engine = QuoteEngine::standard();
    let total = |request: &ProjectRequest| engine.quick_estimate(request).unwrap().total_cost_usd;

    let mut previous = 0.0;
    for area in [1.0, 10.0, 55.5, 100.0, 250.0, 1_000.0] {
        let t = total(&steel_frame_mendoza().with_area(area));
        assert!(t >= previous);
        previous = t;
    }

    let mut previous = 0.0;
    for floors in 1..=8 {
        let t = total(&steel_frame_mendoza().with_floors(floors));
        assert!(t >= previous);
        previous = t;
    }

    let mut locations = Location::ALL.to_vec();
    let table = RateTable::standard();
    locations.sort_by(|a, b| table.lookup_multiplier(a).total_cmp(&table.lookup_multiplier(b)));
    let mut previous = 0.0;
    for location in locations {
        let t = total(&steel_frame_mendoza().with_location(location));
        assert!(t >= previous);
        previous = t;
    }
}

#[test]
fn validity_is_thirty_days() {
    let engine = QuoteEngine::standard();
    for quote_date in [date(2024, 2, 10), date(2024, 12, 15), date(2025, 1, 31)] {
        let quote = engine.detailed_quote_on(&steel_frame_mendoza(), quote_date).unwrap();
        assert_eq!(quote.valid_until - quote.quote_date, Duration::days(30));
        assert_eq!(quote.validity_days(), 30);
    }
}

#[test]
fn formatted_costs_parse_back() {
    let engine = QuoteEngine::standard();
    for (area, floors) in [(100.0, 1), (37.0, 2), (812.0, 3)] {
        let request = steel_frame_mendoza().with_area(area).with_floors(floors);
        let quote = engine.detailed_quote_on(&request, date(2025, 6, 1)).unwrap();
        for amount in [quote.base_cost_usd, quote.additional_costs.total_usd(), quote.total_cost_usd] {
            let parsed = parse_usd(&format_usd(amount).unwrap()).unwrap();
            assert!((parsed - amount).abs() <= 0.5, "{amount} -> {parsed}");
        }
    }
}

#[test]
fn refreshed_rates_apply_to_later_quotes() {
    let store = Arc::new(RateStore::standard());
    let engine = QuoteEngine::new(Arc::clone(&store), QuoteSettings::default()).unwrap();
    let before = engine.quick_estimate(&steel_frame_mendoza()).unwrap();

    let mut table = RateTable::standard();
    table.set_multiplier(Location::Mendoza, 1.5);
    store.replace(table).unwrap();

    let after = engine.quick_estimate(&steel_frame_mendoza()).unwrap();
    assert_eq!(before.total_cost_usd, 120_000.0);
    assert_eq!(after.total_cost_usd, 180_000.0);
}

#[test]
fn custom_settings_change_surcharges() {
    let settings = QuoteSettings::from_toml_str("validity_days = 15\npermit_rate = 0.1\n").unwrap();
    let engine = QuoteEngine::new(Arc::new(RateStore::standard()), settings).unwrap();
    let quote = engine.detailed_quote_on(&steel_frame_mendoza(), date(2025, 6, 1)).unwrap();

    assert_eq!(quote.additional_costs.permits_usd, 10_000.0);
    assert_eq!(quote.valid_until, date(2025, 6, 16));
}

#[test]
fn engine_rejects_out_of_range_settings() {
    let settings = QuoteSettings {
        validity_days: i64::MAX,
        ..Default::default()
    };
    assert!(QuoteEngine::new(Arc::new(RateStore::standard()), settings).is_err());
}
