//! # Catalog
//!
//! Descriptive information about the options a client can pick, for forms
//! and quote documents. The price factors listed for finish levels and usage
//! types are indicative only; pricing always goes through the rate table.

use serde::Serialize;

use crate::rates::RateTable;
use crate::request::{ConstructionType, FinishLevel, Location, UsageType};

/// A construction system with its selling points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructionTypeInfo {
    pub construction_type: ConstructionType,
    pub name: String,
    pub description: &'static str,
    pub characteristics: Vec<&'static str>,
}

/// A finish level or usage type with its indicative price factor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionInfo<T> {
    pub option: T,
    pub name: String,
    pub description: &'static str,
    pub price_factor: f64,
}

/// A location and its current regional multiplier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionInfo {
    pub location: Location,
    pub name: String,
    pub multiplier: f64,
}

/// All known construction types
pub fn construction_types() -> Vec<ConstructionTypeInfo> {
    ConstructionType::ALL
        .into_iter()
        .map(|ct| {
            let (description, characteristics) = match ct {
                ConstructionType::SteelFrame => (
                    "Dry construction with galvanised steel profiles",
                    vec!["Fast construction", "Excellent insulation", "Low environmental impact"],
                ),
                ConstructionType::Industrial => (
                    "Structural steel and metal frames",
                    vec!["High strength", "Ideal for industrial sheds", "Economical"],
                ),
                ConstructionType::Container => (
                    "Shipping containers converted into habitable modules",
                    vec!["Very economical", "Portable", "Fast"],
                ),
                ConstructionType::Mixed => (
                    "Combination of different building systems",
                    vec!["Flexible", "Customisable", "Adaptable"],
                ),
                ConstructionType::Other(_) => ("", Vec::new()),
            };
            ConstructionTypeInfo {
                name: ct.display_name(),
                construction_type: ct,
                description,
                characteristics,
            }
        })
        .collect()
}

/// All known finish levels
pub fn finish_levels() -> Vec<OptionInfo<FinishLevel>> {
    FinishLevel::ALL
        .into_iter()
        .map(|fl| {
            let (description, price_factor) = match fl {
                FinishLevel::Basic => ("Basic finishes for functional use", 0.7),
                FinishLevel::Standard => ("Standard finishes for residential use", 1.0),
                FinishLevel::Premium => ("Premium finishes with high-quality materials", 1.4),
                FinishLevel::Other(_) => ("", 1.0),
            };
            OptionInfo {
                name: fl.display_name(),
                option: fl,
                description,
                price_factor,
            }
        })
        .collect()
}

/// All known usage types
pub fn usage_types() -> Vec<OptionInfo<UsageType>> {
    UsageType::ALL
        .into_iter()
        .map(|ut| {
            let (description, price_factor) = match ut {
                UsageType::Residential => ("Homes and living spaces", 1.0),
                UsageType::Industrial => ("Industrial sheds and workspaces", 0.9),
                UsageType::Commercial => ("Shops and public spaces", 1.1),
                UsageType::Other(_) => ("", 1.0),
            };
            OptionInfo {
                name: ut.display_name(),
                option: ut,
                description,
                price_factor,
            }
        })
        .collect()
}

/// Regional multipliers for every known location, as tabled in `rates`.
pub fn regions(rates: &RateTable) -> Vec<RegionInfo> {
    Location::ALL
        .into_iter()
        .map(|location| RegionInfo {
            name: location.display_name(),
            multiplier: rates.lookup_multiplier(&location),
            location,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_types_are_described() {
        let types = construction_types();
        assert_eq!(types.len(), 4);
        for info in &types {
            assert!(!info.description.is_empty());
            assert_eq!(info.characteristics.len(), 3);
        }
        assert_eq!(types[2].name, "Shipping Container");
    }

    #[test]
    fn test_price_factors() {
        let finishes = finish_levels();
        assert_eq!(finishes.iter().map(|f| f.price_factor).collect::<Vec<_>>(), vec![0.7, 1.0, 1.4]);

        let usages = usage_types();
        let commercial = usages.iter().find(|u| u.option == UsageType::Commercial).unwrap();
        assert_eq!(commercial.price_factor, 1.1);
    }

    #[test]
    fn test_regions_follow_rate_table() {
        let mut table = RateTable::standard();
        let regions_before = regions(&table);
        assert_eq!(regions_before.len(), 24);
        assert_eq!(regions_before[0].name, "Buenos Aires");
        assert_eq!(regions_before[0].multiplier, 1.2);

        table.set_multiplier(Location::BuenosAires, 1.25);
        assert_eq!(regions(&table)[0].multiplier, 1.25);
    }

    #[test]
    fn test_catalog_serializes() {
        let json = serde_json::to_string(&construction_types()).unwrap();
        assert!(json.contains("\"construction_type\":\"steel_frame\""));
    }
}
