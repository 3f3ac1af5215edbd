//! # Material Price List
//!
//! Reference unit prices for individual building materials, shown next to
//! quotes. These prices come from a price feed and are informational: the
//! quote engine prices per m² through the rate table, not per material.
//!
//! Feed payloads are parsed leniently. Field names may be English or Spanish
//! (`name`/`nombre`, `price`/`precio`, ...), missing fields get defaults, and
//! a payload that is not a JSON array falls back to [`default_materials`].
//!
//! ## Example
//!
//! ```rust
//! use quote_core::materials::{MaterialList, MaterialSource};
//!
//! let list = MaterialList::from_feed_json(r#"[{"nombre": "Chapa T101", "precio": 12.4, "unidad": "m²"}]"#);
//! assert_eq!(list.source, MaterialSource::Feed);
//! assert_eq!(list.materials[0].name, "Chapa T101");
//!
//! let fallback = MaterialList::from_feed_json("{\"error\": \"upstream timeout\"}");
//! assert_eq!(fallback.source, MaterialSource::Fallback);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::format::{title_case_key, CURRENCY_PREFIX};

/// Material grouping used in the price list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaterialCategory {
    Structure,
    Roofing,
    Insulation,
    Interior,
    Finishing,
    General,
    /// Unrecognised category, kept verbatim
    Other(String),
}

impl MaterialCategory {
    /// Parse from any string, accepting the feed's Spanish keys.
    pub fn from_key(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "structure" | "estructura" => MaterialCategory::Structure,
            "roofing" | "cubierta" => MaterialCategory::Roofing,
            "insulation" | "aislamiento" => MaterialCategory::Insulation,
            "interior" => MaterialCategory::Interior,
            "finishing" | "terminacion" | "terminación" => MaterialCategory::Finishing,
            "general" | "" => MaterialCategory::General,
            _ => MaterialCategory::Other(raw.trim().to_string()),
        }
    }

    /// Canonical key
    pub fn key(&self) -> &str {
        match self {
            MaterialCategory::Structure => "structure",
            MaterialCategory::Roofing => "roofing",
            MaterialCategory::Insulation => "insulation",
            MaterialCategory::Interior => "interior",
            MaterialCategory::Finishing => "finishing",
            MaterialCategory::General => "general",
            MaterialCategory::Other(raw) => raw,
        }
    }

    /// Display name
    pub fn display_name(&self) -> String {
        match self {
            MaterialCategory::Structure => "Structure".to_string(),
            MaterialCategory::Roofing => "Roofing".to_string(),
            MaterialCategory::Insulation => "Insulation".to_string(),
            MaterialCategory::Interior => "Interior".to_string(),
            MaterialCategory::Finishing => "Finishing".to_string(),
            MaterialCategory::General => "General".to_string(),
            MaterialCategory::Other(raw) => title_case_key(raw),
        }
    }
}

impl From<String> for MaterialCategory {
    fn from(raw: String) -> Self {
        MaterialCategory::from_key(&raw)
    }
}

impl From<MaterialCategory> for String {
    fn from(category: MaterialCategory) -> Self {
        category.key().to_string()
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One priced material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPrice {
    pub id: String,
    pub name: String,
    pub category: MaterialCategory,
    pub description: String,
    /// Unit price in USD
    pub price_usd: f64,
    /// Unit the price refers to (m², linear metre, ...)
    pub unit: String,
}

impl MaterialPrice {
    /// Price with two decimals and its unit, e.g. `U$D 25.50 per linear metre`
    pub fn price_label(&self) -> String {
        format!("{} {:.2} per {}", CURRENCY_PREFIX, self.price_usd, self.unit)
    }

    /// Build an entry from one feed object, filling defaults.
    fn from_feed_value(value: &Value) -> Self {
        let text = |keys: &[&str]| -> Option<String> {
            keys.iter().find_map(|k| match value.get(*k) {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
        };
        let number = |keys: &[&str]| -> Option<f64> {
            keys.iter().find_map(|k| match value.get(*k) {
                Some(Value::Number(n)) => n.as_f64(),
                Some(Value::String(s)) => s.trim().parse().ok(),
                _ => None,
            })
        };

        MaterialPrice {
            id: text(&["id"]).unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: text(&["nombre", "name"]).unwrap_or_else(|| "Material".to_string()),
            category: MaterialCategory::from_key(&text(&["categoria", "category"]).unwrap_or_default()),
            description: text(&["descripcion", "description"])
                .unwrap_or_else(|| "Description not available".to_string()),
            price_usd: number(&["precio", "price"])
                .filter(|p| p.is_finite())
                .unwrap_or(0.0),
            unit: text(&["unidad", "unit"]).unwrap_or_else(|| "unit".to_string()),
        }
    }
}

/// Where a material list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialSource {
    /// Parsed from a feed payload
    Feed,
    /// Feed unusable, built-in defaults returned
    Fallback,
}

/// A list of material prices and its origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialList {
    pub source: MaterialSource,
    pub materials: Vec<MaterialPrice>,
}

impl MaterialList {
    /// Parse a price-feed payload. Never fails: unusable payloads yield the
    /// built-in defaults with [`MaterialSource::Fallback`].
    pub fn from_feed_json(payload: &str) -> Self {
        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Array(items)) => MaterialList {
                source: MaterialSource::Feed,
                materials: items.iter().map(MaterialPrice::from_feed_value).collect(),
            },
            Ok(_) => {
                warn!("Material feed payload is not an array, using default materials");
                MaterialList::fallback()
            }
            Err(e) => {
                warn!(error = %e, "Material feed payload is not valid JSON, using default materials");
                MaterialList::fallback()
            }
        }
    }

    /// The built-in defaults
    pub fn fallback() -> Self {
        MaterialList {
            source: MaterialSource::Fallback,
            materials: default_materials(),
        }
    }

    /// Materials in one category
    pub fn in_category<'a>(&'a self, category: &'a MaterialCategory) -> impl Iterator<Item = &'a MaterialPrice> + 'a {
        self.materials.iter().filter(move |m| &m.category == category)
    }
}

/// Built-in material prices used when the feed is unavailable
pub fn default_materials() -> Vec<MaterialPrice> {
    vec![
        MaterialPrice {
            id: "1".to_string(),
            name: "C-profile 100x50x2mm".to_string(),
            category: MaterialCategory::Structure,
            description: "Galvanised steel profile for steel-frame structures".to_string(),
            price_usd: 25.50,
            unit: "linear metre".to_string(),
        },
        MaterialPrice {
            id: "2".to_string(),
            name: "OSB panel 15mm".to_string(),
            category: MaterialCategory::Structure,
            description: "Structural OSB sheathing panel".to_string(),
            price_usd: 18.75,
            unit: "m²".to_string(),
        },
        MaterialPrice {
            id: "3".to_string(),
            name: "Glass wool insulation 100mm".to_string(),
            category: MaterialCategory::Insulation,
            description: "Thermal and acoustic glass wool insulation".to_string(),
            price_usd: 8.90,
            unit: "m²".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = default_materials();
        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults[0].price_label(), "U$D 25.50 per linear metre");
        assert_eq!(defaults[2].category, MaterialCategory::Insulation);
    }

    #[test]
    fn test_feed_with_spanish_fields() {
        let payload = r#"[
            {"id": 7, "nombre": "Perfil U 70mm", "categoria": "estructura", "descripcion": "Solera", "precio": "14.2", "unidad": "metro lineal"},
            {"name": "Roof sheet", "category": "cubierta", "price": 31}
        ]"#;
        let list = MaterialList::from_feed_json(payload);
        assert_eq!(list.source, MaterialSource::Feed);
        assert_eq!(list.materials.len(), 2);

        let first = &list.materials[0];
        assert_eq!(first.id, "7");
        assert_eq!(first.category, MaterialCategory::Structure);
        assert_eq!(first.price_usd, 14.2);
        assert_eq!(first.unit, "metro lineal");

        let second = &list.materials[1];
        assert_eq!(second.category, MaterialCategory::Roofing);
        assert_eq!(second.description, "Description not available");
        assert_eq!(second.unit, "unit");
        assert!(!second.id.is_empty());
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let list = MaterialList::from_feed_json("[{}]");
        let m = &list.materials[0];
        assert_eq!(m.name, "Material");
        assert_eq!(m.category, MaterialCategory::General);
        assert_eq!(m.price_usd, 0.0);
    }

    #[test]
    fn test_unusable_payloads_fall_back() {
        assert_eq!(MaterialList::from_feed_json("not json").source, MaterialSource::Fallback);
        let list = MaterialList::from_feed_json("{\"items\": []}");
        assert_eq!(list.source, MaterialSource::Fallback);
        assert_eq!(list.materials, default_materials());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(MaterialCategory::from_key("terminacion").display_name(), "Finishing");
        assert_eq!(MaterialCategory::from_key("electrical-supplies").display_name(), "Electrical Supplies");
    }

    #[test]
    fn test_in_category() {
        let list = MaterialList::fallback();
        assert_eq!(list.in_category(&MaterialCategory::Structure).count(), 2);
    }
}
