//! # Project Request
//!
//! The immutable input to the quote engine. Every categorical field is a
//! closed enumeration with an `Other(String)` escape hatch: parsing never
//! fails, so a misspelled or newly added key still produces a quote (priced
//! with the rate table's documented fallbacks) instead of an error.
//!
//! ## Keys
//!
//! Each enum has a canonical snake_case key (`steel_frame`, `buenos_aires`).
//! [`ConstructionType::from_key`] and friends normalise case, `-` and spaces,
//! and also accept the Spanish keys sent by the quote request form
//! (`contenedor`, `mixto`, `residencial`, `estandar`, ...).
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "construction_type": "steel-frame",
//!   "usage_type": "residential",
//!   "finish_level": "standard",
//!   "area_m2": 120.0,
//!   "floors": 2,
//!   "location": "mendoza",
//!   "client": { "name": "Franco", "email": "franco@example.com", "phone": "+54 261 000 0000" }
//! }
//! ```
//!
//! Absent fields take the documented defaults (steel frame, residential,
//! standard, 100 m², one floor, Mendoza).

use serde::{Deserialize, Serialize};

use crate::format::title_case_key;

/// Lower-case a raw key and map `-` and whitespace to `_`
fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Serde and Display glue shared by every keyed enum.
macro_rules! impl_keyed_enum {
    ($type:ident) => {
        impl From<String> for $type {
            fn from(raw: String) -> Self {
                $type::from_key(&raw)
            }
        }

        impl From<&str> for $type {
            fn from(raw: &str) -> Self {
                $type::from_key(raw)
            }
        }

        impl From<$type> for String {
            fn from(value: $type) -> Self {
                value.key().to_string()
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.display_name())
            }
        }

        impl $type {
            /// True if this value is not one of the known variants
            pub fn is_other(&self) -> bool {
                matches!(self, $type::Other(_))
            }
        }
    };
}

// ============================================================================
// Construction Type
// ============================================================================

/// Building system being quoted
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConstructionType {
    /// Dry construction with galvanised steel profiles
    SteelFrame,
    /// Structural steel sheds and industrial buildings
    Industrial,
    /// Converted shipping containers
    Container,
    /// Combination of systems
    Mixed,
    /// Unrecognised key, kept verbatim
    Other(String),
}

impl ConstructionType {
    /// All known construction types
    pub const ALL: [ConstructionType; 4] = [
        ConstructionType::SteelFrame,
        ConstructionType::Industrial,
        ConstructionType::Container,
        ConstructionType::Mixed,
    ];

    /// Parse from any string. Unknown keys become `Other`.
    pub fn from_key(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "steel_frame" | "steelframe" => ConstructionType::SteelFrame,
            "industrial" => ConstructionType::Industrial,
            "container" | "contenedor" | "shipping_container" => ConstructionType::Container,
            "mixed" | "mixto" => ConstructionType::Mixed,
            _ => ConstructionType::Other(raw.trim().to_string()),
        }
    }

    /// Canonical key
    pub fn key(&self) -> &str {
        match self {
            ConstructionType::SteelFrame => "steel_frame",
            ConstructionType::Industrial => "industrial",
            ConstructionType::Container => "container",
            ConstructionType::Mixed => "mixed",
            ConstructionType::Other(raw) => raw,
        }
    }

    /// Human-readable label
    pub fn display_name(&self) -> String {
        match self {
            ConstructionType::SteelFrame => "Steel Frame".to_string(),
            ConstructionType::Industrial => "Industrial".to_string(),
            ConstructionType::Container => "Shipping Container".to_string(),
            ConstructionType::Mixed => "Mixed System".to_string(),
            ConstructionType::Other(raw) => title_case_key(raw),
        }
    }
}

impl Default for ConstructionType {
    fn default() -> Self {
        ConstructionType::SteelFrame
    }
}

impl_keyed_enum!(ConstructionType);

// ============================================================================
// Usage Type
// ============================================================================

/// Intended use of the building
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UsageType {
    Residential,
    Commercial,
    Industrial,
    /// Unrecognised key, kept verbatim
    Other(String),
}

impl UsageType {
    /// All known usage types
    pub const ALL: [UsageType; 3] = [UsageType::Residential, UsageType::Commercial, UsageType::Industrial];

    /// Parse from any string. Unknown keys become `Other`.
    pub fn from_key(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "residential" | "residencial" => UsageType::Residential,
            "commercial" | "comercial" => UsageType::Commercial,
            "industrial" => UsageType::Industrial,
            _ => UsageType::Other(raw.trim().to_string()),
        }
    }

    /// Canonical key
    pub fn key(&self) -> &str {
        match self {
            UsageType::Residential => "residential",
            UsageType::Commercial => "commercial",
            UsageType::Industrial => "industrial",
            UsageType::Other(raw) => raw,
        }
    }

    /// Human-readable label
    pub fn display_name(&self) -> String {
        match self {
            UsageType::Residential => "Residential".to_string(),
            UsageType::Commercial => "Commercial".to_string(),
            UsageType::Industrial => "Industrial".to_string(),
            UsageType::Other(raw) => title_case_key(raw),
        }
    }
}

impl Default for UsageType {
    fn default() -> Self {
        UsageType::Residential
    }
}

impl_keyed_enum!(UsageType);

// ============================================================================
// Finish Level
// ============================================================================

/// Quality of interior and exterior finishes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinishLevel {
    Basic,
    Standard,
    Premium,
    /// Unrecognised key, kept verbatim
    Other(String),
}

impl FinishLevel {
    /// All known finish levels
    pub const ALL: [FinishLevel; 3] = [FinishLevel::Basic, FinishLevel::Standard, FinishLevel::Premium];

    /// Parse from any string. Unknown keys become `Other`.
    pub fn from_key(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "basic" | "basico" | "básico" => FinishLevel::Basic,
            "standard" | "estandar" | "estándar" => FinishLevel::Standard,
            "premium" => FinishLevel::Premium,
            _ => FinishLevel::Other(raw.trim().to_string()),
        }
    }

    /// Canonical key
    pub fn key(&self) -> &str {
        match self {
            FinishLevel::Basic => "basic",
            FinishLevel::Standard => "standard",
            FinishLevel::Premium => "premium",
            FinishLevel::Other(raw) => raw,
        }
    }

    /// Human-readable label
    pub fn display_name(&self) -> String {
        match self {
            FinishLevel::Basic => "Basic".to_string(),
            FinishLevel::Standard => "Standard".to_string(),
            FinishLevel::Premium => "Premium".to_string(),
            FinishLevel::Other(raw) => title_case_key(raw),
        }
    }
}

impl Default for FinishLevel {
    fn default() -> Self {
        FinishLevel::Standard
    }
}

impl_keyed_enum!(FinishLevel);

// ============================================================================
// Location
// ============================================================================

/// Province where the building is erected
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Location {
    BuenosAires,
    CiudadAutonomaBuenosAires,
    Cordoba,
    SantaFe,
    Mendoza,
    Tucuman,
    Salta,
    Jujuy,
    Chaco,
    Formosa,
    Misiones,
    Corrientes,
    EntreRios,
    LaPampa,
    RioNegro,
    Neuquen,
    Chubut,
    SantaCruz,
    TierraDelFuego,
    Catamarca,
    LaRioja,
    SanJuan,
    SanLuis,
    SantiagoDelEstero,
    /// Unrecognised key, kept verbatim
    Other(String),
}

impl Location {
    /// All known locations
    pub const ALL: [Location; 24] = [
        Location::BuenosAires,
        Location::CiudadAutonomaBuenosAires,
        Location::Cordoba,
        Location::SantaFe,
        Location::Mendoza,
        Location::Tucuman,
        Location::Salta,
        Location::Jujuy,
        Location::Chaco,
        Location::Formosa,
        Location::Misiones,
        Location::Corrientes,
        Location::EntreRios,
        Location::LaPampa,
        Location::RioNegro,
        Location::Neuquen,
        Location::Chubut,
        Location::SantaCruz,
        Location::TierraDelFuego,
        Location::Catamarca,
        Location::LaRioja,
        Location::SanJuan,
        Location::SanLuis,
        Location::SantiagoDelEstero,
    ];

    /// Parse from any string. Unknown keys become `Other`.
    pub fn from_key(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "buenos_aires" => Location::BuenosAires,
            "ciudad_autonoma_buenos_aires" | "ciudad_autonoma_de_buenos_aires" | "caba" => {
                Location::CiudadAutonomaBuenosAires
            }
            "cordoba" | "córdoba" => Location::Cordoba,
            "santa_fe" => Location::SantaFe,
            "mendoza" => Location::Mendoza,
            "tucuman" | "tucumán" => Location::Tucuman,
            "salta" => Location::Salta,
            "jujuy" => Location::Jujuy,
            "chaco" => Location::Chaco,
            "formosa" => Location::Formosa,
            "misiones" => Location::Misiones,
            "corrientes" => Location::Corrientes,
            "entre_rios" | "entre_ríos" => Location::EntreRios,
            "la_pampa" => Location::LaPampa,
            "rio_negro" | "río_negro" => Location::RioNegro,
            "neuquen" | "neuquén" => Location::Neuquen,
            "chubut" => Location::Chubut,
            "santa_cruz" => Location::SantaCruz,
            "tierra_del_fuego" => Location::TierraDelFuego,
            "catamarca" => Location::Catamarca,
            "la_rioja" => Location::LaRioja,
            "san_juan" => Location::SanJuan,
            "san_luis" => Location::SanLuis,
            "santiago_del_estero" => Location::SantiagoDelEstero,
            _ => Location::Other(raw.trim().to_string()),
        }
    }

    /// Canonical key
    pub fn key(&self) -> &str {
        match self {
            Location::BuenosAires => "buenos_aires",
            Location::CiudadAutonomaBuenosAires => "ciudad_autonoma_buenos_aires",
            Location::Cordoba => "cordoba",
            Location::SantaFe => "santa_fe",
            Location::Mendoza => "mendoza",
            Location::Tucuman => "tucuman",
            Location::Salta => "salta",
            Location::Jujuy => "jujuy",
            Location::Chaco => "chaco",
            Location::Formosa => "formosa",
            Location::Misiones => "misiones",
            Location::Corrientes => "corrientes",
            Location::EntreRios => "entre_rios",
            Location::LaPampa => "la_pampa",
            Location::RioNegro => "rio_negro",
            Location::Neuquen => "neuquen",
            Location::Chubut => "chubut",
            Location::SantaCruz => "santa_cruz",
            Location::TierraDelFuego => "tierra_del_fuego",
            Location::Catamarca => "catamarca",
            Location::LaRioja => "la_rioja",
            Location::SanJuan => "san_juan",
            Location::SanLuis => "san_luis",
            Location::SantiagoDelEstero => "santiago_del_estero",
            Location::Other(raw) => raw,
        }
    }

    /// Human-readable label
    pub fn display_name(&self) -> String {
        let name = match self {
            Location::BuenosAires => "Buenos Aires",
            Location::CiudadAutonomaBuenosAires => "Ciudad Autónoma de Buenos Aires",
            Location::Cordoba => "Córdoba",
            Location::SantaFe => "Santa Fe",
            Location::Mendoza => "Mendoza",
            Location::Tucuman => "Tucumán",
            Location::Salta => "Salta",
            Location::Jujuy => "Jujuy",
            Location::Chaco => "Chaco",
            Location::Formosa => "Formosa",
            Location::Misiones => "Misiones",
            Location::Corrientes => "Corrientes",
            Location::EntreRios => "Entre Ríos",
            Location::LaPampa => "La Pampa",
            Location::RioNegro => "Río Negro",
            Location::Neuquen => "Neuquén",
            Location::Chubut => "Chubut",
            Location::SantaCruz => "Santa Cruz",
            Location::TierraDelFuego => "Tierra del Fuego",
            Location::Catamarca => "Catamarca",
            Location::LaRioja => "La Rioja",
            Location::SanJuan => "San Juan",
            Location::SanLuis => "San Luis",
            Location::SantiagoDelEstero => "Santiago del Estero",
            Location::Other(raw) => return title_case_key(raw),
        };
        name.to_string()
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::Mendoza
    }
}

impl_keyed_enum!(Location);

// ============================================================================
// Client and Request
// ============================================================================

/// Client identity. Passed through to the quote; never used in pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ClientInfo {
    /// Create a client with all three contact fields
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        ClientInfo {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
        }
    }
}

/// Structured description of the project to price.
///
/// `floors` is signed: the engine does not validate it, and zero or negative
/// values flow through the floor multiplier as-is. Use
/// [`crate::validation`] before calling the engine to reject such requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRequest {
    pub construction_type: ConstructionType,
    pub usage_type: UsageType,
    pub finish_level: FinishLevel,

    /// Covered area in square metres
    #[serde(alias = "square_meters", alias = "area")]
    pub area_m2: f64,

    /// Number of storeys
    #[serde(alias = "floor_count")]
    pub floors: i32,

    pub location: Location,

    pub client: ClientInfo,
}

/// Default area when none is given (m²)
pub const DEFAULT_AREA_M2: f64 = 100.0;

/// Default storey count when none is given
pub const DEFAULT_FLOORS: i32 = 1;

impl Default for ProjectRequest {
    fn default() -> Self {
        ProjectRequest {
            construction_type: ConstructionType::default(),
            usage_type: UsageType::default(),
            finish_level: FinishLevel::default(),
            area_m2: DEFAULT_AREA_M2,
            floors: DEFAULT_FLOORS,
            location: Location::default(),
            client: ClientInfo::default(),
        }
    }
}

impl ProjectRequest {
    /// Create a request for the given system and area, defaults elsewhere.
    pub fn new(construction_type: ConstructionType, area_m2: f64) -> Self {
        ProjectRequest {
            construction_type,
            area_m2,
            ..Default::default()
        }
    }

    /// Set the usage type
    pub fn with_usage(mut self, usage_type: UsageType) -> Self {
        self.usage_type = usage_type;
        self
    }

    /// Set the finish level
    pub fn with_finish(mut self, finish_level: FinishLevel) -> Self {
        self.finish_level = finish_level;
        self
    }

    /// Set the area in m²
    pub fn with_area(mut self, area_m2: f64) -> Self {
        self.area_m2 = area_m2;
        self
    }

    /// Set the number of floors
    pub fn with_floors(mut self, floors: i32) -> Self {
        self.floors = floors;
        self
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Attach client identity
    pub fn with_client(mut self, client: ClientInfo) -> Self {
        self.client = client;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_normalizes() {
        assert_eq!(ConstructionType::from_key("steel-frame"), ConstructionType::SteelFrame);
        assert_eq!(ConstructionType::from_key("Steel Frame"), ConstructionType::SteelFrame);
        assert_eq!(ConstructionType::from_key(" STEEL_FRAME "), ConstructionType::SteelFrame);
        assert_eq!(Location::from_key("tierra-del-fuego"), Location::TierraDelFuego);
        assert_eq!(Location::from_key("caba"), Location::CiudadAutonomaBuenosAires);
    }

    #[test]
    fn test_spanish_aliases() {
        assert_eq!(ConstructionType::from_key("contenedor"), ConstructionType::Container);
        assert_eq!(ConstructionType::from_key("mixto"), ConstructionType::Mixed);
        assert_eq!(UsageType::from_key("residencial"), UsageType::Residential);
        assert_eq!(UsageType::from_key("comercial"), UsageType::Commercial);
        assert_eq!(FinishLevel::from_key("basico"), FinishLevel::Basic);
        assert_eq!(FinishLevel::from_key("estandar"), FinishLevel::Standard);
    }

    #[test]
    fn test_unknown_keys_become_other() {
        let ct = ConstructionType::from_key("timber-frame");
        assert_eq!(ct, ConstructionType::Other("timber-frame".to_string()));
        assert!(ct.is_other());
        assert_eq!(ct.key(), "timber-frame");
        assert_eq!(ct.display_name(), "Timber Frame");

        let loc = Location::from_key("montevideo");
        assert_eq!(loc.display_name(), "Montevideo");
    }

    #[test]
    fn test_keys_roundtrip_through_from_key() {
        for ct in ConstructionType::ALL {
            assert_eq!(ConstructionType::from_key(ct.key()), ct);
        }
        for ut in UsageType::ALL {
            assert_eq!(UsageType::from_key(ut.key()), ut);
        }
        for fl in FinishLevel::ALL {
            assert_eq!(FinishLevel::from_key(fl.key()), fl);
        }
        for loc in Location::ALL {
            assert_eq!(Location::from_key(loc.key()), loc);
            assert!(!loc.is_other());
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ConstructionType::Container.display_name(), "Shipping Container");
        assert_eq!(Location::Cordoba.to_string(), "Córdoba");
        assert_eq!(Location::CiudadAutonomaBuenosAires.display_name(), "Ciudad Autónoma de Buenos Aires");
        assert_eq!(FinishLevel::Premium.to_string(), "Premium");
    }

    #[test]
    fn test_defaults() {
        let req = ProjectRequest::default();
        assert_eq!(req.construction_type, ConstructionType::SteelFrame);
        assert_eq!(req.usage_type, UsageType::Residential);
        assert_eq!(req.finish_level, FinishLevel::Standard);
        assert_eq!(req.area_m2, 100.0);
        assert_eq!(req.floors, 1);
        assert_eq!(req.location, Location::Mendoza);
        assert!(req.client.name.is_none());
    }

    #[test]
    fn test_deserialize_fills_absent_fields() {
        let req: ProjectRequest = serde_json::from_str(r#"{ "square_meters": 150, "floors": 2 }"#).unwrap();
        assert_eq!(req.area_m2, 150.0);
        assert_eq!(req.floors, 2);
        assert_eq!(req.construction_type, ConstructionType::SteelFrame);
        assert_eq!(req.location, Location::Mendoza);
    }

    #[test]
    fn test_deserialize_unknown_enum_values_degrade() {
        let req: ProjectRequest =
            serde_json::from_str(r#"{ "construction_type": "adobe", "location": "atlantis" }"#).unwrap();
        assert_eq!(req.construction_type, ConstructionType::Other("adobe".to_string()));
        assert_eq!(req.location, Location::Other("atlantis".to_string()));
    }

    #[test]
    fn test_enum_serialization_uses_keys() {
        let json = serde_json::to_string(&Location::EntreRios).unwrap();
        assert_eq!(json, "\"entre_rios\"");
        let roundtrip: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, Location::EntreRios);
    }

    #[test]
    fn test_builder() {
        let req = ProjectRequest::new(ConstructionType::Mixed, 250.0)
            .with_usage(UsageType::Commercial)
            .with_finish(FinishLevel::Premium)
            .with_floors(3)
            .with_location(Location::Salta)
            .with_client(ClientInfo::new("Ana", "ana@example.com", "123"));
        assert_eq!(req.area_m2, 250.0);
        assert_eq!(req.floors, 3);
        assert_eq!(req.client.name.as_deref(), Some("Ana"));
    }
}
