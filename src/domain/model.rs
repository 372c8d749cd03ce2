use crate::utils::error::{CatalogError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Electron-volt units that all belong to the `eV` unit class, with their power of ten.
const ELECTRON_VOLT_FAMILY: [(&str, i32); 5] =
    [("eV", 0), ("keV", 3), ("MeV", 6), ("GeV", 9), ("TeV", 12)];

/// Largest precision a `Decimal` significand can carry.
pub const MAX_SIGNIFICANT_FIGURES: u32 = 28;

/// Precision convention a variant was precomputed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoundingPolicy {
    /// `"<n>sf"`
    SignificantFigures(u32),
    /// `"none"`: the unrounded value.
    None,
}

impl FromStr for RoundingPolicy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("none") {
            return Ok(RoundingPolicy::None);
        }

        let digits = token
            .strip_suffix("sf")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| (1..=MAX_SIGNIFICANT_FIGURES).contains(n))
            .ok_or_else(|| CatalogError::malformed(format!("unknown rounding policy `{}`", s)))?;

        Ok(RoundingPolicy::SignificantFigures(digits))
    }
}

impl TryFrom<String> for RoundingPolicy {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RoundingPolicy> for String {
    fn from(policy: RoundingPolicy) -> Self {
        policy.to_string()
    }
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingPolicy::SignificantFigures(n) => write!(f, "{}sf", n),
            RoundingPolicy::None => f.write_str("none"),
        }
    }
}

/// One precomputed (unit, rounding) rendering of a physical quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityVariant {
    #[serde(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "Rounding")]
    pub rounding: RoundingPolicy,
    #[serde(rename = "Significand", deserialize_with = "de::decimal")]
    pub significand: Decimal,
    #[serde(rename = "Exponent", deserialize_with = "de::exponent")]
    pub exponent: i32,
    /// Upstream rendering, kept for consumers that want it verbatim.
    #[serde(rename = "HTML", default)]
    pub html: String,
}

impl QuantityVariant {
    pub fn new(
        unit: impl Into<String>,
        rounding: RoundingPolicy,
        significand: Decimal,
        exponent: i32,
    ) -> Self {
        Self {
            unit: unit.into(),
            rounding,
            significand,
            exponent,
            html: String::new(),
        }
    }

    /// Prefixed electron-volt units collapse into `eV`; every other unit is its own class.
    pub fn unit_class(&self) -> &str {
        if self.electron_volt_scale().is_some() {
            "eV"
        } else {
            &self.unit
        }
    }

    /// Exponent of the value once expressed in its class unit, so `5.11e-1 MeV` gives `5`.
    pub fn class_exponent(&self) -> i32 {
        self.exponent.saturating_add(self.electron_volt_scale().unwrap_or(0))
    }

    fn electron_volt_scale(&self) -> Option<i32> {
        ELECTRON_VOLT_FAMILY
            .iter()
            .find(|(unit, _)| *unit == self.unit)
            .map(|(_, scale)| *scale)
    }
}

/// A physical quantity: a sentinel or a non-empty list of variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuantity", into = "RawQuantity")]
pub enum Quantity {
    /// Exactly zero, e.g. a massless particle.
    Zero,
    /// No decay; only meaningful for mean lifetime.
    Stable,
    Variants(Vec<QuantityVariant>),
}

impl Quantity {
    pub fn variants(variants: Vec<QuantityVariant>) -> Result<Self> {
        if variants.is_empty() {
            return Err(CatalogError::malformed("quantity variant list is empty"));
        }
        Ok(Quantity::Variants(variants))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Sentinel(String),
    Variants(Vec<QuantityVariant>),
}

impl TryFrom<RawQuantity> for Quantity {
    type Error = CatalogError;

    fn try_from(raw: RawQuantity) -> Result<Self> {
        match raw {
            RawQuantity::Sentinel(token) => match token.trim() {
                "0" => Ok(Quantity::Zero),
                t if t.eq_ignore_ascii_case("stable") => Ok(Quantity::Stable),
                other => Err(CatalogError::malformed(format!(
                    "unknown quantity sentinel `{}`",
                    other
                ))),
            },
            RawQuantity::Variants(variants) => Quantity::variants(variants),
        }
    }
}

impl From<Quantity> for RawQuantity {
    fn from(quantity: Quantity) -> Self {
        match quantity {
            Quantity::Zero => RawQuantity::Sentinel("0".to_string()),
            Quantity::Stable => RawQuantity::Sentinel("stable".to_string()),
            Quantity::Variants(variants) => RawQuantity::Variants(variants),
        }
    }
}

/// A particle record as supplied by the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "Reference")]
    pub reference: String,
    #[serde(rename = "URLReference")]
    pub url_slug: String,
    /// LaTeX-style symbol expression, passed through untouched.
    #[serde(rename = "MainSymbol", default)]
    pub display_symbol: String,
    /// Raw token; validated against the charge taxonomy during derivation.
    #[serde(rename = "RelativeCharge")]
    pub relative_charge: String,
    #[serde(rename = "Generation", default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<u8>,
    #[serde(rename = "Mass")]
    pub mass: Quantity,
    #[serde(rename = "Charge")]
    pub charge: Quantity,
    #[serde(rename = "MeanLifetime")]
    pub mean_lifetime: Quantity,
    #[serde(
        rename = "MagneticMoment",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub magnetic_moment: Option<Quantity>,
}

/// The whole input document: `{ "Particles": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "Particles")]
    pub entities: Vec<Entity>,
}

impl Dataset {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| CatalogError::malformed(e.to_string()))
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| CatalogError::malformed(e.to_string()))
    }
}

/// Background, border and text colours for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleDescriptor {
    pub background: String,
    pub border: String,
    pub text: String,
}

impl StyleDescriptor {
    /// Inline CSS declaration block.
    pub fn css(&self) -> String {
        format!(
            "background-color: {}; border-color: {}; color: {};",
            self.background, self.border, self.text
        )
    }
}

/// Render-ready projection of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    pub reference: String,
    pub url_slug: String,
    pub mass_kg: String,
    pub mass_ev: String,
    pub mass_u: String,
    pub has_mass: bool,
    pub charge_c: String,
    pub relative_charge: String,
    pub mean_lifetime: String,
    pub is_stable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnetic_moment: Option<String>,
    pub has_magnetic_moment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    pub hue: f64,
    pub style: StyleDescriptor,
}

mod de {
    use super::*;
    use serde::de::Error;
    use serde::Deserializer;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    impl TextOrNumber {
        fn into_text(self) -> String {
            match self {
                TextOrNumber::Text(text) => text,
                TextOrNumber::Number(number) => number.to_string(),
            }
        }
    }

    pub fn decimal<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Decimal, D::Error> {
        let text = TextOrNumber::deserialize(deserializer)?.into_text();
        let trimmed = text.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|e| D::Error::custom(format!("invalid significand `{}`: {}", text, e)))
    }

    pub fn exponent<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<i32, D::Error> {
        let text = TextOrNumber::deserialize(deserializer)?.into_text();
        text.trim()
            .trim_start_matches('+')
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid exponent `{}`: {}", text, e)))
    }
}
