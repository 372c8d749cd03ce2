use crate::domain::model::{QuantityVariant, RoundingPolicy};
use crate::utils::error::{CatalogError, Result};
use std::fmt;

/// Entity field a selection is made for; carried into error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityField {
    Mass,
    Charge,
    MeanLifetime,
    MagneticMoment,
}

impl fmt::Display for QuantityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuantityField::Mass => "mass",
            QuantityField::Charge => "charge",
            QuantityField::MeanLifetime => "mean_lifetime",
            QuantityField::MagneticMoment => "magnetic_moment",
        };
        f.write_str(name)
    }
}

/// Returns the one variant matching `(unit_class, rounding)`.
///
/// Zero matches is `MissingVariant`, more than one is `AmbiguousVariant`.
pub fn select<'v>(
    variants: &'v [QuantityVariant],
    unit_class: &str,
    rounding: RoundingPolicy,
    reference: &str,
    field: QuantityField,
) -> Result<&'v QuantityVariant> {
    let mut matches = variants
        .iter()
        .filter(|v| v.unit_class() == unit_class && v.rounding == rounding);

    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
        (None, _) => Err(CatalogError::MissingVariant {
            reference: reference.to_string(),
            field: field.to_string(),
            unit_class: unit_class.to_string(),
            rounding: rounding.to_string(),
        }),
        (Some(_), Some(_)) => Err(CatalogError::AmbiguousVariant {
            reference: reference.to_string(),
            field: field.to_string(),
            unit_class: unit_class.to_string(),
            rounding: rounding.to_string(),
            count: 2 + matches.count(),
        }),
    }
}
