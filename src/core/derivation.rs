//! Per-entity derivation of render-ready views.
//!
//! A pass either produces one view for every entity, in input order, or
//! returns the first data-integrity error it meets.

use crate::core::scientific::ScientificNumber;
use crate::core::selector::{select, QuantityField};
use crate::core::taxonomy;
use crate::domain::model::{DerivedView, Entity, Quantity, QuantityVariant, RoundingPolicy};
use crate::utils::error::{CatalogError, Result};
use rand::Rng;

pub const MASS_UNIT_CLASSES: [&str; 3] = ["kg", "eV", "u"];
pub const CHARGE_UNIT_CLASS: &str = "C";
pub const LIFETIME_UNIT_CLASS: &str = "s";
pub const MAGNETIC_MOMENT_UNIT_CLASS: &str = "J/T";
pub const STABLE_LABEL: &str = "stable";

const GENERATION_LABELS: [&str; 3] = ["First", "Second", "Third"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationOptions {
    /// Selects `"<n>sf"` variants and formats them with `n` digits.
    pub significant_figures: u32,
}

impl Default for DerivationOptions {
    fn default() -> Self {
        Self {
            significant_figures: 3,
        }
    }
}

impl DerivationOptions {
    fn rounding(&self) -> RoundingPolicy {
        RoundingPolicy::SignificantFigures(self.significant_figures)
    }

    fn zero_form(&self) -> String {
        ScientificNumber::ZERO.format(self.significant_figures, false)
    }
}

pub fn derive<R: Rng + ?Sized>(
    entities: &[Entity],
    options: &DerivationOptions,
    rng: &mut R,
) -> Result<Vec<DerivedView>> {
    entities
        .iter()
        .map(|entity| derive_entity(entity, options, rng))
        .collect()
}

pub fn derive_entity<R: Rng + ?Sized>(
    entity: &Entity,
    options: &DerivationOptions,
    rng: &mut R,
) -> Result<DerivedView> {
    let reference = entity.reference.as_str();
    let figures = options.significant_figures;

    let (mass_kg, mass_ev, mass_u, has_mass) = match &entity.mass {
        Quantity::Zero => {
            let zero = options.zero_form();
            (zero.clone(), zero.clone(), zero, false)
        }
        Quantity::Variants(variants) => {
            let [kg, ev, u] = MASS_UNIT_CLASSES.map(|unit_class| {
                select(variants, unit_class, options.rounding(), reference, QuantityField::Mass)
            });
            let (kg, ev, u) = (kg?, ev?, u?);
            (
                render(kg, figures, false),
                render(ev, figures, false),
                render(u, figures, false),
                !kg.significand.is_zero(),
            )
        }
        Quantity::Stable => {
            return Err(misplaced_sentinel(reference, QuantityField::Mass, "stable"))
        }
    };

    let charge_c = match &entity.charge {
        Quantity::Zero => options.zero_form(),
        Quantity::Variants(variants) => render(
            select(
                variants,
                CHARGE_UNIT_CLASS,
                options.rounding(),
                reference,
                QuantityField::Charge,
            )?,
            figures,
            true,
        ),
        Quantity::Stable => {
            return Err(misplaced_sentinel(reference, QuantityField::Charge, "stable"))
        }
    };

    let (mean_lifetime, is_stable) = match &entity.mean_lifetime {
        Quantity::Stable => (STABLE_LABEL.to_string(), true),
        Quantity::Variants(variants) => {
            let lifetime = select(
                variants,
                LIFETIME_UNIT_CLASS,
                options.rounding(),
                reference,
                QuantityField::MeanLifetime,
            )?;
            (render(lifetime, figures, false), false)
        }
        Quantity::Zero => {
            return Err(misplaced_sentinel(reference, QuantityField::MeanLifetime, "0"))
        }
    };

    let magnetic_moment = match &entity.magnetic_moment {
        None => None,
        Some(Quantity::Variants(variants)) => {
            let exact = select(
                variants,
                MAGNETIC_MOMENT_UNIT_CLASS,
                RoundingPolicy::None,
                reference,
                QuantityField::MagneticMoment,
            )?;
            let value = ScientificNumber::from_parts(exact.significand, exact.class_exponent());
            Some(value.format(value.significant_digits(), true))
        }
        Some(Quantity::Zero) => {
            return Err(misplaced_sentinel(reference, QuantityField::MagneticMoment, "0"))
        }
        Some(Quantity::Stable) => {
            return Err(misplaced_sentinel(
                reference,
                QuantityField::MagneticMoment,
                "stable",
            ))
        }
    };

    let generation = entity
        .generation
        .map(|ordinal| generation_label(reference, ordinal))
        .transpose()?;

    let hue = taxonomy::jittered_hue(&entity.relative_charge, rng).map_err(|err| match err {
        CatalogError::UnknownCharge { token, .. } => CatalogError::UnknownCharge {
            reference: reference.to_string(),
            token,
        },
        other => other,
    })?;

    tracing::debug!("Derived {} (hue {:.1})", reference, hue);

    Ok(DerivedView {
        reference: entity.reference.clone(),
        url_slug: entity.url_slug.clone(),
        mass_kg,
        mass_ev,
        mass_u,
        has_mass,
        charge_c,
        relative_charge: taxonomy::charge_label(&entity.relative_charge),
        mean_lifetime,
        is_stable,
        has_magnetic_moment: magnetic_moment.is_some(),
        magnetic_moment,
        generation,
        hue,
        style: taxonomy::style_for_hue(hue),
    })
}

/// Formats in the class unit: `eV` variants stored as `MeV` or `GeV` are rescaled.
fn render(variant: &QuantityVariant, figures: u32, include_plus_sign: bool) -> String {
    ScientificNumber::from_parts(variant.significand, variant.class_exponent())
        .format(figures, include_plus_sign)
}

fn generation_label(reference: &str, ordinal: u8) -> Result<String> {
    usize::from(ordinal)
        .checked_sub(1)
        .and_then(|index| GENERATION_LABELS.get(index))
        .map(|label| label.to_string())
        .ok_or_else(|| {
            CatalogError::malformed(format!(
                "{}.generation: ordinal {} is outside 1-3",
                reference, ordinal
            ))
        })
}

fn misplaced_sentinel(reference: &str, field: QuantityField, sentinel: &str) -> CatalogError {
    CatalogError::malformed(format!(
        "{}.{}: sentinel `{}` is not valid for this field",
        reference, field, sentinel
    ))
}
