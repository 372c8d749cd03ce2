//! Scientific-notation rendering on exact decimals.
//!
//! Values are held as a `Decimal` coefficient times a power of ten, so
//! magnitudes far outside `Decimal`'s own range (1e-31 kg, 1e-25 s) stay
//! exact. Binary floating point never enters the path.

use crate::utils::error::{CatalogError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub const MINUS_GLYPH: &str = "&minus;";
pub const PLUS_GLYPH: &str = "+";
pub const TIMES_GLYPH: &str = "×";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

/// `value = sign * significand * 10^order_of_magnitude`.
///
/// `significand` is the magnitude in `[1, 10)`, or `0` together with
/// `order_of_magnitude == 0` for zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    pub sign: Sign,
    pub order_of_magnitude: i64,
    pub significand: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScientificNumber {
    coefficient: Decimal,
    exponent: i32,
}

impl ScientificNumber {
    pub const ZERO: ScientificNumber = ScientificNumber {
        coefficient: Decimal::ZERO,
        exponent: 0,
    };

    pub fn from_decimal(value: Decimal) -> Self {
        Self::from_parts(value, 0)
    }

    /// `coefficient * 10^exponent`; the coefficient need not be normalized.
    pub fn from_parts(coefficient: Decimal, exponent: i32) -> Self {
        Self {
            coefficient,
            exponent,
        }
    }

    /// Parses plain or exponent notation: `-1234`, `0.0005`, `9.11e-31`.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let invalid = |reason: &str| CatalogError::InvalidNumber {
            value: text.to_string(),
            reason: reason.to_string(),
        };

        let (coefficient, exponent) = match trimmed.find(['e', 'E']) {
            Some(at) => (&trimmed[..at], Some(&trimmed[at + 1..])),
            None => (trimmed, None),
        };
        let coefficient = coefficient.strip_prefix('+').unwrap_or(coefficient);
        if coefficient.is_empty() {
            return Err(invalid("missing digits"));
        }

        let coefficient = Decimal::from_str(coefficient).map_err(|e| invalid(&e.to_string()))?;
        let exponent = match exponent {
            Some(exp) => exp
                .strip_prefix('+')
                .unwrap_or(exp)
                .parse::<i32>()
                .map_err(|e| invalid(&format!("bad exponent: {}", e)))?,
            None => 0,
        };

        Ok(Self::from_parts(coefficient, exponent))
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    pub fn normalize(&self) -> Normalized {
        if self.coefficient.is_zero() {
            return Normalized {
                sign: Sign::Zero,
                order_of_magnitude: 0,
                significand: Decimal::ZERO,
            };
        }

        let sign = if self.coefficient.is_sign_negative() {
            Sign::Negative
        } else {
            Sign::Positive
        };

        // A Decimal mantissa fits in 96 bits, so it has at most 29 digits and
        // `digits - 1` is always a legal scale.
        let magnitude = self.coefficient.abs();
        let mantissa = magnitude.mantissa();
        let digits = decimal_digits(mantissa);
        let order_of_magnitude =
            i64::from(digits) - 1 - i64::from(magnitude.scale()) + i64::from(self.exponent);
        let significand = Decimal::from_i128_with_scale(mantissa, digits - 1).normalize();

        Normalized {
            sign,
            order_of_magnitude,
            significand,
        }
    }

    /// Digits the coefficient was written with, trailing zeros included (at least one).
    pub fn significant_digits(&self) -> u32 {
        if self.coefficient.is_zero() {
            return 1;
        }
        decimal_digits(self.coefficient.abs().mantissa())
    }

    /// Renders e.g. `&minus;1.23 × 10^3` or `+5.00 × 10^-4`.
    ///
    /// The exponent suffix is omitted when the (post-rounding) order of
    /// magnitude is zero. Zero never carries a sign glyph.
    pub fn format(&self, significant_figures: u32, include_plus_sign: bool) -> String {
        let normalized = self.normalize();
        let places = significant_figures.clamp(1, 28) - 1;

        let mut order = normalized.order_of_magnitude;
        let mut rounded = round_half_up(normalized.significand, places);
        if rounded >= Decimal::TEN {
            rounded = round_half_up(rounded / Decimal::TEN, places);
            order += 1;
        }
        rounded.rescale(places);

        let sign = match normalized.sign {
            Sign::Negative => MINUS_GLYPH,
            Sign::Positive if include_plus_sign => PLUS_GLYPH,
            _ => "",
        };

        if order == 0 {
            format!("{}{}", sign, rounded)
        } else {
            format!("{}{} {} 10^{}", sign, rounded, TIMES_GLYPH, order)
        }
    }
}

fn round_half_up(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

fn decimal_digits(mut value: i128) -> u32 {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}
