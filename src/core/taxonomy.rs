//! Relative-charge colour taxonomy.
//!
//! One ordered table maps each canonical charge token to a base hue. Hue
//! jitter keeps same-charge particles clustered while still telling them
//! apart; its random source is always supplied by the caller.

use crate::domain::model::StyleDescriptor;
use crate::utils::error::{CatalogError, Result};
use rand::Rng;

/// Canonical tokens, most positive first, with their base hue in degrees.
pub const CHARGE_HUES: [(&str, f64); 9] = [
    ("+2", 310.0),
    ("+1", 350.0),
    ("+2/3", 5.0),
    ("+1/3", 20.0),
    ("0", 110.0),
    ("-1/3", 170.0),
    ("-2/3", 195.0),
    ("-1", 215.0),
    ("-2", 245.0),
];

pub const NEUTRAL_JITTER_DEGREES: f64 = 40.0;
pub const CHARGED_JITTER_DEGREES: f64 = 10.0;

const NEUTRAL_TOKEN: &str = "0";

pub fn hue_for(token: &str) -> Result<f64> {
    CHARGE_HUES
        .iter()
        .find(|(known, _)| *known == token)
        .map(|(_, hue)| *hue)
        .ok_or_else(|| CatalogError::UnknownCharge {
            reference: String::new(),
            token: token.to_string(),
        })
}

/// Half-width of the jitter band for `token`.
pub fn jitter_band(token: &str) -> f64 {
    if token == NEUTRAL_TOKEN {
        NEUTRAL_JITTER_DEGREES
    } else {
        CHARGED_JITTER_DEGREES
    }
}

/// Base hue plus a uniform offset in `[-band, +band]`. Not wrapped into `[0, 360)`.
pub fn jittered_hue<R: Rng + ?Sized>(token: &str, rng: &mut R) -> Result<f64> {
    let base = hue_for(token)?;
    let band = jitter_band(token);
    Ok(base + rng.gen_range(-band..=band))
}

/// Display form of a charge token: ASCII minus becomes the HTML minus entity.
pub fn charge_label(token: &str) -> String {
    token.replace('-', crate::core::scientific::MINUS_GLYPH)
}

const BACKGROUND_SATURATION: u8 = 100;
const BACKGROUND_LIGHTNESS: u8 = 95;
const BORDER_SATURATION: u8 = 100;
const BORDER_LIGHTNESS: u8 = 85;
const TEXT_SATURATION: u8 = 70;
const TEXT_LIGHTNESS: u8 = 40;

pub fn style_for_hue(hue: f64) -> StyleDescriptor {
    let hsl = |saturation: u8, lightness: u8| {
        format!("hsl({:.1}, {}%, {}%)", hue, saturation, lightness)
    };
    StyleDescriptor {
        background: hsl(BACKGROUND_SATURATION, BACKGROUND_LIGHTNESS),
        border: hsl(BORDER_SATURATION, BORDER_LIGHTNESS),
        text: hsl(TEXT_SATURATION, TEXT_LIGHTNESS),
    }
}
