//! Tropical zodiac helpers.
//!
//! Longitudes are normalised into [0, 360) before any sign lookup, and each of the
//! 12 signs spans exactly 30 degrees starting at 0° Aries.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];

    pub fn name(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Air => "air",
            Element::Water => "water",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Signs in zodiac order, index 0 = Aries
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign at a zero-based index, wrapping past Pisces
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "aries",
            ZodiacSign::Taurus => "taurus",
            ZodiacSign::Gemini => "gemini",
            ZodiacSign::Cancer => "cancer",
            ZodiacSign::Leo => "leo",
            ZodiacSign::Virgo => "virgo",
            ZodiacSign::Libra => "libra",
            ZodiacSign::Scorpio => "scorpio",
            ZodiacSign::Sagittarius => "sagittarius",
            ZodiacSign::Capricorn => "capricorn",
            ZodiacSign::Aquarius => "aquarius",
            ZodiacSign::Pisces => "pisces",
        }
    }

    /// Fire, earth, air, water repeat in that order around the zodiac
    pub fn element(&self) -> Element {
        Element::ALL[self.index() % 4]
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a longitude falls in the zodiac
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignPlacement {
    pub sign: ZodiacSign,
    /// floor(longitude / 30), 0..=11
    pub sign_index: usize,
    /// Degrees into the sign, 0 <= x < 30
    pub position_in_sign: f64,
}

impl SignPlacement {
    pub fn from_longitude(longitude: f64) -> Self {
        let lon = normalize_degrees(longitude);
        let sign_index = ((lon / 30.0).floor() as usize).min(11);
        Self {
            sign: ZodiacSign::from_index(sign_index),
            sign_index,
            position_in_sign: lon - sign_index as f64 * 30.0,
        }
    }
}

/// Wrap any angle into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle difference into (-180, 180]
pub fn signed_difference(degrees: f64) -> f64 {
    let wrapped = normalize_degrees(degrees);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-30.0), 330.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-15) < 360.0);
    }

    #[test]
    fn test_signed_difference() {
        assert_eq!(signed_difference(190.0), -170.0);
        assert_eq!(signed_difference(-190.0), 170.0);
        assert_eq!(signed_difference(180.0), 180.0);
    }

    #[test]
    fn test_sign_placement() {
        let placement = SignPlacement::from_longitude(135.5);
        assert_eq!(placement.sign, ZodiacSign::Leo);
        assert_eq!(placement.sign_index, 4);
        assert!((placement.position_in_sign - 15.5).abs() < 1e-9);

        let wrapped = SignPlacement::from_longitude(-0.5);
        assert_eq!(wrapped.sign, ZodiacSign::Pisces);
        assert!((wrapped.position_in_sign - 29.5).abs() < 1e-9);
    }

    #[test]
    fn test_sign_elements() {
        assert_eq!(ZodiacSign::Aries.element(), Element::Fire);
        assert_eq!(ZodiacSign::Taurus.element(), Element::Earth);
        assert_eq!(ZodiacSign::Libra.element(), Element::Air);
        assert_eq!(ZodiacSign::Pisces.element(), Element::Water);
    }
}
