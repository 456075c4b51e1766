use serde::{Deserialize, Serialize};

use crate::ephemeris::RawHouses;
use crate::zodiac::{normalize_degrees, SignPlacement, ZodiacSign};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseCusp {
    /// House number, 1..=12
    pub house: u8,
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub position_in_sign: f64,
}

impl HouseCusp {
    fn new(house: u8, longitude: f64) -> Self {
        let placement = SignPlacement::from_longitude(longitude);
        Self {
            house,
            longitude: normalize_degrees(longitude),
            sign: placement.sign,
            position_in_sign: placement.position_in_sign,
        }
    }
}

/// Whether the cusps come from a real computation or the fallback layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HouseStatus {
    Computed,
    /// Fallback layout: cusps every 30° from 0° Aries, Ascendant = Midheaven = 0°
    Degraded { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseSystem {
    /// House system identifier, e.g. "placidus"
    pub system: String,
    /// Cusps for houses 1..=12, in order
    pub cusps: Vec<HouseCusp>,
    pub ascendant: f64,
    pub midheaven: f64,
    pub status: HouseStatus,
}

impl HouseSystem {
    pub const PLACIDUS: &'static str = "placidus";

    pub fn from_raw(system: &str, raw: &RawHouses) -> Self {
        Self {
            system: system.to_string(),
            cusps: raw
                .cusps
                .iter()
                .enumerate()
                .map(|(i, &lon)| HouseCusp::new(i as u8 + 1, lon))
                .collect(),
            ascendant: normalize_degrees(raw.ascendant),
            midheaven: normalize_degrees(raw.midheaven),
            status: HouseStatus::Computed,
        }
    }

    /// The documented fallback layout, tagged as degraded
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            system: Self::PLACIDUS.to_string(),
            cusps: (0..12u8).map(|i| HouseCusp::new(i + 1, f64::from(i) * 30.0)).collect(),
            ascendant: 0.0,
            midheaven: 0.0,
            status: HouseStatus::Degraded {
                reason: reason.into(),
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, HouseStatus::Degraded { .. })
    }

    pub fn cusp_longitudes(&self) -> Vec<f64> {
        self.cusps.iter().map(|c| c.longitude).collect()
    }

    pub fn ascendant_sign(&self) -> ZodiacSign {
        SignPlacement::from_longitude(self.ascendant).sign
    }

    pub fn midheaven_sign(&self) -> ZodiacSign {
        SignPlacement::from_longitude(self.midheaven).sign
    }
}
