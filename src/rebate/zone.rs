use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ZoneRatingsConfig;
use crate::error::ValidationError;

/// One of the four STC solar zones, resolved upstream from the install address.
///
/// Serialized as its bare number (`1`..=`4`); any other number is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SolarZone {
    Zone1,
    Zone2,
    Zone3,
    Zone4,
}

impl SolarZone {
    /// All zones in ascending order.
    pub const ALL: [SolarZone; 4] = [Self::Zone1, Self::Zone2, Self::Zone3, Self::Zone4];

    /// Zone number, 1–4.
    pub const fn number(self) -> u8 {
        match self {
            Self::Zone1 => 1,
            Self::Zone2 => 2,
            Self::Zone3 => 3,
            Self::Zone4 => 4,
        }
    }
}

impl TryFrom<u8> for SolarZone {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Zone1),
            2 => Ok(Self::Zone2),
            3 => Ok(Self::Zone3),
            4 => Ok(Self::Zone4),
            other => Err(ValidationError::UnknownZone(other)),
        }
    }
}

impl From<SolarZone> for u8 {
    fn from(zone: SolarZone) -> Self {
        zone.number()
    }
}

impl fmt::Display for SolarZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zone {}", self.number())
    }
}

/// Zone → insolation lookup (kWh/kW/day).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRatingTable {
    ratings: [f64; 4],
}

impl ZoneRatingTable {
    /// Builds the table from configured ratings.
    pub fn from_config(cfg: &ZoneRatingsConfig) -> Self {
        Self {
            ratings: [cfg.zone_1, cfg.zone_2, cfg.zone_3, cfg.zone_4],
        }
    }

    /// Returns the rating for `zone`.
    pub fn rating(&self, zone: SolarZone) -> f64 {
        self.ratings[usize::from(zone.number() - 1)]
    }
}

impl Default for ZoneRatingTable {
    fn default() -> Self {
        Self::from_config(&ZoneRatingsConfig::default())
    }
}
