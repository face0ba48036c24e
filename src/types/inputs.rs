//! Raw form values and the categorical levels they draw from

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A categorical value outside its enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} '{value}', expected one of: {expected}")]
pub struct UnknownLevel {
    pub field: &'static str,
    pub value: String,
    pub expected: String,
}

/// Industrial sector of the facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "Oil&Gas")]
    OilGas,
    Power,
    Waste,
    Chemical,
}

impl Sector {
    /// Levels in the order the form offers them.
    pub const ALL: [Sector; 4] = [Sector::OilGas, Sector::Power, Sector::Waste, Sector::Chemical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::OilGas => "Oil&Gas",
            Sector::Power => "Power",
            Sector::Waste => "Waste",
            Sector::Chemical => "Chemical",
        }
    }

    /// Category code seen by the trees.
    ///
    /// Codes follow the lexicographic order of the level names, which is how
    /// the categorical dtype was built at training time.
    pub fn category_code(&self) -> u32 {
        match self {
            Sector::Chemical => 0,
            Sector::OilGas => 1,
            Sector::Power => 2,
            Sector::Waste => 3,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLevel {
                field: "Sector",
                value: s.to_string(),
                expected: join_levels(Self::ALL.iter().map(Sector::as_str)),
            })
    }
}

/// UK region the facility sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UkRegion {
    North,
    Midlands,
    South,
    Scotland,
    Wales,
}

impl UkRegion {
    /// Levels in the order the form offers them.
    pub const ALL: [UkRegion; 5] = [
        UkRegion::North,
        UkRegion::Midlands,
        UkRegion::South,
        UkRegion::Scotland,
        UkRegion::Wales,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UkRegion::North => "North",
            UkRegion::Midlands => "Midlands",
            UkRegion::South => "South",
            UkRegion::Scotland => "Scotland",
            UkRegion::Wales => "Wales",
        }
    }

    /// Category code seen by the trees (lexicographic level order).
    pub fn category_code(&self) -> u32 {
        match self {
            UkRegion::Midlands => 0,
            UkRegion::North => 1,
            UkRegion::Scotland => 2,
            UkRegion::South => 3,
            UkRegion::Wales => 4,
        }
    }
}

impl fmt::Display for UkRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UkRegion {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLevel {
                field: "UK_Region",
                value: s.to_string(),
                expected: join_levels(Self::ALL.iter().map(UkRegion::as_str)),
            })
    }
}

fn join_levels<'a>(levels: impl Iterator<Item = &'a str>) -> String {
    levels.collect::<Vec<_>>().join(", ")
}

/// The fifteen values collected by the form.
///
/// Thirteen of them flow straight into the prediction record. The mean
/// annual pressure is only used to derive the pressure/wind interaction term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValues {
    pub year: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub sector: Sector,
    pub uk_region: UkRegion,
    pub facility_count_25km: u32,
    pub mean_temperature_winter: f64,
    pub mean_wind_winter: f64,
    pub total_rainfall_winter: f64,
    pub mean_temperature_annual: f64,
    pub mean_wind_annual: f64,
    pub total_rainfall_annual: f64,
    pub mean_pressure_annual: f64,
}

impl Default for FieldValues {
    fn default() -> Self {
        Self {
            year: 2023,
            latitude: 52.0,
            longitude: -2.0,
            sector: Sector::OilGas,
            uk_region: UkRegion::North,
            facility_count_25km: 1,
            mean_temperature_winter: 5.0,
            mean_wind_winter: 8.0,
            total_rainfall_winter: 200.0,
            mean_temperature_annual: 10.0,
            mean_wind_annual: 6.0,
            total_rainfall_annual: 800.0,
            mean_pressure_annual: 1013.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_parse() {
        assert_eq!("Oil&Gas".parse::<Sector>().unwrap(), Sector::OilGas);
        assert_eq!(" power ".parse::<Sector>().unwrap(), Sector::Power);

        let err = "Nuclear".parse::<Sector>().unwrap_err();
        assert_eq!(err.field, "Sector");
        assert_eq!(err.expected, "Oil&Gas, Power, Waste, Chemical");
    }

    #[test]
    fn test_region_parse() {
        assert_eq!("SCOTLAND".parse::<UkRegion>().unwrap(), UkRegion::Scotland);
        assert!("Northern Ireland".parse::<UkRegion>().is_err());
    }

    #[test]
    fn test_category_codes_are_lexicographic() {
        let mut sectors = Sector::ALL.to_vec();
        sectors.sort_by_key(|s| s.as_str());
        let codes: Vec<u32> = sectors.iter().map(Sector::category_code).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);

        let mut regions = UkRegion::ALL.to_vec();
        regions.sort_by_key(|r| r.as_str());
        let codes: Vec<u32> = regions.iter().map(UkRegion::category_code).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_sector_serde_uses_display_name() {
        let json = serde_json::to_string(&Sector::OilGas).unwrap();
        assert_eq!(json, "\"Oil&Gas\"");
    }

    #[test]
    fn test_defaults() {
        let values = FieldValues::default();
        assert_eq!(values.year, 2023);
        assert_eq!(values.sector, Sector::OilGas);
        assert_eq!(values.uk_region, UkRegion::North);
        assert_eq!(values.facility_count_25km, 1);
        assert_eq!(values.mean_pressure_annual, 1013.0);
    }
}
