//! Form fields, their ranges, and input parsing.
//!
//! The form owns range enforcement: a value that fails here never reaches
//! the assembler, and the previous value stays in place.

use crate::types::inputs::{FieldValues, UnknownLevel};
use thiserror::Error;

const SECTOR_OPTIONS: &[&str] = &["Oil&Gas", "Power", "Waste", "Chemical"];
const REGION_OPTIONS: &[&str] = &["North", "Midlands", "South", "Scotland", "Wales"];

/// Rejected user input
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Unknown command '{0}'. Type `help` for a list of commands.")]
    UnknownCommand(String),

    #[error("Unknown field '{0}'. Type `help` for a list of fields.")]
    UnknownField(String),

    #[error("No value given for {0}.")]
    MissingValue(&'static str),

    #[error("{label} must be a number, got '{value}'.")]
    NotANumber { label: &'static str, value: String },

    #[error("{label} must be a whole number, got '{value}'.")]
    NotWhole { label: &'static str, value: String },

    #[error("{label} must be between {min} and {max}, got {value}.")]
    OutOfRange {
        label: &'static str,
        min: String,
        max: String,
        value: String,
    },

    #[error("{0}.")]
    UnknownLevel(#[from] UnknownLevel),
}

/// Which column of the page a field is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Facility,
    Climate,
}

impl Panel {
    pub fn title(&self) -> &'static str {
        match self {
            Panel::Facility => "Facility Information",
            Panel::Climate => "Climate Parameters",
        }
    }
}

/// Allowed values of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Choice(&'static [&'static str]),
}

/// One editable input on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    Latitude,
    Longitude,
    Sector,
    UkRegion,
    FacilityCount,
    MeanTemperatureWinter,
    MeanWindWinter,
    TotalRainfallWinter,
    MeanTemperatureAnnual,
    MeanWindAnnual,
    TotalRainfallAnnual,
    MeanPressureAnnual,
}

impl Field {
    /// Fields in display order
    pub const ALL: [Field; 13] = [
        Field::Year,
        Field::Latitude,
        Field::Longitude,
        Field::Sector,
        Field::UkRegion,
        Field::FacilityCount,
        Field::MeanTemperatureWinter,
        Field::MeanWindWinter,
        Field::TotalRainfallWinter,
        Field::MeanTemperatureAnnual,
        Field::MeanWindAnnual,
        Field::TotalRainfallAnnual,
        Field::MeanPressureAnnual,
    ];

    /// Canonical key, the model column name where there is one
    pub fn key(&self) -> &'static str {
        match self {
            Field::Year => "Year",
            Field::Latitude => "Latitude",
            Field::Longitude => "Longitude",
            Field::Sector => "Sector",
            Field::UkRegion => "UK_Region",
            Field::FacilityCount => "Facility_Count_25km",
            Field::MeanTemperatureWinter => "mean_temperature_winter",
            Field::MeanWindWinter => "mean_wind_winter",
            Field::TotalRainfallWinter => "total_rainfall_winter",
            Field::MeanTemperatureAnnual => "mean_temperature_annual",
            Field::MeanWindAnnual => "mean_wind_annual",
            Field::TotalRainfallAnnual => "total_rainfall_annual",
            Field::MeanPressureAnnual => "mean_pressure_annual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Year => "Year",
            Field::Latitude => "Latitude",
            Field::Longitude => "Longitude",
            Field::Sector => "Sector",
            Field::UkRegion => "UK Region",
            Field::FacilityCount => "Facility Count (25km radius)",
            Field::MeanTemperatureWinter => "Mean Temperature Winter (C)",
            Field::MeanWindWinter => "Mean Wind Winter (m/s)",
            Field::TotalRainfallWinter => "Total Rainfall Winter (mm)",
            Field::MeanTemperatureAnnual => "Mean Temperature Annual (C)",
            Field::MeanWindAnnual => "Mean Wind Annual (m/s)",
            Field::TotalRainfallAnnual => "Total Rainfall Annual (mm)",
            Field::MeanPressureAnnual => "Mean Pressure Annual (hPa)",
        }
    }

    /// Short names accepted in addition to the key and label
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Year => &[],
            Field::Latitude => &["lat"],
            Field::Longitude => &["lon", "lng"],
            Field::Sector => &[],
            Field::UkRegion => &["region"],
            Field::FacilityCount => &["facility_count", "facilities"],
            Field::MeanTemperatureWinter => &["temp_winter"],
            Field::MeanWindWinter => &["wind_winter"],
            Field::TotalRainfallWinter => &["rain_winter", "rainfall_winter"],
            Field::MeanTemperatureAnnual => &["temp_annual"],
            Field::MeanWindAnnual => &["wind_annual"],
            Field::TotalRainfallAnnual => &["rain_annual", "rainfall_annual"],
            Field::MeanPressureAnnual => &["pressure"],
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Year => FieldKind::Integer { min: 2018, max: 2023 },
            Field::Latitude => FieldKind::Float { min: 49.0, max: 61.0 },
            Field::Longitude => FieldKind::Float { min: -8.0, max: 2.0 },
            Field::Sector => FieldKind::Choice(SECTOR_OPTIONS),
            Field::UkRegion => FieldKind::Choice(REGION_OPTIONS),
            Field::FacilityCount => FieldKind::Integer { min: 0, max: 100 },
            Field::MeanTemperatureWinter => FieldKind::Float { min: -5.0, max: 15.0 },
            Field::MeanWindWinter => FieldKind::Float { min: 0.0, max: 20.0 },
            Field::TotalRainfallWinter => FieldKind::Float { min: 0.0, max: 1000.0 },
            Field::MeanTemperatureAnnual => FieldKind::Float { min: 0.0, max: 20.0 },
            Field::MeanWindAnnual => FieldKind::Float { min: 0.0, max: 15.0 },
            Field::TotalRainfallAnnual => FieldKind::Float { min: 0.0, max: 3000.0 },
            Field::MeanPressureAnnual => FieldKind::Float { min: 980.0, max: 1030.0 },
        }
    }

    pub fn panel(&self) -> Panel {
        match self {
            Field::Year
            | Field::Latitude
            | Field::Longitude
            | Field::Sector
            | Field::UkRegion
            | Field::FacilityCount => Panel::Facility,
            _ => Panel::Climate,
        }
    }

    /// Resolve a user-typed key. Matching ignores case, spaces, and punctuation.
    pub fn lookup(key: &str) -> Option<Field> {
        let wanted = normalize(key);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|field| {
            normalize(field.key()) == wanted
                || normalize(field.label()) == wanted
                || field.aliases().iter().any(|alias| normalize(alias) == wanted)
        })
    }

    /// Current value as shown on the form
    pub fn display(&self, values: &FieldValues) -> String {
        match self {
            Field::Year => values.year.to_string(),
            Field::Latitude => format!("{:.2}", values.latitude),
            Field::Longitude => format!("{:.2}", values.longitude),
            Field::Sector => values.sector.to_string(),
            Field::UkRegion => values.uk_region.to_string(),
            Field::FacilityCount => values.facility_count_25km.to_string(),
            Field::MeanTemperatureWinter => format!("{:.2}", values.mean_temperature_winter),
            Field::MeanWindWinter => format!("{:.2}", values.mean_wind_winter),
            Field::TotalRainfallWinter => format!("{:.2}", values.total_rainfall_winter),
            Field::MeanTemperatureAnnual => format!("{:.2}", values.mean_temperature_annual),
            Field::MeanWindAnnual => format!("{:.2}", values.mean_wind_annual),
            Field::TotalRainfallAnnual => format!("{:.2}", values.total_rainfall_annual),
            Field::MeanPressureAnnual => format!("{:.2}", values.mean_pressure_annual),
        }
    }

    /// Allowed values as shown on the form
    pub fn describe_range(&self) -> String {
        match self.kind() {
            FieldKind::Integer { min, max } => format!("[{min}, {max}]"),
            FieldKind::Float { min, max } => format!("[{min:.2}, {max:.2}]"),
            FieldKind::Choice(options) => options.join(" | "),
        }
    }

    /// Parse `raw` and store it. On error `values` is left unchanged.
    pub fn apply(&self, values: &mut FieldValues, raw: &str) -> Result<(), InputError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InputError::MissingValue(self.label()));
        }

        match self {
            Field::Year => values.year = self.parse_integer(raw)? as i32,
            Field::FacilityCount => values.facility_count_25km = self.parse_integer(raw)? as u32,
            Field::Sector => values.sector = raw.parse()?,
            Field::UkRegion => values.uk_region = raw.parse()?,
            Field::Latitude => values.latitude = self.parse_float(raw)?,
            Field::Longitude => values.longitude = self.parse_float(raw)?,
            Field::MeanTemperatureWinter => values.mean_temperature_winter = self.parse_float(raw)?,
            Field::MeanWindWinter => values.mean_wind_winter = self.parse_float(raw)?,
            Field::TotalRainfallWinter => values.total_rainfall_winter = self.parse_float(raw)?,
            Field::MeanTemperatureAnnual => values.mean_temperature_annual = self.parse_float(raw)?,
            Field::MeanWindAnnual => values.mean_wind_annual = self.parse_float(raw)?,
            Field::TotalRainfallAnnual => values.total_rainfall_annual = self.parse_float(raw)?,
            Field::MeanPressureAnnual => values.mean_pressure_annual = self.parse_float(raw)?,
        }
        Ok(())
    }

    fn parse_integer(&self, raw: &str) -> Result<i64, InputError> {
        let value = match raw.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                return Err(match raw.parse::<f64>().ok().filter(|v| v.is_finite()) {
                    // Whole but wider than i64, so necessarily outside the field range
                    Some(v) if v >= i64::MAX as f64 || v < i64::MIN as f64 => {
                        self.out_of_range(raw)
                    }
                    Some(_) => InputError::NotWhole {
                        label: self.label(),
                        value: raw.to_string(),
                    },
                    None => InputError::NotANumber {
                        label: self.label(),
                        value: raw.to_string(),
                    },
                })
            }
        };

        if let FieldKind::Integer { min, max } = self.kind() {
            if value < min || value > max {
                return Err(self.out_of_range(&value.to_string()));
            }
        }
        Ok(value)
    }

    fn out_of_range(&self, value: &str) -> InputError {
        let (min, max) = match self.kind() {
            FieldKind::Integer { min, max } => (min.to_string(), max.to_string()),
            FieldKind::Float { min, max } => (format!("{min:.2}"), format!("{max:.2}")),
            FieldKind::Choice(_) => (String::new(), String::new()),
        };
        InputError::OutOfRange {
            label: self.label(),
            min,
            max,
            value: value.to_string(),
        }
    }

    fn parse_float(&self, raw: &str) -> Result<f64, InputError> {
        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| InputError::NotANumber {
                label: self.label(),
                value: raw.to_string(),
            })?;

        if let FieldKind::Float { min, max } = self.kind() {
            if value < min || value > max {
                return Err(self.out_of_range(raw));
            }
        }
        Ok(value)
    }
}

fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
