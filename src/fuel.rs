//! Scott & Burgan fire behavior fuel models and the classified raster that
//! maps them.
//!
//! The classified raster stores one numeric [`FuelModelCode`] per cell, e.g.
//! `101` for GR1 or `91` for NB1 (urban).

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{constants::FUEL_MODEL_CLASSIFIED, Error};

/// Heat content of fuel particles, BTU/lb
pub const HEAT_CONTENT: u32 = 8000;
/// Total mineral content, fraction of oven-dry weight
pub const TOTAL_MINERAL_CONTENT: f64 = 0.0555;
/// Effective (silica-free) mineral content, fraction of oven-dry weight
pub const EFFECTIVE_MINERAL_CONTENT: f64 = 0.01;
/// Oven-dry particle density, lb/ft³
pub const PARTICLE_DENSITY: f64 = 32.;

/// Path of the classified fuel model raster inside `data_dir`. Only builds the
/// path; the file is not checked.
///
/// ```
/// use std::path::Path;
///
/// use fuelgrid::{fuel, FUEL_MODEL_CLASSIFIED};
///
/// let path = fuel::raster_path("/srv/data");
/// assert_eq!(path, Path::new("/srv/data").join(FUEL_MODEL_CLASSIFIED));
/// ```
pub fn raster_path(data_dir: impl AsRef<Path>) -> PathBuf {
    data_dir.as_ref().join(FUEL_MODEL_CLASSIFIED)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FuelType {
    NonBurnable,
    Grass,
    GrassShrub,
    Shrub,
    TimberUnderstory,
    TimberLitter,
    SlashBlowdown,
}

// (type, code prefix, raster value of model 1, model numbers in the group)
static FUEL_GROUPS: [(FuelType, &str, u16, &[u16]); 7] = [
    (FuelType::NonBurnable, "NB", 90, &[1, 2, 3, 8, 9]),
    (FuelType::Grass, "GR", 100, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
    (FuelType::GrassShrub, "GS", 120, &[1, 2, 3, 4]),
    (FuelType::Shrub, "SH", 140, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
    (FuelType::TimberUnderstory, "TU", 160, &[1, 2, 3, 4, 5]),
    (FuelType::TimberLitter, "TL", 180, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
    (FuelType::SlashBlowdown, "SB", 200, &[1, 2, 3, 4]),
];

/// A Scott & Burgan fuel model, identified by its raster value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuelModelCode(u16);

impl FuelModelCode {
    /// Validates a raster value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFuelModel`] if the value is not one of the 45
    /// defined models.
    ///
    /// # Usage
    ///
    /// ```
    /// use fuelgrid::fuel::{FuelModelCode, FuelType};
    ///
    /// let code = FuelModelCode::from_number(183).unwrap();
    /// assert_eq!(code.code(), "TL3");
    /// assert_eq!(code.fuel_type(), FuelType::TimberLitter);
    /// assert!(code.is_burnable());
    ///
    /// assert!(!FuelModelCode::from_number(98).unwrap().is_burnable());
    /// assert!(FuelModelCode::from_number(94).is_err());
    /// assert!(FuelModelCode::from_number(110).is_err());
    /// ```
    pub fn from_number(number: u16) -> Result<FuelModelCode, Error> {
        FUEL_GROUPS
            .iter()
            .any(|(_, _, base, models)| number > *base && models.contains(&(number - base)))
            .then_some(FuelModelCode(number))
            .ok_or_else(|| Error::InvalidFuelModel(format!("No fuel model with number {number}")))
    }

    /// Every defined model in ascending raster order.
    pub fn all() -> impl Iterator<Item = FuelModelCode> {
        FUEL_GROUPS
            .iter()
            .flat_map(|(_, _, base, models)| models.iter().map(move |m| FuelModelCode(base + m)))
    }

    #[inline]
    pub fn number(&self) -> u16 {
        self.0
    }

    fn group(&self) -> (FuelType, &'static str, u16) {
        FUEL_GROUPS
            .iter()
            .rev()
            .find(|(_, _, base, _)| self.0 > *base)
            .map_or((FuelType::NonBurnable, "NB", 90), |(fuel_type, prefix, base, _)| (*fuel_type, *prefix, *base))
    }

    pub fn fuel_type(&self) -> FuelType {
        self.group().0
    }

    /// Alphanumeric code such as `GR1`.
    pub fn code(&self) -> String {
        let (_, prefix, base) = self.group();
        format!("{prefix}{}", self.0 - base)
    }

    pub fn is_burnable(&self) -> bool {
        self.fuel_type() != FuelType::NonBurnable
    }
}

impl FromStr for FuelModelCode {
    type Err = Error;

    /// Parses an alphanumeric code (`"SH5"`, case-insensitive) or a raster
    /// value (`"145"`).
    ///
    /// ```
    /// use fuelgrid::fuel::FuelModelCode;
    ///
    /// let code: FuelModelCode = "sh5".parse().unwrap();
    /// assert_eq!(code.number(), 145);
    /// assert_eq!("145".parse::<FuelModelCode>().unwrap(), code);
    ///
    /// assert!("SH0".parse::<FuelModelCode>().is_err());
    /// assert!("XX1".parse::<FuelModelCode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_uppercase();

        if let Ok(number) = value.parse::<u16>() {
            return FuelModelCode::from_number(number);
        }

        let invalid = || Error::InvalidFuelModel(format!("Unknown fuel model code {value}"));
        let Some((prefix, index)) = value.get(..2).zip(value.get(2..)) else {
            return Err(invalid());
        };
        let (_, _, base, _) = FUEL_GROUPS
            .iter()
            .find(|(_, group_prefix, _, _)| *group_prefix == prefix)
            .ok_or_else(invalid)?;
        let index = index.parse::<u16>().map_err(|_| invalid())?;

        let number = base.checked_add(index).ok_or_else(invalid)?;

        FuelModelCode::from_number(number).map_err(|_| invalid())
    }
}

impl Display for FuelModelCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Rothermel surface fire parameters of one fuel model, as served alongside
/// the classified raster. Loads are in tons/acre, depths in feet and
/// surface-area-to-volume ratios in 1/ft.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuelModel {
    pub code: String,
    pub number: u16,
    pub name: String,
    pub description: String,
    /// 1-h, 10-h, 100-h, live herbaceous, live woody
    pub fuel_load: Vec<f64>,
    /// `static` or `dynamic` load transfer
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub model_type: String,
    pub sav_ratio: Vec<u32>,
    pub fuel_bed_depth: f64,
    pub dead_fuel_moisture_of_extinction: f64,
    pub characteristic_sav: u32,
    pub bulk_density: f64,
    pub relative_packing_ratio: f64,
}

impl FuelModel {
    /// Oven-dry fuel load, fuel bed depth times bulk density.
    pub fn oven_dry_fuel_load(&self) -> f64 {
        self.fuel_bed_depth * self.bulk_density
    }

    /// The validated raster code of this model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFuelModel`] if `number` isn't a defined model.
    pub fn model_code(&self) -> Result<FuelModelCode, Error> {
        FuelModelCode::from_number(self.number)
    }
}
