#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

use thiserror::Error;

pub mod authority;
pub mod constants;
pub mod crs;
pub mod fuel;
pub mod latlon;
pub mod utility;
pub mod wkt;

pub use authority::AuthorityCode;
pub use constants::{ALBERS_EQUAL_AREA_CONIC, FUEL_MODEL_CLASSIFIED, WGS84};
pub use crs::Crs;
pub use latlon::LatLon;
pub use projections::{albers::AlbersEqualArea, Projection};

pub mod projections {
    pub mod albers;

    use crate::LatLon;

    /// A map projection between geographic and planar coordinates.
    pub trait Projection {
        /// Projects a geographic point to `(x, y)` in the projection's linear unit.
        fn forward(&self, point: &LatLon) -> (f64, f64);
        /// Recovers the geographic point for planar `(x, y)`.
        fn inverse(&self, x: f64, y: f64) -> LatLon;
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Coordinate parameters are not valid: {0}")]
    InvalidCoord(String),
    #[error("WKT is invalid at byte {position}: {msg}")]
    InvalidWkt {
        position: usize,
        msg: String,
    },
    #[error("{parent} is missing required {child}")]
    MissingNode {
        parent: String,
        child: String,
    },
    #[error("CRS type {0} is not supported")]
    UnsupportedCrs(String),
    #[error("Authority code is invalid: {0}")]
    InvalidAuthorityCode(String),
    #[error("Authority code {0} is not registered")]
    UnknownAuthorityCode(String),
    #[error("Projection method {0} is not supported")]
    UnsupportedProjection(String),
    #[error("Projection parameter {0} is missing")]
    MissingParameter(String),
    #[error("Projection parameter {name} is invalid: {msg}")]
    InvalidParameter {
        name: String,
        msg: String,
    },
    #[error("Fuel model is invalid: {0}")]
    InvalidFuelModel(String),
}

/// Parses a value from its textual form, whatever that form is for the type
/// (WKT, `AUTHORITY:CODE`, fuel model code).
pub fn from_str<S, T>(value: S) -> Result<T, Error>
where
    S: AsRef<str>,
    T: std::str::FromStr<Err = Error>,
{
    value.as_ref().parse()
}

trait ThisOrThat {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T;
    fn ternary_lazy<F, E, T>(&self, r#true: F, r#false: E) -> T
    where
        F: Fn() -> T,
        E: Fn() -> T;
}

impl ThisOrThat for bool {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T {
        if *self { r#true } else { r#false }
    }

    fn ternary_lazy<F, E, T>(&self, r#true: F, r#false: E) -> T
    where
        F: Fn() -> T,
        E: Fn() -> T,
    {
        if *self { r#true() } else { r#false() }
    }
}
