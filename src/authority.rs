use std::{collections::HashMap, fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use tracing::debug;

use crate::{constants::ALBERS_EQUAL_AREA_CONIC, crs::Crs, Error};

const EPSG_4326: &str = "GEOGCS[\"WGS 84\",\
    DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,298.257223563,AUTHORITY[\"EPSG\",\"7030\"]],\
        AUTHORITY[\"EPSG\",\"6326\"]],\
    PRIMEM[\"Greenwich\",0,AUTHORITY[\"EPSG\",\"8901\"]],\
    UNIT[\"degree\",0.0174532925199433,AUTHORITY[\"EPSG\",\"9122\"]],\
    AXIS[\"Latitude\",NORTH],\
    AXIS[\"Longitude\",EAST],\
    AUTHORITY[\"EPSG\",\"4326\"]]";

const EPSG_4269: &str = "GEOGCS[\"NAD83\",\
    DATUM[\"North_American_Datum_1983\",SPHEROID[\"GRS 1980\",6378137,298.257222101,AUTHORITY[\"EPSG\",\"7019\"]],\
        TOWGS84[0,0,0,0,0,0,0],\
        AUTHORITY[\"EPSG\",\"6269\"]],\
    PRIMEM[\"Greenwich\",0,AUTHORITY[\"EPSG\",\"8901\"]],\
    UNIT[\"degree\",0.0174532925199433,AUTHORITY[\"EPSG\",\"9122\"]],\
    AXIS[\"Latitude\",NORTH],\
    AXIS[\"Longitude\",EAST],\
    AUTHORITY[\"EPSG\",\"4269\"]]";

lazy_static! {
    static ref REGISTRY: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        map.insert("EPSG:4326", EPSG_4326);
        map.insert("EPSG:4269", EPSG_4269);
        map.insert("ESRI:102039", ALBERS_EQUAL_AREA_CONIC);
        map
    };
}

/// An `AUTHORITY:CODE` CRS identifier such as `EPSG:4326`. The authority name
/// is normalized to upper case.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthorityCode {
    pub(crate) authority: String,
    pub(crate) code: String,
}

impl AuthorityCode {
    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Looks up the full definition of this code in the built-in registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAuthorityCode`] if the code isn't registered.
    ///
    /// # Usage
    ///
    /// ```
    /// use fuelgrid::{AuthorityCode, WGS84};
    ///
    /// let code: AuthorityCode = WGS84.parse().unwrap();
    /// let crs = code.resolve().unwrap();
    ///
    /// assert_eq!(crs.name(), "WGS 84");
    /// assert_eq!(crs.geographic().datum.name, "WGS_1984");
    ///
    /// let unknown: AuthorityCode = "EPSG:1".parse().unwrap();
    /// assert!(unknown.resolve().is_err());
    /// ```
    pub fn resolve(&self) -> Result<Crs, Error> {
        let wkt = REGISTRY
            .get(self.to_string().as_str())
            .ok_or_else(|| Error::UnknownAuthorityCode(self.to_string()))?;

        debug!(code = %self, "resolving registered crs");
        Crs::from_wkt(wkt)
    }
}

/// All codes the registry can resolve, sorted.
pub fn known_codes() -> Vec<AuthorityCode> {
    let mut codes = REGISTRY
        .keys()
        .filter_map(|key| key.parse::<AuthorityCode>().ok())
        .collect::<Vec<_>>();
    codes.sort_by(|a, b| (&a.authority, &a.code).cmp(&(&b.authority, &b.code)));
    codes
}

impl FromStr for AuthorityCode {
    type Err = Error;

    /// Parses `AUTHORITY:CODE`.
    ///
    /// ```
    /// use fuelgrid::AuthorityCode;
    ///
    /// let code: AuthorityCode = "epsg:4326".parse().unwrap();
    /// assert_eq!(code.authority(), "EPSG");
    /// assert_eq!(code.code(), "4326");
    ///
    /// assert!("EPSG".parse::<AuthorityCode>().is_err());
    /// assert!("EPSG:".parse::<AuthorityCode>().is_err());
    /// assert!("EPSG:43:26".parse::<AuthorityCode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let Some((authority, code)) = value.split_once(':') else {
            return Err(Error::InvalidAuthorityCode(format!("Missing ':' in {value}")));
        };

        if authority.is_empty() || !authority.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::InvalidAuthorityCode(format!("Invalid authority name in {value}")));
        }
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidAuthorityCode(format!("Invalid code in {value}")));
        }

        Ok(Self {
            authority: authority.to_ascii_uppercase(),
            code: code.to_string(),
        })
    }
}

impl Display for AuthorityCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}
