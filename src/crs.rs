use std::{fmt::Display, str::FromStr};

use tracing::debug;

use crate::{
    authority::AuthorityCode,
    constants::{GRS80_A, GRS80_INV_F, WGS84_A, WGS84_F},
    wkt::{self, Node, Value},
    Error,
};

/// `AUTHORITY["EPSG","4326"]`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Authority {
    pub name: String,
    pub code: String,
}

impl Authority {
    pub fn epsg(code: u32) -> Authority {
        Self {
            name: "EPSG".to_string(),
            code: code.to_string(),
        }
    }

    fn from_node(node: &Node) -> Result<Authority, Error> {
        Ok(Self {
            name: node.text_arg(0)?.to_string(),
            code: node.text_arg(1)?.to_string(),
        })
    }

    fn optional(node: &Node) -> Result<Option<Authority>, Error> {
        node.find("AUTHORITY").map(Authority::from_node).transpose()
    }

    fn to_node(&self) -> Node {
        Node::new("AUTHORITY")
            .with(self.name.as_str())
            .with(self.code.as_str())
    }
}

impl Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.code)
    }
}

/// Angular or linear unit, with `factor` converting to radians or metres.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub name: String,
    pub factor: f64,
    pub authority: Option<Authority>,
}

impl Unit {
    fn from_node(node: &Node) -> Result<Unit, Error> {
        Ok(Self {
            name: node.text_arg(0)?.to_string(),
            factor: node.number_arg(1)?,
            authority: Authority::optional(node)?,
        })
    }

    fn to_node(&self) -> Node {
        Node::new("UNIT")
            .with(self.name.as_str())
            .with(self.factor)
            .with_opt(self.authority.as_ref().map(Authority::to_node))
    }
}

/// Reference ellipsoid, `SPHEROID` in WKT.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    pub name: String,
    pub semi_major_axis: f64,
    /// Zero for a sphere.
    pub inverse_flattening: f64,
    pub authority: Option<Authority>,
}

impl Ellipsoid {
    /// WGS 84 ellipsoid (EPSG:7030).
    pub fn wgs84() -> Ellipsoid {
        Self {
            name: "WGS 84".to_string(),
            semi_major_axis: WGS84_A,
            inverse_flattening: 1.0 / WGS84_F,
            authority: Some(Authority::epsg(7030)),
        }
    }

    /// GRS 1980 ellipsoid (EPSG:7019), as used by NAD83.
    pub fn grs80() -> Ellipsoid {
        Self {
            name: "GRS 1980".to_string(),
            semi_major_axis: GRS80_A,
            inverse_flattening: GRS80_INV_F,
            authority: Some(Authority::epsg(7019)),
        }
    }

    /// Flattening `f`; zero for a sphere.
    ///
    /// ```
    /// use fuelgrid::crs::Ellipsoid;
    ///
    /// let grs80 = Ellipsoid::grs80();
    /// assert!((grs80.flattening() - 1.0 / 298.257222101).abs() < 1e-15);
    /// ```
    pub fn flattening(&self) -> f64 {
        if self.inverse_flattening == 0. {
            0.
        } else {
            1. / self.inverse_flattening
        }
    }

    /// First eccentricity squared, `f(2 - f)`.
    pub fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        f * (2. - f)
    }

    fn from_node(node: &Node) -> Result<Ellipsoid, Error> {
        Ok(Self {
            name: node.text_arg(0)?.to_string(),
            semi_major_axis: node.number_arg(1)?,
            inverse_flattening: node.number_arg(2)?,
            authority: Authority::optional(node)?,
        })
    }

    fn to_node(&self) -> Node {
        Node::new("SPHEROID")
            .with(self.name.as_str())
            .with(self.semi_major_axis)
            .with(self.inverse_flattening)
            .with_opt(self.authority.as_ref().map(Authority::to_node))
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Datum {
    pub name: String,
    pub ellipsoid: Ellipsoid,
    /// Bursa-Wolf parameters from `TOWGS84`, if given.
    pub to_wgs84: Option<Vec<f64>>,
    pub authority: Option<Authority>,
}

impl Datum {
    fn from_node(node: &Node) -> Result<Datum, Error> {
        let to_wgs84 = node
            .find("TOWGS84")
            .map(|towgs| {
                (0..towgs.args.len())
                    .map(|i| towgs.number_arg(i))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            name: node.text_arg(0)?.to_string(),
            ellipsoid: Ellipsoid::from_node(node.require("SPHEROID")?)?,
            to_wgs84,
            authority: Authority::optional(node)?,
        })
    }

    fn to_node(&self) -> Node {
        let to_wgs84 = self.to_wgs84.as_ref().map(|params| {
            params
                .iter()
                .fold(Node::new("TOWGS84"), |node, value| node.with(*value))
        });

        Node::new("DATUM")
            .with(self.name.as_str())
            .with(self.ellipsoid.to_node())
            .with_opt(to_wgs84)
            .with_opt(self.authority.as_ref().map(Authority::to_node))
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimeMeridian {
    pub name: String,
    /// Longitude from Greenwich, in the CRS angular unit.
    pub longitude: f64,
    pub authority: Option<Authority>,
}

impl PrimeMeridian {
    fn from_node(node: &Node) -> Result<PrimeMeridian, Error> {
        Ok(Self {
            name: node.text_arg(0)?.to_string(),
            longitude: node.number_arg(1)?,
            authority: Authority::optional(node)?,
        })
    }

    fn to_node(&self) -> Node {
        Node::new("PRIMEM")
            .with(self.name.as_str())
            .with(self.longitude)
            .with_opt(self.authority.as_ref().map(Authority::to_node))
    }
}

/// `AXIS["Lat",NORTH]`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Axis {
    pub name: String,
    pub direction: String,
}

impl Axis {
    fn from_node(node: &Node) -> Result<Axis, Error> {
        Ok(Self {
            name: node.text_arg(0)?.to_string(),
            direction: node.keyword_arg(1)?.to_string(),
        })
    }

    fn to_node(&self) -> Node {
        let mut node = Node::new("AXIS").with(self.name.as_str());
        node.args.push(Value::Keyword(self.direction.clone()));
        node
    }

    fn all(node: &Node) -> Result<Vec<Axis>, Error> {
        node.find_all("AXIS").map(Axis::from_node).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeographicCrs {
    pub name: String,
    pub datum: Datum,
    pub prime_meridian: PrimeMeridian,
    pub unit: Unit,
    pub axes: Vec<Axis>,
    pub authority: Option<Authority>,
}

impl GeographicCrs {
    fn from_node(node: &Node) -> Result<GeographicCrs, Error> {
        Ok(Self {
            name: node.text_arg(0)?.to_string(),
            datum: Datum::from_node(node.require("DATUM")?)?,
            prime_meridian: PrimeMeridian::from_node(node.require("PRIMEM")?)?,
            unit: Unit::from_node(node.require("UNIT")?)?,
            axes: Axis::all(node)?,
            authority: Authority::optional(node)?,
        })
    }

    fn to_node(&self) -> Node {
        let node = Node::new("GEOGCS")
            .with(self.name.as_str())
            .with(self.datum.to_node())
            .with(self.prime_meridian.to_node())
            .with(self.unit.to_node());

        self.axes
            .iter()
            .fold(node, |node, axis| node.with(axis.to_node()))
            .with_opt(self.authority.as_ref().map(Authority::to_node))
    }
}

/// Projection method, `PROJECTION["Albers_Conic_Equal_Area"]`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    pub name: String,
    pub authority: Option<Authority>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub name: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedCrs {
    pub name: String,
    pub geographic: GeographicCrs,
    pub projection: Projection,
    pub parameters: Vec<Parameter>,
    pub unit: Unit,
    pub axes: Vec<Axis>,
    pub authority: Option<Authority>,
}

impl ProjectedCrs {
    /// Looks up a projection parameter by name, ignoring case.
    ///
    /// ```
    /// use fuelgrid::{Crs, ALBERS_EQUAL_AREA_CONIC};
    ///
    /// let crs = Crs::from_wkt(ALBERS_EQUAL_AREA_CONIC).unwrap();
    /// let projected = crs.as_projected().unwrap();
    ///
    /// assert_eq!(projected.parameter("Standard_Parallel_1"), Some(29.5));
    /// assert_eq!(projected.parameter("scale_factor"), None);
    /// ```
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters
            .iter()
            .find(|param| param.name.eq_ignore_ascii_case(name))
            .map(|param| param.value)
    }

    fn from_node(node: &Node) -> Result<ProjectedCrs, Error> {
        let projection = node.require("PROJECTION")?;
        let parameters = node
            .find_all("PARAMETER")
            .map(|param| {
                Ok(Parameter {
                    name: param.text_arg(0)?.to_string(),
                    value: param.number_arg(1)?,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self {
            name: node.text_arg(0)?.to_string(),
            geographic: GeographicCrs::from_node(node.require("GEOGCS")?)?,
            projection: Projection {
                name: projection.text_arg(0)?.to_string(),
                authority: Authority::optional(projection)?,
            },
            parameters,
            unit: Unit::from_node(node.require("UNIT")?)?,
            axes: Axis::all(node)?,
            authority: Authority::optional(node)?,
        })
    }

    fn to_node(&self) -> Node {
        let projection = Node::new("PROJECTION")
            .with(self.projection.name.as_str())
            .with_opt(self.projection.authority.as_ref().map(Authority::to_node));

        let node = Node::new("PROJCS")
            .with(self.name.as_str())
            .with(self.geographic.to_node())
            .with(projection);

        let node = self.parameters.iter().fold(node, |node, param| {
            node.with(
                Node::new("PARAMETER")
                    .with(param.name.as_str())
                    .with(param.value),
            )
        });

        self.axes
            .iter()
            .fold(node.with(self.unit.to_node()), |node, axis| node.with(axis.to_node()))
            .with_opt(self.authority.as_ref().map(Authority::to_node))
    }
}

/// A coordinate reference system, either geographic (`GEOGCS`) or projected
/// (`PROJCS`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crs {
    Geographic(GeographicCrs),
    Projected(ProjectedCrs),
}

impl Crs {
    /// Parses a WKT (version 1) CRS definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWkt`] if the text is malformed,
    /// [`Error::UnsupportedCrs`] if the root is neither `GEOGCS` nor `PROJCS`,
    /// and [`Error::MissingNode`] if a required element is absent.
    ///
    /// # Usage
    ///
    /// ```
    /// use fuelgrid::{Crs, ALBERS_EQUAL_AREA_CONIC};
    ///
    /// let crs = Crs::from_wkt(ALBERS_EQUAL_AREA_CONIC).unwrap();
    ///
    /// assert!(!crs.is_geographic());
    /// assert_eq!(crs.geographic().datum.name, "North_American_Datum_1983");
    /// assert_eq!(crs.ellipsoid().name, "GRS 1980");
    ///
    /// assert!(Crs::from_wkt(r#"VERT_CS["NAVD88"]"#).is_err());
    /// ```
    pub fn from_wkt(value: &str) -> Result<Crs, Error> {
        let node = wkt::parse(value)?;
        Crs::from_node(&node)
    }

    /// Lowers a parsed WKT tree into a CRS.
    ///
    /// # Errors
    ///
    /// See [`Crs::from_wkt`].
    pub fn from_node(node: &Node) -> Result<Crs, Error> {
        let crs = match node.keyword.to_ascii_uppercase().as_str() {
            "GEOGCS" => Crs::Geographic(GeographicCrs::from_node(node)?),
            "PROJCS" => Crs::Projected(ProjectedCrs::from_node(node)?),
            other => return Err(Error::UnsupportedCrs(other.to_string())),
        };

        debug!(crs = %crs.name(), geographic = crs.is_geographic(), "loaded crs");
        Ok(crs)
    }

    pub fn to_node(&self) -> Node {
        match self {
            Crs::Geographic(crs) => crs.to_node(),
            Crs::Projected(crs) => crs.to_node(),
        }
    }

    /// Serializes to canonical WKT. Parsing the output yields an equal [`Crs`].
    pub fn to_wkt(&self) -> String {
        self.to_node().to_string()
    }

    pub fn name(&self) -> &str {
        match self {
            Crs::Geographic(crs) => &crs.name,
            Crs::Projected(crs) => &crs.name,
        }
    }

    pub fn authority(&self) -> Option<&Authority> {
        match self {
            Crs::Geographic(crs) => crs.authority.as_ref(),
            Crs::Projected(crs) => crs.authority.as_ref(),
        }
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Geographic(_))
    }

    /// The CRS itself if geographic, else the base geographic CRS of the projection.
    pub fn geographic(&self) -> &GeographicCrs {
        match self {
            Crs::Geographic(crs) => crs,
            Crs::Projected(crs) => &crs.geographic,
        }
    }

    pub fn as_projected(&self) -> Option<&ProjectedCrs> {
        match self {
            Crs::Projected(crs) => Some(crs),
            Crs::Geographic(_) => None,
        }
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.geographic().datum.ellipsoid
    }
}

impl FromStr for Crs {
    type Err = Error;

    /// Accepts WKT or an `AUTHORITY:CODE` identifier known to the registry.
    ///
    /// ```
    /// use fuelgrid::{Crs, WGS84};
    ///
    /// let crs: Crs = WGS84.parse().unwrap();
    ///
    /// assert!(crs.is_geographic());
    /// assert_eq!(crs.authority().unwrap().to_string(), WGS84);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(['[', '(']) {
            Crs::from_wkt(s)
        } else {
            s.parse::<AuthorityCode>()?.resolve()
        }
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_node())
    }
}
