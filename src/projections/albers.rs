use tracing::debug;

use crate::{
    crs::{Ellipsoid, ProjectedCrs},
    latlon::LatLon,
    projections::Projection,
    utility::{dms, GeoMath},
    Error, ThisOrThat,
};

// Projection method names accepted for Albers, compared case-insensitively
const METHOD_NAMES: [&str; 3] = ["Albers_Conic_Equal_Area", "Albers", "Albers_Equal_Area"];

const MAX_ITERATIONS: usize = 15;
const TOLERANCE: f64 = 1e-12;

/// Defining parameters of an Albers equal area conic projection, angles in
/// degrees and offsets in the CRS linear unit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlbersParams {
    pub standard_parallel_1: f64,
    pub standard_parallel_2: f64,
    pub latitude_of_center: f64,
    pub longitude_of_center: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

impl AlbersParams {
    /// Parameters of [`crate::ALBERS_EQUAL_AREA_CONIC`].
    pub const USGS_CONUS: AlbersParams = AlbersParams {
        standard_parallel_1: 29.5,
        standard_parallel_2: 45.5,
        latitude_of_center: 23.,
        longitude_of_center: -96.,
        false_easting: 0.,
        false_northing: 0.,
    };
}

/// Albers equal area conic projection on an ellipsoid, following Snyder,
/// *Map Projections: A Working Manual*, pp. 101-102.
#[derive(Clone, Debug, PartialEq)]
pub struct AlbersEqualArea {
    a: f64,
    e: f64,
    e2: f64,
    n: f64,
    c: f64,
    rho0: f64,
    /// Central meridian, degrees from Greenwich
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
    /// Metres per linear unit
    to_metre: f64,
}

impl AlbersEqualArea {
    /// Creates the projection, validating the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a latitude is outside `[-90, 90]`,
    /// the standard parallels are symmetric about the equator, `to_metre` isn't
    /// positive, or the ellipsoid has a non-positive semi-major axis or a
    /// flattening outside `[0, 1)`.
    pub fn new(ellipsoid: &Ellipsoid, params: AlbersParams, to_metre: f64) -> Result<AlbersEqualArea, Error> {
        let lats = [
            ("standard_parallel_1", params.standard_parallel_1),
            ("standard_parallel_2", params.standard_parallel_2),
            ("latitude_of_center", params.latitude_of_center),
        ];
        for (name, lat) in lats {
            if !(-f64::from(dms::QD)..=f64::from(dms::QD)).contains(&lat) {
                return Err(Error::InvalidParameter {
                    name: name.to_string(),
                    msg: format!("Latitude {lat} outside of valid range [-90, 90]"),
                });
            }
        }

        if (params.standard_parallel_1 + params.standard_parallel_2).is_zero() {
            return Err(Error::InvalidParameter {
                name: "standard_parallel_2".to_string(),
                msg: "Standard parallels must not be symmetric about the equator".to_string(),
            });
        }

        if to_metre.is_nan() || to_metre <= 0. {
            return Err(Error::InvalidParameter {
                name: "UNIT".to_string(),
                msg: format!("Linear unit factor {to_metre} must be positive"),
            });
        }

        if !ellipsoid.semi_major_axis.is_finite() || ellipsoid.semi_major_axis <= 0. {
            return Err(Error::InvalidParameter {
                name: "SPHEROID".to_string(),
                msg: format!("Semi-major axis {} must be positive", ellipsoid.semi_major_axis),
            });
        }

        // f in [0, 1) keeps the eccentricity squared in [0, 1) too
        if !(0. ..1.).contains(&ellipsoid.flattening()) {
            return Err(Error::InvalidParameter {
                name: "SPHEROID".to_string(),
                msg: format!(
                    "Inverse flattening {} must be 0 or greater than 1",
                    ellipsoid.inverse_flattening
                ),
            });
        }

        Ok(Self::build(ellipsoid, params, to_metre))
    }

    /// Builds the projection described by a parsed projected CRS.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedProjection`] if the CRS isn't an Albers
    /// projection, [`Error::MissingParameter`] if a required parameter is
    /// absent, and the errors of [`AlbersEqualArea::new`].
    ///
    /// # Usage
    ///
    /// ```
    /// use fuelgrid::{AlbersEqualArea, Crs, LatLon, Projection, ALBERS_EQUAL_AREA_CONIC};
    ///
    /// let crs = Crs::from_wkt(ALBERS_EQUAL_AREA_CONIC).unwrap();
    /// let albers = AlbersEqualArea::from_crs(crs.as_projected().unwrap()).unwrap();
    ///
    /// let (x, y) = albers.forward(&LatLon::create(23.0, -96.0).unwrap());
    /// assert!(x.abs() < 1e-6);
    /// assert!(y.abs() < 1e-6);
    /// ```
    pub fn from_crs(crs: &ProjectedCrs) -> Result<AlbersEqualArea, Error> {
        let method = &crs.projection.name;
        if !METHOD_NAMES.iter().any(|name| name.eq_ignore_ascii_case(method)) {
            return Err(Error::UnsupportedProjection(method.clone()));
        }

        let required = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| crs.parameter(name))
                .ok_or_else(|| Error::MissingParameter(names[0].to_string()))
        };

        let prime_meridian = crs.geographic.prime_meridian.longitude;
        let params = AlbersParams {
            standard_parallel_1: required(&["standard_parallel_1"])?,
            standard_parallel_2: required(&["standard_parallel_2"])?,
            latitude_of_center: required(&["latitude_of_center", "latitude_of_origin"])?,
            longitude_of_center: required(&["longitude_of_center", "central_meridian"])? + prime_meridian,
            false_easting: crs.parameter("false_easting").unwrap_or(0.),
            false_northing: crs.parameter("false_northing").unwrap_or(0.),
        };

        Self::new(&crs.geographic.datum.ellipsoid, params, crs.unit.factor)
    }

    /// The USGS contiguous United States projection of
    /// [`crate::ALBERS_EQUAL_AREA_CONIC`] on GRS 1980, in metres.
    pub fn usgs_conus() -> AlbersEqualArea {
        Self::build(&Ellipsoid::grs80(), AlbersParams::USGS_CONUS, 1.)
    }

    fn build(ellipsoid: &Ellipsoid, params: AlbersParams, to_metre: f64) -> AlbersEqualArea {
        let e2 = ellipsoid.eccentricity_squared();
        let e = e2.sqrt();

        let mut albers = Self {
            a: ellipsoid.semi_major_axis,
            e,
            e2,
            n: 0.,
            c: 0.,
            rho0: 0.,
            lon0: params.longitude_of_center.ang_normalize(),
            false_easting: params.false_easting,
            false_northing: params.false_northing,
            to_metre,
        };

        let (sin1, cos1) = params.standard_parallel_1.to_radians().sin_cos();
        let (sin2, cos2) = params.standard_parallel_2.to_radians().sin_cos();
        let m1 = albers.m(sin1, cos1);
        let m2 = albers.m(sin2, cos2);
        let q1 = albers.q(sin1);
        let q2 = albers.q(sin2);
        let q0 = albers.q(params.latitude_of_center.to_radians().sin());

        // Single standard parallel (tangent cone)
        albers.n = params.standard_parallel_1.eps_eq(params.standard_parallel_2)
            .ternary_lazy(|| sin1, || (m1.powi(2) - m2.powi(2)) / (q2 - q1));
        albers.c = m1.powi(2) + albers.n * q1;
        albers.rho0 = albers.rho(q0);

        debug!(
            n = albers.n,
            c = albers.c,
            rho0 = albers.rho0,
            lon0 = albers.lon0,
            "albers projection ready"
        );

        albers
    }

    /// Cone constant `n`.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    /// Snyder's `m` (eq. 14-15) from sin/cos of latitude
    fn m(&self, sin_phi: f64, cos_phi: f64) -> f64 {
        cos_phi / (1. - self.e2 * sin_phi.powi(2)).sqrt()
    }

    /// Authalic `q` (eq. 3-12)
    fn q(&self, sin_phi: f64) -> f64 {
        if self.e.is_zero() {
            return 2. * sin_phi;
        }
        (1. - self.e2) * (
            sin_phi / (1. - self.e2 * sin_phi.powi(2)) +
            sin_phi.eatanhe(self.e) / self.e2
        )
    }

    /// Radius of the parallel with authalic `q` on the developed cone, metres
    fn rho(&self, q: f64) -> f64 {
        self.a * (self.c - self.n * q).max(0.).sqrt() / self.n
    }

    /// Latitude in degrees from authalic `q`, by Newton iteration (eq. 3-16).
    fn latitude_from_q(&self, q: f64) -> f64 {
        let qp = self.q(1.);
        if q.abs() >= qp - TOLERANCE {
            return f64::from(dms::QD).copysign(q);
        }

        let mut phi = num::clamp(q / 2., -1., 1.).asin();
        if self.e.is_zero() {
            return phi.to_degrees();
        }

        for _ in 0..MAX_ITERATIONS {
            let (sin_phi, cos_phi) = phi.sin_cos();
            let one_es2 = 1. - self.e2 * sin_phi.powi(2);
            let dphi = one_es2.powi(2) / (2. * cos_phi) * (
                q / (1. - self.e2) -
                sin_phi / one_es2 -
                sin_phi.eatanhe(self.e) / self.e2
            );
            phi += dphi;
            if dphi.abs() < TOLERANCE {
                break;
            }
        }

        phi.to_degrees()
    }

    /// Area of a closed ring of geographic points, in square linear units of
    /// the projection. Edges are straight lines in the projected plane, so
    /// long edges along parallels should be densified by the caller. The ring
    /// may be given open or closed.
    ///
    /// ```
    /// use fuelgrid::{AlbersEqualArea, LatLon};
    ///
    /// let albers = AlbersEqualArea::usgs_conus();
    /// assert_eq!(albers.ring_area(&[]), 0.0);
    ///
    /// let ring = [
    ///     LatLon::create(40.0, -105.0).unwrap(),
    ///     LatLon::create(40.0, -104.99).unwrap(),
    ///     LatLon::create(40.01, -104.99).unwrap(),
    ///     LatLon::create(40.01, -105.0).unwrap(),
    /// ];
    /// // Roughly 0.85 km by 1.1 km
    /// let area = albers.ring_area(&ring);
    /// assert!(area > 0.9e6 && area < 1.0e6);
    /// ```
    pub fn ring_area(&self, ring: &[LatLon]) -> f64 {
        if ring.len() < 3 {
            return 0.;
        }

        let projected = ring
            .iter()
            .map(|point| self.forward(point))
            .collect::<Vec<_>>();

        let twice_area = projected
            .iter()
            .zip(projected.iter().cycle().skip(1))
            .fold(0., |acc, ((x1, y1), (x2, y2))| acc + (x1 * y2 - x2 * y1));

        twice_area.abs() / 2.
    }
}

impl Projection for AlbersEqualArea {
    /// ```
    /// use fuelgrid::{AlbersEqualArea, LatLon, Projection};
    ///
    /// let albers = AlbersEqualArea::usgs_conus();
    /// let point = LatLon::create(39.7392, -104.9903).unwrap();
    ///
    /// let (x, y) = albers.forward(&point);
    /// let back = albers.inverse(x, y);
    ///
    /// assert!(x < 0.0 && y > 0.0);
    /// assert!((back.latitude() - point.latitude()).abs() < 1e-9);
    /// assert!((back.longitude() - point.longitude()).abs() < 1e-9);
    /// ```
    fn forward(&self, point: &LatLon) -> (f64, f64) {
        let rho = self.rho(self.q(point.latitude.to_radians().sin()));
        let theta = self.n * (point.longitude - self.lon0).ang_normalize().to_radians();
        let (sin_theta, cos_theta) = theta.sin_cos();

        let x = rho * sin_theta / self.to_metre + self.false_easting;
        let y = (self.rho0 - rho * cos_theta) / self.to_metre + self.false_northing;

        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> LatLon {
        let x = (x - self.false_easting) * self.to_metre;
        let y = self.rho0 - (y - self.false_northing) * self.to_metre;

        let rho = x.hypot(y);
        let theta = (self.n < 0.).ternary_lazy(|| (-x).atan2(-y), || x.atan2(y));
        let q = (self.c - (rho * self.n / self.a).powi(2)) / self.n;

        let lat = self.latitude_from_q(q);
        let lon = (self.lon0 + (theta / self.n).to_degrees()).ang_normalize();

        LatLon::new(lat, lon)
    }
}
