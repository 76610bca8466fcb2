//! Fixed names and coordinate reference systems shared by the fire analysis
//! pipeline.

/// File name of the classified Scott & Burgan fuel model raster. It is looked
/// up relative to the caller's data directory, see [`crate::fuel::raster_path`].
pub const FUEL_MODEL_CLASSIFIED: &str = "40_scott_and_burgan_fire_behaviour_fuel_models_classified.tif";

/// WGS84 latitude/longitude CRS.
pub const WGS84: &str = "EPSG:4326";

/// USGS version of the Albers equal area conic projection for the contiguous
/// United States (ESRI:102039), on NAD83.
///
/// ```
/// use fuelgrid::{Crs, ALBERS_EQUAL_AREA_CONIC};
///
/// let crs = Crs::from_wkt(ALBERS_EQUAL_AREA_CONIC).unwrap();
/// assert_eq!(crs.name(), "USA_Contiguous_Albers_Equal_Area_Conic_USGS_version");
/// ```
pub const ALBERS_EQUAL_AREA_CONIC: &str = "PROJCS[\"USA_Contiguous_Albers_Equal_Area_Conic_USGS_version\",\
    GEOGCS[\"NAD83\",DATUM[\"North_American_Datum_1983\",\
        SPHEROID[\"GRS 1980\",6378137,298.2572221010042, AUTHORITY[\"EPSG\",\"7019\"]],\
        AUTHORITY[\"EPSG\",\"6269\"]],\
        PRIMEM[\"Greenwich\",0],\
        UNIT[\"degree\",0.0174532925199433],\
        AUTHORITY[\"EPSG\",\"4269\"]],\
    PROJECTION[\"Albers_Conic_Equal_Area\"],\
    PARAMETER[\"standard_parallel_1\",29.5],\
    PARAMETER[\"standard_parallel_2\",45.5],\
    PARAMETER[\"latitude_of_center\",23],\
    PARAMETER[\"longitude_of_center\",-96],\
    PARAMETER[\"false_easting\",0],\
    PARAMETER[\"false_northing\",0],\
    UNIT[\"metre\",1,AUTHORITY[\"EPSG\",\"9001\"]]]";

// Semi-major axis a
pub(crate) const WGS84_A: f64 = 6_378_137.;
// Flattening
#[allow(clippy::unreadable_literal)]
pub(crate) const WGS84_F: f64 = 1.0 / 298.257223563;

// GRS 1980 shares the WGS84 semi-major axis
pub(crate) const GRS80_A: f64 = WGS84_A;
#[allow(clippy::unreadable_literal)]
pub(crate) const GRS80_INV_F: f64 = 298.2572221010042;
