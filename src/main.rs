//! Command line access to the fuel raster name and CRS definitions.
//!
//! ```bash
//! fuelgrid constants
//! fuelgrid describe EPSG:4326
//! fuelgrid project 39.7392 -104.9903
//! RUST_LOG=debug fuelgrid unproject -775000 1720000
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use fuelgrid::{
    authority, fuel, AlbersEqualArea, Crs, LatLon, Projection, ALBERS_EQUAL_AREA_CONIC,
    FUEL_MODEL_CLASSIFIED, WGS84,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fuelgrid")]
#[command(about = "Fuel model raster and coordinate reference system definitions", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the raster file name and CRS constants
    Constants,
    /// Parse a CRS (WKT or AUTHORITY:CODE) and print a summary
    Describe {
        crs: String,
    },
    /// Project a latitude/longitude point
    Project {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        /// Target CRS, WKT or AUTHORITY:CODE
        #[arg(long, env = "FUELGRID_CRS", default_value = ALBERS_EQUAL_AREA_CONIC)]
        crs: String,
    },
    /// Recover the latitude/longitude of a projected point
    Unproject {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        /// Source CRS, WKT or AUTHORITY:CODE
        #[arg(long, env = "FUELGRID_CRS", default_value = ALBERS_EQUAL_AREA_CONIC)]
        crs: String,
    },
    /// Print the path of the classified fuel model raster
    Raster {
        data_dir: PathBuf,
    },
}

fn albers_for(crs: &str) -> anyhow::Result<AlbersEqualArea> {
    let crs: Crs = crs.parse().context("Failed to parse CRS")?;
    let Some(projected) = crs.as_projected() else {
        bail!("{} is geographic, nothing to project", crs.name());
    };
    debug!(crs = %projected.name, method = %projected.projection.name, "using projection");

    Ok(AlbersEqualArea::from_crs(projected)?)
}

fn describe(crs: &str) -> anyhow::Result<()> {
    let crs: Crs = crs.parse().context("Failed to parse CRS")?;
    let geographic = crs.geographic();
    let ellipsoid = crs.ellipsoid();

    println!("Name:       {}", crs.name());
    if let Some(authority) = crs.authority() {
        println!("Authority:  {authority}");
    }
    println!("Kind:       {}", if crs.is_geographic() { "geographic" } else { "projected" });
    println!("Datum:      {}", geographic.datum.name);
    println!(
        "Ellipsoid:  {} (a = {}, 1/f = {})",
        ellipsoid.name, ellipsoid.semi_major_axis, ellipsoid.inverse_flattening
    );

    if let Some(projected) = crs.as_projected() {
        println!("Projection: {}", projected.projection.name);
        for param in &projected.parameters {
            println!("  {} = {}", param.name, param.value);
        }
        println!("Unit:       {} ({})", projected.unit.name, projected.unit.factor);
    }

    println!("{crs}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_writer(std::io::stderr).with_target(false).with_env_filter(filter).init();

    let args = Args::parse();

    match args.command {
        Command::Constants => {
            println!("FUEL_MODEL_CLASSIFIED = {FUEL_MODEL_CLASSIFIED}");
            println!("WGS84 = {WGS84}");
            println!("ALBERS_EQUAL_AREA_CONIC = {ALBERS_EQUAL_AREA_CONIC}");
            let codes = authority::known_codes()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            info!("Registered codes: {}", codes.join(", "));
        }
        Command::Describe { crs } => describe(&crs)?,
        Command::Project { lat, lon, crs } => {
            let albers = albers_for(&crs)?;
            let point = LatLon::create(lat, lon)?;
            let (x, y) = albers.forward(&point);
            println!("{x:.3} {y:.3}");
        }
        Command::Unproject { x, y, crs } => {
            let albers = albers_for(&crs)?;
            println!("{}", albers.inverse(x, y));
        }
        Command::Raster { data_dir } => {
            println!("{}", fuel::raster_path(data_dir).display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn project_accepts_negative_coordinates() {
        let args = Args::try_parse_from(["fuelgrid", "project", "39.7392", "-104.9903", "--crs", "ESRI:102039"]).unwrap();

        match args.command {
            Command::Project { lat, lon, crs } => {
                assert_eq!(lat, 39.7392);
                assert_eq!(lon, -104.9903);
                assert_eq!(crs, "ESRI:102039");
            }
            other => panic!("expected project, got {other:?}"),
        }
    }

    #[test]
    fn default_crs_builds_usgs_conus() {
        assert_eq!(albers_for(ALBERS_EQUAL_AREA_CONIC).unwrap(), AlbersEqualArea::usgs_conus());
        assert_eq!(albers_for("ESRI:102039").unwrap(), AlbersEqualArea::usgs_conus());
    }

    #[test]
    fn geographic_crs_is_rejected() {
        let err = albers_for(WGS84).unwrap_err();
        assert!(err.to_string().contains("is geographic"), "{err}");

        assert!(albers_for("EPSG:3857").is_err());
        assert!(describe("not a crs").is_err());
        assert!(describe(WGS84).is_ok());
    }
}
