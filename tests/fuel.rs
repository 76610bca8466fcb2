use std::collections::HashSet;

use fuelgrid::{
    fuel::{self, FuelModel, FuelModelCode, FuelType},
    Error, FUEL_MODEL_CLASSIFIED,
};

#[test]
fn forty_burnable_models() {
    let codes = FuelModelCode::all().collect::<Vec<_>>();

    assert_eq!(codes.len(), 45);
    assert_eq!(codes.iter().filter(|code| code.is_burnable()).count(), 40);
    assert!(codes.windows(2).all(|pair| pair[0] < pair[1]));

    let names = codes.iter().map(FuelModelCode::code).collect::<HashSet<_>>();
    assert_eq!(names.len(), 45);

    for code in codes {
        assert_eq!(FuelModelCode::from_number(code.number()).unwrap(), code);
        assert_eq!(code.to_string().parse::<FuelModelCode>().unwrap(), code);
    }
}

#[test]
fn raster_values() {
    let cases = [
        (91, "NB1", FuelType::NonBurnable),
        (99, "NB9", FuelType::NonBurnable),
        (101, "GR1", FuelType::Grass),
        (124, "GS4", FuelType::GrassShrub),
        (149, "SH9", FuelType::Shrub),
        (165, "TU5", FuelType::TimberUnderstory),
        (181, "TL1", FuelType::TimberLitter),
        (204, "SB4", FuelType::SlashBlowdown),
    ];

    for (number, code, fuel_type) in cases {
        let model = FuelModelCode::from_number(number).unwrap();
        assert_eq!(model.code(), code);
        assert_eq!(model.fuel_type(), fuel_type);
    }

    for invalid in [0, 90, 94, 100, 110, 125, 166, 190, 205, u16::MAX] {
        assert!(matches!(FuelModelCode::from_number(invalid), Err(Error::InvalidFuelModel(_))), "{invalid}");
    }

    for invalid in ["", "G", "GR", "GR10", "NB4", "Ü1", "TL65535"] {
        assert!(invalid.parse::<FuelModelCode>().is_err(), "{invalid}");
    }
}

#[test]
fn raster_lives_in_data_dir() {
    let path = fuel::raster_path("data");

    assert_eq!(path.file_name().unwrap(), FUEL_MODEL_CLASSIFIED);
    assert_eq!(path.parent().unwrap(), std::path::Path::new("data"));
}

#[test]
fn oven_dry_load() {
    let model = FuelModel {
        code: "GR2".to_string(),
        number: 102,
        name: "Low Load, Dry Climate Grass".to_string(),
        description: "Moderately coarse continuous grass, average depth about 1 foot.".to_string(),
        fuel_load: vec![0.1, 0.0, 0.0, 1.0, 0.0],
        model_type: "dynamic".to_string(),
        sav_ratio: vec![2000, 1800],
        fuel_bed_depth: 1.0,
        dead_fuel_moisture_of_extinction: 15.0,
        characteristic_sav: 1820,
        bulk_density: 0.05,
        relative_packing_ratio: 0.87,
    };

    assert!((model.oven_dry_fuel_load() - 0.05).abs() < 1e-12);
    assert_eq!(model.model_code().unwrap().code(), model.code);

    assert_eq!(fuel::HEAT_CONTENT, 8000);
    assert_eq!(fuel::PARTICLE_DENSITY, 32.0);
}
