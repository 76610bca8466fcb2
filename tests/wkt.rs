use fuelgrid::{
    authority,
    crs::Crs,
    wkt::{self, Value},
    AuthorityCode, Error,
};

const UTM_13N: &str = r#"PROJCS["NAD83 / UTM zone 13N",
    GEOGCS["NAD83",
        DATUM["North_American_Datum_1983",
            SPHEROID["GRS 1980",6378137,298.257222101,AUTHORITY["EPSG","7019"]],
            TOWGS84[0,0,0,0,0,0,0],
            AUTHORITY["EPSG","6269"]],
        PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],
        UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],
        AUTHORITY["EPSG","4269"]],
    PROJECTION["Transverse_Mercator"],
    PARAMETER["latitude_of_origin",0],
    PARAMETER["central_meridian",-105],
    PARAMETER["scale_factor",0.9996],
    PARAMETER["false_easting",500000],
    PARAMETER["false_northing",0],
    UNIT["metre",1,AUTHORITY["EPSG","9001"]],
    AXIS["Easting",EAST],
    AXIS["Northing",NORTH],
    AUTHORITY["EPSG","26913"]]"#;

#[test]
fn parses_nested_nodes_and_keywords() {
    let node = wkt::parse(r#"AXIS["Easting", EAST]"#).unwrap();

    assert_eq!(node.keyword, "AXIS");
    assert_eq!(
        node.args,
        vec![Value::Text("Easting".to_string()), Value::Keyword("EAST".to_string())]
    );
}

#[test]
fn accepts_round_brackets_and_exponents() {
    let node = wkt::parse("TOWGS84(1.5e2, -2E-1, +3, .5)").unwrap();

    assert_eq!(node.number_arg(0).unwrap(), 150.0);
    assert_eq!(node.number_arg(1).unwrap(), -0.2);
    assert_eq!(node.number_arg(2).unwrap(), 3.0);
    assert_eq!(node.number_arg(3).unwrap(), 0.5);
    assert_eq!(node.to_string(), "TOWGS84[150,-0.2,3,0.5]");
}

#[test]
fn escaped_quotes_round_trip() {
    let node = wkt::parse(r#"DATUM["The ""best"" datum"]"#).unwrap();

    assert_eq!(node.text_arg(0).unwrap(), r#"The "best" datum"#);
    assert_eq!(node.to_string(), r#"DATUM["The ""best"" datum"]"#);
}

#[test]
fn empty_node() {
    let node = wkt::parse("EMPTY[ ]").unwrap();

    assert!(node.args.is_empty());
    assert_eq!(node.to_string(), "EMPTY[]");
}

#[test]
fn malformed_input_reports_position() {
    let cases = [
        ("", 0),
        ("[1]", 0),
        ("UNIT", 4),
        (r#"UNIT["metre",1"#, 14),
        (r#"UNIT["metre" 1]"#, 13),
        (r#"UNIT["metre,1]"#, 14),
        (r#"UNIT["metre",1)"#, 14),
        (r#"UNIT["metre",1]]"#, 15),
        (r#"UNIT["metre",#]"#, 13),
    ];

    for (input, expected) in cases {
        match wkt::parse(input) {
            Err(Error::InvalidWkt { position, .. }) => assert_eq!(position, expected, "{input}"),
            other => panic!("{input} should fail, got {other:?}"),
        }
    }
}

#[test]
fn invalid_number_is_rejected() {
    assert!(matches!(
        wkt::parse("UNIT[\"metre\",1.2.3]"),
        Err(Error::InvalidWkt { position: 13, .. })
    ));
}

#[test]
fn deep_nesting_is_rejected() {
    let nested = |depth: usize| format!("{}{}", "A[".repeat(depth), "]".repeat(depth));

    assert!(wkt::parse(&nested(64)).is_ok());
    assert!(matches!(
        wkt::parse(&nested(65)),
        Err(Error::InvalidWkt { position: 128, .. })
    ));
    assert!(matches!(
        wkt::parse(&nested(100_000)),
        Err(Error::InvalidWkt { position: 128, .. })
    ));
}

#[test]
fn overflowing_numbers_are_rejected() {
    assert!(matches!(
        wkt::parse(r#"SPHEROID["S",1e999,298]"#),
        Err(Error::InvalidWkt { position: 13, .. })
    ));
    assert!(matches!(
        wkt::parse(r#"SPHEROID["S",6378137,-1e400]"#),
        Err(Error::InvalidWkt { position: 21, .. })
    ));

    // Underflow to zero is still finite
    assert_eq!(wkt::parse("TOWGS84[1e-999]").unwrap().number_arg(0).unwrap(), 0.0);
}

#[test]
fn projected_crs_with_axes_round_trips() {
    let crs = Crs::from_wkt(UTM_13N).unwrap();
    let projected = crs.as_projected().unwrap();

    assert_eq!(crs.authority().unwrap().to_string(), "EPSG:26913");
    assert_eq!(projected.projection.name, "Transverse_Mercator");
    assert_eq!(projected.parameter("central_meridian"), Some(-105.0));
    assert_eq!(projected.parameter("SCALE_FACTOR"), Some(0.9996));
    assert_eq!(projected.axes.len(), 2);
    assert_eq!(projected.axes[0].direction, "EAST");
    assert_eq!(projected.geographic.datum.to_wgs84, Some(vec![0.0; 7]));

    let wkt = crs.to_wkt();
    assert!(!wkt.contains('\n'));
    assert!(wkt.starts_with(r#"PROJCS["NAD83 / UTM zone 13N",GEOGCS["NAD83",DATUM["#));
    assert_eq!(Crs::from_wkt(&wkt).unwrap(), crs);
    assert_eq!(crs.to_string(), wkt);
}

#[test]
fn unsupported_and_incomplete_crs() {
    assert!(matches!(
        Crs::from_wkt(r#"VERT_CS["NAVD88",VERT_DATUM["North American Vertical Datum 1988",2005]]"#),
        Err(Error::UnsupportedCrs(_))
    ));

    let missing_datum = r#"GEOGCS["Broken",PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#;
    match Crs::from_wkt(missing_datum) {
        Err(Error::MissingNode { parent, child }) => {
            assert_eq!(parent, "GEOGCS");
            assert_eq!(child, "DATUM");
        }
        other => panic!("expected missing DATUM, got {other:?}"),
    }

    let bad_spheroid = r#"GEOGCS["Broken",DATUM["D",SPHEROID["S","a",1]],PRIMEM["Greenwich",0],UNIT["degree",1]]"#;
    assert!(matches!(Crs::from_wkt(bad_spheroid), Err(Error::MissingNode { .. })));
}

#[test]
fn authority_codes() {
    let code: AuthorityCode = " esri:102039 ".parse().unwrap();
    assert_eq!(code.to_string(), "ESRI:102039");

    for invalid in ["", "4326", ":4326", "EPSG:", "EP SG:4326", "EPSG:43 26"] {
        assert!(
            matches!(invalid.parse::<AuthorityCode>(), Err(Error::InvalidAuthorityCode(_))),
            "{invalid}"
        );
    }

    assert!(matches!(
        "EPSG:3857".parse::<Crs>(),
        Err(Error::UnknownAuthorityCode(code)) if code == "EPSG:3857"
    ));
}

#[test]
fn every_registered_code_resolves() {
    let codes = authority::known_codes();
    let names = codes.iter().map(ToString::to_string).collect::<Vec<_>>();

    assert_eq!(names, ["EPSG:4269", "EPSG:4326", "ESRI:102039"]);

    for code in codes {
        let crs = code.resolve().unwrap();
        assert_eq!(Crs::from_wkt(&crs.to_wkt()).unwrap(), crs);
    }
}
