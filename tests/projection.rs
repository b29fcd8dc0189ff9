//! Projection parameters depend on the global configuration, so all the cases run in one test.

use ncgrid::{
    attribute::Number,
    config::{global_config_mut, ProjectionNameAttributes},
    convention::{CfConvention, Convention, ProjectionValue, GRID_MAPPING_NAME, WGS84_DATUM},
    node::memory::MemoryNode,
};

fn mercator() -> MemoryNode {
    MemoryNode::new("crs")
        .with_attribute("standard_parallel", vec![25.0f64, 35.0])
        .with_attribute("longitude_of_projection_origin", 0f64)
        .with_attribute("crs_wkt", "PROJCS[\"Mercator\"]")
        .with_attribute("towgs84", vec![-87.0f64, -98.0, -121.0])
        .with_attribute("comment", "not a number")
        .with_attribute("horizontal_datum_name", "WGS84")
        .with_attribute("false_easting", 500_000f64)
        .with_attribute("grid_mapping_name", "mercator")
}

#[test]
fn projection_parameters() {
    let convention = CfConvention;
    assert!(convention.projection(&MemoryNode::new("crs")).is_none());

    // The first *_name attribute ends the scan, even grid_mapping_name.
    let node = MemoryNode::new("crs")
        .with_attribute("grid_mapping_name", "mercator")
        .with_attribute("false_easting", 500_000f64);
    assert_eq!(convention.projection(&node).unwrap().len(), 1);
    let parameters = convention.projection(&mercator()).unwrap();
    assert_eq!(parameters.method(), Some("mercator"));
    let names: Vec<_> = parameters.iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec![
            GRID_MAPPING_NAME,
            "standard_parallel",
            "longitude_of_projection_origin",
            "towgs84"
        ]
    );
    assert_eq!(
        parameters.get("standard_parallel"),
        Some(&ProjectionValue::Vector(vec![25.0, 35.0]))
    );
    assert_eq!(
        parameters.get("longitude_of_projection_origin"),
        Some(&ProjectionValue::Number(Number::Double(0.0)))
    );
    match parameters.get("towgs84") {
        Some(ProjectionValue::BursaWolf(towgs84)) => {
            assert_eq!(towgs84.target_datum(), WGS84_DATUM);
            assert_eq!(towgs84.tz, -121.0);
            assert!(towgs84.is_translation());
        }
        other => panic!("unexpected towgs84 {other:?}"),
    }
    assert!(parameters.get("crs_wkt").is_none());
    assert!(parameters.get("comment").is_none());

    // *_name attributes are stored and the scan continues.
    global_config_mut().set_projection_name_attributes(ProjectionNameAttributes::Store);
    let parameters = convention.projection(&mercator()).unwrap();
    global_config_mut().set_projection_name_attributes(ProjectionNameAttributes::EndScan);
    assert_eq!(parameters.len(), 6);
    assert_eq!(
        parameters
            .get("horizontal_datum_name")
            .and_then(ProjectionValue::as_text),
        Some("WGS84")
    );
    assert_eq!(
        parameters.get("false_easting").and_then(ProjectionValue::as_f64),
        Some(500_000.0)
    );

    // Too many towgs84 values are ignored.
    let node = MemoryNode::new("crs")
        .with_attribute("towgs84", vec![0f64; 8])
        .with_attribute("semi_major_axis", 6_378_137f64)
        .with_attribute("grid_mapping_name", "mercator");
    let parameters = convention.projection(&node).unwrap();
    assert!(parameters.get("towgs84").is_none());
    assert!(parameters.get("semi_major_axis").is_some());
    assert_eq!(parameters.method(), Some("mercator"));
}
