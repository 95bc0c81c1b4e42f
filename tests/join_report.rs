use ndvi_rs::geo::{join_coverage, parse_features};
use ndvi_rs::index::build;
use ndvi_rs::models::RawRecord;

const WORLD: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "id": "USA",
      "properties": { "name": "United States" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[ -100.0, 30.0 ], [ -90.0, 30.0 ], [ -90.0, 40.0 ], [ -100.0, 40.0 ], [ -100.0, 30.0 ]]]
      }
    },
    {
      "type": "Feature",
      "id": "ATA",
      "properties": { "name": "Antarctica" },
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [[[[ -60.0, -75.0 ], [ -50.0, -75.0 ], [ -50.0, -70.0 ], [ -60.0, -70.0 ], [ -60.0, -75.0 ]]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "name": "Nowhere" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[ 0.0, 0.0 ], [ 1.0, 0.0 ], [ 1.0, 1.0 ], [ 0.0, 1.0 ], [ 0.0, 0.0 ]]]
      }
    }
  ]
}"#;

#[test]
fn parse_features_reads_ids_names_and_geometry() {
    let features = parse_features(WORLD).unwrap();
    assert_eq!(features.len(), 3);
    assert_eq!(features[0].iso3.as_deref(), Some("USA"));
    assert_eq!(features[0].name, "United States");
    assert_eq!(features[0].label(), "United States (USA)");
    assert_eq!(features[2].iso3, None);
    assert_eq!(features[2].label(), "Nowhere");
}

#[test]
fn parse_features_rejects_non_collections() {
    let lone = r#"{ "type": "Feature", "properties": {}, "geometry": null }"#;
    assert!(parse_features(lone).is_err());
    assert!(parse_features("not json at all").is_err());
}

#[test]
fn join_coverage_lists_exactly_the_unjoinable_features() {
    let features = parse_features(WORLD).unwrap();
    let series = build(vec![RawRecord::new("USA", 1, Some(0.3))]);

    let report = join_coverage(&features, &series);
    assert_eq!(report.matched, 1);
    assert_eq!(
        report.unmatched,
        vec!["Antarctica (ATA)".to_string(), "Nowhere".to_string()]
    );
}

#[test]
fn join_coverage_with_empty_series_matches_nothing() {
    let features = parse_features(WORLD).unwrap();
    let report = join_coverage(&features, &Default::default());
    assert_eq!(report.matched, 0);
    assert_eq!(report.unmatched.len(), 3);
}
