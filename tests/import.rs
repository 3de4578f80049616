// End-to-end imports through the public API: parse, reconcile into a
// session, then save and reload.

use geoimport::{
    Feature, Format, GeometryType, ImportConfig, ImportDirective, ImportTarget, LayerId, MapSession, Stage,
    features_to_geojson, parse_features, run_import,
};
use serde_json::{Value, json};

const GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "Chez Rémy"}, "geometry": {"type": "Point", "coordinates": [6.92, 47.48]}},
    {"type": "Feature", "properties": {"name": "Gare"}, "geometry": {"type": "Point", "coordinates": [6.86, 47.63]}},
    {"type": "Feature", "properties": {"name": "Route"}, "geometry": {"type": "LineString", "coordinates": [[2.46, 48.88], [2.48, 48.76]]}},
    {"type": "Feature", "properties": {"name": "Parc"}, "geometry": {"type": "Polygon", "coordinates": [[[2.1, 48.1], [2.2, 48.1], [2.2, 48.2], [2.1, 48.1]]]}},
    {"type": "Feature", "properties": {"name": "Rivers"}, "geometry": {"type": "MultiLineString", "coordinates": [[[1, 1], [2, 2]], [[3, 3], [4, 4]]]}}
  ]
}"#;

const KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2"><Document>
  <Placemark><name>Simple point</name><Point><coordinates>-122.0822035425683,37.42228990140251,0</coordinates></Point></Placemark>
  <Placemark><name>Path</name><LineString><coordinates>-112.08,36.10 -112.09,36.11</coordinates></LineString></Placemark>
  <Placemark><name>Area</name><Polygon><outerBoundaryIs><LinearRing>
    <coordinates>-77.05,38.87 -77.06,38.88 -77.04,38.88 -77.05,38.87</coordinates>
  </LinearRing></outerBoundaryIs></Polygon></Placemark>
</Document></kml>"#;

const GPX: &str = r#"<gpx version="1.1" creator="test">
  <wpt lat="45.44283" lon="-121.72904"><name>Camp</name></wpt>
  <trk><name>Walk</name><trkseg>
    <trkpt lat="45.4431641" lon="-121.7295456"/><trkpt lat="45.4428615" lon="-121.7290800"/>
  </trkseg></trk>
</gpx>"#;

const OSM: &str = r#"{"version": 0.6, "elements": [
  {"type": "node", "id": 3570, "lat": 48.85, "lon": 2.35, "tags": {"amenity": "cafe"}},
  {"type": "node", "id": 3571, "lat": 48.86, "lon": 2.36, "tags": {"amenity": "bar"}}
]}"#;

const CSV: &str = "Foo,Latitude,Longitude,title,description\n\
                   bar,41.34,122.86,a point somewhere,the description of this point\n\
                   baz,42.34,121.86,another point,description of another point\n";

fn import(session: &mut MapSession, format: Format, text: &str, target: ImportTarget) -> geoimport::ImportOutcome {
    run_import(&ImportDirective::new(format, text).with_target(target), session, &ImportConfig::default())
}

fn markers(session: &MapSession) -> usize {
    session.layers().iter().map(|l| l.marker_count()).sum()
}

fn paths(session: &MapSession) -> usize {
    session.layers().feature_count() - markers(session)
}

/// A session holding one layer with one marker.
fn session_with_layer() -> (MapSession, LayerId) {
    let mut session = MapSession::new();
    let outcome = import(&mut session, Format::GeoJson, r#"{"type": "Point", "coordinates": [1, 2]}"#, ImportTarget::NewLayer);
    let id = outcome.created_layer().unwrap();
    (session, id)
}

#[test]
fn every_format_lands_in_one_new_layer() {
    let cases = [
        (Format::GeoJson, GEOJSON, 2, 3),
        (Format::Kml, KML, 1, 2),
        (Format::Gpx, GPX, 1, 1),
        (Format::Osm, OSM, 2, 0),
        (Format::Csv, CSV, 2, 0),
    ];
    for (format, text, expected_markers, expected_paths) in cases {
        let mut session = MapSession::new();
        let outcome = import(&mut session, format, text, ImportTarget::NewLayer);
        assert!(outcome.is_success(), "{format}: {:?}", outcome.errors);
        assert_eq!(session.layers().len(), 1, "{format}");
        assert_eq!(markers(&session), expected_markers, "{format}");
        assert_eq!(paths(&session), expected_paths, "{format}");
    }
}

#[test]
fn append_to_existing_layer() {
    let (mut session, id) = session_with_layer();
    let outcome = import(&mut session, Format::Csv, CSV, ImportTarget::append_to(id));
    assert!(outcome.is_success());
    assert_eq!(outcome.created_layer(), None);
    assert_eq!(session.layers().len(), 1);
    assert_eq!(markers(&session), 3);
    // Existing feature first.
    assert_eq!(session.layers().get(id).unwrap().features()[0].properties().len(), 0);
}

#[test]
fn replace_existing_layer() {
    let (mut session, id) = session_with_layer();
    let outcome = import(&mut session, Format::Csv, CSV, ImportTarget::replace(id));
    assert_eq!(outcome.features_added, 2);
    assert_eq!(session.layers().len(), 1);
    assert_eq!(markers(&session), 2);
}

#[test]
fn new_layer_next_to_existing_one() {
    let (mut session, existing) = session_with_layer();
    let outcome = import(&mut session, Format::Csv, CSV, ImportTarget::NewLayer);
    let created = outcome.created_layer().unwrap();
    assert_ne!(created, existing);
    assert_eq!(session.layers().len(), 2);
    assert_eq!(markers(&session), 3);

    // The new layer is offered as a target for the next import.
    let choices: Vec<LayerId> = session.layers().choices().into_iter().map(|(id, _)| id).collect();
    assert_eq!(choices, vec![existing, created]);
    import(&mut session, Format::Osm, OSM, ImportTarget::append_to(created));
    assert_eq!(session.layers().get(created).unwrap().len(), 4);
}

#[test]
fn csv_without_coordinate_headers_creates_no_layer() {
    let mut session = MapSession::new();
    let outcome = import(&mut session, Format::Csv, "a,b,c\n12.23,48.34,mypoint\n12.23,48.34,mypoint2", ImportTarget::NewLayer);
    assert!(!outcome.is_success());
    assert_eq!(outcome.created_layer(), None);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].stage, Stage::Parse);
    assert!(outcome.alert().unwrap().message.contains("latitude"));
    assert!(session.layers().is_empty());
}

#[test]
fn dots_are_removed_from_property_names_before_saving() {
    let text = json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [6.92, 47.48]},
             "properties": {"color": "", "name": "Chez Rémy", "A . in the name": ""}},
            {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[2.46, 48.88], [2.48, 48.76], [2.16, 48.71]]},
             "properties": {"color": "", "name": "Périf", "with a dot.": ""}},
        ],
    });
    let mut session = MapSession::new();
    let id = import(&mut session, Format::GeoJson, &text.to_string(), ImportTarget::NewLayer).created_layer().unwrap();

    let saved = session.layers().get(id).unwrap().to_geojson();
    assert_eq!(saved["features"][0]["properties"], json!({"color": "", "name": "Chez Rémy", "A _ in the name": ""}));
    assert_eq!(saved["features"][1]["properties"], json!({"color": "", "name": "Périf", "with a dot_": ""}));
}

#[test]
fn geometry_collection_becomes_one_feature_per_member() {
    let text = r#"{"type": "GeometryCollection", "geometries": [
        {"type": "Point", "coordinates": [-80.66, 35.04]},
        {"type": "Polygon", "coordinates": [[[-80.66, 35.04], [-80.67, 35.05], [-80.68, 35.04], [-80.66, 35.04]]]},
        {"type": "LineString", "coordinates": [[-80.66, 35.05], [-80.67, 35.06]]}
    ]}"#;
    let features = parse_features(Format::GeoJson, text).unwrap();
    let types: Vec<_> = features.iter().map(Feature::geometry_type).collect();
    assert_eq!(types, vec![GeometryType::Point, GeometryType::Polygon, GeometryType::LineString]);
}

#[test]
fn native_import_keeps_layers_but_not_map_identity() {
    let text = json!({
        "type": "umap",
        "uri": "http://umap.example/en/map/imported-map_1",
        "properties": {"name": "Imported map", "umap_id": 1234, "miniMap": true},
        "layers": [
            {"type": "FeatureCollection", "_umap_options": {"name": "Cities", "id": 12},
             "features": [{"type": "Feature", "properties": {"name": "Lyon"}, "geometry": {"type": "Point", "coordinates": [4.8, 45.7]}}]},
            {"type": "FeatureCollection", "_umap_options": {"name": "Tunnels", "displayOnLoad": false},
             "features": [{"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[1, 1], [2, 2]]}}]},
        ],
    });
    let mut session = MapSession::new();
    session.options_mut().insert("umap_id".into(), json!(99));
    let outcome = import(&mut session, Format::Native, &text.to_string(), ImportTarget::NewLayer);

    assert!(outcome.is_success());
    assert_eq!(outcome.created_layers.len(), 2);
    assert_eq!(session.name(), Some("Imported map"));
    assert_eq!(session.options().get("miniMap"), Some(&json!(true)));
    assert_eq!(session.options().get("umap_id"), Some(&json!(99)));
    let names: Vec<_> = session.layers().iter().map(|l| l.name().to_string()).collect();
    assert_eq!(names, vec!["Cities", "Tunnels"]);
    assert_eq!(session.layers().iter().nth(1).unwrap().options().get("displayOnLoad"), Some(&json!(false)));
}

#[test]
fn native_append_does_not_overwrite_map_identity() {
    let text = json!({
        "type": "umap",
        "uri": "http://umap.example/en/map/other_7",
        "properties": {"name": "Other map", "umap_id": 7, "id": 7, "uri": "http://umap.example/m/7", "zoom": 9},
        "layers": [
            {"type": "FeatureCollection", "_umap_options": {"name": "Cities", "id": 12},
             "features": [{"type": "Feature", "properties": {"name": "Lyon"}, "geometry": {"type": "Point", "coordinates": [4.8, 45.7]}}]},
        ],
    });
    let (mut session, id) = session_with_layer();
    session.options_mut().insert("umap_id".into(), json!(99));

    let outcome = import(&mut session, Format::Native, &text.to_string(), ImportTarget::append_to(id));
    assert!(outcome.is_success(), "{:?}", outcome.errors);
    assert_eq!(outcome.created_layer(), None);
    assert_eq!(session.layers().len(), 1);
    assert_eq!(session.layers().get(id).unwrap().len(), 2);

    assert_eq!(session.options().get("umap_id"), Some(&json!(99)));
    assert_eq!(session.options().get("id"), None);
    assert_eq!(session.options().get("uri"), None);
    assert_eq!(session.options().get("zoom"), Some(&json!(9)));
    assert_eq!(session.layers().get(id).unwrap().options().get("id"), None);
}

#[test]
fn deeply_nested_kml_is_a_parse_error() {
    let text = format!("<kml>{}{}</kml>", "<Folder>".repeat(20_000), "</Folder>".repeat(20_000));
    let mut session = MapSession::new();
    let outcome = import(&mut session, Format::Kml, &text, ImportTarget::NewLayer);
    assert!(!outcome.is_success());
    assert_eq!(outcome.errors[0].stage, Stage::Parse);
    assert!(session.layers().is_empty());
}

#[test]
fn saved_layer_reimports_identically() {
    let original = parse_features(Format::GeoJson, GEOJSON).unwrap();
    let saved: Value = features_to_geojson(&original);
    let reimported = parse_features(Format::GeoJson, &saved.to_string()).unwrap();
    assert_eq!(reimported, original);
}

#[test]
fn saved_session_reloads() {
    let mut session = MapSession::new();
    import(&mut session, Format::Kml, KML, ImportTarget::NewLayer);
    import(&mut session, Format::Gpx, GPX, ImportTarget::NewLayer);

    let reloaded = MapSession::from_native(&session.to_native_string()).unwrap();
    assert_eq!(reloaded.layers().len(), 2);
    for (a, b) in session.layers().iter().zip(reloaded.layers().iter()) {
        assert_eq!(a.name(), b.name());
        assert_eq!(a.features(), b.features());
    }
}

#[test]
fn bad_target_reports_and_leaves_session_alone() {
    let (mut session, id) = session_with_layer();
    session.layers_mut().remove(id);
    let outcome = import(&mut session, Format::Csv, CSV, ImportTarget::append_to(id));
    assert_eq!(outcome.errors[0].stage, Stage::Reconcile);
    assert!(session.layers().is_empty());

    // Ids are not reused after removal.
    let next = import(&mut session, Format::Csv, CSV, ImportTarget::NewLayer).created_layer().unwrap();
    assert_ne!(next, id);
}
