use super::*;
use crate::{
    foundation::core::{Point, Rgb8},
    views::overview::OverviewPosition,
    views::view::ViewBehavior,
};

const CAMEL: &str = r#"{
    "colorValues": [[255, 0, 0], [0, 255, 0]],
    "sliderValues": [[0, 1000], [10, 2000]],
    "channelIsOn": [true, false],
    "colormap": "",
    "loaderSelection": [{"channel": 0, "z": 0, "t": 0}, {"channel": 1, "z": 0, "t": 0}],
    "overviewOn": true,
    "overview": {"position": "top-left", "maximumWidth": 300},
    "initialViewState": {"target": [256, 128], "zoom": -1, "width": 1000, "height": 800},
    "loader": {"type": "demo", "width": 512, "height": 256, "tileSize": 64, "channels": 2}
}"#;

fn parse(json: &str) -> ViewerConfig {
    ViewerConfig::from_reader(json.as_bytes()).unwrap()
}

#[test]
fn camel_case_aliases_are_accepted() {
    let cfg = parse(CAMEL);
    assert_eq!(cfg.channels.color_values[1], Rgb8::new(0, 255, 0));
    assert_eq!(cfg.channels.slider_values[1], [10.0, 2000.0]);
    assert_eq!(cfg.channels.visible_channels().collect::<Vec<_>>(), [0]);
    assert!(cfg.overview_on);
    assert_eq!(cfg.overview.position, OverviewPosition::TopLeft);
    assert_eq!(cfg.overview.maximum_width, 300.0);
    assert_eq!(cfg.overview.scale, 0.2);
    assert_eq!(cfg.initial_view_state.target, Point::new(256.0, 128.0));
    assert_eq!(cfg.transition_fields, ["t", "z"]);
    cfg.validate().unwrap();
}

#[test]
fn minimal_config_has_no_loader() {
    let cfg = parse(
        r#"{"initial_view_state": {"target": {"x": 0, "y": 0}, "zoom": 0, "width": 10, "height": 10}}"#,
    );
    assert!(cfg.loader.is_none());
    assert!(!cfg.overview_on);
    assert!(cfg.channels.is_empty());
    assert!(cfg.build_loader().unwrap().is_none());

    let viewer = cfg.into_viewer().unwrap();
    assert!(viewer.compose().is_empty());
}

#[test]
fn into_viewer_builds_both_views() {
    let viewer = parse(CAMEL).into_viewer().unwrap();
    assert!(viewer.overview_on());
    let scene = viewer.compose();
    let ids: Vec<_> = scene.views.iter().map(|v| v.id()).collect();
    assert_eq!(ids, ["detail", "overview"]);
    assert!(scene.layer_props[0].colormap.is_none());
    assert_eq!(scene.layer_props[0].loader.metadata().kind, "demo");
    assert_eq!(scene.layer_props[0].loader_selection.as_ref().map(|s| s.len()), Some(2));
}

#[test]
fn validation_failures_are_reported() {
    let mut mismatched = parse(CAMEL);
    mismatched.channels.channel_is_on.pop();

    let mut bad_scale = parse(CAMEL);
    bad_scale.overview.scale = 2.0;

    let mut bad_bounds = parse(CAMEL);
    bad_bounds.overview.minimum_width = 500.0;

    let mut bad_size = parse(CAMEL);
    bad_size.initial_view_state.width = 0.0;

    let mut bad_selection = parse(CAMEL);
    bad_selection.loader_selection = Some(Selection::default());

    for cfg in [mismatched, bad_scale, bad_bounds, bad_size, bad_selection] {
        assert!(matches!(cfg.validate(), Err(TileviewError::Validation(_))));
    }
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = ViewerConfig::from_reader("{".as_bytes()).unwrap_err();
    assert!(matches!(err, TileviewError::Serde(_)));

    let err = ViewerConfig::from_path("/nonexistent/tileview.json").unwrap_err();
    assert!(matches!(err, TileviewError::Validation(_)));
}
