use super::*;
use crate::test_support::initial_view_state;

#[test]
fn from_initial_builds_independent_values() {
    let base = initial_view_state();
    let detail = ViewportState::from_initial(&base, "detail");
    let overview = ViewportState::from_initial(&base, "overview");
    assert_eq!(detail.id, "detail");
    assert_eq!(overview.id, "overview");
    assert_eq!(detail.target, base.target);

    let moved = detail.with_target(Point::new(1.0, 2.0));
    assert_eq!(detail.target, base.target);
    assert_eq!(moved.zoom, detail.zoom);
    assert_eq!(moved.target, Point::new(1.0, 2.0));
}

#[test]
fn visible_bounds_follow_zoom() {
    let state = ViewportState {
        id: "detail".to_string(),
        target: Point::new(100.0, 50.0),
        zoom: 1.0,
        width: 400.0,
        height: 200.0,
    };
    assert_eq!(state.visible_bounds(), Rect::new(0.0, 0.0, 200.0, 100.0));
}

#[test]
fn target_accepts_array_or_object() {
    let a: InitialViewState =
        serde_json::from_str(r#"{"target": [10, 20], "zoom": 0, "width": 5, "height": 6}"#)
            .unwrap();
    let b: InitialViewState = serde_json::from_str(
        r#"{"target": {"x": 10, "y": 20}, "zoom": 0, "width": 5, "height": 6}"#,
    )
    .unwrap();
    assert_eq!(a, b);

    let json = serde_json::to_value(ViewportState::from_initial(&a, "detail")).unwrap();
    assert_eq!(json["target"], serde_json::json!([10.0, 20.0]));
}

#[test]
fn view_states_are_keyed_by_id() {
    let base = initial_view_state();
    let mut states: ViewStates = [
        ViewportState::from_initial(&base, "overview"),
        ViewportState::from_initial(&base, "detail"),
    ]
    .into_iter()
    .collect();
    assert_eq!(states.len(), 2);
    let ids: Vec<_> = states.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["detail", "overview"]);

    let previous = states.insert(ViewportState::from_initial(&base, "detail").with_size(1.0, 1.0));
    assert!(previous.is_some());
    assert_eq!(states.get("detail").unwrap().width, 1.0);
}
