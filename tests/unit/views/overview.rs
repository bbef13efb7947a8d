use std::sync::Arc;

use super::*;
use crate::{
    foundation::core::Rect,
    loader::memory::InMemoryLoader,
    loader::source::{Loader, Raster, RasterData},
    selection::model::PlaneSelection,
    test_support::{fields, initial_view_state, pyramid_loader, selection},
};

fn seed() -> ViewportState {
    ViewportState::from_initial(&initial_view_state(), "overview")
}

fn detail_state() -> ViewportState {
    ViewportState::from_initial(&initial_view_state(), "detail")
}

fn overview(options: OverviewOptions) -> OverviewView {
    OverviewView::new(
        seed(),
        pyramid_loader(None).metadata(),
        800.0,
        600.0,
        options,
    )
}

fn tall_loader() -> Arc<dyn Loader> {
    let raster = Raster::new(10, 40, RasterData::Uint8(vec![0; 400])).unwrap();
    let plane = PlaneSelection::new().with("channel", 0);
    Arc::new(InMemoryLoader::flat("tall", vec![(plane, raster)]).unwrap())
}

#[test]
fn defaults_match_documented_values() {
    let o = OverviewOptions::default();
    assert_eq!(o.scale, 0.2);
    assert_eq!(o.margin, 25.0);
    assert_eq!(o.position, OverviewPosition::BottomRight);
    assert_eq!((o.minimum_width, o.maximum_width), (150.0, 350.0));
    assert_eq!(o.bounding_box_color, Rgb8::new(255, 0, 0));
    assert_eq!(o.viewport_outline_color, Rgb8::new(255, 190, 0));
    assert_eq!(o.bounding_box_outline_width, 1.0);
    assert_eq!(o.viewport_outline_width, 2.0);
    o.validate().unwrap();
}

#[test]
fn options_accept_camel_case_and_partial_input() {
    let o: OverviewOptions = serde_json::from_str(
        r#"{"scale": 0.5, "position": "top-left", "minimumWidth": 10, "boundingBoxColor": [0, 0, 255]}"#,
    )
    .unwrap();
    assert_eq!(o.scale, 0.5);
    assert_eq!(o.position, OverviewPosition::TopLeft);
    assert_eq!(o.minimum_width, 10.0);
    assert_eq!(o.maximum_width, 350.0);
    assert_eq!(o.bounding_box_color, Rgb8::new(0, 0, 255));
}

#[test]
fn invalid_options_are_rejected() {
    let bad = [
        OverviewOptions {
            scale: 0.0,
            ..OverviewOptions::default()
        },
        OverviewOptions {
            scale: 1.5,
            ..OverviewOptions::default()
        },
        OverviewOptions {
            minimum_width: 400.0,
            ..OverviewOptions::default()
        },
        OverviewOptions {
            viewport_outline_width: -1.0,
            ..OverviewOptions::default()
        },
    ];
    for options in bad {
        assert!(matches!(
            options.validate(),
            Err(TileviewError::Validation(_))
        ));
    }
}

#[test]
fn landscape_overview_is_sized_from_detail_width() {
    let view = overview(OverviewOptions::default());
    // 800 * 0.2 = 160, aspect 64x32.
    let p = view.placement();
    assert_eq!((p.width, p.height), (160.0, 80.0));
    assert_eq!((p.x, p.y), (615.0, 495.0));
    assert_eq!(view.pixels_per_unit(), 2.5);
}

#[test]
fn size_is_clamped_between_minimum_and_maximum() {
    let metadata = pyramid_loader(None).metadata().clone();
    let small = OverviewView::new(seed(), &metadata, 100.0, 100.0, OverviewOptions::default());
    assert_eq!(small.placement().width, 150.0);
    let large = OverviewView::new(seed(), &metadata, 4000.0, 100.0, OverviewOptions::default());
    assert_eq!(large.placement().width, 350.0);
}

#[test]
fn portrait_overview_is_sized_from_detail_height() {
    let view = OverviewView::new(
        seed(),
        tall_loader().metadata(),
        800.0,
        600.0,
        OverviewOptions::default(),
    );
    // 600 * 0.2 = 120 -> raised to the 150 minimum.
    let p = view.placement();
    assert_eq!((p.width, p.height), (37.5, 150.0));
}

#[test]
fn placement_follows_position() {
    let at = |position| {
        overview(OverviewOptions {
            position,
            ..OverviewOptions::default()
        })
        .placement()
    };
    let tr = at(OverviewPosition::TopRight);
    assert_eq!((tr.x, tr.y), (615.0, 25.0));
    let tl = at(OverviewPosition::TopLeft);
    assert_eq!((tl.x, tl.y), (25.0, 25.0));
    let bl = at(OverviewPosition::BottomLeft);
    assert_eq!((bl.x, bl.y), (25.0, 495.0));
}

#[test]
fn own_viewport_is_pinned_to_the_whole_image() {
    let view = overview(OverviewOptions::default());
    let pinned = view.initial_view_state();
    assert_eq!(pinned.id, "overview");
    assert_eq!(pinned.target, Point::new(32.0, 16.0));
    assert!((pinned.zoom - 2.5_f64.log2()).abs() < 1e-12);
    assert_eq!((pinned.width, pinned.height), (160.0, 80.0));

    let panned = pinned.with_target(Point::new(0.0, 0.0));
    assert_eq!(view.filter_view_state(&panned, &panned), Some(pinned.clone()));
    assert!(view.filter_view_state(&detail_state(), pinned).is_none());
}

#[test]
fn layers_require_detail_state() {
    let props = LayerConfig::new(pyramid_loader(None));
    let err = overview(OverviewOptions::default())
        .produce_layers(&props, &ViewStates::new())
        .unwrap_err();
    assert!(matches!(err, TileviewError::Validation(_)));
}

#[test]
fn layers_are_pinned_thumbnail_plus_detail_bounds() {
    let props = LayerConfig::new(pyramid_loader(None))
        .with_selection(Some(selection(1, 0)))
        .with_transition_fields(fields());
    let states: ViewStates = [detail_state()].into_iter().collect();
    let view = overview(OverviewOptions::default());
    let layers = view.produce_layers(&props, &states).unwrap();
    assert_eq!(layers.len(), 2);

    let image = layers[0].as_multiscale().unwrap();
    assert_eq!(image.id, "mem-#overview#-0-1");
    assert_eq!(image.viewport_id, "overview");
    assert_eq!(image.pinned_level, Some(2));

    let bbox = layers[1].as_bounding_box().unwrap();
    assert_eq!(bbox.id, "bounding-box-#overview#");
    let bounds = detail_state().visible_bounds();
    assert_eq!(bounds, Rect::new(-68.0, -59.0, 132.0, 91.0));
    assert_eq!(
        bbox.bounding_box,
        [
            Point::new(-68.0, -59.0),
            Point::new(132.0, -59.0),
            Point::new(132.0, 91.0),
            Point::new(-68.0, 91.0),
        ]
    );
    assert_eq!(bbox.overview_scale, 2.5);
    assert_eq!(bbox.bounding_box_color, Rgb8::RED);
    assert_eq!(bbox.viewport_outline_width, 2.0);
}

#[test]
fn overview_ignores_incoming_selection() {
    let props = LayerConfig::new(pyramid_loader(None))
        .with_selection(Some(selection(0, 0)))
        .with_incoming(Some(selection(1, 1)), None)
        .with_transition_fields(fields());
    let states: ViewStates = [detail_state()].into_iter().collect();
    let layers = overview(OverviewOptions::default())
        .produce_layers(&props, &states)
        .unwrap();
    assert_eq!(layers.iter().filter(|l| l.is_image()).count(), 1);
}

#[test]
fn clicks_map_to_image_coordinates() {
    let view = overview(OverviewOptions::default());
    let update = view.pan_detail_to(Point::new(80.0, 40.0));
    assert_eq!(update.id, "overview");
    assert_eq!(update.target, Point::new(32.0, 16.0));

    let outside = view.pan_detail_to(Point::new(1000.0, -5.0));
    assert_eq!(outside.target, Point::new(64.0, 0.0));
}
