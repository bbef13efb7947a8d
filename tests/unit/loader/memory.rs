use futures_util::FutureExt as _;

use super::*;
use crate::loader::metadata::PhysicalSize;
use crate::loader::source::RasterData;

fn plane(channel: u32) -> PlaneSelection {
    PlaneSelection::new().with("channel", channel).with("z", 0)
}

fn ramp(width: u32, height: u32, offset: u16) -> Raster {
    let data = (0..width * height).map(|v| v as u16 + offset).collect();
    Raster::new(width, height, RasterData::Uint16(data)).unwrap()
}

#[test]
fn levels_are_added_until_one_tile_covers_the_raster() {
    let loader =
        InMemoryLoader::from_planes("mem", 4, vec![(plane(0), ramp(10, 6, 0))]).unwrap();
    let m = loader.metadata();
    // 10x6 -> 5x3 -> 3x2
    assert_eq!(m.num_levels, 3);
    assert!(m.is_pyramid);
    assert_eq!(m.raster_size(2).unwrap(), RasterShape::new(3, 2));

    let coarse = loader
        .get_raster(RasterRequest {
            level: 2,
            plane: plane(0),
        })
        .now_or_never()
        .unwrap()
        .unwrap();
    assert_eq!(coarse.shape(), RasterShape::new(3, 2));
}

#[test]
fn single_tile_source_is_not_a_pyramid() {
    let loader = InMemoryLoader::from_planes("mem", 16, vec![(plane(0), ramp(8, 8, 0))]).unwrap();
    assert!(!loader.metadata().is_pyramid);
    assert_eq!(loader.metadata().num_levels, 1);
}

#[test]
fn tiles_are_cropped_from_the_requested_plane() {
    let loader = InMemoryLoader::from_planes(
        "mem",
        4,
        vec![(plane(0), ramp(6, 6, 0)), (plane(1), ramp(6, 6, 100))],
    )
    .unwrap();

    let tile = loader
        .get_tile(TileRequest {
            x: 1,
            y: 0,
            level: 0,
            plane: plane(1),
        })
        .now_or_never()
        .unwrap()
        .unwrap();
    assert_eq!((tile.width, tile.height), (2, 4));
    match tile.data {
        RasterData::Uint16(v) => assert_eq!(&v[..2], &[104, 105]),
        other => panic!("unexpected data {other:?}"),
    }
}

#[test]
fn fetch_failures_are_loader_errors() {
    let loader = InMemoryLoader::from_planes("mem", 4, vec![(plane(0), ramp(6, 6, 0))]).unwrap();
    let missing_plane = loader
        .get_raster(RasterRequest {
            level: 0,
            plane: plane(7),
        })
        .now_or_never()
        .unwrap();
    assert!(matches!(missing_plane, Err(TileviewError::Loader(_))));

    let outside = loader
        .get_tile(TileRequest {
            x: 5,
            y: 0,
            level: 0,
            plane: plane(0),
        })
        .now_or_never()
        .unwrap();
    assert!(matches!(outside, Err(TileviewError::Loader(_))));
}

#[test]
fn planes_must_agree_on_shape_and_be_unique() {
    assert!(
        InMemoryLoader::from_planes(
            "mem",
            4,
            vec![(plane(0), ramp(6, 6, 0)), (plane(1), ramp(5, 6, 0))]
        )
        .is_err()
    );
    assert!(
        InMemoryLoader::from_planes(
            "mem",
            4,
            vec![(plane(0), ramp(6, 6, 0)), (plane(0), ramp(6, 6, 0))]
        )
        .is_err()
    );
    assert!(InMemoryLoader::from_planes("mem", 4, vec![]).is_err());
}

#[test]
fn flat_loader_exposes_calibration() {
    let mut sizes = PhysicalSizes::new();
    sizes.insert("x".to_string(), PhysicalSize::new("µm", 0.25));
    let loader = InMemoryLoader::flat("flat", vec![(plane(0), ramp(300, 200, 0))])
        .unwrap()
        .with_physical_sizes(sizes);
    let m = loader.metadata();
    assert!(!m.is_pyramid);
    assert_eq!(m.tile_size, 300);
    assert_eq!(m.horizontal_physical_size().unwrap().unit, "µm");
}
