use super::*;

fn meta(physical_sizes: Option<PhysicalSizes>) -> LoaderMetadata {
    LoaderMetadata {
        kind: "tiff".to_string(),
        is_pyramid: true,
        num_levels: 3,
        tile_size: 256,
        dtype: Dtype::Uint16,
        shape: RasterShape::new(1001, 500),
        physical_sizes,
    }
}

fn sizes(unit: &str, value: f64) -> PhysicalSizes {
    let mut m = PhysicalSizes::new();
    m.insert("x".to_string(), PhysicalSize::new(unit, value));
    m
}

#[test]
fn raster_size_halves_and_rounds_up() {
    let m = meta(None);
    assert_eq!(m.raster_size(0).unwrap(), RasterShape::new(1001, 500));
    assert_eq!(m.raster_size(1).unwrap(), RasterShape::new(501, 250));
    assert_eq!(m.raster_size(2).unwrap(), RasterShape::new(251, 125));
    assert!(m.raster_size(3).is_err());
    assert_eq!(m.coarsest_level(), 2);
}

#[test]
fn horizontal_size_requires_unit_and_positive_value() {
    assert!(meta(None).horizontal_physical_size().is_none());
    assert_eq!(
        meta(Some(sizes("µm", 0.5)))
            .horizontal_physical_size()
            .unwrap()
            .value,
        0.5
    );
    assert!(meta(Some(sizes("", 0.5))).horizontal_physical_size().is_none());
    assert!(meta(Some(sizes("µm", 0.0))).horizontal_physical_size().is_none());
    assert!(meta(Some(sizes("µm", -1.0))).horizontal_physical_size().is_none());
    assert!(
        meta(Some(sizes("µm", f64::NAN)))
            .horizontal_physical_size()
            .is_none()
    );
}

#[test]
fn validate_rejects_inconsistent_topology() {
    assert!(meta(None).validate().is_ok());

    let mut flat = meta(None);
    flat.is_pyramid = false;
    assert!(flat.validate().is_err());
    flat.num_levels = 1;
    assert!(flat.validate().is_ok());

    let mut empty = meta(None);
    empty.shape = RasterShape::new(0, 10);
    assert!(empty.validate().is_err());
}

#[test]
fn type_tag_serializes_as_type() {
    let json = serde_json::to_value(meta(None)).unwrap();
    assert_eq!(json["type"], "tiff");
    assert!(json.get("physical_sizes").is_none());
}
