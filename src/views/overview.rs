use crate::{
    foundation::core::{Point, Rgb8, scale_to_zoom},
    foundation::error::{TileviewError, TileviewResult},
    layers::config::LayerConfig,
    layers::ids::{bounding_box_layer_id, image_layer_id},
    layers::layer::{BoundingBoxLayer, ImageProps, MultiscaleImageLayer, RenderLayer},
    loader::metadata::{LoaderMetadata, RasterShape},
    views::view::{DETAIL_VIEW_ID, ViewBehavior, ViewPlacement},
    views::viewport::{ViewStates, ViewportState},
};

/// Corner of the detail view the overview is anchored to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverviewPosition {
    /// Bottom-right corner.
    #[default]
    BottomRight,
    /// Top-right corner.
    TopRight,
    /// Top-left corner.
    TopLeft,
    /// Bottom-left corner.
    BottomLeft,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Size, placement and styling of the overview.
pub struct OverviewOptions {
    /// Overview size as a fraction of the detail view.
    pub scale: f64,
    /// Distance from the anchored corner, in pixels.
    pub margin: f64,
    /// Anchored corner.
    pub position: OverviewPosition,
    /// Lower bound on the long edge, in pixels.
    #[serde(alias = "minimumWidth")]
    pub minimum_width: f64,
    /// Upper bound on the long edge, in pixels.
    #[serde(alias = "maximumWidth")]
    pub maximum_width: f64,
    /// Color of the detail viewport rectangle.
    #[serde(alias = "boundingBoxColor")]
    pub bounding_box_color: Rgb8,
    /// Stroke width of the detail viewport rectangle.
    #[serde(alias = "boundingBoxOutlineWidth")]
    pub bounding_box_outline_width: f64,
    /// Color of the overview frame.
    #[serde(alias = "viewportOutlineColor")]
    pub viewport_outline_color: Rgb8,
    /// Stroke width of the overview frame.
    #[serde(alias = "viewportOutlineWidth")]
    pub viewport_outline_width: f64,
}

impl Default for OverviewOptions {
    fn default() -> Self {
        Self {
            scale: 0.2,
            margin: 25.0,
            position: OverviewPosition::BottomRight,
            minimum_width: 150.0,
            maximum_width: 350.0,
            bounding_box_color: Rgb8::RED,
            bounding_box_outline_width: 1.0,
            viewport_outline_color: Rgb8::AMBER,
            viewport_outline_width: 2.0,
        }
    }
}

impl OverviewOptions {
    /// Check option ranges.
    pub fn validate(&self) -> TileviewResult<()> {
        if !(self.scale > 0.0 && self.scale <= 1.0) {
            return Err(TileviewError::validation(
                "overview.scale must be in (0, 1]",
            ));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(TileviewError::validation(
                "overview.margin must be finite and >= 0",
            ));
        }
        if !self.minimum_width.is_finite() || self.minimum_width <= 0.0 {
            return Err(TileviewError::validation(
                "overview.minimum_width must be finite and > 0",
            ));
        }
        if !self.maximum_width.is_finite() || self.minimum_width > self.maximum_width {
            return Err(TileviewError::validation(
                "overview.minimum_width must be <= overview.maximum_width",
            ));
        }
        for (name, w) in [
            ("bounding_box_outline_width", self.bounding_box_outline_width),
            ("viewport_outline_width", self.viewport_outline_width),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(TileviewError::validation(format!(
                    "overview.{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Picture-in-picture thumbnail of the whole image.
///
/// Its own viewport is pinned so the full raster fits, and it outlines what the detail view
/// currently shows.
pub struct OverviewView {
    initial_view_state: ViewportState,
    options: OverviewOptions,
    placement: ViewPlacement,
    image_shape: RasterShape,
}

impl OverviewView {
    /// Size and place the overview inside a `detail_width` x `detail_height` detail view.
    ///
    /// `seed` provides the view id; its pan and zoom are replaced by the pinned full-image state.
    pub fn new(
        seed: ViewportState,
        metadata: &LoaderMetadata,
        detail_width: f64,
        detail_height: f64,
        options: OverviewOptions,
    ) -> Self {
        let image_shape = metadata.shape;
        let raster_w = f64::from(image_shape.width);
        let raster_h = f64::from(image_shape.height);
        let clamp = |edge: f64| edge.max(options.minimum_width).min(options.maximum_width);

        let (width, height) = if raster_w >= raster_h {
            let width = clamp(detail_width * options.scale);
            (width, width * raster_h / raster_w)
        } else {
            let height = clamp(detail_height * options.scale);
            (height * raster_w / raster_h, height)
        };

        let margin = options.margin;
        let (x, y) = match options.position {
            OverviewPosition::BottomRight => (
                detail_width - width - margin,
                detail_height - height - margin,
            ),
            OverviewPosition::TopRight => (detail_width - width - margin, margin),
            OverviewPosition::TopLeft => (margin, margin),
            OverviewPosition::BottomLeft => (margin, detail_height - height - margin),
        };

        let initial_view_state = ViewportState {
            id: seed.id,
            target: Point::new(raster_w / 2.0, raster_h / 2.0),
            zoom: scale_to_zoom(width / raster_w),
            width,
            height,
        };
        tracing::debug!(
            view = %initial_view_state.id,
            width,
            height,
            x,
            y,
            "overview view sized"
        );

        Self {
            initial_view_state,
            options,
            placement: ViewPlacement {
                x,
                y,
                width,
                height,
            },
            image_shape,
        }
    }

    /// Styling and layout options.
    pub fn options(&self) -> &OverviewOptions {
        &self.options
    }

    /// Overview pixels per full-resolution image pixel.
    pub fn pixels_per_unit(&self) -> f64 {
        self.placement.width / f64::from(self.image_shape.width)
    }

    /// Viewport update that pans the detail view to what lies under `overview_pixel`.
    ///
    /// `overview_pixel` is relative to the overview's top-left corner. The resulting target is
    /// clamped to the image.
    pub fn pan_detail_to(&self, overview_pixel: Point) -> ViewportState {
        let scale = self.pixels_per_unit();
        let target = Point::new(
            (overview_pixel.x / scale).clamp(0.0, f64::from(self.image_shape.width)),
            (overview_pixel.y / scale).clamp(0.0, f64::from(self.image_shape.height)),
        );
        self.initial_view_state.with_target(target)
    }
}

impl ViewBehavior for OverviewView {
    fn id(&self) -> &str {
        &self.initial_view_state.id
    }

    fn initial_view_state(&self) -> &ViewportState {
        &self.initial_view_state
    }

    fn placement(&self) -> ViewPlacement {
        self.placement
    }

    fn produce_layers(
        &self,
        props: &LayerConfig,
        view_states: &ViewStates,
    ) -> TileviewResult<Vec<RenderLayer>> {
        let detail = view_states.get(DETAIL_VIEW_ID).ok_or_else(|| {
            TileviewError::validation("overview requires the detail view state")
        })?;

        let id = self.id();
        let metadata = props.loader.metadata();
        let selection = props.loader_selection.as_ref();
        let mut image = MultiscaleImageLayer::new(
            image_layer_id(&metadata.kind, id, selection, &props.transition_fields),
            id,
            props.loader.clone(),
            ImageProps::from_config(props, selection),
        );
        image.pinned_level = Some(metadata.coarsest_level());

        let bounds = detail.visible_bounds();
        let bounding_box = BoundingBoxLayer {
            id: bounding_box_layer_id(id),
            viewport_id: id.to_string(),
            bounding_box: [
                Point::new(bounds.x0, bounds.y0),
                Point::new(bounds.x1, bounds.y0),
                Point::new(bounds.x1, bounds.y1),
                Point::new(bounds.x0, bounds.y1),
            ],
            overview_scale: self.pixels_per_unit(),
            bounding_box_color: self.options.bounding_box_color,
            bounding_box_outline_width: self.options.bounding_box_outline_width,
            viewport_outline_color: self.options.viewport_outline_color,
            viewport_outline_width: self.options.viewport_outline_width,
        };

        Ok(vec![
            RenderLayer::MultiscaleImage(image),
            RenderLayer::BoundingBox(bounding_box),
        ])
    }

    fn filter_view_state(
        &self,
        update: &ViewportState,
        _current: &ViewportState,
    ) -> Option<ViewportState> {
        (update.id == self.id()).then(|| self.initial_view_state.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/views/overview.rs"]
mod tests;
