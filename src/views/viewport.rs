use std::collections::BTreeMap;

use crate::foundation::core::{Point, Rect, zoom_to_scale};

mod point_repr {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::foundation::core::Point;

    pub(super) fn serialize<S: Serializer>(p: &Point, s: S) -> Result<S::Ok, S::Error> {
        [p.x, p.y].serialize(s)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Point, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj { x: f64, y: f64 },
        }

        match Repr::deserialize(d)? {
            Repr::Arr([x, y]) => Ok(Point::new(x, y)),
            Repr::Obj { x, y } => Ok(Point::new(x, y)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Viewport a viewer starts with, before any view id is assigned.
pub struct InitialViewState {
    /// Image coordinate at the view center; accepts `[x, y]` or `{x, y}`.
    #[serde(with = "point_repr")]
    pub target: Point,
    /// Orthographic zoom (`0` = one screen pixel per image pixel).
    pub zoom: f64,
    /// View width in screen pixels.
    pub width: f64,
    /// View height in screen pixels.
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Pan/zoom/size of one view, keyed by view id.
pub struct ViewportState {
    /// Owning (or, for updates, originating) view id.
    pub id: String,
    /// Image coordinate at the view center.
    #[serde(with = "point_repr")]
    pub target: Point,
    /// Orthographic zoom.
    pub zoom: f64,
    /// View width in screen pixels.
    pub width: f64,
    /// View height in screen pixels.
    pub height: f64,
}

impl ViewportState {
    /// New state for view `id` copied from `base`.
    pub fn from_initial(base: &InitialViewState, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target: base.target,
            zoom: base.zoom,
            width: base.width,
            height: base.height,
        }
    }

    /// Copy with a new pan target.
    pub fn with_target(&self, target: Point) -> Self {
        Self {
            target,
            ..self.clone()
        }
    }

    /// Copy with new screen dimensions.
    pub fn with_size(&self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    /// Copy relabelled with another view id.
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }

    /// Screen pixels per image pixel.
    pub fn pixels_per_unit(&self) -> f64 {
        zoom_to_scale(self.zoom)
    }

    /// Image-space rectangle visible in this view.
    pub fn visible_bounds(&self) -> Rect {
        let scale = self.pixels_per_unit();
        let half_w = self.width / (2.0 * scale);
        let half_h = self.height / (2.0 * scale);
        Rect::new(
            self.target.x - half_w,
            self.target.y - half_h,
            self.target.x + half_w,
            self.target.y + half_h,
        )
    }
}

/// Latest viewport state of every view, keyed by view id.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct ViewStates(BTreeMap<String, ViewportState>);

impl ViewStates {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `id`.
    pub fn get(&self, id: &str) -> Option<&ViewportState> {
        self.0.get(id)
    }

    /// Store `state` under its own id, returning the previous value.
    pub fn insert(&mut self, state: ViewportState) -> Option<ViewportState> {
        self.0.insert(state.id.clone(), state)
    }

    /// Iterate states in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ViewportState> {
        self.0.values()
    }

    /// Number of views tracked.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when no view is tracked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ViewportState> for ViewStates {
    fn from_iter<I: IntoIterator<Item = ViewportState>>(iter: I) -> Self {
        let mut states = Self::new();
        for state in iter {
            states.insert(state);
        }
        states
    }
}

#[cfg(test)]
#[path = "../../tests/unit/views/viewport.rs"]
mod tests;
