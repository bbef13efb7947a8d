use crate::selection::model::Selection;

/// Id segment identifying a view inside layer ids: `-#<view id>#`.
pub fn view_segment(view_id: &str) -> String {
    format!("-#{view_id}#")
}

/// Id of an image layer rendered by `view_id`.
///
/// Layers for a present selection carry its transition suffix so that the layer for an incoming
/// selection keeps its id (and its loaded tiles) once it becomes current.
pub fn image_layer_id(
    loader_kind: &str,
    view_id: &str,
    selection: Option<&Selection>,
    transition_fields: &[String],
) -> String {
    let suffix = selection
        .map(|s| s.transition_suffix(transition_fields))
        .unwrap_or_default();
    format!("{loader_kind}{}{suffix}", view_segment(view_id))
}

/// Id of the scale bar rendered by `view_id`.
pub fn scale_bar_layer_id(view_id: &str) -> String {
    format!("scale-bar{}", view_segment(view_id))
}

/// Id of the bounding box rendered by `view_id`.
pub fn bounding_box_layer_id(view_id: &str) -> String {
    format!("bounding-box{}", view_segment(view_id))
}
