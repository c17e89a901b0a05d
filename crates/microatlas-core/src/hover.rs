//! Annotation hover hit-testing: map a container-relative pointer position to
//! the nearest annotation marker within a fixed screen-space radius.

use crate::config::Annotation;
use crate::consts::{ANNOTATION_ANCHOR_OFFSET_Y, ANNOTATION_HIT_RADIUS};
use crate::view::ViewState;

/// Screen position of an annotation's visual anchor (marker tip offset).
pub fn annotation_screen_pos(
    annotation: &Annotation,
    view: &ViewState,
    container: [f32; 2],
) -> [f32; 2] {
    let [sx, sy] = view.image_to_screen(annotation.target, container);
    [sx, sy - ANNOTATION_ANCHOR_OFFSET_Y]
}

/// Index of the closest annotation within the hit radius of `pointer`
/// (container-relative screen coordinates), or `None`.
///
/// Ties break by Euclidean screen distance. Callers disable hover entirely
/// while the annotation layer is hidden.
pub fn hover_annotation(
    annotations: &[Annotation],
    view: &ViewState,
    pointer: [f32; 2],
    container: [f32; 2],
) -> Option<usize> {
    let mut closest = None;
    let mut closest_dist = f32::INFINITY;

    for (i, annotation) in annotations.iter().enumerate() {
        let [sx, sy] = annotation_screen_pos(annotation, view, container);
        let dx = pointer[0] - sx;
        let dy = pointer[1] - sy;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < ANNOTATION_HIT_RADIUS && dist < closest_dist {
            closest = Some(i);
            closest_dist = dist;
        }
    }

    closest
}
