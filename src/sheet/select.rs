use std::collections::BTreeSet;

use crate::{
    foundation::{
        core::{FrameTime, TimeRange},
        error::SheetResult,
    },
    host::LayerNode,
};

/// Ordered, strictly increasing times to render into the sheet.
///
/// With `ignore_empty_frames` unset this is every time in `range`. Otherwise only the
/// times for which `probe` reports a keyframe are kept. Ranges longer than
/// [`MAX_TIMELINE_FRAMES`](crate::MAX_TIMELINE_FRAMES) are rejected before `probe` runs.
pub fn select_frames<P>(
    range: TimeRange,
    ignore_empty_frames: bool,
    mut probe: P,
) -> SheetResult<Vec<FrameTime>>
where
    P: FnMut(FrameTime) -> bool,
{
    let len = range.bounded_len_frames()?;
    if !ignore_empty_frames {
        let mut all = Vec::with_capacity(len as usize);
        all.extend(range.iter());
        return Ok(all);
    }

    let mut keyed = BTreeSet::new();
    for time in range.iter() {
        if probe(time) {
            tracing::debug!(time = time.0, "found keyframe");
            keyed.insert(time);
        }
    }
    Ok(keyed.into_iter().collect())
}

/// True when `layer` or any visible descendant has a keyframe at `time`.
///
/// A hidden layer hides its whole subtree.
pub fn layer_has_keyframe_at(layer: &dyn LayerNode, time: FrameTime) -> bool {
    let mut stack = vec![layer];
    while let Some(node) = stack.pop() {
        if !node.is_visible() {
            continue;
        }
        if node.has_keyframe_at(time) {
            return true;
        }
        stack.extend(node.children());
    }
    false
}

/// [`layer_has_keyframe_at`] over a list of top-level layers.
pub fn layers_have_keyframe_at(layers: &[&dyn LayerNode], time: FrameTime) -> bool {
    layers.iter().any(|layer| layer_has_keyframe_at(*layer, time))
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/select.rs"]
mod tests;
