//! Hit testing: pointer → field / resize handle lookup.

use tle_core::{Field, FieldId, FieldRect, Point, ResizeHandle};

/// Find the topmost field at `p`.
/// Returns `None` if the pointer is over empty canvas.
pub fn hit_test(fields: &[Field], p: Point) -> Option<FieldId> {
    // Walk in reverse (last painted = topmost)
    fields
        .iter()
        .rev()
        .find(|f| f.rect().contains(p))
        .map(|f| f.id)
}

/// Find the resize handle of `rect` within `radius` of `p`.
/// Corners win over edges where they overlap on small fields.
pub fn handle_at(rect: &FieldRect, p: Point, radius: f64) -> Option<ResizeHandle> {
    let corners = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Se,
        ResizeHandle::Sw,
    ];
    let edges = [
        ResizeHandle::N,
        ResizeHandle::E,
        ResizeHandle::S,
        ResizeHandle::W,
    ];
    corners
        .into_iter()
        .chain(edges)
        .find(|h| h.point_on(rect).distance(p) <= radius)
}
