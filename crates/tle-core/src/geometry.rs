//! Pure geometry helpers: grid snapping, canvas clamping, resize handles.
//!
//! Everything here is stateless and deterministic. The canvas controller
//! composes these per pointer event; the field store runs `clamp_rect` on
//! every write.
//!
//! ## Resize handles
//!
//! Each handle is described per axis by an [`AxisRule`]:
//!
//! | Handle | x axis | y axis |
//! |--------|--------|--------|
//! | `n`    | fixed  | start  |
//! | `s`    | fixed  | end    |
//! | `e`    | end    | fixed  |
//! | `w`    | start  | fixed  |
//! | `ne`   | end    | start  |
//! | `nw`   | start  | start  |
//! | `se`   | end    | end    |
//! | `sw`   | start  | end    |
//!
//! A `start` axis moves the near edge (position shifts by the delta, size
//! by its negation) so the far edge stays put; an `end` axis moves only
//! the far edge.

use crate::model::{CanvasSize, FieldRect};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default grid pitch in pixels.
pub const GRID_SIZE: f64 = 10.0;

/// Smallest width or height a field may have.
pub const MIN_FIELD_SIZE: f64 = 20.0;

/// Offset applied to both axes when duplicating a field.
pub const DUPLICATE_OFFSET: f64 = 10.0;

// ─── Snapping & clamping ─────────────────────────────────────────────────

/// Round `v` to the nearest multiple of `grid` when `enabled`.
///
/// Idempotent: `snap(snap(v, g, true), g, true) == snap(v, g, true)`.
/// A non-positive grid disables snapping.
pub fn snap(v: f64, grid: f64, enabled: bool) -> f64 {
    if !enabled || grid <= 0.0 {
        return v;
    }
    (v / grid).round() * grid
}

/// Force `rect` onto the canvas.
///
/// Dimensions first (at least [`MIN_FIELD_SIZE`], at most the canvas
/// extent), then position, so an oversized field can never be pushed
/// off-canvas.
pub fn clamp_rect(rect: FieldRect, canvas: CanvasSize) -> FieldRect {
    let width = rect.width.max(MIN_FIELD_SIZE).min(canvas.width);
    let height = rect.height.max(MIN_FIELD_SIZE).min(canvas.height);
    let x = rect.x.min(canvas.width - width).max(0.0);
    let y = rect.y.min(canvas.height - height).max(0.0);
    FieldRect::new(x, y, width, height)
}

/// True when `rect` satisfies every bounds invariant for `canvas`.
pub fn fits_canvas(rect: &FieldRect, canvas: CanvasSize) -> bool {
    rect.x >= 0.0
        && rect.y >= 0.0
        && rect.right() <= canvas.width
        && rect.bottom() <= canvas.height
        && rect.width >= MIN_FIELD_SIZE.min(canvas.width)
        && rect.height >= MIN_FIELD_SIZE.min(canvas.height)
}

// ─── Resize handles ──────────────────────────────────────────────────────

/// How one axis of a rectangle reacts to a handle drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRule {
    /// The handle does not touch this axis.
    Fixed,
    /// The handle sits on the near edge; the far edge is the anchor.
    Start,
    /// The handle sits on the far edge; the near edge is the anchor.
    End,
}

impl AxisRule {
    /// Apply a pointer delta to one axis, returning `(pos, size)`.
    pub fn apply(self, pos: f64, size: f64, delta: f64) -> (f64, f64) {
        match self {
            AxisRule::Fixed => (pos, size),
            AxisRule::Start => (pos + delta, size - delta),
            AxisRule::End => (pos, size + delta),
        }
    }

    /// Where the handle sits along this axis.
    fn handle_coord(self, pos: f64, size: f64) -> f64 {
        match self {
            AxisRule::Fixed => pos + size / 2.0,
            AxisRule::Start => pos,
            AxisRule::End => pos + size,
        }
    }

    /// Snap and bound the candidate `(pos, size)` while keeping this
    /// axis's anchored edge where it was at gesture start.
    fn fit(self, start: (f64, f64), candidate: (f64, f64), grid: Option<f64>, extent: f64) -> (f64, f64) {
        let snap_size = |s: f64| grid.map_or(s, |g| snap(s, g, true));
        match self {
            AxisRule::Fixed => candidate,
            AxisRule::End => {
                let pos = start.0;
                let size = snap_size(candidate.1)
                    .max(MIN_FIELD_SIZE)
                    .min(extent - pos);
                (pos, size)
            }
            AxisRule::Start => {
                let anchor = start.0 + start.1;
                let size = snap_size(candidate.1).max(MIN_FIELD_SIZE).min(anchor);
                (anchor - size, size)
            }
        }
    }
}

/// One of the eight points on a selected field's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
    ];

    /// Per-axis rule table: `(x rule, y rule)`.
    pub const fn rules(self) -> (AxisRule, AxisRule) {
        use AxisRule::*;
        match self {
            ResizeHandle::N => (Fixed, Start),
            ResizeHandle::S => (Fixed, End),
            ResizeHandle::E => (End, Fixed),
            ResizeHandle::W => (Start, Fixed),
            ResizeHandle::Ne => (End, Start),
            ResizeHandle::Nw => (Start, Start),
            ResizeHandle::Se => (End, End),
            ResizeHandle::Sw => (Start, End),
        }
    }

    /// Canvas position of this handle on `rect`.
    pub fn point_on(self, rect: &FieldRect) -> Point {
        let (rx, ry) = self.rules();
        Point::new(
            rx.handle_coord(rect.x, rect.width),
            ry.handle_coord(rect.y, rect.height),
        )
    }
}

/// Raw candidate rectangle for a handle dragged by `delta` since gesture
/// start. No snapping or clamping.
pub fn apply_resize_handle(handle: ResizeHandle, delta: Vec2, start: FieldRect) -> FieldRect {
    let (rx, ry) = handle.rules();
    let (x, width) = rx.apply(start.x, start.width, delta.x);
    let (y, height) = ry.apply(start.y, start.height, delta.y);
    FieldRect::new(x, y, width, height)
}

/// Turn a raw resize candidate into the rectangle to commit.
///
/// Sizes are snapped to `grid` (when given) and held at the minimum size,
/// the moving edge stops at the canvas border, and on every axis the
/// handle touches the opposite edge stays at its gesture-start position.
/// The result is finally passed through [`clamp_rect`].
pub fn fit_resized(
    handle: ResizeHandle,
    start: FieldRect,
    candidate: FieldRect,
    grid: Option<f64>,
    canvas: CanvasSize,
) -> FieldRect {
    let (rx, ry) = handle.rules();
    let (x, width) = rx.fit(
        (start.x, start.width),
        (candidate.x, candidate.width),
        grid,
        canvas.width,
    );
    let (y, height) = ry.fit(
        (start.y, start.height),
        (candidate.y, candidate.height),
        grid,
        canvas.height,
    );
    clamp_rect(FieldRect::new(x, y, width, height), canvas)
}
