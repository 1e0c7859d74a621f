//! Canvas controller: one interactive editing session.
//!
//! Translates pointer input into store mutations. The controller owns the
//! only transient state in the engine: the current selection and the
//! in-flight gesture.
//!
//! ## Gesture states
//!
//! ```text
//! Idle ──begin_drag──▶ Dragging ──end_drag──▶ Idle
//! Idle ──begin_resize─▶ Resizing ──end_resize─▶ Idle
//! ```
//!
//! Every move event recomputes the candidate rectangle from the gesture's
//! start rectangle plus the accumulated pointer delta, so repeating an
//! event is harmless and ending a gesture early keeps the last commit.
//! If the gesture's field disappears (deleted by another actor), the next
//! move silently aborts the gesture.

use crate::config::EditorConfig;
use crate::hit::{handle_at, hit_test};
use crate::store::FieldStore;
use tle_core::geometry::{apply_resize_handle, clamp_rect, fit_resized, snap};
use tle_core::guides::{AlignmentGuide, Guides, detect_guides};
use tle_core::{
    BuiltinRegistry, Field, FieldId, FieldRect, FieldType, FieldTypeRegistry, LayoutError, Point,
    ResizeHandle, Result,
};

/// The in-flight pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        id: FieldId,
        start_rect: FieldRect,
        pointer_start: Point,
    },
    Resizing {
        id: FieldId,
        handle: ResizeHandle,
        start_rect: FieldRect,
        pointer_start: Point,
    },
}

pub struct CanvasController {
    store: FieldStore,
    registry: Box<dyn FieldTypeRegistry>,
    config: EditorConfig,
    selected: Option<FieldId>,
    gesture: Gesture,
    guides: Guides,
}

impl CanvasController {
    pub fn new(store: FieldStore, config: EditorConfig) -> Self {
        Self::with_registry(store, config, Box::new(BuiltinRegistry))
    }

    pub fn with_registry(
        store: FieldStore,
        config: EditorConfig,
        registry: Box<dyn FieldTypeRegistry>,
    ) -> Self {
        Self {
            store: store.with_duplicate_offset(config.duplicate_offset),
            registry,
            config,
            selected: None,
            gesture: Gesture::Idle,
            guides: Guides::new(),
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    /// Direct store access for collaborators outside the gesture flow
    /// (property panel edits, remote deletes).
    pub fn store_mut(&mut self) -> &mut FieldStore {
        &mut self.store
    }

    pub fn into_store(self) -> FieldStore {
        self.store
    }

    /// Fields in z-order for rendering.
    pub fn fields(&self) -> &[Field] {
        self.store.fields()
    }

    /// The selected field, if it still exists.
    pub fn selection(&self) -> Option<FieldId> {
        self.selected.filter(|id| self.store.contains(*id))
    }

    /// Guides for the current drag frame; empty outside a drag.
    pub fn guides(&self) -> &[AlignmentGuide] {
        &self.guides
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.config.snap_enabled = enabled;
    }

    // ─── Selection & commands ────────────────────────────────────────────

    /// Select a field, or clear the selection with `None`.
    /// Unknown ids clear the selection.
    pub fn select_field(&mut self, id: Option<FieldId>) {
        self.selected = id.filter(|id| self.store.contains(*id));
    }

    /// Drop a new field of `kind` with its top-left at `point` and select it.
    pub fn drop_field(&mut self, kind: FieldType, point: Point) -> FieldId {
        let defaults = self.registry.defaults(kind);
        let at = Point::new(self.snap(point.x), self.snap(point.y));
        let id = self.store.add_field(&defaults, at).id;
        self.selected = Some(id);
        id
    }

    /// Delete the selected field, if any.
    pub fn delete_selected(&mut self) -> Result<()> {
        if let Some(id) = self.selection() {
            self.store.delete_field(id)?;
            self.selected = None;
        }
        Ok(())
    }

    /// Duplicate the selected field and select the copy.
    pub fn duplicate_selected(&mut self) -> Result<Option<FieldId>> {
        let Some(id) = self.selection() else {
            return Ok(None);
        };
        let copy = self.store.duplicate_field(id)?.id;
        self.selected = Some(copy);
        Ok(Some(copy))
    }

    // ─── Drag ────────────────────────────────────────────────────────────

    /// Start moving `id`; the pointer is at `pointer` on the canvas.
    pub fn begin_drag(&mut self, id: FieldId, pointer: Point) -> Result<()> {
        if self.gesture != Gesture::Idle {
            return Err(self.overlapping_gesture("begin_drag"));
        }
        let start_rect = self
            .store
            .get(id)
            .ok_or(LayoutError::NotFound(id))?
            .rect();
        log::debug!("begin drag {} at {:?}", id, start_rect);
        self.selected = Some(id);
        self.gesture = Gesture::Dragging {
            id,
            start_rect,
            pointer_start: pointer,
        };
        Ok(())
    }

    /// Apply the pointer position to the dragged field and refresh guides.
    pub fn on_drag_move(&mut self, pointer: Point) {
        let Gesture::Dragging {
            id,
            start_rect,
            pointer_start,
        } = self.gesture
        else {
            return;
        };

        let delta = pointer - pointer_start;
        let candidate = FieldRect {
            x: self.snap(start_rect.x + delta.x),
            y: self.snap(start_rect.y + delta.y),
            ..start_rect
        };
        let rect = clamp_rect(candidate, self.store.canvas());

        match self.store.update_field_rect(id, rect).map(Field::rect) {
            Ok(committed) => {
                self.guides = detect_guides(
                    id,
                    committed,
                    self.store.fields(),
                    self.config.align_threshold,
                );
            }
            Err(_) => self.abort_gesture(id),
        }
    }

    /// Finish the drag. The last committed rectangle stands.
    pub fn end_drag(&mut self) {
        if let Gesture::Dragging { id, .. } = self.gesture {
            log::debug!("end drag {}", id);
            self.gesture = Gesture::Idle;
        }
        self.guides.clear();
    }

    // ─── Resize ──────────────────────────────────────────────────────────

    /// Start resizing `id` from `handle`.
    pub fn begin_resize(&mut self, id: FieldId, handle: ResizeHandle, pointer: Point) -> Result<()> {
        if self.gesture != Gesture::Idle {
            return Err(self.overlapping_gesture("begin_resize"));
        }
        let start_rect = self
            .store
            .get(id)
            .ok_or(LayoutError::NotFound(id))?
            .rect();
        log::debug!("begin resize {} via {:?} at {:?}", id, handle, start_rect);
        self.selected = Some(id);
        self.gesture = Gesture::Resizing {
            id,
            handle,
            start_rect,
            pointer_start: pointer,
        };
        Ok(())
    }

    pub fn on_resize_move(&mut self, pointer: Point) {
        let Gesture::Resizing {
            id,
            handle,
            start_rect,
            pointer_start,
        } = self.gesture
        else {
            return;
        };

        let raw = apply_resize_handle(handle, pointer - pointer_start, start_rect);
        let grid = self.config.snap_enabled.then_some(self.config.grid_size);
        let rect = fit_resized(handle, start_rect, raw, grid, self.store.canvas());

        if self.store.update_field_rect(id, rect).is_err() {
            self.abort_gesture(id);
        }
    }

    pub fn end_resize(&mut self) {
        if let Gesture::Resizing { id, .. } = self.gesture {
            log::debug!("end resize {}", id);
            self.gesture = Gesture::Idle;
        }
    }

    // ─── Pointer routing ─────────────────────────────────────────────────

    /// Route a press: a handle of the selected field starts a resize, a
    /// field body selects it and starts a drag, empty canvas clears the
    /// selection.
    ///
    /// A press while a gesture is still open means its release was lost
    /// (pointer let go outside the window). That gesture ends first, keeping
    /// its last commit.
    pub fn pointer_down(&mut self, p: Point) -> Result<()> {
        if self.gesture != Gesture::Idle {
            log::debug!("press during {:?}; ending it", self.gesture);
            self.pointer_up();
        }
        if let Some(id) = self.selection() {
            let rect = self.store.get(id).map(Field::rect);
            if let Some(handle) = rect.and_then(|r| handle_at(&r, p, self.config.handle_radius)) {
                return self.begin_resize(id, handle, p);
            }
        }
        match hit_test(self.store.fields(), p) {
            Some(id) => self.begin_drag(id, p),
            None => {
                self.selected = None;
                Ok(())
            }
        }
    }

    pub fn pointer_move(&mut self, p: Point) {
        match self.gesture {
            Gesture::Dragging { .. } => self.on_drag_move(p),
            Gesture::Resizing { .. } => self.on_resize_move(p),
            Gesture::Idle => {}
        }
    }

    pub fn pointer_up(&mut self) {
        match self.gesture {
            Gesture::Dragging { .. } => self.end_drag(),
            Gesture::Resizing { .. } => self.end_resize(),
            Gesture::Idle => {}
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn snap(&self, v: f64) -> f64 {
        snap(v, self.config.grid_size, self.config.snap_enabled)
    }

    /// The gesture's field vanished mid-gesture; drop the gesture quietly.
    fn abort_gesture(&mut self, id: FieldId) {
        log::warn!("{} disappeared during {:?}; aborting gesture", id, self.gesture);
        self.gesture = Gesture::Idle;
        self.guides.clear();
    }

    /// Starting a gesture while another is active is a caller bug: fatal in
    /// debug builds, logged and ignored otherwise.
    fn overlapping_gesture(&self, what: &'static str) -> LayoutError {
        if cfg!(debug_assertions) {
            panic!("{what} while another gesture is active");
        }
        log::error!("{what} while {:?} is active; ignored", self.gesture);
        LayoutError::InvariantViolation(what)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tle_core::{CanvasSize, GuideKind, Template};

    fn controller() -> CanvasController {
        let store = FieldStore::from_template(Template::new("t", "Test", CanvasSize::A4)).unwrap();
        CanvasController::new(store, EditorConfig::default())
    }

    fn place(c: &mut CanvasController, rect: FieldRect) -> FieldId {
        let id = c.drop_field(FieldType::Text, Point::new(0.0, 0.0));
        c.store_mut().update_field_rect(id, rect).unwrap();
        id
    }

    fn rect_of(c: &CanvasController, id: FieldId) -> FieldRect {
        c.store().get(id).unwrap().rect()
    }

    #[test]
    fn drag_snaps_committed_position() {
        let mut c = controller();
        let id = place(&mut c, FieldRect::new(0.0, 0.0, 100.0, 40.0));

        c.begin_drag(id, Point::new(10.0, 10.0)).unwrap();
        c.on_drag_move(Point::new(113.0, 217.0));
        assert_eq!(rect_of(&c, id), FieldRect::new(100.0, 210.0, 100.0, 40.0));
        c.end_drag();
        assert_eq!(c.gesture(), Gesture::Idle);
        assert_eq!(rect_of(&c, id), FieldRect::new(100.0, 210.0, 100.0, 40.0));
    }

    #[test]
    fn repeated_move_event_is_idempotent() {
        let mut c = controller();
        let id = place(&mut c, FieldRect::new(40.0, 40.0, 60.0, 60.0));

        c.begin_drag(id, Point::new(50.0, 50.0)).unwrap();
        c.on_drag_move(Point::new(77.0, 91.0));
        let first = rect_of(&c, id);
        c.on_drag_move(Point::new(77.0, 91.0));
        assert_eq!(rect_of(&c, id), first);
    }

    #[test]
    fn drag_guides_follow_the_snapped_candidate() {
        let mut c = controller();
        c.set_snap_enabled(false);
        let a = place(&mut c, FieldRect::new(50.0, 50.0, 100.0, 40.0));
        let b = place(&mut c, FieldRect::new(200.0, 150.0, 60.0, 40.0));

        c.begin_drag(b, Point::new(200.0, 150.0)).unwrap();
        c.on_drag_move(Point::new(52.0, 150.0));
        let guides = c.guides().to_vec();
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].kind, GuideKind::Vertical);
        assert_eq!(guides[0].position, rect_of(&c, a).x);

        // Beyond the threshold the guide goes away.
        c.on_drag_move(Point::new(70.0, 150.0));
        assert!(c.guides().is_empty());

        c.on_drag_move(Point::new(52.0, 150.0));
        assert!(!c.guides().is_empty());
        c.end_drag();
        assert!(c.guides().is_empty());
    }

    #[test]
    fn no_guides_without_a_drag() {
        let mut c = controller();
        let _a = place(&mut c, FieldRect::new(50.0, 50.0, 100.0, 40.0));
        let b = place(&mut c, FieldRect::new(50.0, 150.0, 100.0, 40.0));

        c.on_drag_move(Point::new(300.0, 300.0));
        assert!(c.guides().is_empty());
        assert_eq!(rect_of(&c, b), FieldRect::new(50.0, 150.0, 100.0, 40.0));

        c.begin_resize(b, ResizeHandle::E, Point::new(150.0, 170.0)).unwrap();
        c.on_resize_move(Point::new(152.0, 170.0));
        assert!(c.guides().is_empty());
    }

    #[test]
    fn resize_se_grows_and_snaps_size() {
        let mut c = controller();
        let id = place(&mut c, FieldRect::new(100.0, 100.0, 80.0, 60.0));

        c.begin_resize(id, ResizeHandle::Se, Point::new(180.0, 160.0)).unwrap();
        c.on_resize_move(Point::new(223.0, 187.0));
        assert_eq!(rect_of(&c, id), FieldRect::new(100.0, 100.0, 120.0, 90.0));
        c.end_resize();
        assert_eq!(c.gesture(), Gesture::Idle);
    }

    #[test]
    fn resize_nw_keeps_bottom_right() {
        let mut c = controller();
        let id = place(&mut c, FieldRect::new(100.0, 100.0, 80.0, 60.0));

        c.begin_resize(id, ResizeHandle::Nw, Point::new(100.0, 100.0)).unwrap();
        for p in [(87.0, 73.0), (160.0, 150.0), (-50.0, -50.0)] {
            c.on_resize_move(Point::new(p.0, p.1));
            let r = rect_of(&c, id);
            assert_eq!((r.right(), r.bottom()), (180.0, 160.0), "after {p:?}");
        }
    }

    #[test]
    fn deleted_field_aborts_gesture_silently() {
        let mut c = controller();
        let id = place(&mut c, FieldRect::new(10.0, 10.0, 50.0, 50.0));

        c.begin_drag(id, Point::new(20.0, 20.0)).unwrap();
        c.on_drag_move(Point::new(40.0, 40.0));
        c.store_mut().delete_field(id).unwrap();

        c.on_drag_move(Point::new(60.0, 60.0));
        assert_eq!(c.gesture(), Gesture::Idle);
        assert!(c.guides().is_empty());
        assert_eq!(c.selection(), None);

        let id = place(&mut c, FieldRect::new(10.0, 10.0, 50.0, 50.0));
        c.begin_resize(id, ResizeHandle::S, Point::new(35.0, 60.0)).unwrap();
        c.store_mut().delete_field(id).unwrap();
        c.on_resize_move(Point::new(35.0, 90.0));
        assert_eq!(c.gesture(), Gesture::Idle);
    }

    #[test]
    fn begin_on_missing_field_is_not_found() {
        let mut c = controller();
        let ghost = FieldId::intern("ctl_ghost");
        assert!(matches!(
            c.begin_drag(ghost, Point::ZERO),
            Err(LayoutError::NotFound(_))
        ));
        assert_eq!(c.gesture(), Gesture::Idle);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "another gesture is active")]
    fn overlapping_gesture_panics_in_debug() {
        let mut c = controller();
        let id = place(&mut c, FieldRect::new(10.0, 10.0, 50.0, 50.0));
        c.begin_drag(id, Point::ZERO).unwrap();
        let _ = c.begin_resize(id, ResizeHandle::Se, Point::ZERO);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn overlapping_gesture_is_ignored_in_release() {
        let mut c = controller();
        let id = place(&mut c, FieldRect::new(10.0, 10.0, 50.0, 50.0));
        c.begin_drag(id, Point::ZERO).unwrap();
        let before = c.gesture();
        assert!(matches!(
            c.begin_resize(id, ResizeHandle::Se, Point::ZERO),
            Err(LayoutError::InvariantViolation(_))
        ));
        assert_eq!(c.gesture(), before);
    }

    #[test]
    fn pointer_routing_prefers_handles_of_selection() {
        let mut c = controller();
        let id = place(&mut c, FieldRect::new(100.0, 100.0, 100.0, 50.0));
        c.select_field(None);

        // Body press selects and drags.
        c.pointer_down(Point::new(150.0, 120.0)).unwrap();
        assert!(matches!(c.gesture(), Gesture::Dragging { .. }));
        assert_eq!(c.selection(), Some(id));
        c.pointer_up();

        // Handle press on the selected field resizes.
        c.pointer_down(Point::new(200.0, 150.0)).unwrap();
        assert!(matches!(
            c.gesture(),
            Gesture::Resizing {
                handle: ResizeHandle::Se,
                ..
            }
        ));
        c.pointer_move(Point::new(240.0, 150.0));
        assert_eq!(rect_of(&c, id).width, 140.0);
        c.pointer_up();
        assert_eq!(c.gesture(), Gesture::Idle);

        // Empty canvas clears the selection.
        c.pointer_down(Point::new(500.0, 700.0)).unwrap();
        assert_eq!(c.selection(), None);
    }

    #[test]
    fn press_without_release_ends_the_open_gesture() {
        let mut c = controller();
        let id = place(&mut c, FieldRect::new(100.0, 100.0, 100.0, 50.0));
        c.select_field(None);

        c.pointer_down(Point::new(150.0, 120.0)).unwrap();
        c.pointer_move(Point::new(180.0, 150.0));
        let moved = rect_of(&c, id);
        assert_eq!(moved, FieldRect::new(130.0, 130.0, 100.0, 50.0));

        // Release lost; the next press starts a fresh drag from the commit.
        c.pointer_down(Point::new(150.0, 140.0)).unwrap();
        assert_eq!(
            c.gesture(),
            Gesture::Dragging {
                id,
                start_rect: moved,
                pointer_start: Point::new(150.0, 140.0),
            }
        );
        c.pointer_move(Point::new(160.0, 140.0));
        assert_eq!(rect_of(&c, id), FieldRect::new(140.0, 130.0, 100.0, 50.0));

        // Same for a resize left open, then a press on empty canvas.
        c.pointer_up();
        c.pointer_down(Point::new(240.0, 180.0)).unwrap();
        assert!(matches!(c.gesture(), Gesture::Resizing { .. }));
        c.pointer_down(Point::new(500.0, 700.0)).unwrap();
        assert_eq!(c.gesture(), Gesture::Idle);
        assert_eq!(c.selection(), None);
        assert!(c.guides().is_empty());
    }

    #[test]
    fn duplicate_and_delete_selected() {
        let mut c = controller();
        let id = place(&mut c, FieldRect::new(10.0, 10.0, 50.0, 50.0));
        c.select_field(Some(id));

        let copy = c.duplicate_selected().unwrap().unwrap();
        assert_eq!(c.selection(), Some(copy));
        assert_eq!(rect_of(&c, copy), FieldRect::new(20.0, 20.0, 50.0, 50.0));

        c.delete_selected().unwrap();
        assert_eq!(c.selection(), None);
        assert_eq!(c.fields().len(), 1);
        assert_eq!(c.duplicate_selected().unwrap(), None);
    }
}
