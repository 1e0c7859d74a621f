//! Field store: the authoritative field list for one template.
//!
//! Every write path clamps geometry onto the canvas, so the bounds
//! invariants hold after any sequence of calls:
//!
//! - `0 ≤ x`, `0 ≤ y`
//! - `x + width ≤ canvasWidth`, `y + height ≤ canvasHeight`
//! - `width ≥ 20`, `height ≥ 20`
//!
//! Committed mutations are announced to subscribers synchronously so a
//! rendering layer can redraw.

use std::collections::HashSet;
use tle_core::geometry::{DUPLICATE_OFFSET, MIN_FIELD_SIZE, clamp_rect};
use tle_core::{
    CanvasSize, Field, FieldDefaults, FieldId, FieldRect, IdAllocator, LayoutError, Point,
    Properties, Result, Template,
};

/// A committed store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Added(FieldId),
    Updated(FieldId),
    Removed(FieldId),
    Duplicated { source: FieldId, copy: FieldId },
    /// Z-order changed for this field.
    Reordered(FieldId),
}

pub type Listener = Box<dyn FnMut(&StoreEvent)>;

/// A shallow property/binding edit from the property panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    /// Keys merged over the existing properties; other keys are kept.
    pub properties: Option<Properties>,
    /// `Some(None)` clears the binding.
    pub data_binding: Option<Option<String>>,
}

pub struct FieldStore {
    template: Template,
    ids: IdAllocator,
    duplicate_offset: f64,
    listeners: Vec<Listener>,
}

impl FieldStore {
    /// Take ownership of a loaded template.
    ///
    /// Fields are normalised through `clamp_rect`, so a stored template
    /// that violates the bounds invariants is repaired on load.
    ///
    /// # Errors
    /// `InvalidCanvas` if either canvas dimension is not a finite number of
    /// at least `MIN_FIELD_SIZE`; `DuplicateId` if two fields share an id.
    pub fn from_template(mut template: Template) -> Result<Self> {
        let canvas = template.canvas();
        let usable = |v: f64| v.is_finite() && v >= MIN_FIELD_SIZE;
        if !usable(canvas.width) || !usable(canvas.height) {
            return Err(LayoutError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }
        let mut seen = HashSet::with_capacity(template.fields.len());
        for field in &mut template.fields {
            if !seen.insert(field.id) {
                return Err(LayoutError::DuplicateId(field.id));
            }
            let clamped = clamp_rect(field.rect(), canvas);
            if clamped != field.rect() {
                log::debug!("normalised {} on load: {:?} -> {:?}", field.id, field.rect(), clamped);
                field.set_rect(clamped);
            }
        }
        Ok(Self {
            ids: IdAllocator::seeded(&seen),
            template,
            duplicate_offset: DUPLICATE_OFFSET,
            listeners: Vec::new(),
        })
    }

    /// Distance (both axes) between a field and its duplicate.
    pub fn with_duplicate_offset(mut self, offset: f64) -> Self {
        self.duplicate_offset = offset;
        self
    }

    /// Register a listener for committed mutations.
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn into_template(self) -> Template {
        self.template
    }

    pub fn canvas(&self) -> CanvasSize {
        self.template.canvas()
    }

    /// Fields in z-order (last = topmost).
    pub fn fields(&self) -> &[Field] {
        &self.template.fields
    }

    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.template.field(id)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: FieldId) -> Option<usize> {
        self.template.fields.iter().position(|f| f.id == id)
    }

    fn require(&self, id: FieldId) -> Result<usize> {
        self.index_of(id).ok_or(LayoutError::NotFound(id))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Create a field from type defaults with its top-left at `drop`,
    /// clamped so the whole field fits. Never fails.
    pub fn add_field(&mut self, defaults: &FieldDefaults, drop: Point) -> &Field {
        let id = self.ids.allocate(defaults.kind.as_str());
        let rect = clamp_rect(
            FieldRect::new(drop.x, drop.y, defaults.width, defaults.height),
            self.canvas(),
        );
        log::debug!("add {} ({}) at {:?}", id, defaults.kind.as_str(), rect);
        self.template
            .fields
            .push(Field::new(id, defaults.kind, rect, defaults.properties.clone()));
        self.emit(StoreEvent::Added(id));
        self.last()
    }

    /// Replace a field's geometry with the clamped `proposed` rectangle.
    pub fn update_field_rect(&mut self, id: FieldId, proposed: FieldRect) -> Result<&Field> {
        let idx = self.require(id)?;
        let rect = clamp_rect(proposed, self.canvas());
        self.template.fields[idx].set_rect(rect);
        log::trace!("update {} -> {:?}", id, rect);
        self.emit(StoreEvent::Updated(id));
        Ok(&self.template.fields[idx])
    }

    /// Shallow-merge a property/binding patch. Geometry is untouched.
    pub fn update_field_property(&mut self, id: FieldId, patch: FieldPatch) -> Result<&Field> {
        let idx = self.require(id)?;
        let field = &mut self.template.fields[idx];
        if let Some(props) = patch.properties {
            field.properties.extend(props);
        }
        if let Some(binding) = patch.data_binding {
            field.data_binding = binding;
        }
        self.emit(StoreEvent::Updated(id));
        Ok(&self.template.fields[idx])
    }

    /// Remove a field.
    ///
    /// # Errors
    /// `NotFound` when the id is absent, including a second delete.
    pub fn delete_field(&mut self, id: FieldId) -> Result<()> {
        let idx = self.require(id)?;
        self.template.fields.remove(idx);
        log::debug!("delete {}", id);
        self.emit(StoreEvent::Removed(id));
        Ok(())
    }

    /// Copy a field under a new id, offset so the copy is visible, and
    /// place it on top.
    pub fn duplicate_field(&mut self, id: FieldId) -> Result<&Field> {
        let idx = self.require(id)?;
        let mut copy = self.template.fields[idx].clone();
        copy.id = self.ids.allocate(copy.kind.as_str());
        let shifted = FieldRect {
            x: copy.x + self.duplicate_offset,
            y: copy.y + self.duplicate_offset,
            ..copy.rect()
        };
        copy.set_rect(clamp_rect(shifted, self.canvas()));
        let copy_id = copy.id;
        log::debug!("duplicate {} -> {}", id, copy_id);
        self.template.fields.push(copy);
        self.emit(StoreEvent::Duplicated {
            source: id,
            copy: copy_id,
        });
        Ok(self.last())
    }

    /// Move a field to the top of the z-order.
    pub fn bring_to_front(&mut self, id: FieldId) -> Result<()> {
        let idx = self.require(id)?;
        let field = self.template.fields.remove(idx);
        self.template.fields.push(field);
        self.emit(StoreEvent::Reordered(id));
        Ok(())
    }

    /// Move a field to the bottom of the z-order.
    pub fn send_to_back(&mut self, id: FieldId) -> Result<()> {
        let idx = self.require(id)?;
        let field = self.template.fields.remove(idx);
        self.template.fields.insert(0, field);
        self.emit(StoreEvent::Reordered(id));
        Ok(())
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn last(&self) -> &Field {
        let idx = self.template.fields.len() - 1;
        &self.template.fields[idx]
    }

    fn emit(&mut self, event: StoreEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
