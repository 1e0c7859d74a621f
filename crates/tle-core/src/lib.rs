pub mod datasource;
pub mod error;
pub mod geometry;
pub mod guides;
pub mod id;
pub mod model;
pub mod persist;
pub mod registry;

pub use datasource::{DataSourceField, suggest_bindings};
pub use error::{LayoutError, Result};
pub use geometry::{
    DUPLICATE_OFFSET, GRID_SIZE, MIN_FIELD_SIZE, ResizeHandle, apply_resize_handle, clamp_rect,
    fit_resized, snap,
};
pub use guides::{ALIGN_THRESHOLD, AlignmentGuide, GuideKind, Guides, detect_guides};
pub use id::{FieldId, IdAllocator};
pub use model::*;
pub use persist::{TemplateRepository, template_from_json, template_to_json};
pub use registry::{BuiltinRegistry, FieldDefaults, FieldTypeRegistry};

// Re-export kurbo's point types so downstream crates speak the same geometry.
pub use kurbo::{Point, Vec2};
