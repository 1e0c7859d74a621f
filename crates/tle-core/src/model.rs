//! Template data model.
//!
//! A template is one fixed-size canvas holding an ordered list of fields.
//! List order is z-order: later fields paint on top. Field geometry is
//! the only part the engine interprets; `properties` and `data_binding`
//! are carried through untouched for the rendering and property layers.

use crate::id::FieldId;
use chrono::{DateTime, Utc};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Type-specific visual attributes (font size, colors, alignment, ...).
/// Opaque to the geometry engine.
pub type Properties = serde_json::Map<String, serde_json::Value>;

// ─── Field types ─────────────────────────────────────────────────────────

/// The closed set of field kinds a template can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Checkbox,
    Signature,
    Image,
    Table,
    QrCode,
    Barcode,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Checkbox,
        FieldType::Signature,
        FieldType::Image,
        FieldType::Table,
        FieldType::QrCode,
        FieldType::Barcode,
    ];

    /// Wire name, also used as the prefix of generated field ids.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Checkbox => "checkbox",
            FieldType::Signature => "signature",
            FieldType::Image => "image",
            FieldType::Table => "table",
            FieldType::QrCode => "qr_code",
            FieldType::Barcode => "barcode",
        }
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned field rectangle in canvas pixel space (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FieldRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment: points on the border count as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Canvas (page) dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    /// A4 portrait at 72 dpi.
    pub const A4: CanvasSize = CanvasSize {
        width: 595.0,
        height: 842.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ─── Field ───────────────────────────────────────────────────────────────

/// A positioned, sized, typed rectangle on the template canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_binding: Option<String>,
}

impl Field {
    pub fn new(id: FieldId, kind: FieldType, rect: FieldRect, properties: Properties) -> Self {
        Self {
            id,
            kind,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            properties,
            data_binding: None,
        }
    }

    pub fn rect(&self) -> FieldRect {
        FieldRect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: FieldRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }
}

// ─── Template ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TemplateMetadata {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One template page: canvas dimensions plus its fields in z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    pub metadata: TemplateMetadata,
}

impl Template {
    pub fn new(id: impl Into<String>, name: impl Into<String>, canvas: CanvasSize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            canvas_width: canvas.width,
            canvas_height: canvas.height,
            background_image: None,
            fields: Vec::new(),
            metadata: TemplateMetadata::new(Utc::now()),
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Record a modification: bump `updatedAt` and the version counter.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.metadata.updated_at = now;
        self.metadata.version += 1;
    }
}
