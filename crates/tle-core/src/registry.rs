//! Field type registry: default size and properties per field type.
//!
//! The editor consults a registry when a field type is dropped onto the
//! canvas. Hosts may supply their own; [`BuiltinRegistry`] carries the
//! stock defaults.

use crate::model::{FieldType, Properties};
use serde_json::{Value, json};

/// What a freshly dropped field of some type looks like.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefaults {
    pub kind: FieldType,
    pub width: f64,
    pub height: f64,
    pub properties: Properties,
}

pub trait FieldTypeRegistry {
    fn defaults(&self, kind: FieldType) -> FieldDefaults;
}

/// Stock defaults for every field type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRegistry;

impl FieldTypeRegistry for BuiltinRegistry {
    fn defaults(&self, kind: FieldType) -> FieldDefaults {
        let (width, height, properties) = match kind {
            FieldType::Text => (150.0, 30.0, text_props("left")),
            FieldType::Number => (100.0, 30.0, text_props("right")),
            FieldType::Date => (120.0, 30.0, {
                let mut p = text_props("left");
                p.insert("format".into(), json!("YYYY-MM-DD"));
                p
            }),
            FieldType::Checkbox => (20.0, 20.0, object(json!({ "checked": false, "borderColor": "#000000" }))),
            FieldType::Signature => (200.0, 60.0, object(json!({ "borderColor": "#000000", "borderWidth": 1 }))),
            FieldType::Image => (150.0, 100.0, object(json!({ "fit": "contain" }))),
            FieldType::Table => (400.0, 150.0, object(json!({ "columns": [], "fontSize": 10, "borderWidth": 1 }))),
            FieldType::QrCode => (100.0, 100.0, object(json!({ "errorCorrection": "M" }))),
            FieldType::Barcode => (200.0, 60.0, object(json!({ "format": "CODE128", "showText": true }))),
        };
        FieldDefaults {
            kind,
            width,
            height,
            properties,
        }
    }
}

fn text_props(align: &str) -> Properties {
    object(json!({
        "fontSize": 12,
        "fontFamily": "Helvetica",
        "color": "#000000",
        "align": align,
    }))
}

fn object(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => Properties::new(),
    }
}
