//! Template persistence boundary.
//!
//! Storage itself belongs to the host. The engine consumes a
//! [`TemplateRepository`] and knows the JSON shape templates travel in:
//!
//! ```json
//! { "id", "name", "canvasWidth", "canvasHeight", "backgroundImage"?,
//!   "fields": [{ "id", "type", "x", "y", "width", "height",
//!                "properties": {}, "dataBinding"? }],
//!   "metadata": { "version", "createdAt", "updatedAt" } }
//! ```

use crate::error::Result;
use crate::model::Template;

/// Host-provided template storage.
pub trait TemplateRepository {
    fn load_template(&self, id: &str) -> Result<Template>;
    fn save_template(&mut self, template: &Template) -> Result<()>;
}

pub fn template_from_json(json: &str) -> Result<Template> {
    Ok(serde_json::from_str(json)?)
}

pub fn template_to_json(template: &Template) -> Result<String> {
    Ok(serde_json::to_string_pretty(template)?)
}
