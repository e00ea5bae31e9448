//! Field schema metadata for block templates.
//!
//! Two wire shapes exist: the legacy flat `fields` map and the structured
//! `{contentFields, themeFields, layoutFields}` triple. Both deserialize
//! through [`FieldSchemaShape`] and normalize into [`FieldSchema`] at the
//! registry boundary; nothing deeper branches on the legacy shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Image,
    Link,
    Boolean,
    Number,
    /// Symbolic theme token resolved by the theming pipeline
    Token,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: FieldType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn new(kind: FieldType) -> Self {
        Self {
            kind,
            label: None,
            default: None,
        }
    }

    pub fn text() -> Self {
        Self::new(FieldType::Text)
    }

    pub fn image() -> Self {
        Self::new(FieldType::Image)
    }

    pub fn link() -> Self {
        Self::new(FieldType::Link)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    pub fn token() -> Self {
        Self::new(FieldType::Token)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Wire shapes accepted for a block's field schema. `Flat` must come
/// first: the grouped variant's members all default, so it would swallow
/// any object otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldSchemaShape {
    Flat {
        fields: HashMap<String, FieldSpec>,
    },
    Grouped {
        #[serde(default, rename = "contentFields")]
        content_fields: HashMap<String, FieldSpec>,
        #[serde(default, rename = "themeFields")]
        theme_fields: HashMap<String, FieldSpec>,
        #[serde(default, rename = "layoutFields")]
        layout_fields: HashMap<String, FieldSpec>,
    },
}

/// Canonical grouped schema
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    #[serde(default)]
    pub content_fields: HashMap<String, FieldSpec>,
    #[serde(default)]
    pub theme_fields: HashMap<String, FieldSpec>,
    #[serde(default)]
    pub layout_fields: HashMap<String, FieldSpec>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.content_fields.insert(name.into(), spec);
        self
    }

    pub fn theme(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.theme_fields.insert(name.into(), spec);
        self
    }

    pub fn layout(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.layout_fields.insert(name.into(), spec);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.content_fields
            .get(name)
            .or_else(|| self.theme_fields.get(name))
            .or_else(|| self.layout_fields.get(name))
    }

    pub fn len(&self) -> usize {
        self.content_fields.len() + self.theme_fields.len() + self.layout_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<FieldSchemaShape> for FieldSchema {
    fn from(shape: FieldSchemaShape) -> Self {
        match shape {
            FieldSchemaShape::Grouped {
                content_fields,
                theme_fields,
                layout_fields,
            } => Self {
                content_fields,
                theme_fields,
                layout_fields,
            },
            // Legacy flat maps carried no grouping; token fields are the
            // only ones the pipeline treats differently
            FieldSchemaShape::Flat { fields } => {
                let mut schema = Self::default();
                for (name, spec) in fields {
                    if spec.kind == FieldType::Token {
                        schema.theme_fields.insert(name, spec);
                    } else {
                        schema.content_fields.insert(name, spec);
                    }
                }
                schema
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_shape_normalizes() {
        let json = r#"{
            "fields": {
                "heading": { "type": "text" },
                "background": { "type": "token" }
            }
        }"#;

        let shape: FieldSchemaShape = serde_json::from_str(json).unwrap();
        let schema: FieldSchema = shape.into();

        assert!(schema.content_fields.contains_key("heading"));
        assert!(schema.theme_fields.contains_key("background"));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_grouped_shape_normalizes() {
        let json = r#"{
            "contentFields": { "heading": { "type": "text" } },
            "themeFields": { "background": { "type": "token" } },
            "layoutFields": { "columns": { "type": "number" } }
        }"#;

        let shape: FieldSchemaShape = serde_json::from_str(json).unwrap();
        let schema: FieldSchema = shape.into();

        assert_eq!(schema.content_fields.len(), 1);
        assert_eq!(schema.theme_fields.len(), 1);
        assert_eq!(schema.layout_fields.len(), 1);
        assert!(schema.field("columns").is_some());
    }

    #[test]
    fn test_field_lookup_spans_groups() {
        let schema = FieldSchema::new()
            .content("heading", FieldSpec::text())
            .theme("background", FieldSpec::token());

        assert_eq!(schema.field("heading").unwrap().kind, FieldType::Text);
        assert_eq!(schema.field("background").unwrap().kind, FieldType::Token);
        assert!(schema.field("missing").is_none());
    }
}
