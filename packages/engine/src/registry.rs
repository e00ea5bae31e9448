//! # Block Registry
//!
//! Maps a `(category, variant)` pair to a renderable block template plus
//! its field-schema metadata. The registry is built once at startup from
//! the builtin manifest; resolution never fails. Unknown paths fall back
//! to a shared entry that renders a visible diagnostic panel, so a single
//! bad block never blocks the rest of the page.

use crate::schema::FieldSchema;
use crate::theme::{resolve_token, GradientKind, ThemePalette, TokenStyle};
use sitekit_model::{BlockNode, ValueMap};
use std::collections::HashMap;
use tracing::warn;

/// Everything a block template needs to render one placed block
pub struct RenderInput<'a> {
    /// Requested template path (diagnostics render it on fallback)
    pub category: &'a str,
    pub variant: &'a str,

    /// Placed instance id, used for stable element ids
    pub block_id: &'a str,

    /// The resolved root's value map
    pub values: &'a ValueMap,

    pub palette: &'a ThemePalette,
}

impl RenderInput<'_> {
    /// String field with a fallback
    pub fn text(&self, field: &str, fallback: &str) -> String {
        self.values
            .get(field)
            .and_then(|v| v.as_str())
            .unwrap_or(fallback)
            .to_string()
    }

    /// Optional string field
    pub fn maybe_text(&self, field: &str) -> Option<String> {
        self.values
            .get(field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    /// Resolve a theme-token field to concrete styling. The gradient kind
    /// comes from the sibling `gradient_type` field, defaulting to linear.
    pub fn token_style(&self, field: &str) -> TokenStyle {
        let token = self
            .values
            .get(field)
            .and_then(|v| v.as_str())
            .unwrap_or("none");
        let kind = self
            .values
            .get("gradient_type")
            .and_then(|v| v.as_str())
            .map(GradientKind::parse)
            .unwrap_or_default();
        resolve_token(token, kind, self.palette)
    }
}

pub type RenderFn = fn(&RenderInput) -> BlockNode;

/// One registered block template
pub struct RegistryEntry {
    pub category: String,
    pub variant: String,
    pub schema: FieldSchema,
    pub render: RenderFn,
}

pub struct BlockRegistry {
    entries: HashMap<(String, String), RegistryEntry>,
    fallback: RegistryEntry,
}

impl BlockRegistry {
    /// Registry over the builtin template manifest
    pub fn builtin() -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
            fallback: crate::blocks::fallback_entry(),
        };
        for entry in crate::blocks::builtin_manifest() {
            registry.register(entry);
        }
        registry
    }

    pub fn register(&mut self, entry: RegistryEntry) {
        self.entries
            .insert((entry.category.clone(), entry.variant.clone()), entry);
    }

    /// Look up a template. Unknown paths return the fallback entry, whose
    /// render function shows the failed path inline.
    pub fn resolve(&self, category: &str, variant: &str) -> &RegistryEntry {
        match self
            .entries
            .get(&(category.to_string(), variant.to_string()))
        {
            Some(entry) => entry,
            None => {
                warn!(category, variant, "block template not found, using fallback");
                &self.fallback
            }
        }
    }

    pub fn contains(&self, category: &str, variant: &str) -> bool {
        self.entries
            .contains_key(&(category.to_string(), variant.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_model::ValueMap;

    #[test]
    fn test_builtin_registry_resolves_known_paths() {
        let registry = BlockRegistry::builtin();
        assert!(registry.contains("hero", "centered"));
        assert!(registry.contains("footer", "simple"));

        let entry = registry.resolve("hero", "centered");
        assert_eq!(entry.category, "hero");
        assert_eq!(entry.variant, "centered");
    }

    #[test]
    fn test_unknown_path_falls_back_with_diagnostic() {
        let registry = BlockRegistry::builtin();
        let entry = registry.resolve("carousel", "fancy");

        let values = ValueMap::new();
        let palette = ThemePalette::default();
        let input = RenderInput {
            category: "carousel",
            variant: "fancy",
            block_id: "block_1",
            values: &values,
            palette: &palette,
        };

        let node = (entry.render)(&input);
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("carousel/fancy"));
    }
}
