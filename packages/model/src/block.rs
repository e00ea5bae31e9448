//! # Block Instances
//!
//! A block instance is one placed block on a page. Instances live in a
//! single flat collection per project and are filtered by `page_id` at
//! render time; `index` is the ascending render order.
//!
//! ## Linking
//!
//! An instance may mirror another instance's content:
//! - `instance` points at the source instance it was cloned from
//! - `ref` points at the resolved root, written once as a lookup shortcut
//!
//! An instance with neither is a root and owns its content. Only the
//! root's value map renders; a linked instance contributes placement
//! (`page_id`, `index`) only.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitekit_common::block_id;
use std::collections::HashMap;

/// A single field value. Every field travels as `{ "value": … }` on the
/// wire, never a bare scalar; the wrapper is preserved on read and write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: Value,
}

impl FieldValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self { value: value.into() }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }
}

pub type ValueMap = HashMap<String, FieldValue>;

/// One placed block on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
    pub instance_id: String,
    pub page_id: String,

    /// Render order, ascending; ties keep original collection order
    pub index: i64,

    /// Block template folder, e.g. `hero`
    pub category: String,

    /// Template variant subfolder, e.g. `centered`
    pub variant: String,

    #[serde(default)]
    pub values: ValueMap,

    /// Source instance this one was cloned from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Cached resolved root, written on first resolution
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
}

impl BlockInstance {
    pub fn new(
        page_id: impl Into<String>,
        category: impl Into<String>,
        variant: impl Into<String>,
        index: i64,
    ) -> Self {
        Self {
            instance_id: block_id(),
            page_id: page_id.into(),
            index,
            category: category.into(),
            variant: variant.into(),
            values: ValueMap::new(),
            instance: None,
            ref_id: None,
        }
    }

    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), FieldValue::new(value));
        self
    }

    /// Whether this instance owns its content
    pub fn is_root(&self) -> bool {
        self.instance.is_none() && self.ref_id.is_none()
    }

    /// Next link to follow during resolution: `ref` wins over `instance`
    pub fn link_target(&self) -> Option<&str> {
        self.ref_id.as_deref().or(self.instance.as_deref())
    }
}

/// Instances placed on `page_id`, in render order. The sort is stable, so
/// equal indices keep their original collection order.
pub fn page_blocks<'a>(blocks: &'a [BlockInstance], page_id: &str) -> Vec<&'a BlockInstance> {
    let mut placed: Vec<&BlockInstance> = blocks
        .iter()
        .filter(|b| b.page_id == page_id)
        .collect();
    placed.sort_by_key(|b| b.index);
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_wrapper_shape() {
        let value = FieldValue::new("Build faster");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"value":"Build faster"}"#);

        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), Some("Build faster"));
    }

    #[test]
    fn test_root_detection() {
        let mut block = BlockInstance::new("page_home", "hero", "centered", 0);
        assert!(block.is_root());

        block.instance = Some("block_source".to_string());
        assert!(!block.is_root());
        assert_eq!(block.link_target(), Some("block_source"));

        block.ref_id = Some("block_root".to_string());
        assert_eq!(block.link_target(), Some("block_root"));
    }

    #[test]
    fn test_page_blocks_sorts_stably() {
        let mut a = BlockInstance::new("p1", "hero", "centered", 1);
        a.instance_id = "a".to_string();
        let mut b = BlockInstance::new("p1", "cta", "banner", 0);
        b.instance_id = "b".to_string();
        let mut c = BlockInstance::new("p1", "footer", "simple", 1);
        c.instance_id = "c".to_string();
        let mut other = BlockInstance::new("p2", "hero", "centered", 0);
        other.instance_id = "d".to_string();

        let blocks = vec![a, b, c, other];
        let ordered: Vec<&str> = page_blocks(&blocks, "p1")
            .iter()
            .map(|b| b.instance_id.as_str())
            .collect();

        // b first (index 0), then a before c: equal indices keep input order
        assert_eq!(ordered, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_ref_serializes_under_wire_name() {
        let mut block = BlockInstance::new("p1", "hero", "centered", 0);
        block.ref_id = Some("block_root".to_string());

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["ref"], "block_root");
        assert!(json.get("ref_id").is_none());
    }
}
