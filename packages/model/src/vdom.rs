use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rendered block tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockNode {
    /// HTML element
    Element {
        tag: String,
        attributes: HashMap<String, String>,
        styles: HashMap<String, String>,
        children: Vec<BlockNode>,
    },

    /// Text node
    Text { content: String },

    /// Error node (shows diagnostics inline instead of failing the page)
    Error { message: String },
}

impl BlockNode {
    pub fn element(tag: impl Into<String>) -> Self {
        BlockNode::Element {
            tag: tag.into(),
            attributes: HashMap::new(),
            styles: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        BlockNode::Text {
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        BlockNode::Error {
            message: message.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let BlockNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let BlockNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: BlockNode) -> Self {
        if let BlockNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<BlockNode>) -> Self {
        if let BlockNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self, BlockNode::Error { .. })
    }
}

/// A fully composed page: one node per placed block plus collected styles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub nodes: Vec<BlockNode>,
    pub styles: Vec<CssRule>,
}

/// CSS rule; declarations keep their authored order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

impl RenderedPage {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            styles: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: BlockNode) {
        self.nodes.push(node);
    }

    pub fn add_rule(
        &mut self,
        selector: impl Into<String>,
        declarations: Vec<(String, String)>,
    ) {
        self.styles.push(CssRule {
            selector: selector.into(),
            declarations,
        });
    }
}

impl Default for RenderedPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let node = BlockNode::element("section")
            .with_attr("class", "hero")
            .with_style("background", "#fff")
            .with_child(BlockNode::text("Welcome"));

        match &node {
            BlockNode::Element {
                tag,
                attributes,
                styles,
                children,
            } => {
                assert_eq!(tag, "section");
                assert_eq!(attributes.get("class").unwrap(), "hero");
                assert_eq!(styles.get("background").unwrap(), "#fff");
                assert_eq!(children.len(), 1);
            }
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn test_serialization_is_tagged() {
        let node = BlockNode::text("hi");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Text");
    }
}
