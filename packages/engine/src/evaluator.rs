//! # Page Evaluator
//!
//! Composes one page from the data model: filters the flat instance
//! collection to the page, stable-sorts by render index, resolves each
//! instance to its root source, and renders every block through the
//! registry. Resolution failures become inline diagnostic nodes; a single
//! broken block never fails the page.

use crate::registry::{BlockRegistry, RenderInput};
use crate::resolve::{build_arena, resolve_root, BlockArena};
use crate::theme::{css_custom_properties, has_active_palette, ThemePalette};
use sitekit_model::{
    BlockInstance, BlockNode, EditorState, Page, Project, RenderedPage, Variable, VariableSet,
};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// A read-only view over everything evaluation needs. Both the editor
/// state store and the public renderer's fetched payload convert into it.
pub struct EvalInput<'a> {
    pub project: &'a Project,
    pub pages: &'a [Page],
    pub variables: &'a [Variable],
    pub variable_sets: &'a [VariableSet],
    pub blocks: &'a [BlockInstance],
    pub selected_page_id: Option<&'a str>,
}

impl<'a> From<&'a EditorState> for EvalInput<'a> {
    fn from(state: &'a EditorState) -> Self {
        Self {
            project: &state.project,
            pages: &state.pages,
            variables: &state.variables,
            variable_sets: &state.variable_sets,
            blocks: &state.block_instances,
            selected_page_id: state.selected_page_id.as_deref(),
        }
    }
}

/// Whether the preview is allowed to render: the theming pipeline needs a
/// non-empty active color set.
pub fn preview_ready(input: &EvalInput) -> bool {
    has_active_palette(input.variable_sets, input.variables)
}

pub struct PageEvaluator<'r> {
    registry: &'r BlockRegistry,
}

impl<'r> PageEvaluator<'r> {
    pub fn new(registry: &'r BlockRegistry) -> Self {
        Self { registry }
    }

    /// Evaluate one page to its rendered block tree
    #[instrument(skip(self, input), fields(page_id))]
    pub fn evaluate(&self, input: &EvalInput, page_id: &str) -> RenderedPage {
        let mut rendered = RenderedPage::new();

        let declarations = css_custom_properties(input.variable_sets, input.variables);
        if !declarations.is_empty() {
            rendered.add_rule(":root", declarations);
        }

        let palette = ThemePalette::from_variables(input.variable_sets, input.variables);
        let arena = build_arena(input.blocks);

        for block in self.placed_blocks(input, page_id) {
            let node = self.evaluate_block(&arena, block, &palette);
            rendered.add_node(node);
        }

        debug!(
            nodes = rendered.nodes.len(),
            rules = rendered.styles.len(),
            "page evaluated"
        );
        rendered
    }

    /// Instances placed on the page, in stable index order. Blocks whose
    /// `page_id` matches no known page are retained and rendered against
    /// the currently selected page.
    fn placed_blocks<'a>(
        &self,
        input: &'a EvalInput,
        page_id: &str,
    ) -> Vec<&'a BlockInstance> {
        let known: HashSet<&str> = input.pages.iter().map(|p| p.id.as_str()).collect();
        let is_selected = input.selected_page_id == Some(page_id);

        let mut placed: Vec<&BlockInstance> = input
            .blocks
            .iter()
            .filter(|b| {
                if b.page_id == page_id {
                    return true;
                }
                if !known.contains(b.page_id.as_str()) && is_selected {
                    warn!(
                        instance_id = %b.instance_id,
                        page_id = %b.page_id,
                        "block references an unknown page, rendering on selected page"
                    );
                    return true;
                }
                false
            })
            .collect();

        placed.sort_by_key(|b| b.index);
        placed
    }

    fn evaluate_block(
        &self,
        arena: &BlockArena,
        block: &BlockInstance,
        palette: &ThemePalette,
    ) -> BlockNode {
        let root = match resolve_root(arena, block) {
            Ok(root) => root,
            Err(err) => {
                warn!(instance_id = %block.instance_id, %err, "link resolution failed");
                return BlockNode::error(err.to_string());
            }
        };

        let entry = self.registry.resolve(&root.category, &root.variant);
        let render_input = RenderInput {
            category: &root.category,
            variant: &root.variant,
            block_id: &block.instance_id,
            values: &root.values,
            palette,
        };
        (entry.render)(&render_input)
    }
}
