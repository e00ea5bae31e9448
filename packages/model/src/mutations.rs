//! # State Mutations
//!
//! High-level semantic operations on the editor state.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation represents a semantic operation
//! 2. **Validated**: All mutations validate referenced ids before applying
//! 3. **Last write wins**: Field edits replace whole values, no merging
//!
//! ## Selection Semantics
//!
//! - `AddPage` selects the new page
//! - `RemovePage` reassigns the cursor to the first remaining page, or
//!   clears it when no pages remain
//! - `RemoveBlock` clears the block cursor when it pointed at the removed
//!   instance, and does NOT relink instances cloned from it; dangling
//!   links degrade at resolution time

use crate::block::{BlockInstance, FieldValue};
use crate::page::{derive_page_path, Page};
use crate::project::{ProjectMetadata, ProjectSettings};
use crate::state::EditorState;
use crate::variable::Variable;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Add a page with a generated id and a path derived from its name
    AddPage { name: String },

    /// Remove a page; the selection cursor moves to the first remaining page
    RemovePage { page_id: String },

    /// Rename a page (its path is untouched)
    RenamePage { page_id: String, name: String },

    /// Change a page's route path
    SetPagePath { page_id: String, path: String },

    /// Move the page selection cursor
    SelectPage { page_id: String },

    /// Place a new block at the end of a page
    AddBlock {
        page_id: String,
        category: String,
        variant: String,
    },

    /// Remove a block instance from the collection
    RemoveBlock { block_id: String },

    /// Change a block's render index
    MoveBlock { block_id: String, index: i64 },

    /// Set one field in a block's value map (atomic replacement)
    SetBlockField {
        block_id: String,
        field: String,
        value: Value,
    },

    /// Turn a block into a linked clone of another instance
    LinkBlock {
        block_id: String,
        source_id: String,
    },

    /// Move the block selection cursor (`None` clears it)
    SelectBlock { block_id: Option<String> },

    /// Insert or replace a variable by id
    UpsertVariable { variable: Variable },

    /// Remove a variable
    RemoveVariable { variable_id: String },

    /// Replace project design settings
    SetProjectSettings { settings: ProjectSettings },

    /// Replace project SEO metadata
    SetProjectMetadata { metadata: ProjectMetadata },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    #[error("Page name must not be empty")]
    EmptyPageName,

    #[error("Block cannot link to itself")]
    SelfLink,
}

impl Mutation {
    /// Apply the mutation to the state with validation
    pub fn apply(&self, state: &mut EditorState) -> Result<(), MutationError> {
        self.validate(state)?;

        match self {
            Mutation::AddPage { name } => Self::apply_add_page(state, name),
            Mutation::RemovePage { page_id } => Self::apply_remove_page(state, page_id),
            Mutation::RenamePage { page_id, name } => {
                let page = state.page_mut(page_id).ok_or_else(|| {
                    MutationError::PageNotFound(page_id.clone())
                })?;
                page.name = name.clone();
                page.touch();
                Ok(())
            }
            Mutation::SetPagePath { page_id, path } => {
                let normalized = if path.starts_with('/') {
                    path.clone()
                } else {
                    format!("/{}", path)
                };
                let page = state.page_mut(page_id).ok_or_else(|| {
                    MutationError::PageNotFound(page_id.clone())
                })?;
                page.path = normalized;
                page.touch();
                Ok(())
            }
            Mutation::SelectPage { page_id } => {
                state.selected_page_id = Some(page_id.clone());
                Ok(())
            }
            Mutation::AddBlock {
                page_id,
                category,
                variant,
            } => Self::apply_add_block(state, page_id, category, variant),
            Mutation::RemoveBlock { block_id } => Self::apply_remove_block(state, block_id),
            Mutation::MoveBlock { block_id, index } => {
                let block = state.block_mut(block_id).ok_or_else(|| {
                    MutationError::BlockNotFound(block_id.clone())
                })?;
                block.index = *index;
                Ok(())
            }
            Mutation::SetBlockField {
                block_id,
                field,
                value,
            } => {
                let block = state.block_mut(block_id).ok_or_else(|| {
                    MutationError::BlockNotFound(block_id.clone())
                })?;
                block
                    .values
                    .insert(field.clone(), FieldValue::new(value.clone()));
                Ok(())
            }
            Mutation::LinkBlock {
                block_id,
                source_id,
            } => {
                let block = state.block_mut(block_id).ok_or_else(|| {
                    MutationError::BlockNotFound(block_id.clone())
                })?;
                block.instance = Some(source_id.clone());
                // The old shortcut may point at a different chain now
                block.ref_id = None;
                Ok(())
            }
            Mutation::SelectBlock { block_id } => {
                state.selected_block_id = block_id.clone();
                Ok(())
            }
            Mutation::UpsertVariable { variable } => {
                if let Some(existing) = state
                    .variables
                    .iter_mut()
                    .find(|v| v.id == variable.id)
                {
                    *existing = variable.clone();
                } else {
                    state.variables.push(variable.clone());
                }
                Ok(())
            }
            Mutation::RemoveVariable { variable_id } => {
                state.variables.retain(|v| v.id != *variable_id);
                Ok(())
            }
            Mutation::SetProjectSettings { settings } => {
                state.project.settings = settings.clone();
                Ok(())
            }
            Mutation::SetProjectMetadata { metadata } => {
                state.project.metadata = metadata.clone();
                Ok(())
            }
        }
    }

    fn apply_add_page(state: &mut EditorState, name: &str) -> Result<(), MutationError> {
        let page = Page::new(name);
        state.selected_page_id = Some(page.id.clone());
        state.pages.push(page);
        Ok(())
    }

    fn apply_remove_page(state: &mut EditorState, page_id: &str) -> Result<(), MutationError> {
        state.pages.retain(|p| p.id != page_id);

        if state.selected_page_id.as_deref() == Some(page_id) {
            state.selected_page_id = state.pages.first().map(|p| p.id.clone());
        }
        Ok(())
    }

    fn apply_add_block(
        state: &mut EditorState,
        page_id: &str,
        category: &str,
        variant: &str,
    ) -> Result<(), MutationError> {
        let index = state.next_block_index(page_id);
        let block = BlockInstance::new(page_id, category, variant, index);
        state.selected_block_id = Some(block.instance_id.clone());
        state.block_instances.push(block);
        Ok(())
    }

    fn apply_remove_block(state: &mut EditorState, block_id: &str) -> Result<(), MutationError> {
        let orphaned = state
            .block_instances
            .iter()
            .filter(|b| b.link_target() == Some(block_id))
            .count();
        if orphaned > 0 {
            warn!(
                block_id,
                orphaned, "removing a block that other instances link to"
            );
        }

        state.block_instances.retain(|b| b.instance_id != block_id);

        if state.selected_block_id.as_deref() == Some(block_id) {
            state.selected_block_id = None;
        }
        Ok(())
    }

    /// Validate without applying
    pub fn validate(&self, state: &EditorState) -> Result<(), MutationError> {
        match self {
            Mutation::AddPage { name } => {
                if name.trim().is_empty() {
                    return Err(MutationError::EmptyPageName);
                }
                Ok(())
            }

            Mutation::RemovePage { page_id }
            | Mutation::SelectPage { page_id }
            | Mutation::SetPagePath { page_id, .. }
            | Mutation::RenamePage { page_id, .. } => {
                state
                    .page(page_id)
                    .ok_or_else(|| MutationError::PageNotFound(page_id.clone()))?;
                Ok(())
            }

            Mutation::AddBlock { page_id, .. } => {
                state
                    .page(page_id)
                    .ok_or_else(|| MutationError::PageNotFound(page_id.clone()))?;
                Ok(())
            }

            Mutation::RemoveBlock { block_id }
            | Mutation::MoveBlock { block_id, .. }
            | Mutation::SetBlockField { block_id, .. } => {
                state
                    .block(block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                Ok(())
            }

            Mutation::LinkBlock {
                block_id,
                source_id,
            } => {
                if block_id == source_id {
                    return Err(MutationError::SelfLink);
                }
                state
                    .block(block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                state
                    .block(source_id)
                    .ok_or_else(|| MutationError::BlockNotFound(source_id.clone()))?;
                Ok(())
            }

            Mutation::SelectBlock { block_id } => {
                if let Some(id) = block_id {
                    state
                        .block(id)
                        .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
                }
                Ok(())
            }

            Mutation::RemoveVariable { variable_id } => {
                state
                    .variable(variable_id)
                    .ok_or_else(|| MutationError::VariableNotFound(variable_id.clone()))?;
                Ok(())
            }

            Mutation::UpsertVariable { .. }
            | Mutation::SetProjectSettings { .. }
            | Mutation::SetProjectMetadata { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;

    fn state_with_page(name: &str) -> (EditorState, String) {
        let mut state = EditorState::new(Project::new("proj_1", "Portfolio", "portfolio"));
        state
            .apply(Mutation::AddPage {
                name: name.to_string(),
            })
            .unwrap();
        let id = state.selected_page_id.clone().unwrap();
        (state, id)
    }

    #[test]
    fn test_add_page_derives_path_and_selects() {
        let (state, id) = state_with_page("About");
        let page = state.page(&id).unwrap();
        assert_eq!(page.path, "/about");
        assert_eq!(state.selected_page_id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_remove_selected_page_moves_cursor() {
        let (mut state, home_id) = state_with_page("Home");
        state
            .apply(Mutation::AddPage {
                name: "About".to_string(),
            })
            .unwrap();
        let about_id = state.selected_page_id.clone().unwrap();

        state
            .apply(Mutation::RemovePage {
                page_id: about_id,
            })
            .unwrap();
        assert_eq!(state.selected_page_id.as_deref(), Some(home_id.as_str()));

        state
            .apply(Mutation::RemovePage { page_id: home_id })
            .unwrap();
        assert_eq!(state.selected_page_id, None);
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::SetBlockField {
            block_id: "block_1".to_string(),
            field: "heading".to_string(),
            value: serde_json::json!("Hello"),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();
        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_validation_rejects_unknown_ids() {
        let (state, _) = state_with_page("Home");

        let mutation = Mutation::RemoveBlock {
            block_id: "block_missing".to_string(),
        };
        assert_eq!(
            mutation.validate(&state),
            Err(MutationError::BlockNotFound("block_missing".to_string()))
        );
    }

    #[test]
    fn test_link_block_clears_stale_shortcut() {
        let (mut state, page_id) = state_with_page("Home");
        for _ in 0..2 {
            state
                .apply(Mutation::AddBlock {
                    page_id: page_id.clone(),
                    category: "hero".to_string(),
                    variant: "centered".to_string(),
                })
                .unwrap();
        }
        let source = state.block_instances[0].instance_id.clone();
        let clone = state.block_instances[1].instance_id.clone();
        state.block_mut(&clone).unwrap().ref_id = Some("block_stale".to_string());

        state
            .apply(Mutation::LinkBlock {
                block_id: clone.clone(),
                source_id: source.clone(),
            })
            .unwrap();

        let linked = state.block(&clone).unwrap();
        assert_eq!(linked.instance.as_deref(), Some(source.as_str()));
        assert_eq!(linked.ref_id, None);
    }

    #[test]
    fn test_self_link_rejected() {
        let (mut state, page_id) = state_with_page("Home");
        state
            .apply(Mutation::AddBlock {
                page_id,
                category: "hero".to_string(),
                variant: "centered".to_string(),
            })
            .unwrap();
        let id = state.block_instances[0].instance_id.clone();

        let result = state.apply(Mutation::LinkBlock {
            block_id: id.clone(),
            source_id: id,
        });
        assert_eq!(result, Err(MutationError::SelfLink));
    }

    #[test]
    fn test_remove_block_keeps_dangling_links() {
        let (mut state, page_id) = state_with_page("Home");
        for _ in 0..2 {
            state
                .apply(Mutation::AddBlock {
                    page_id: page_id.clone(),
                    category: "hero".to_string(),
                    variant: "centered".to_string(),
                })
                .unwrap();
        }
        let source = state.block_instances[0].instance_id.clone();
        let clone = state.block_instances[1].instance_id.clone();
        state
            .apply(Mutation::LinkBlock {
                block_id: clone.clone(),
                source_id: source.clone(),
            })
            .unwrap();

        state
            .apply(Mutation::RemoveBlock {
                block_id: source.clone(),
            })
            .unwrap();

        // The clone still points at the removed source
        assert_eq!(
            state.block(&clone).unwrap().instance.as_deref(),
            Some(source.as_str())
        );
    }
}
