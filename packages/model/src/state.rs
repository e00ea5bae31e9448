//! # Editor State Store
//!
//! In-memory authoritative state for one open project: pages, block
//! instances, variables and the selection cursors. All mutation flows
//! through [`EditorState::apply`]; the store is owned by a single caller
//! and mutated from one thread, so edits within a tick are last-write-wins.

use crate::block::BlockInstance;
use crate::mutations::{Mutation, MutationError};
use crate::page::Page;
use crate::project::Project;
use crate::variable::{Variable, VariableSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub project: Project,
    pub pages: Vec<Page>,
    pub variables: Vec<Variable>,
    pub variable_sets: Vec<VariableSet>,
    pub block_instances: Vec<BlockInstance>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_page_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_block_id: Option<String>,

    /// Increments on each applied mutation
    #[serde(default)]
    pub version: u64,
}

impl EditorState {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            pages: Vec::new(),
            variables: Vec::new(),
            variable_sets: Vec::new(),
            block_instances: Vec::new(),
            selected_page_id: None,
            selected_block_id: None,
            version: 0,
        }
    }

    /// Apply a mutation with validation. The version increments on every
    /// attempt, accepted or not, so optimistic callers can detect churn.
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), MutationError> {
        self.version += 1;
        mutation.apply(self)
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_mut(&mut self, id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    /// Page matching a route path (`/about`)
    pub fn page_by_path(&self, path: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.path == path)
    }

    pub fn selected_page(&self) -> Option<&Page> {
        self.selected_page_id
            .as_deref()
            .and_then(|id| self.page(id))
    }

    pub fn block(&self, id: &str) -> Option<&BlockInstance> {
        self.block_instances
            .iter()
            .find(|b| b.instance_id == id)
    }

    pub fn block_mut(&mut self, id: &str) -> Option<&mut BlockInstance> {
        self.block_instances
            .iter_mut()
            .find(|b| b.instance_id == id)
    }

    /// Flat id → instance lookup for link resolution
    pub fn block_arena(&self) -> HashMap<&str, &BlockInstance> {
        self.block_instances
            .iter()
            .map(|b| (b.instance_id.as_str(), b))
            .collect()
    }

    /// Next free render index on a page
    pub fn next_block_index(&self, page_id: &str) -> i64 {
        self.block_instances
            .iter()
            .filter(|b| b.page_id == page_id)
            .map(|b| b.index)
            .max()
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    pub fn variable(&self, id: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.id == id)
    }
}
