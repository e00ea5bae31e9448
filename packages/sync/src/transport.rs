//! Transport layer abstraction.
//!
//! The sync engine is a state machine over an [`ApiTransport`]; all I/O
//! lives behind this trait so the engine can be driven by the HTTP client
//! in production and an in-memory transport in tests.

use crate::error::TransportError;
use crate::wire::ProjectPayload;
use async_trait::async_trait;
use sitekit_model::{BlockInstance, Page, Project, Variable, VariableSet};

#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Fetch the persisted project representation
    async fn fetch_project(&self, project_id: &str) -> Result<ProjectPayload, TransportError>;

    /// Push project metadata and settings
    async fn push_project(
        &self,
        project_id: &str,
        project: &Project,
    ) -> Result<(), TransportError>;

    /// Push the page collection
    async fn push_pages(&self, project_id: &str, pages: &[Page]) -> Result<(), TransportError>;

    /// Push variables together with their sets
    async fn push_variables(
        &self,
        project_id: &str,
        variables: &[Variable],
        sets: &[VariableSet],
    ) -> Result<(), TransportError>;

    /// Push the block instance collection
    async fn push_blocks(
        &self,
        project_id: &str,
        blocks: &[BlockInstance],
    ) -> Result<(), TransportError>;
}
