//! Backend wire shapes.
//!
//! The persisted representation uses camelCase payload keys and Mongo-style
//! `_id` fields on nested resources; pages additionally carry a `page_id`
//! in the frontend id space once one has been assigned. These types absorb
//! both so the transform layer can normalize without guessing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitekit_model::{
    BlockInstance, Page, ProjectMetadata, ProjectSettings, ProjectTier, Variable, VariableSet,
};

/// `GET /projects/{id}` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub project: BackendProject,

    #[serde(default)]
    pub pages: Vec<BackendPage>,

    #[serde(default)]
    pub block_instances: Vec<BackendBlockInstance>,

    #[serde(default)]
    pub variables: Vec<Variable>,

    #[serde(default)]
    pub variable_sets: Vec<VariableSet>,

    /// Some deployments keep settings beside the project rather than on it
    #[serde(default)]
    pub settings: Option<ProjectSettings>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendProject {
    #[serde(default, rename = "_id")]
    pub db_id: Option<String>,

    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub subdomain: String,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub tier: ProjectTier,

    #[serde(default)]
    pub settings: ProjectSettings,

    #[serde(default)]
    pub metadata: ProjectMetadata,

    #[serde(default)]
    pub verification_token: Option<String>,
}

/// Pages keep their frontend ids under `page_id`; `_id` is the database id
#[derive(Debug, Clone, Deserialize)]
pub struct BackendPage {
    #[serde(default, rename = "_id")]
    pub db_id: Option<String>,

    #[serde(default)]
    pub page_id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub is_static: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendBlockInstance {
    #[serde(default, rename = "_id")]
    pub db_id: Option<String>,

    #[serde(default)]
    pub instance_id: Option<String>,

    pub page_id: String,

    #[serde(default)]
    pub index: i64,

    pub category: String,
    pub variant: String,

    #[serde(default)]
    pub values: sitekit_model::ValueMap,

    #[serde(default)]
    pub instance: Option<String>,

    #[serde(default, rename = "ref")]
    pub ref_id: Option<String>,
}

/// `GET /preview/projects/subdomain/{subdomain}` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPayload {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub pages: Vec<BackendPage>,

    #[serde(default)]
    pub blocks: Vec<BackendBlockInstance>,

    #[serde(default)]
    pub metadata: Option<ProjectMetadata>,

    #[serde(default)]
    pub settings: Option<ProjectSettings>,

    #[serde(default)]
    pub variables: Vec<Variable>,

    #[serde(default)]
    pub variable_sets: Vec<VariableSet>,
}

/// One page as serialized into the pages sync body; the frontend id is
/// pushed under `page_id`, which is how it round-trips unchanged.
#[derive(Debug, Serialize)]
pub struct PagePush<'a> {
    pub page_id: &'a str,
    pub name: &'a str,
    pub path: &'a str,
    pub is_static: bool,
}

impl<'a> From<&'a Page> for PagePush<'a> {
    fn from(page: &'a Page) -> Self {
        Self {
            page_id: &page.id,
            name: &page.name,
            path: &page.path,
            is_static: page.is_static,
        }
    }
}

/// `POST /pages/projects/{id}/sync` body
pub fn pages_sync_body(pages: &[Page]) -> serde_json::Value {
    let pushes: Vec<PagePush> = pages.iter().map(PagePush::from).collect();
    serde_json::json!({ "pages": pushes })
}

/// `POST /variables/projects/{id}/sync` body
pub fn variables_sync_body(
    variables: &[Variable],
    sets: &[VariableSet],
) -> serde_json::Value {
    serde_json::json!({ "variables": variables, "variableSets": sets })
}

/// `POST /block-instances/projects/{id}/sync` body
pub fn blocks_sync_body(blocks: &[BlockInstance]) -> serde_json::Value {
    serde_json::json!({ "blockInstances": blocks })
}
