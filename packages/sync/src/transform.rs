//! # Load Transform
//!
//! Turns a persisted backend payload into the editor state shape:
//!
//! - backend `_id`s collapse into the frontend id space
//! - instance links pointing at backend ids are re-linked to frontend ids
//! - an empty variable collection seeds the default token bundle, so the
//!   preview palette is never empty
//! - the previously selected page survives a reload when it still exists

use crate::error::LoadError;
use crate::wire::{
    BackendBlockInstance, BackendPage, BackendProject, PreviewPayload, ProjectPayload,
};
use chrono::Utc;
use sitekit_common::{block_id, page_id};
use sitekit_model::{
    default_variable_bundle, derive_page_path, BlockInstance, EditorState, Page, Project,
};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Build editor state from a persisted payload
#[instrument(skip(payload), fields(project = ?payload.project.id))]
pub fn into_editor_state(
    payload: ProjectPayload,
    previous_selection: Option<&str>,
) -> Result<EditorState, LoadError> {
    let mut project = project_from_backend(payload.project)?;
    if let Some(settings) = payload.settings {
        project.settings = settings;
    }

    let (pages, backend_page_ids) = pages_from_backend(payload.pages);
    let blocks = blocks_from_backend(payload.block_instances, &backend_page_ids);

    let (variable_sets, variables) = if payload.variables.is_empty() {
        debug!("payload carries no variables, seeding default bundle");
        default_variable_bundle()
    } else {
        (payload.variable_sets, payload.variables)
    };

    let selected_page_id = previous_selection
        .filter(|id| pages.iter().any(|p| p.id == *id))
        .map(String::from)
        .or_else(|| pages.first().map(|p| p.id.clone()));

    Ok(EditorState {
        project,
        pages,
        variables,
        variable_sets,
        block_instances: blocks,
        selected_page_id,
        selected_block_id: None,
        version: 0,
    })
}

/// Build a read-only state from the public preview payload. The payload
/// carries no project resource of its own, so one is synthesized from the
/// subdomain plus whatever metadata and settings came along.
pub fn preview_into_state(
    payload: PreviewPayload,
    subdomain: &str,
) -> Result<EditorState, LoadError> {
    let project = BackendProject {
        db_id: None,
        id: Some(format!("preview_{}", subdomain)),
        name: payload.name.unwrap_or_else(|| subdomain.to_string()),
        description: String::new(),
        subdomain: subdomain.to_string(),
        user_id: String::new(),
        tier: Default::default(),
        settings: payload.settings.clone().unwrap_or_default(),
        metadata: payload.metadata.unwrap_or_default(),
        verification_token: None,
    };

    into_editor_state(
        ProjectPayload {
            project,
            pages: payload.pages,
            block_instances: payload.blocks,
            variables: payload.variables,
            variable_sets: payload.variable_sets,
            settings: payload.settings,
        },
        None,
    )
}

fn project_from_backend(backend: BackendProject) -> Result<Project, LoadError> {
    let id = backend
        .id
        .or(backend.db_id)
        .ok_or_else(|| LoadError::MalformedPayload("project has no id".to_string()))?;

    Ok(Project {
        id,
        name: backend.name,
        description: backend.description,
        subdomain: backend.subdomain,
        user_id: backend.user_id,
        tier: backend.tier,
        settings: backend.settings,
        metadata: backend.metadata,
        verification_token: backend.verification_token,
    })
}

/// Pages plus the backend-id → frontend-id mapping used to re-link blocks
fn pages_from_backend(
    backend_pages: Vec<BackendPage>,
) -> (Vec<Page>, HashMap<String, String>) {
    let mut pages = Vec::with_capacity(backend_pages.len());
    let mut mapping = HashMap::new();

    for backend in backend_pages {
        let id = match (&backend.page_id, &backend.db_id) {
            (Some(page_id), _) => page_id.clone(),
            (None, Some(db_id)) => db_id.clone(),
            (None, None) => {
                warn!(name = %backend.name, "page has no id, generating one");
                page_id()
            }
        };

        if let Some(db_id) = &backend.db_id {
            mapping.insert(db_id.clone(), id.clone());
        }

        let now = Utc::now();
        pages.push(Page {
            id,
            path: backend
                .path
                .unwrap_or_else(|| derive_page_path(&backend.name)),
            name: backend.name,
            is_static: backend.is_static,
            created_at: backend.created_at.unwrap_or(now),
            updated_at: backend.updated_at.unwrap_or(now),
        });
    }

    (pages, mapping)
}

fn blocks_from_backend(
    backend_blocks: Vec<BackendBlockInstance>,
    backend_page_ids: &HashMap<String, String>,
) -> Vec<BlockInstance> {
    // First pass: assign frontend ids and record the backend-id mapping
    let mut backend_block_ids: HashMap<String, String> = HashMap::new();
    let mut blocks: Vec<BlockInstance> = backend_blocks
        .into_iter()
        .map(|backend| {
            let instance_id = backend
                .instance_id
                .clone()
                .or(backend.db_id.clone())
                .unwrap_or_else(block_id);

            if let Some(db_id) = backend.db_id {
                backend_block_ids.insert(db_id, instance_id.clone());
            }

            let page_id = backend_page_ids
                .get(&backend.page_id)
                .cloned()
                .unwrap_or(backend.page_id);

            BlockInstance {
                instance_id,
                page_id,
                index: backend.index,
                category: backend.category,
                variant: backend.variant,
                values: backend.values,
                instance: backend.instance,
                ref_id: backend.ref_id,
            }
        })
        .collect();

    // Second pass: links that pointed at backend ids move into the
    // frontend instance-id space
    for block in &mut blocks {
        if let Some(target) = &block.instance {
            if let Some(mapped) = backend_block_ids.get(target) {
                block.instance = Some(mapped.clone());
            }
        }
        if let Some(target) = &block.ref_id {
            if let Some(mapped) = backend_block_ids.get(target) {
                block.ref_id = Some(mapped.clone());
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> ProjectPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_missing_project_id_is_fatal() {
        let payload = payload(r#"{ "project": { "name": "X", "subdomain": "x" } }"#);
        assert!(matches!(
            into_editor_state(payload, None),
            Err(LoadError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_page_ids_prefer_frontend_space() {
        let payload = payload(
            r#"{
                "project": { "_id": "p1", "name": "X", "subdomain": "x" },
                "pages": [
                    { "_id": "1", "page_id": "home", "name": "Home" },
                    { "_id": "2", "name": "About" }
                ]
            }"#,
        );

        let state = into_editor_state(payload, None).unwrap();
        assert_eq!(state.pages[0].id, "home");
        assert_eq!(state.pages[1].id, "2");
        assert_eq!(state.pages[1].path, "/about");
    }

    #[test]
    fn test_block_links_remap_to_frontend_ids() {
        let payload = payload(
            r#"{
                "project": { "_id": "p1", "name": "X", "subdomain": "x" },
                "pages": [ { "_id": "db_home", "page_id": "home", "name": "Home" } ],
                "blockInstances": [
                    { "_id": "db_a", "instance_id": "a", "page_id": "db_home",
                      "index": 0, "category": "hero", "variant": "centered" },
                    { "_id": "db_b", "page_id": "home", "index": 1,
                      "category": "hero", "variant": "centered", "instance": "db_a" }
                ]
            }"#,
        );

        let state = into_editor_state(payload, None).unwrap();
        // The first block's page_id pointed at the backend page id
        assert_eq!(state.block_instances[0].page_id, "home");
        // The second block's link pointed at the first block's backend id
        assert_eq!(state.block_instances[1].instance.as_deref(), Some("a"));
        assert_eq!(state.block_instances[1].instance_id, "db_b");
    }

    #[test]
    fn test_empty_variables_seed_defaults() {
        let payload = payload(r#"{ "project": { "_id": "p1", "name": "X", "subdomain": "x" } }"#);

        let state = into_editor_state(payload, None).unwrap();
        assert!(!state.variables.is_empty());
        assert!(state.variable_sets.iter().any(|s| s.key == "set_colors"));
    }

    #[test]
    fn test_selection_survives_reload() {
        let json = r#"{
            "project": { "_id": "p1", "name": "X", "subdomain": "x" },
            "pages": [
                { "page_id": "home", "name": "Home" },
                { "page_id": "about", "name": "About" }
            ]
        }"#;

        let state = into_editor_state(payload(json), Some("about")).unwrap();
        assert_eq!(state.selected_page_id.as_deref(), Some("about"));

        let state = into_editor_state(payload(json), Some("gone")).unwrap();
        assert_eq!(state.selected_page_id.as_deref(), Some("home"));

        let state = into_editor_state(payload(json), None).unwrap();
        assert_eq!(state.selected_page_id.as_deref(), Some("home"));
    }
}
