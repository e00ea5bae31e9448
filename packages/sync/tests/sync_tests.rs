//! Integration tests for the sync protocol, driven through an in-memory
//! transport.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use sitekit_model::{BlockInstance, EditorState, Page, Project, Variable, VariableSet};
use sitekit_sync::wire::{blocks_sync_body, pages_sync_body};
use sitekit_sync::{
    ApiTransport, ProjectPayload, SyncEngine, SyncError, SyncPhase, SyncStage, TransportError,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory transport: serves a canned payload, records pushes, and can
/// be told to fail at one stage.
#[derive(Default)]
struct MockTransport {
    payload: Option<String>,
    fail_at: Option<SyncStage>,
    delay: Option<Duration>,
    pushes: Mutex<Vec<SyncStage>>,
    pushed_blocks: Arc<Mutex<Vec<BlockInstance>>>,
    calls: AtomicU32,
}

impl MockTransport {
    fn with_payload(json: &str) -> Self {
        Self {
            payload: Some(json.to_string()),
            ..Default::default()
        }
    }

    fn failing_at(stage: SyncStage) -> Self {
        Self {
            fail_at: Some(stage),
            ..Default::default()
        }
    }

    async fn stage(&self, stage: SyncStage) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_at == Some(stage) {
            return Err(TransportError::Backend {
                status: 500,
                message: format!("{} push rejected", stage),
            });
        }
        self.pushes.lock().unwrap().push(stage);
        Ok(())
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn fetch_project(&self, _project_id: &str) -> Result<ProjectPayload, TransportError> {
        let json = self.payload.as_ref().ok_or(TransportError::Backend {
            status: 404,
            message: "project not found".to_string(),
        })?;
        Ok(serde_json::from_str(json)?)
    }

    async fn push_project(
        &self,
        _project_id: &str,
        _project: &Project,
    ) -> Result<(), TransportError> {
        self.stage(SyncStage::Project).await
    }

    async fn push_pages(&self, _project_id: &str, _pages: &[Page]) -> Result<(), TransportError> {
        self.stage(SyncStage::Pages).await
    }

    async fn push_variables(
        &self,
        _project_id: &str,
        _variables: &[Variable],
        _sets: &[VariableSet],
    ) -> Result<(), TransportError> {
        self.stage(SyncStage::Variables).await
    }

    async fn push_blocks(
        &self,
        _project_id: &str,
        blocks: &[BlockInstance],
    ) -> Result<(), TransportError> {
        self.pushed_blocks.lock().unwrap().extend_from_slice(blocks);
        self.stage(SyncStage::Blocks).await
    }
}

fn basic_payload() -> &'static str {
    r#"{
        "project": { "_id": "p1", "name": "Portfolio", "subdomain": "portfolio" },
        "pages": [ { "_id": "1", "page_id": "home", "name": "Home" } ],
        "blockInstances": [
            { "instance_id": "b1", "page_id": "home", "index": 0,
              "category": "hero", "variant": "centered",
              "values": { "heading": { "value": "Hi" } } }
        ]
    }"#
}

#[tokio::test]
async fn test_load_reaches_ready() {
    let engine = SyncEngine::new(MockTransport::with_payload(basic_payload()), "p1");
    assert_eq!(engine.phase(), SyncPhase::Idle);

    let state = engine.load(None).await.unwrap();
    assert_eq!(engine.phase(), SyncPhase::Ready);
    assert_eq!(state.pages.len(), 1);
    assert_eq!(state.selected_page_id.as_deref(), Some("home"));
}

#[tokio::test]
async fn test_load_failure_reaches_error_phase() {
    let engine = SyncEngine::new(MockTransport::default(), "p1");
    assert!(engine.load(None).await.is_err());
    assert_eq!(engine.phase(), SyncPhase::Error);
}

#[tokio::test]
async fn test_load_seeds_default_variables_and_preview_gate() {
    let engine = SyncEngine::new(MockTransport::with_payload(basic_payload()), "p1");
    let state = engine.load(None).await.unwrap();

    // No variables in the payload: the default bundle takes their place
    assert!(!state.variables.is_empty());
    let palette = state
        .variable_sets
        .iter()
        .find(|s| s.key == "set_colors")
        .expect("active palette set seeded");
    let active_colors = state
        .variables
        .iter()
        .filter(|v| v.set_id() == Some(palette.id.as_str()))
        .count();
    assert!(active_colors > 0);
}

#[tokio::test]
async fn test_round_trip_preserves_ids() {
    let engine = SyncEngine::new(MockTransport::with_payload(basic_payload()), "p1");
    let state = engine.load(None).await.unwrap();

    assert_eq!(state.pages[0].id, "home");
    assert_eq!(state.block_instances[0].instance_id, "b1");
    assert_eq!(state.block_instances[0].page_id, "home");

    // Serialize the way the sync push does
    let pages_body = pages_sync_body(&state.pages);
    assert_eq!(pages_body["pages"][0]["page_id"], "home");

    let blocks_body = blocks_sync_body(&state.block_instances);
    assert_eq!(blocks_body["blockInstances"][0]["instance_id"], "b1");
    assert_eq!(blocks_body["blockInstances"][0]["page_id"], "home");
    assert_eq!(
        blocks_body["blockInstances"][0]["values"]["heading"]["value"],
        "Hi"
    );
}

#[tokio::test]
async fn test_full_sync_pushes_all_stages_in_order() {
    let transport = MockTransport::default();
    let state = EditorState::new(Project::new("p1", "Portfolio", "portfolio"));

    let engine = SyncEngine::new(transport, "p1");
    let report = engine.sync_to_cloud(&state).await.unwrap();

    assert!(report.is_success());
    assert_eq!(
        report.pushed,
        vec![
            SyncStage::Project,
            SyncStage::Pages,
            SyncStage::Variables,
            SyncStage::Blocks
        ]
    );
    assert_eq!(engine.phase(), SyncPhase::Ready);
}

#[tokio::test]
async fn test_variables_failure_aborts_remaining_stages() {
    let transport = MockTransport::failing_at(SyncStage::Variables);
    let state = EditorState::new(Project::new("p1", "Portfolio", "portfolio"));

    let engine = SyncEngine::new(transport, "p1");
    let report = engine.sync_to_cloud(&state).await.unwrap();

    // Project and pages made it upstream and stay reported as pushed
    assert_eq!(report.pushed, vec![SyncStage::Project, SyncStage::Pages]);

    let failure = report.failure.unwrap();
    assert_eq!(failure.stage, SyncStage::Variables);
    assert!(failure.message.contains("variables"));
    assert_eq!(engine.phase(), SyncPhase::Error);
}

#[tokio::test]
async fn test_only_one_sync_in_flight() {
    let transport = MockTransport {
        delay: Some(Duration::from_millis(100)),
        ..Default::default()
    };
    let engine = Arc::new(SyncEngine::new(transport, "p1"));
    let state = EditorState::new(Project::new("p1", "Portfolio", "portfolio"));

    let first = {
        let engine = Arc::clone(&engine);
        let state = state.clone();
        tokio::spawn(async move { engine.sync_to_cloud(&state).await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = engine.sync_to_cloud(&state).await;
    assert_eq!(second.unwrap_err(), SyncError::SyncInFlight);

    let report = first.await.unwrap().unwrap();
    assert!(report.is_success());

    // After the first completes, syncing is allowed again
    assert!(engine.sync_to_cloud(&state).await.is_ok());
}

#[tokio::test]
async fn test_pushed_blocks_carry_link_intent() {
    let transport = MockTransport::default();
    let received = Arc::clone(&transport.pushed_blocks);
    let mut state = EditorState::new(Project::new("p1", "Portfolio", "portfolio"));

    let mut linked = BlockInstance::new("page_home", "hero", "centered", 0);
    linked.instance = Some("block_source".to_string());
    state.block_instances.push(linked);

    let engine = SyncEngine::new(transport, "p1");
    engine.sync_to_cloud(&state).await.unwrap();

    // The engine defaults `ref` from `instance` before pushing
    let pushed = received.lock().unwrap();
    assert_eq!(pushed[0].ref_id.as_deref(), Some("block_source"));
    assert_eq!(pushed[0].instance.as_deref(), Some("block_source"));
}
