//! # Sync Engine
//!
//! State machine reconciling the in-memory editor state with the persisted
//! backend representation. The engine owns no I/O of its own; everything
//! goes through an [`ApiTransport`].
//!
//! ## Phases
//!
//! ```text
//! Idle → Loading → Ready            (initial load)
//! Ready → Syncing → Ready | Error   (explicit sync to cloud)
//! ```
//!
//! ## Sync to cloud
//!
//! One coordinated multi-resource push: project, then pages, then
//! variables, then block instances, each as a separate sequential call.
//! The first failing stage aborts the remainder; the report names the
//! stages that were pushed and the stage that failed, so partial success
//! is communicated rather than swallowed. Only one sync may be in flight
//! per project at a time: re-entry is rejected, and load is not guarded
//! against a concurrent save.

use crate::error::{LoadError, SyncError};
use crate::transform::into_editor_state;
use crate::transport::ApiTransport;
use serde::{Deserialize, Serialize};
use sitekit_common::block_id;
use sitekit_model::{BlockInstance, EditorState};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPhase {
    Idle,
    Loading,
    Ready,
    Syncing,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStage {
    Project,
    Pages,
    Variables,
    Blocks,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStage::Project => "project",
            SyncStage::Pages => "pages",
            SyncStage::Variables => "variables",
            SyncStage::Blocks => "block instances",
        };
        f.write_str(name)
    }
}

/// The stage a sync aborted at, with the backend's own message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    pub stage: SyncStage,
    pub message: String,
}

/// Outcome of one sync-to-cloud call: which stages made it upstream, and
/// the failure that aborted the rest, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub pushed: Vec<SyncStage>,
    pub failure: Option<StageFailure>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct SyncEngine<T> {
    transport: T,
    project_id: String,
    phase: Mutex<SyncPhase>,
    is_syncing: AtomicBool,
}

impl<T: ApiTransport> SyncEngine<T> {
    pub fn new(transport: T, project_id: impl Into<String>) -> Self {
        Self {
            transport,
            project_id: project_id.into(),
            phase: Mutex::new(SyncPhase::Idle),
            is_syncing: AtomicBool::new(false),
        }
    }

    pub fn phase(&self) -> SyncPhase {
        *self.phase.lock().unwrap()
    }

    fn set_phase(&self, phase: SyncPhase) {
        *self.phase.lock().unwrap() = phase;
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Initial load: fetch, transform, seed defaults where the payload is
    /// missing variables. `previous_selection` survives when the page
    /// still exists. The loaded state is returned, not installed anywhere;
    /// a caller that goes away mid-fetch just drops the future and no
    /// state is written after teardown.
    #[instrument(skip(self))]
    pub async fn load(
        &self,
        previous_selection: Option<&str>,
    ) -> Result<EditorState, LoadError> {
        self.set_phase(SyncPhase::Loading);

        let payload = match self.transport.fetch_project(&self.project_id).await {
            Ok(payload) => payload,
            Err(err) => {
                self.set_phase(SyncPhase::Error);
                return Err(err.into());
            }
        };

        match into_editor_state(payload, previous_selection) {
            Ok(state) => {
                info!(
                    pages = state.pages.len(),
                    blocks = state.block_instances.len(),
                    "project loaded"
                );
                self.set_phase(SyncPhase::Ready);
                Ok(state)
            }
            Err(err) => {
                self.set_phase(SyncPhase::Error);
                Err(err)
            }
        }
    }

    /// Explicit multi-resource push. Returns [`SyncError::SyncInFlight`]
    /// when a sync is already running; per-stage failures travel in the
    /// returned report, not as an `Err`.
    #[instrument(skip(self, state))]
    pub async fn sync_to_cloud(
        &self,
        state: &EditorState,
    ) -> Result<SyncReport, SyncError> {
        if self.is_syncing.swap(true, Ordering::SeqCst) {
            return Err(SyncError::SyncInFlight);
        }

        self.set_phase(SyncPhase::Syncing);
        let report = self.push_all(state).await;

        self.set_phase(if report.is_success() {
            SyncPhase::Ready
        } else {
            SyncPhase::Error
        });
        self.is_syncing.store(false, Ordering::SeqCst);

        Ok(report)
    }

    async fn push_all(&self, state: &EditorState) -> SyncReport {
        let mut pushed = Vec::new();

        if let Err(err) = self
            .transport
            .push_project(&self.project_id, &state.project)
            .await
        {
            return Self::aborted(pushed, SyncStage::Project, err.to_string());
        }
        pushed.push(SyncStage::Project);

        if let Err(err) = self
            .transport
            .push_pages(&self.project_id, &state.pages)
            .await
        {
            return Self::aborted(pushed, SyncStage::Pages, err.to_string());
        }
        pushed.push(SyncStage::Pages);

        if let Err(err) = self
            .transport
            .push_variables(&self.project_id, &state.variables, &state.variable_sets)
            .await
        {
            return Self::aborted(pushed, SyncStage::Variables, err.to_string());
        }
        pushed.push(SyncStage::Variables);

        let blocks = prepare_for_push(&state.block_instances);
        if let Err(err) = self.transport.push_blocks(&self.project_id, &blocks).await {
            return Self::aborted(pushed, SyncStage::Blocks, err.to_string());
        }
        pushed.push(SyncStage::Blocks);

        info!(stages = pushed.len(), "sync to cloud complete");
        SyncReport {
            pushed,
            failure: None,
        }
    }

    fn aborted(pushed: Vec<SyncStage>, stage: SyncStage, message: String) -> SyncReport {
        warn!(%stage, error = %message, "sync aborted");
        SyncReport {
            pushed,
            failure: Some(StageFailure { stage, message }),
        }
    }
}

/// Prepare block instances for the push: every instance carries an id, and
/// `ref` defaults to `instance` so link intent survives the round-trip.
pub fn prepare_for_push(blocks: &[BlockInstance]) -> Vec<BlockInstance> {
    blocks
        .iter()
        .map(|block| {
            let mut block = block.clone();
            if block.instance_id.is_empty() {
                block.instance_id = block_id();
            }
            if block.ref_id.is_none() {
                block.ref_id = block.instance.clone();
            }
            block
        })
        .collect()
}
