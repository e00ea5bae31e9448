//! Local editor snapshots.
//!
//! A JSON snapshot of the full editor state, keyed by project id, kept
//! independent of backend sync as an offline/optimistic fallback. Writes
//! go through a debounced writer: bursts of edits coalesce into a single
//! write once the state has been quiet for about a second.

use crate::error::SnapshotError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitekit_model::EditorState;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Quiet period before a pending snapshot is flushed
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug, Serialize)]
struct SnapshotWrite<'a> {
    saved_at: DateTime<Utc>,
    state: &'a EditorState,
}

#[derive(Debug, Deserialize)]
struct SnapshotRead {
    #[allow(dead_code)]
    saved_at: DateTime<Utc>,
    state: EditorState,
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, project_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", project_id))
    }

    pub fn save(&self, state: &EditorState) -> Result<(), SnapshotError> {
        std::fs::create_dir_all(&self.dir)?;
        let snapshot = SnapshotWrite {
            saved_at: Utc::now(),
            state,
        };
        let json = serde_json::to_string(&snapshot)?;
        std::fs::write(self.path(&state.project.id), json)?;
        debug!(project_id = %state.project.id, "snapshot written");
        Ok(())
    }

    pub fn load(&self, project_id: &str) -> Result<Option<EditorState>, SnapshotError> {
        let path = self.path(project_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)?;
        let snapshot: SnapshotRead = serde_json::from_str(&json)?;
        Ok(Some(snapshot.state))
    }
}

/// Handle to the debounced snapshot task
#[derive(Clone)]
pub struct SnapshotWriter {
    tx: mpsc::Sender<EditorState>,
}

impl SnapshotWriter {
    /// Spawn the writer task. Each submitted state supersedes the one
    /// before it; a write happens only after `quiet` elapses with no new
    /// submissions (and on shutdown for the last pending state).
    pub fn spawn(store: SnapshotStore, quiet: Duration) -> Self {
        let (tx, mut rx) = mpsc::channel::<EditorState>(64);

        tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    match timeout(quiet, rx.recv()).await {
                        // Newer state within the quiet period: coalesce
                        Ok(Some(next)) => latest = next,
                        // Channel closed: flush and stop
                        Ok(None) => {
                            if let Err(err) = store.save(&latest) {
                                warn!(%err, "snapshot write failed");
                            }
                            return;
                        }
                        // Quiet period elapsed: flush
                        Err(_) => break,
                    }
                }
                if let Err(err) = store.save(&latest) {
                    warn!(%err, "snapshot write failed");
                }
            }
        });

        Self { tx }
    }

    /// Queue a state for persistence
    pub async fn submit(&self, state: EditorState) {
        if self.tx.send(state).await.is_err() {
            warn!("snapshot writer is gone, dropping state");
        }
    }
}
