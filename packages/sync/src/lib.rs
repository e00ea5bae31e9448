pub mod client;
pub mod engine;
pub mod error;
pub mod fonts;
pub mod snapshot;
pub mod transform;
pub mod transport;
pub mod wire;

pub use client::HttpApiClient;
pub use engine::{prepare_for_push, StageFailure, SyncEngine, SyncPhase, SyncReport, SyncStage};
pub use error::{LoadError, SnapshotError, SyncError, TransportError};
pub use fonts::{FontCatalog, FontEntry, FontPage};
pub use snapshot::{SnapshotStore, SnapshotWriter};
pub use transform::{into_editor_state, preview_into_state};
pub use transport::ApiTransport;
pub use wire::{PreviewPayload, ProjectPayload};
