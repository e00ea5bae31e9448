pub mod export;
pub mod serve;
pub mod sync;

pub use export::ExportArgs;
pub use serve::ServeArgs;
pub use sync::SyncArgs;
