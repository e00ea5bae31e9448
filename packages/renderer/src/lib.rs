pub mod cache;
pub mod server;

pub use cache::PayloadCache;
pub use server::{router, serve, AppState, RendererConfig, RendererError};
