//! # Public Renderer
//!
//! Serves published sites by subdomain. Stateless per request: the
//! subdomain comes from the `Host` header and the page path from the URI;
//! the preview payload is fetched through a short-lived cache, rebuilt
//! into a read-only model view and evaluated with the same engine as the
//! editor preview, so linked blocks resolve on published pages too. Fetch
//! or decode failures render a styled error page instead of propagating
//! to the transport layer.

use crate::cache::{PayloadCache, DEFAULT_TTL};
use axum::extract::{Host, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use sitekit_engine::{compile_page, BlockRegistry, CompileOptions, EvalInput, PageEvaluator};
use sitekit_sync::{preview_into_state, HttpApiClient, TransportError};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

#[derive(Error, Debug)]
pub enum RendererError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Backend base URL the preview endpoint lives under
    pub backend_url: String,

    /// Address to bind, e.g. `0.0.0.0:4000`
    pub bind: SocketAddr,

    /// Payload cache TTL
    pub cache_ttl: Duration,
}

impl RendererConfig {
    pub fn new(backend_url: impl Into<String>, bind: SocketAddr) -> Self {
        Self {
            backend_url: backend_url.into(),
            bind,
            cache_ttl: DEFAULT_TTL,
        }
    }
}

pub struct AppState {
    client: HttpApiClient,
    cache: PayloadCache,
    registry: BlockRegistry,
}

impl AppState {
    pub fn new(config: &RendererConfig) -> Result<Self, RendererError> {
        Ok(Self {
            client: HttpApiClient::new(&config.backend_url)?,
            cache: PayloadCache::new(config.cache_ttl),
            registry: BlockRegistry::builtin(),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .fallback(render_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the renderer until the process is stopped
pub async fn serve(config: RendererConfig) -> Result<(), RendererError> {
    let state = Arc::new(AppState::new(&config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "public renderer listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// First label of the host, with any port stripped: the subdomain the
/// project publishes under.
fn subdomain_of(host: &str) -> &str {
    let host = host.split(':').next().unwrap_or(host);
    host.split('.').next().unwrap_or(host)
}

#[instrument(skip(state))]
async fn render_page(
    State(state): State<Arc<AppState>>,
    Host(host): Host,
    uri: Uri,
) -> Response {
    let subdomain = subdomain_of(&host).to_string();
    let path = if uri.path().is_empty() {
        "/".to_string()
    } else {
        uri.path().to_string()
    };

    let key = PayloadCache::key(&subdomain, &path);
    let payload = match state.cache.get(&key).await {
        Some(payload) => payload,
        None => match state.client.fetch_preview(&subdomain, &path).await {
            Ok(payload) => {
                state.cache.insert(key, payload.clone()).await;
                payload
            }
            Err(err) => {
                warn!(%subdomain, %err, "preview fetch failed");
                return error_response(
                    StatusCode::NOT_FOUND,
                    "Site not found",
                    "This site does not exist or is not published yet.",
                );
            }
        },
    };

    let site = match preview_into_state(payload, &subdomain) {
        Ok(site) => site,
        Err(err) => {
            warn!(%subdomain, %err, "preview payload malformed");
            return error_response(
                StatusCode::BAD_GATEWAY,
                "Something went wrong",
                "The site data could not be read. Try again in a moment.",
            );
        }
    };

    let Some(page) = site
        .page_by_path(&path)
        .or_else(|| if path == "/" { site.pages.first() } else { None })
    else {
        return error_response(
            StatusCode::NOT_FOUND,
            "Page not found",
            "There is no page at this address.",
        );
    };

    let evaluator = PageEvaluator::new(&state.registry);
    let rendered = evaluator.evaluate(&EvalInput::from(&site), &page.id);
    let html = compile_page(&site.project, page, &rendered, CompileOptions::default());

    (
        StatusCode::OK,
        [(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache.ttl().as_secs()),
        )],
        Html(html),
    )
        .into_response()
}

fn error_response(status: StatusCode, title: &str, message: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
  </head>
  <body style="font-family: sans-serif; display: grid; place-items: center; min-height: 100vh">
    <div style="text-align: center">
      <h1>{title}</h1>
      <p>{message}</p>
    </div>
  </body>
</html>
"#
    );
    (status, Html(html)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdomain_extraction() {
        assert_eq!(subdomain_of("portfolio.sitekit.app"), "portfolio");
        assert_eq!(subdomain_of("portfolio.sitekit.app:4000"), "portfolio");
        assert_eq!(subdomain_of("localhost"), "localhost");
    }

    #[test]
    fn test_error_page_contains_message() {
        let response = error_response(
            StatusCode::NOT_FOUND,
            "Page not found",
            "There is no page at this address.",
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
