//! HTTP implementation of the API transport.
//!
//! Cookie-authenticated JSON-over-HTTP against the sitekit backend. Every
//! endpoint returns 2xx on success and a JSON `message` body on failure;
//! non-2xx responses surface as [`TransportError::Backend`] with that
//! message so sync failures stay attributable to a concrete stage.

use crate::error::TransportError;
use crate::transport::ApiTransport;
use crate::wire::{
    blocks_sync_body, pages_sync_body, variables_sync_body, PreviewPayload, ProjectPayload,
};
use async_trait::async_trait;
use serde::Deserialize;
use sitekit_model::{BlockInstance, Page, Project, Variable, VariableSet};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct BackendMessage {
    message: String,
}

pub struct HttpApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<BackendMessage>()
            .await
            .map(|m| m.message)
            .unwrap_or_else(|_| status.to_string());

        Err(TransportError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<(), TransportError> {
        debug!(path, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Fetch the public preview payload for a subdomain + path
    pub async fn fetch_preview(
        &self,
        subdomain: &str,
        path: &str,
    ) -> Result<PreviewPayload, TransportError> {
        let url = self.url(&format!(
            "/preview/projects/subdomain/{}",
            subdomain
        ));
        let response = self
            .http
            .get(url)
            .query(&[("path", path)])
            .send()
            .await?;
        let payload = Self::check(response).await?.json().await?;
        Ok(payload)
    }
}

#[async_trait]
impl ApiTransport for HttpApiClient {
    async fn fetch_project(&self, project_id: &str) -> Result<ProjectPayload, TransportError> {
        debug!(project_id, "GET project");
        let response = self
            .http
            .get(self.url(&format!("/projects/{}", project_id)))
            .send()
            .await?;
        let payload = Self::check(response).await?.json().await?;
        Ok(payload)
    }

    async fn push_project(
        &self,
        project_id: &str,
        project: &Project,
    ) -> Result<(), TransportError> {
        let body = serde_json::to_value(project)?;
        self.post_json(&format!("/projects/{}/sync", project_id), &body)
            .await
    }

    async fn push_pages(&self, project_id: &str, pages: &[Page]) -> Result<(), TransportError> {
        self.post_json(
            &format!("/pages/projects/{}/sync", project_id),
            &pages_sync_body(pages),
        )
        .await
    }

    async fn push_variables(
        &self,
        project_id: &str,
        variables: &[Variable],
        sets: &[VariableSet],
    ) -> Result<(), TransportError> {
        self.post_json(
            &format!("/variables/projects/{}/sync", project_id),
            &variables_sync_body(variables, sets),
        )
        .await
    }

    async fn push_blocks(
        &self,
        project_id: &str,
        blocks: &[BlockInstance],
    ) -> Result<(), TransportError> {
        self.post_json(
            &format!("/block-instances/projects/{}/sync", project_id),
            &blocks_sync_body(blocks),
        )
        .await
    }
}
