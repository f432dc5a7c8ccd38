//! HTTP ownership source
//!
//! `GET {base_url}/entities/{entity_id}/ownership-graph` returning the JSON
//! snapshot described in `ubo_core::model`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use ubo_core::OwnershipGraph;

use crate::config::SourceConfig;
use crate::error::{ConfigError, FetchError};
use crate::source::OwnershipGraphSource;

pub struct HttpGraphSource {
    client: Client,
    base_url: Url,
}

impl HttpGraphSource {
    pub fn new(config: &SourceConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Request URL for `entity_id`, path-segment encoded.
    pub fn graph_url(&self, entity_id: &str) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("entities")
                .push(entity_id)
                .push("ownership-graph");
        }
        url
    }
}

/// Map a non-success status to the fetch failure it represents.
fn status_error(entity_id: &str, status: StatusCode) -> FetchError {
    if status == StatusCode::NOT_FOUND {
        FetchError::NotFound {
            entity_id: entity_id.to_string(),
        }
    } else {
        FetchError::Status {
            entity_id: entity_id.to_string(),
            status: status.as_u16(),
        }
    }
}

#[async_trait]
impl OwnershipGraphSource for HttpGraphSource {
    async fn fetch_ownership_graph_above(
        &self,
        entity_id: &str,
    ) -> Result<OwnershipGraph, FetchError> {
        let url = self.graph_url(entity_id);
        tracing::debug!(%url, "Fetching ownership graph");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                entity_id,
                status = status.as_u16(),
                "Ownership source rejected request"
            );
            return Err(status_error(entity_id, status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        OwnershipGraph::from_json(&body).map_err(|e| {
            FetchError::Malformed(format!(
                "{} (first 200 chars: {})",
                e,
                body.chars().take(200).collect::<String>()
            ))
        })
    }
}
