//! Handler for the remote-image deletion task.

use async_trait::async_trait;

use crate::error::{TaskError, TaskResult};
use crate::models::{DELETE_REMOTE_IMAGE, DeleteImagePayload};
use crate::worker::TaskHandler;

/// Asset store connection settings.
#[derive(Debug, Clone)]
pub struct AssetStoreConfig {
    /// Base URL of the asset store's deletion endpoint.
    pub base_url: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
}

/// Requests deletion of a remote image by its opaque public id.
///
/// A non-success response is an execution failure, which the worker
/// retries with backoff until the store accepts the request.
pub struct DeleteImageHandler {
    client: reqwest::Client,
    config: AssetStoreConfig,
}

impl DeleteImageHandler {
    pub fn new(config: AssetStoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: AssetStoreConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: config.api_key,
            },
        }
    }
}

#[async_trait]
impl TaskHandler for DeleteImageHandler {
    fn name(&self) -> &'static str {
        DELETE_REMOTE_IMAGE
    }

    async fn run(&self, payload: &serde_json::Value) -> TaskResult<()> {
        let payload: DeleteImagePayload = serde_json::from_value(payload.clone())?;

        let url = format!("{}/{}", self.config.base_url, payload.public_id);
        let mut request = self.client.delete(&url);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TaskError::Execution(e.to_string()))?;

        if response.status().is_success() || response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::info!(public_id = %payload.public_id, "Remote image deletion requested");
            Ok(())
        } else {
            Err(TaskError::Execution(format!(
                "Asset store returned {} for {}",
                response.status(),
                payload.public_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_rejects_malformed_payload() {
        let handler = DeleteImageHandler::new(AssetStoreConfig {
            base_url: "http://localhost:9000/assets".to_string(),
            api_key: None,
        });
        let result = handler.run(&json!({ "wrong": true })).await;
        assert!(matches!(result, Err(TaskError::Payload(_))));
    }
}
