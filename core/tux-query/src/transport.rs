//! Transport abstraction over the content delivery API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::QueryConfig;
use crate::error::{QueryError, QueryResult};
use crate::params::QueryParams;

/// Performs authenticated GETs against one content space.
///
/// Retries, backoff and timeouts are the implementation's business; the
/// resolver only sees the parsed body or the failure.
#[async_trait]
pub trait ContentTransport: Send + Sync {
    /// Fetches `path` (relative to the space root) and returns the JSON body.
    async fn get(&self, path: &str, params: &QueryParams) -> QueryResult<Value>;
}

/// [`ContentTransport`] backed by `reqwest`, sending `Authorization: Bearer`.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    access_token: String,
}

impl HttpTransport {
    /// Creates a transport for the space described by `config`.
    pub fn new(config: &QueryConfig) -> QueryResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QueryError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ContentTransport for HttpTransport {
    async fn get(&self, path: &str, params: &QueryParams) -> QueryResult<Value> {
        let context = format!("GET {path}");
        debug!(%path, params = params.pairs().len(), "content API request");

        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.access_token)
            .query(params.pairs())
            .send()
            .await
            .map_err(|source| QueryError::Transport {
                context: context.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| QueryError::Transport {
            context: context.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(QueryError::Status {
                context,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| QueryError::MalformedResponse {
            context,
            reason: format!("body is not JSON: {e}"),
        })
    }
}
