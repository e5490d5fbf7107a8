//! Client configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QueryError, QueryResult};

/// Connection settings for one content space.
#[derive(Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Space id.
    pub space: String,
    /// Bearer token sent with every request.
    pub access_token: String,
    /// API sub-domain: `cdn` for published content, `preview` for drafts.
    pub sub_domain: String,
    /// Overrides `https://{sub_domain}.contentful.com` (proxies, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// Per-request timeout applied by the HTTP transport.
    pub timeout_secs: u64,
}

impl QueryConfig {
    /// Creates a config for `space` on `https://{sub_domain}.contentful.com`.
    pub fn new(
        space: impl Into<String>,
        access_token: impl Into<String>,
        sub_domain: impl Into<String>,
    ) -> Self {
        Self {
            space: space.into(),
            access_token: access_token.into(),
            sub_domain: sub_domain.into(),
            ..Default::default()
        }
    }

    /// Root of all requests: `{api_base_url}/spaces/{space}`.
    pub fn base_url(&self) -> String {
        let host = match &self.api_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.contentful.com", self.sub_domain),
        };
        format!("{host}/spaces/{}", self.space)
    }

    /// Rejects configs that cannot produce a working client.
    pub fn validate(&self) -> QueryResult<()> {
        if self.space.trim().is_empty() {
            return Err(QueryError::Config("space must not be empty".to_string()));
        }
        if self.access_token.trim().is_empty() {
            return Err(QueryError::Config("access token must not be empty".to_string()));
        }
        if self.api_base_url.is_none() && self.sub_domain.trim().is_empty() {
            return Err(QueryError::Config("sub-domain must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(QueryError::Config("timeout must be at least one second".to_string()));
        }
        Ok(())
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            space: String::new(),
            access_token: String::new(),
            sub_domain: "cdn".to_string(),
            api_base_url: None,
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for QueryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryConfig")
            .field("space", &self.space)
            .field("access_token", &"<redacted>")
            .field("sub_domain", &self.sub_domain)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
