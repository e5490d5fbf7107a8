//! Override-aware query API.

use std::sync::Arc;

use tracing::{debug, warn};
use tux_overrides::OverrideStore;
use tux_types::{Entry, Envelope};

use crate::config::QueryConfig;
use crate::error::{QueryError, QueryResult};
use crate::link::hydrate;
use crate::params::QueryParams;
use crate::transport::{ContentTransport, HttpTransport};

/// Page size used by [`QueryApi::get_all_entries`] when the caller sets none.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Fetches entries from one content space and returns them with local
/// overrides applied and links hydrated.
#[derive(Clone)]
pub struct QueryApi {
    transport: Arc<dyn ContentTransport>,
    overrides: Arc<OverrideStore>,
}

impl QueryApi {
    /// Creates an API over an existing transport and override store.
    pub fn new(transport: Arc<dyn ContentTransport>, overrides: Arc<OverrideStore>) -> Self {
        Self {
            transport,
            overrides,
        }
    }

    /// Creates an API talking HTTP to the space described by `config`.
    pub fn connect(config: &QueryConfig, overrides: Arc<OverrideStore>) -> QueryResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), overrides))
    }

    /// The store consulted on every fetch.
    pub fn overrides(&self) -> &Arc<OverrideStore> {
        &self.overrides
    }

    /// Records a locally edited entry; later fetches serve it while it is newer.
    pub fn override_entry(&self, entry: Entry) -> QueryResult<()> {
        Ok(self.overrides.record_override(entry)?)
    }

    /// Fetches a collection.
    ///
    /// `params` are sent as-is. Each item is replaced by its override when the
    /// override is newer, then links are hydrated from `includes`.
    pub async fn get_entries(&self, params: &QueryParams) -> QueryResult<Envelope> {
        let context = "GET /entries";
        let body = self.transport.get("/entries", params).await?;
        let envelope = Envelope::from_json(body).map_err(|e| QueryError::malformed(context, e))?;

        let overridden = Envelope {
            items: envelope
                .items
                .iter()
                .map(|item| self.overrides.resolve(item))
                .collect(),
            ..envelope
        };

        let hydrated = hydrate(&overridden, &self.overrides);
        debug!(
            items = hydrated.items.len(),
            included = hydrated.included_count(),
            "fetched collection"
        );
        Ok(hydrated)
    }

    /// Fetches a single entry and applies its override.
    ///
    /// The single-entry response has no `includes`, so links in the returned
    /// entry are left unresolved.
    pub async fn get_entry(&self, id: &str) -> QueryResult<Entry> {
        let path = format!("/entries/{}", entry_path_segment(id)?);
        let body = self.transport.get(&path, &QueryParams::new()).await?;
        let entry =
            Entry::from_json(body).map_err(|e| QueryError::malformed(format!("GET {path}"), e))?;
        Ok(self.overrides.resolve(&entry))
    }

    /// Fetches every page of a collection.
    ///
    /// Pages are requested one after another, starting at the caller's `skip`
    /// (default 0) with the caller's `limit` (default [`DEFAULT_PAGE_SIZE`]).
    /// Each page is hydrated against its own `includes`.
    pub async fn get_all_entries(&self, params: &QueryParams) -> QueryResult<Vec<Entry>> {
        let limit = parse_counter(params, "limit")?.unwrap_or(DEFAULT_PAGE_SIZE);
        let mut skip = parse_counter(params, "skip")?.unwrap_or(0);
        let mut entries = Vec::new();

        loop {
            let page_params = params.clone().limit(limit).skip(skip);
            let mut page = self.get_entries(&page_params).await?;
            if page.skip.is_some_and(|echoed| echoed != skip) {
                warn!(requested = skip, echoed = ?page.skip, "server ignored skip, paging on requested offset");
            }
            // Progress is tracked on the requested offset, never the echoed one.
            page.skip = Some(skip);

            let more = page.has_more();
            skip = skip.saturating_add(page.items.len() as u64);
            entries.extend(page.items);
            debug!(fetched = entries.len(), total = ?page.total, "fetched page");

            if !more {
                return Ok(entries);
            }
        }
    }
}

/// Percent-encodes `id` so it addresses exactly one path segment.
///
/// Dot segments cannot be encoded away (URL parsers normalise `%2E%2E` too),
/// so empty, `.` and `..` ids are rejected.
fn entry_path_segment(id: &str) -> QueryResult<String> {
    if matches!(id, "" | "." | "..") {
        return Err(QueryError::InvalidId(id.to_string()));
    }
    Ok(urlencoding::encode(id).into_owned())
}

fn parse_counter(params: &QueryParams, key: &str) -> QueryResult<Option<u64>> {
    params
        .get(key)
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|_| QueryError::Config(format!("`{key}` must be a non-negative integer, got {raw:?}")))
        })
        .transpose()
}
