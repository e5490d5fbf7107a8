//! Content delivery API client for Tux.
//!
//! Fetches entries from a content space and returns them ready for rendering:
//! locally edited overrides replace stale server copies, and link
//! placeholders carry the fields of the entries and assets they point at.
//!
//! # Components
//!
//! - **Transport**: [`ContentTransport`] is the seam to the HTTP API, and
//!   [`HttpTransport`] implements it with bearer auth
//! - **Link map**: [`LinkMap`] and [`hydrate`] attach included targets to links
//! - **API**: [`QueryApi`] ties transport, overrides and hydration together
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tux_overrides::OverrideStore;
//! use tux_query::{QueryApi, QueryConfig, QueryParams};
//!
//! # async fn run() -> tux_query::QueryResult<()> {
//! let config = QueryConfig::new("space-id", "token", "cdn");
//! let api = QueryApi::connect(&config, Arc::new(OverrideStore::new()))?;
//!
//! let pages = api
//!     .get_entries(&QueryParams::new().content_type("page").limit(10))
//!     .await?;
//! for page in &pages.items {
//!     println!("{}: {:?}", page.id(), page.get_str("/title"));
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod config;
mod error;
pub mod link;
mod params;
pub mod transport;

pub use api::{DEFAULT_PAGE_SIZE, QueryApi};
pub use config::QueryConfig;
pub use error::{QueryError, QueryResult};
pub use link::{LinkMap, hydrate};
pub use params::QueryParams;
pub use transport::{ContentTransport, HttpTransport};
