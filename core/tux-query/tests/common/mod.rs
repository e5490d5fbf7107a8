//! Shared fixtures for tux-query tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;
use tux_query::{ContentTransport, QueryParams, QueryResult};

type Responder = Box<dyn Fn(&str, &QueryParams) -> QueryResult<Value> + Send + Sync>;

/// In-memory transport answering from a closure and recording every request.
pub struct FakeTransport {
    respond: Responder,
    requests: Mutex<Vec<(String, QueryParams)>>,
}

impl FakeTransport {
    pub fn new(
        respond: impl Fn(&str, &QueryParams) -> QueryResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with the same body.
    pub fn fixed(body: Value) -> Self {
        Self::new(move |_, _| Ok(body.clone()))
    }

    pub fn requests(&self) -> Vec<(String, QueryParams)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentTransport for FakeTransport {
    async fn get(&self, path: &str, params: &QueryParams) -> QueryResult<Value> {
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), params.clone()));
        (self.respond)(path, params)
    }
}

pub fn link(id: &str, link_type: &str) -> Value {
    json!({"sys": {"id": id, "type": "Link", "linkType": link_type}})
}

pub fn raw_entry(id: &str, updated_at: &str, fields: Value) -> Value {
    json!({
        "sys": {"id": id, "type": "Entry", "updatedAt": updated_at},
        "fields": fields
    })
}

pub fn raw_asset(id: &str, updated_at: &str, title: &str) -> Value {
    json!({
        "sys": {"id": id, "type": "Asset", "updatedAt": updated_at},
        "fields": {
            "title": title,
            "file": {"url": format!("//images.example.com/{id}.png")}
        }
    })
}

pub fn envelope(items: Vec<Value>, assets: Vec<Value>, entries: Vec<Value>) -> Value {
    json!({
        "sys": {"type": "Array"},
        "total": items.len(),
        "skip": 0,
        "limit": 100,
        "items": items,
        "includes": {"Asset": assets, "Entry": entries}
    })
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
