//! Upstash Redis over its REST API.
//!
//! Commands are posted as a JSON array (`["INCR", key]`) to the database URL
//! with a bearer token. Replies are `{"result": ...}` or `{"error": "..."}`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use folio_core::error::{FolioError, Result};

use super::store::CounterStore;

pub struct UpstashCounterStore {
    http: reqwest::Client,
    url: String,
    token: String,
    key: String,
}

#[derive(Debug, Deserialize)]
struct UpstashReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl UpstashCounterStore {
    pub fn new(http: reqwest::Client, url: String, token: String, key: String) -> Self {
        Self {
            http,
            url: url.trim_end_matches('/').to_string(),
            token,
            key,
        }
    }

    async fn command(&self, cmd: &str) -> Result<u64> {
        let resp = self
            .http
            .post(self.url.as_str())
            .bearer_auth(&self.token)
            .json(&json!([cmd, self.key]))
            .send()
            .await
            .map_err(|e| FolioError::Store(format!("{cmd} request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FolioError::Store(format!("{cmd} body read failed: {e}")))?;

        if !status.is_success() {
            return Err(FolioError::Store(format!("{cmd} returned {status}: {body}")));
        }

        parse_reply(&body)
    }
}

/// Decode a reply body into a count. `null` (missing key) is 0; GET returns
/// the value as a string, INCR as a number.
fn parse_reply(body: &str) -> Result<u64> {
    let reply: UpstashReply = serde_json::from_str(body)
        .map_err(|e| FolioError::Store(format!("malformed reply: {e}")))?;

    if let Some(err) = reply.error {
        return Err(FolioError::Store(err));
    }

    match reply.result {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| FolioError::Store(format!("count out of range: {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| FolioError::Store(format!("count is not an integer: {s}"))),
        Some(other) => Err(FolioError::Store(format!("unexpected result: {other}"))),
    }
}

#[async_trait]
impl CounterStore for UpstashCounterStore {
    fn backend(&self) -> &'static str {
        "upstash"
    }

    async fn read(&self) -> Result<u64> {
        self.command("GET").await
    }

    async fn increment(&self) -> Result<u64> {
        self.command("INCR").await
    }
}
