//! JSON-RPC 1.1 transport shared by the service clients.
//!
//! Requests are `{"version":"1.1","method":"Module.method","params":[arg],"id":"n"}`
//! posted with the raw token in the `Authorization` header. Successful
//! responses wrap the return value in a one-element `result` array.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

/// Opaque session credential, supplied per call and never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{name} ({code}): {message}")]
    Service {
        code: i64,
        name: String,
        message: String,
    },

    #[error("Could not decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct RpcFault {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    message: String,
}

/// Build the request envelope for a single-argument call.
pub fn request_body<P: Serialize>(method: &str, params: &P, id: u64) -> Value {
    json!({
        "version": "1.1",
        "method": method,
        "params": [params],
        "id": id.to_string(),
    })
}

/// Decode a response envelope, preferring a service fault over the HTTP status.
pub fn decode_response<R: DeserializeOwned>(status: u16, body: &str) -> Result<R, RpcError> {
    let success = (200..300).contains(&status);
    let envelope: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) if success => return Err(RpcError::Decode(e.to_string())),
        Err(_) => {
            return Err(RpcError::Status {
                status,
                body: body.to_string(),
            })
        }
    };

    if let Some(fault) = envelope.get("error").filter(|e| !e.is_null()) {
        let fault: RpcFault = serde_json::from_value(fault.clone())
            .map_err(|e| RpcError::Decode(format!("bad error object: {}", e)))?;
        return Err(RpcError::Service {
            code: fault.code,
            name: fault.name,
            message: fault.message,
        });
    }
    if !success {
        return Err(RpcError::Status {
            status,
            body: body.to_string(),
        });
    }

    let first = envelope
        .get("result")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .cloned()
        .ok_or_else(|| RpcError::Decode("response has no result".into()))?;
    serde_json::from_value(first).map_err(|e| RpcError::Decode(e.to_string()))
}

/// A JSON-RPC endpoint.
pub struct JsonRpcClient {
    http: Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub async fn call<P, R>(
        &self,
        method: &str,
        params: &P,
        token: Option<&AuthToken>,
    ) -> Result<R, RpcError>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("RPC {} -> {} (id {})", method, self.url, id);

        let mut request = self
            .http
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&request_body(method, params, id));
        if let Some(token) = token {
            request = request.header("Authorization", token.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        decode_response(status, &body)
    }
}
