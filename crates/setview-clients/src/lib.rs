//! Remote service clients for set resolution and member retrieval.
//!
//! Both services speak JSON-RPC 1.1 over HTTP. The aggregator only sees the
//! [`SetResolver`] and [`ObjectFetcher`] traits, so tests and alternative
//! transports can stand in for the HTTP clients.

pub mod rpc;
pub mod set_api;
pub mod wizard;
pub mod workspace;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use setview_core::{MemberObject, ResolvedSet, ServiceEndpoints, SetReference};

pub use rpc::{AuthToken, JsonRpcClient, RpcError};
pub use set_api::SetApiClient;
pub use wizard::{ServiceStatus, ServiceWizardClient};
pub use workspace::WorkspaceClient;

/// One entry of a bulk fetch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRef {
    #[serde(rename = "ref")]
    pub reference: String,
}

impl ObjectRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// Resolves a set reference into its metadata and ordered member list.
#[async_trait]
pub trait SetResolver: Send + Sync {
    async fn resolve_set(
        &self,
        reference: &SetReference,
        include_item_info: bool,
        token: Option<&AuthToken>,
    ) -> Result<ResolvedSet, RpcError>;
}

/// Fetches many objects in one request, one result per ref in request order.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn get_objects(
        &self,
        refs: &[ObjectRef],
        token: Option<&AuthToken>,
    ) -> Result<Vec<MemberObject>, RpcError>;
}

/// Build the shared HTTP client with the configured request timeout.
pub fn http_client(endpoints: &ServiceEndpoints) -> setview_core::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(endpoints.timeout_secs))
        .build()
        .map_err(|e| setview_core::Error::Config(format!("HTTP client: {}", e)))
}
