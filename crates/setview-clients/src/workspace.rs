//! Bulk object fetch client for the workspace service.

use async_trait::async_trait;
use reqwest::Client;
use setview_core::MemberObject;

use crate::rpc::{AuthToken, JsonRpcClient, RpcError};
use crate::{ObjectFetcher, ObjectRef};

pub struct WorkspaceClient {
    rpc: JsonRpcClient,
}

impl WorkspaceClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            rpc: JsonRpcClient::new(http, url),
        }
    }
}

#[async_trait]
impl ObjectFetcher for WorkspaceClient {
    async fn get_objects(
        &self,
        refs: &[ObjectRef],
        token: Option<&AuthToken>,
    ) -> Result<Vec<MemberObject>, RpcError> {
        self.rpc.call("Workspace.get_objects", &refs, token).await
    }
}
