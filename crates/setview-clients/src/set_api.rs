//! Set resolution client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use setview_core::{ResolvedSet, ServiceEndpoints, SetReference};

use crate::rpc::{AuthToken, JsonRpcClient, RpcError};
use crate::wizard::ServiceWizardClient;
use crate::SetResolver;

const MODULE: &str = "SetAPI";

#[derive(Debug, Serialize)]
struct GetReadsSetParams {
    #[serde(rename = "ref")]
    reference: String,
    include_item_info: u8,
}

/// Client for the dynamically deployed set service.
///
/// The service URL is looked up through the service wizard on every call
/// unless `setApiUrl` is configured.
pub struct SetApiClient {
    http: Client,
    wizard: ServiceWizardClient,
    version: String,
    fixed_url: Option<String>,
}

impl SetApiClient {
    pub fn new(http: Client, endpoints: &ServiceEndpoints) -> Self {
        Self {
            wizard: ServiceWizardClient::new(http.clone(), endpoints.service_wizard_url.clone()),
            http,
            version: endpoints.set_api_version.clone(),
            fixed_url: endpoints.set_api_url.clone(),
        }
    }

    async fn service(&self, token: Option<&AuthToken>) -> Result<JsonRpcClient, RpcError> {
        let url = match &self.fixed_url {
            Some(url) => url.clone(),
            None => {
                self.wizard
                    .get_service_status(MODULE, &self.version, token)
                    .await?
                    .url
            }
        };
        Ok(JsonRpcClient::new(self.http.clone(), url))
    }

    pub async fn get_reads_set_v1(
        &self,
        reference: &SetReference,
        include_item_info: bool,
        token: Option<&AuthToken>,
    ) -> Result<ResolvedSet, RpcError> {
        let params = GetReadsSetParams {
            reference: reference.to_string(),
            include_item_info: u8::from(include_item_info),
        };
        self.service(token)
            .await?
            .call(&format!("{}.get_reads_set_v1", MODULE), &params, token)
            .await
    }
}

#[async_trait]
impl SetResolver for SetApiClient {
    async fn resolve_set(
        &self,
        reference: &SetReference,
        include_item_info: bool,
        token: Option<&AuthToken>,
    ) -> Result<ResolvedSet, RpcError> {
        self.get_reads_set_v1(reference, include_item_info, token).await
    }
}
