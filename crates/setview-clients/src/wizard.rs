//! Service wizard lookup for dynamically deployed services.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rpc::{AuthToken, JsonRpcClient, RpcError};

#[derive(Debug, Serialize)]
struct ServiceQuery<'a> {
    module_name: &'a str,
    version: &'a str,
}

/// Subset of the service status record that callers need.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    pub url: String,
}

pub struct ServiceWizardClient {
    rpc: JsonRpcClient,
}

impl ServiceWizardClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            rpc: JsonRpcClient::new(http, url),
        }
    }

    pub async fn get_service_status(
        &self,
        module_name: &str,
        version: &str,
        token: Option<&AuthToken>,
    ) -> Result<ServiceStatus, RpcError> {
        let status: ServiceStatus = self
            .rpc
            .call(
                "ServiceWizard.get_service_status",
                &ServiceQuery {
                    module_name,
                    version,
                },
                token,
            )
            .await?;
        debug!("{} ({}) is served at {}", module_name, version, status.url);
        Ok(status)
    }
}
