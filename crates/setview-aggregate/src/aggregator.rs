//! Set aggregator — resolve the set, bulk fetch its members, summarize.

use std::sync::Arc;

use setview_clients::{
    AuthToken, ObjectFetcher, ObjectRef, RpcError, SetApiClient, SetResolver, WorkspaceClient,
};
use setview_core::{AggregationResult, Error, Result, ServiceEndpoints, SetReference};
use tracing::{debug, info};

use crate::builder;

/// Runs the resolve → fetch → build pipeline for one set reference.
///
/// Holds no per-invocation state; every call starts from scratch.
#[derive(Clone)]
pub struct SetAggregator {
    resolver: Arc<dyn SetResolver>,
    fetcher: Arc<dyn ObjectFetcher>,
}

impl SetAggregator {
    pub fn new(resolver: Arc<dyn SetResolver>, fetcher: Arc<dyn ObjectFetcher>) -> Self {
        Self { resolver, fetcher }
    }

    /// Wire up the HTTP clients for the given endpoints.
    pub fn from_endpoints(endpoints: &ServiceEndpoints) -> Result<Self> {
        endpoints.validate()?;
        let http = setview_clients::http_client(endpoints)?;
        Ok(Self::new(
            Arc::new(SetApiClient::new(http.clone(), endpoints)),
            Arc::new(WorkspaceClient::new(http, endpoints.workspace_url.clone())),
        ))
    }

    pub async fn aggregate(
        &self,
        reference: &SetReference,
        token: Option<&AuthToken>,
    ) -> Result<AggregationResult> {
        debug!("Resolving set {}", reference);
        let resolved = self
            .resolver
            .resolve_set(reference, true, token)
            .await
            .map_err(|e| classify(e, Error::Resolution))?;

        let items = builder::member_refs(&resolved)?;
        let members = if items.is_empty() {
            debug!("Set {} is empty, skipping member fetch", reference);
            Vec::new()
        } else {
            let refs: Vec<ObjectRef> = items
                .iter()
                .map(|i| ObjectRef::new(i.reference.clone()))
                .collect();
            debug!("Fetching {} members of {}", refs.len(), reference);
            self.fetcher
                .get_objects(&refs, token)
                .await
                .map_err(|e| classify(e, Error::Fetch))?
        };

        let result = builder::build_result(&resolved, members)?;
        info!(
            "Aggregated set {}: {} items, type={}, reads={}, bp={}",
            reference,
            result.set.item_count,
            result.set.item_type,
            result.set.stats.read_count,
            result.set.stats.base_pair_count
        );
        Ok(result)
    }
}

/// Decode failures are malformed responses; everything else belongs to the stage.
fn classify(err: RpcError, stage: fn(String) -> Error) -> Error {
    match err {
        RpcError::Decode(msg) => Error::MalformedResponse(msg),
        other => stage(other.to_string()),
    }
}
