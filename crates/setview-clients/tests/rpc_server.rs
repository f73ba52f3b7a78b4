//! Client tests against a local JSON-RPC stub serving the wizard, set and
//! workspace endpoints on one ephemeral port.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use setview_clients::{
    AuthToken, ObjectFetcher, ObjectRef, RpcError, SetApiClient, SetResolver, WorkspaceClient,
};
use setview_core::{ServiceEndpoints, SetReference};

#[derive(Debug, Clone)]
struct RecordedCall {
    method: String,
    auth: Option<String>,
    params: Value,
}

#[derive(Default)]
struct Stub {
    addr: Mutex<Option<SocketAddr>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Stub {
    fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn handle(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let method = body["method"].as_str().unwrap_or_default().to_string();
    let params = body["params"][0].clone();
    stub.calls.lock().unwrap().push(RecordedCall {
        method: method.clone(),
        auth: headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        params: params.clone(),
    });

    let addr = stub.addr.lock().unwrap().expect("stub address set");
    match method.as_str() {
        "ServiceWizard.get_service_status" => (
            StatusCode::OK,
            Json(json!({
                "version": "1.1",
                "result": [{ "url": format!("http://{}/setapi", addr), "status": "active" }],
            })),
        ),
        "SetAPI.get_reads_set_v1" if params["ref"] == "1/404" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "version": "1.1",
                "error": { "name": "JSONRPCError", "code": -32500, "message": "Object 404 cannot be accessed" },
            })),
        ),
        "SetAPI.get_reads_set_v1" => (
            StatusCode::OK,
            Json(json!({
                "version": "1.1",
                "result": [{
                    "info": [2, "my_reads_set", "KBaseSets.ReadsSet-1.0"],
                    "data": {
                        "description": "two libraries",
                        "items": [
                            { "ref": "1/10/1", "info": [10, "lib_a", "KBaseFile.PairedEndLibrary-2.0"] },
                            { "ref": "1/11/1", "info": [11, "lib_b", "KBaseFile.PairedEndLibrary-2.0"] },
                        ],
                    },
                }],
            })),
        ),
        "Workspace.get_objects" => {
            let objects: Vec<Value> = params
                .as_array()
                .cloned()
                .unwrap_or_default()
                .iter()
                .map(|r| {
                    json!({
                        "info": [0, format!("obj {}", r["ref"].as_str().unwrap_or_default()), "KBaseFile.PairedEndLibrary-2.0"],
                        "data": { "read_count": 10 },
                        "provenance": [],
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "version": "1.1", "result": [objects] })))
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn spawn_stub() -> (Arc<Stub>, SocketAddr) {
    let stub = Arc::new(Stub::default());
    let app = Router::new()
        .route("/wizard", post(handle))
        .route("/setapi", post(handle))
        .route("/ws", post(handle))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    *stub.addr.lock().unwrap() = Some(addr);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (stub, addr)
}

fn endpoints(addr: SocketAddr) -> ServiceEndpoints {
    ServiceEndpoints::new(format!("http://{}/ws", addr), format!("http://{}/wizard", addr))
}

#[tokio::test]
async fn test_set_lookup_goes_through_wizard() {
    let (stub, addr) = spawn_stub().await;
    let endpoints = endpoints(addr);
    let http = setview_clients::http_client(&endpoints).unwrap();
    let client = SetApiClient::new(http, &endpoints);
    let token = AuthToken::new("tok");

    let reference: SetReference = "1/2".parse().unwrap();
    let set = client
        .resolve_set(&reference, true, Some(&token))
        .await
        .unwrap();

    assert_eq!(set.info.name().unwrap(), "my_reads_set");
    assert_eq!(set.data.description, "two libraries");
    assert_eq!(set.data.items.len(), 2);
    assert_eq!(set.data.items[1].reference, "1/11/1");

    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].method, "ServiceWizard.get_service_status");
    assert_eq!(calls[0].params["module_name"], "SetAPI");
    assert_eq!(calls[0].params["version"], "release");
    assert_eq!(calls[1].method, "SetAPI.get_reads_set_v1");
    assert_eq!(calls[1].params["ref"], "1/2");
    assert_eq!(calls[1].params["include_item_info"], 1);
    assert_eq!(calls[1].auth.as_deref(), Some("tok"));
}

#[tokio::test]
async fn test_fixed_set_url_skips_wizard() {
    let (stub, addr) = spawn_stub().await;
    let mut endpoints = endpoints(addr);
    endpoints.set_api_url = Some(format!("http://{}/setapi", addr));
    let http = setview_clients::http_client(&endpoints).unwrap();
    let client = SetApiClient::new(http, &endpoints);

    let reference: SetReference = "1/2/3".parse().unwrap();
    client.resolve_set(&reference, true, None).await.unwrap();

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "SetAPI.get_reads_set_v1");
    assert_eq!(calls[0].params["ref"], "1/2/3");
    assert!(calls[0].auth.is_none());
}

#[tokio::test]
async fn test_service_fault_is_surfaced() {
    let (_stub, addr) = spawn_stub().await;
    let endpoints = endpoints(addr);
    let http = setview_clients::http_client(&endpoints).unwrap();
    let client = SetApiClient::new(http, &endpoints);

    let reference: SetReference = "1/404".parse().unwrap();
    let err = client.resolve_set(&reference, true, None).await.unwrap_err();
    match err {
        RpcError::Service { code, message, .. } => {
            assert_eq!(code, -32500);
            assert!(message.contains("cannot be accessed"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_bulk_fetch_sends_all_refs_in_one_call() {
    let (stub, addr) = spawn_stub().await;
    let endpoints = endpoints(addr);
    let http = setview_clients::http_client(&endpoints).unwrap();
    let client = WorkspaceClient::new(http, endpoints.workspace_url.clone());

    let refs = vec![ObjectRef::new("1/10/1"), ObjectRef::new("1/11/1")];
    let objects = client
        .get_objects(&refs, Some(&AuthToken::new("tok")))
        .await
        .unwrap();

    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].info.name().unwrap(), "obj 1/10/1");
    assert_eq!(objects[1].data["read_count"], 10);

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "Workspace.get_objects");
    assert_eq!(calls[0].params, json!([{ "ref": "1/10/1" }, { "ref": "1/11/1" }]));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let endpoints = ServiceEndpoints::new("http://127.0.0.1:1/ws", "http://127.0.0.1:1/wizard");
    let http = setview_clients::http_client(&endpoints).unwrap();
    let client = WorkspaceClient::new(http, endpoints.workspace_url.clone());

    let err = client
        .get_objects(&[ObjectRef::new("1/2/3")], None)
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Transport(_)));
}
