/// HTTP adapter tests against an in-process canned HTTP server
use eol_sync::prelude::*;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ============================================================================
// Canned server
// ============================================================================

#[derive(Debug, Clone)]
struct CannedResponse {
    status: u16,
    body: String,
    headers: Vec<(String, String)>,
}

impl CannedResponse {
    fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: String,
}

/// Serves the queued responses in order, one per connection, then 500s
struct CannedServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl CannedServer {
    async fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let queue = Arc::new(Mutex::new(VecDeque::from(responses)));

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let response = queue.lock().unwrap().pop_front().unwrap_or_else(|| {
                    CannedResponse::json(500, json!({"error": "no canned response left"}))
                });
                handle(stream, response, recorded.clone()).await;
            }
        });

        Self { base_url, requests }
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    mut stream: TcpStream,
    response: CannedResponse,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    recorded.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
        body,
    });

    let mut raw = format!(
        "HTTP/1.1 {} Canned\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        response.body.len()
    );
    for (name, value) in &response.headers {
        raw.push_str(&format!("{}: {}\r\n", name, value));
    }
    raw.push_str("\r\n");
    raw.push_str(&response.body);

    let _ = stream.write_all(raw.as_bytes()).await;
    let _ = stream.shutdown().await;
}

// ============================================================================
// Helpers
// ============================================================================

fn client(base_url: &str, max_retries: u32) -> PortCatalogClient {
    PortCatalogClient::new(CatalogClientConfig {
        base_url: base_url.to_string(),
        max_retries,
        retry_base_delay: Duration::from_millis(1),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn credential() -> Credential {
    Credential::new("Bearer test-token")
}

// ============================================================================
// Catalog client
// ============================================================================

#[tokio::test]
async fn test_fetch_entities_sends_auth_and_decodes() {
    let server = CannedServer::start(vec![CannedResponse::json(
        200,
        json!({
            "ok": true,
            "entities": [
                {"identifier": "react", "title": "React", "blueprint": "framework", "properties": {"state": "Active"}},
                {"identifier": "jquery", "properties": {"state": "EOL"}, "relations": {}}
            ]
        }),
    )])
    .await;

    let entities = client(&server.base_url, 0)
        .fetch_entities(&credential(), "framework")
        .await
        .unwrap();

    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0]["identifier"], "react");
    assert_eq!(entities[1]["identifier"], "jquery");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/v1/blueprints/framework/entities");
    assert_eq!(requests[0].headers["authorization"], "Bearer test-token");
    assert!(requests[0].headers["user-agent"].starts_with("eol-sync/"));
}

#[tokio::test]
async fn test_patch_entity_sends_properties_body() {
    let server = CannedServer::start(vec![CannedResponse::json(
        200,
        json!({"ok": true, "entity": {"identifier": "svc 1"}}),
    )])
    .await;

    let patch = EntityPatch::set_count("number_of_eol_packages", 2);
    client(&server.base_url, 0)
        .patch_entity(&credential(), "service", "svc 1", &patch)
        .await
        .unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].method, "PATCH");
    assert_eq!(requests[0].path, "/v1/blueprints/service/entities/svc%201");
    assert!(requests[0].headers["content-type"].starts_with("application/json"));
    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body, json!({"properties": {"number_of_eol_packages": 2}}));
}

#[tokio::test]
async fn test_list_blueprints_and_count() {
    let server = CannedServer::start(vec![
        CannedResponse::json(
            200,
            json!({"blueprints": [{"identifier": "framework", "title": "Framework"}, {"identifier": "service"}]}),
        ),
        CannedResponse::json(200, json!({"ok": true, "count": 42})),
    ])
    .await;
    let client = client(&server.base_url, 0);

    let blueprints = client.list_blueprints(&credential()).await.unwrap();
    assert_eq!(blueprints, vec!["framework", "service"]);

    let count = client.count_entities(&credential(), "service").await.unwrap();
    assert_eq!(count, 42);
    assert_eq!(
        server.requests()[1].path,
        "/v1/blueprints/service/entities-count"
    );
}

#[tokio::test]
async fn test_list_blueprints_unexpected_body_is_transport_error() {
    let server =
        CannedServer::start(vec![CannedResponse::json(200, json!({"ok": true, "data": []}))]).await;

    let err = client(&server.base_url, 0)
        .list_blueprints(&credential())
        .await
        .unwrap_err();

    assert_eq!(SyncError::kind_of(&err), ErrorKind::Transport);
    assert!(err.to_string().contains("invalid response body"));
}

#[tokio::test]
async fn test_not_found_carries_body() {
    let server = CannedServer::start(vec![CannedResponse::json(
        404,
        json!({"ok": false, "error": "not_found", "message": "Blueprint framework was not found"}),
    )])
    .await;

    let err = client(&server.base_url, 3)
        .fetch_entities(&credential(), "framework")
        .await
        .unwrap_err();

    assert_eq!(SyncError::kind_of(&err), ErrorKind::NotFound);
    assert!(err.to_string().contains("Blueprint framework was not found"));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_validation_error_is_not_retried() {
    let server = CannedServer::start(vec![CannedResponse::json(
        422,
        json!({"ok": false, "error": "invalid_property"}),
    )])
    .await;

    let patch = EntityPatch::set_count("number_of_eol_packages", 1);
    let err = client(&server.base_url, 3)
        .patch_entity(&credential(), "service", "svc1", &patch)
        .await
        .unwrap_err();

    assert_eq!(SyncError::kind_of(&err), ErrorKind::Validation);
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_is_authentication_error() {
    let server = CannedServer::start(vec![CannedResponse::json(
        401,
        json!({"ok": false, "error": "unauthorized"}),
    )])
    .await;

    let err = client(&server.base_url, 3)
        .fetch_entities(&credential(), "framework")
        .await
        .unwrap_err();

    assert_eq!(SyncError::kind_of(&err), ErrorKind::Authentication);
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_retried_until_success() {
    let server = CannedServer::start(vec![
        CannedResponse::json(503, json!({"ok": false})),
        CannedResponse::json(429, json!({"ok": false})).with_header("Retry-After", "0"),
        CannedResponse::json(200, json!({"entities": []})),
    ])
    .await;

    let entities = client(&server.base_url, 3)
        .fetch_entities(&credential(), "service")
        .await
        .unwrap();

    assert!(entities.is_empty());
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_server_error_without_retries_is_transport_error() {
    let server = CannedServer::start(vec![CannedResponse::json(
        500,
        json!({"ok": false, "error": "internal"}),
    )])
    .await;

    let patch = EntityPatch::set_count("number_of_eol_packages", 1);
    let err = client(&server.base_url, 0)
        .patch_entity(&credential(), "service", "svc1", &patch)
        .await
        .unwrap_err();

    assert_eq!(SyncError::kind_of(&err), ErrorKind::Transport);
    assert!(err.to_string().contains("500"));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_retries_exhausted_returns_last_error() {
    let server = CannedServer::start(vec![
        CannedResponse::json(502, json!({"ok": false})),
        CannedResponse::json(502, json!({"ok": false})),
        CannedResponse::json(502, json!({"ok": false})),
    ])
    .await;

    let err = client(&server.base_url, 2)
        .list_blueprints(&credential())
        .await
        .unwrap_err();

    assert_eq!(SyncError::kind_of(&err), ErrorKind::Transport);
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_undecodable_body_is_transport_error() {
    let server = CannedServer::start(vec![CannedResponse {
        status: 200,
        body: "<html>maintenance</html>".to_string(),
        headers: vec![("Content-Type".to_string(), "text/html".to_string())],
    }])
    .await;

    let err = client(&server.base_url, 0)
        .fetch_entities(&credential(), "framework")
        .await
        .unwrap_err();

    assert_eq!(SyncError::kind_of(&err), ErrorKind::Transport);
    assert!(err.to_string().contains("invalid response body"));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind and drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&base_url, 1)
        .list_blueprints(&credential())
        .await
        .unwrap_err();

    assert_eq!(SyncError::kind_of(&err), ErrorKind::Transport);
}

// ============================================================================
// Authenticator
// ============================================================================

#[tokio::test]
async fn test_client_credentials_exchange() {
    let server = CannedServer::start(vec![CannedResponse::json(
        200,
        json!({"ok": true, "accessToken": "issued-token", "expiresIn": 10800, "tokenType": "Bearer"}),
    )])
    .await;

    let authenticator = PortAuthenticator::new(Credentials::ClientCredentials {
        client_id: "my-client".to_string(),
        client_secret: "s3cr3t".to_string(),
        auth_url: format!("{}/v1/auth/access_token", server.base_url),
    })
    .unwrap();

    let credential = authenticator.credential().await.unwrap();
    assert_eq!(credential.header_value(), "Bearer issued-token");

    let requests = server.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/v1/auth/access_token");
    assert!(requests[0].headers["content-type"].starts_with("application/x-www-form-urlencoded"));
    assert!(requests[0].body.contains("grant_type=client_credentials"));
    assert!(requests[0].body.contains("client_id=my-client"));
    assert!(requests[0].body.contains("client_secret=s3cr3t"));
}

#[tokio::test]
async fn test_client_credentials_rejected_is_not_retried() {
    let server = CannedServer::start(vec![
        CannedResponse::json(500, json!({"ok": false})),
        CannedResponse::json(200, json!({"accessToken": "never-used"})),
    ])
    .await;

    let authenticator = PortAuthenticator::new(Credentials::ClientCredentials {
        client_id: "my-client".to_string(),
        client_secret: "wrong".to_string(),
        auth_url: format!("{}/v1/auth/access_token", server.base_url),
    })
    .unwrap();

    let err = authenticator.credential().await.unwrap_err();
    assert_eq!(SyncError::kind_of(&err), ErrorKind::Authentication);
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_client_credentials_missing_token() {
    let server = CannedServer::start(vec![CannedResponse::json(200, json!({"ok": true}))]).await;

    let authenticator = PortAuthenticator::new(Credentials::ClientCredentials {
        client_id: "my-client".to_string(),
        client_secret: "s3cr3t".to_string(),
        auth_url: format!("{}/v1/auth/access_token", server.base_url),
    })
    .unwrap();

    let err = authenticator.credential().await.unwrap_err();
    assert!(err.to_string().contains("no access_token"));
}

// ============================================================================
// Full pipeline over HTTP
// ============================================================================

#[tokio::test]
async fn test_pipeline_over_http() {
    let server = CannedServer::start(vec![
        CannedResponse::json(
            200,
            json!({"blueprints": [{"identifier": "framework"}, {"identifier": "service"}]}),
        ),
        CannedResponse::json(
            200,
            json!({"entities": [
                {"identifier": "react", "properties": {"state": "Active"}},
                {"identifier": "jquery", "properties": {"state": "EOL"}}
            ]}),
        ),
        CannedResponse::json(200, json!({"count": 2})),
        CannedResponse::json(
            200,
            json!({"entities": [
                {"identifier": "svc1", "relations": {"framework": ["react", "jquery"]}}
            ]}),
        ),
        CannedResponse::json(200, json!({"count": 1})),
        CannedResponse::json(200, json!({"ok": true})),
    ])
    .await;

    let use_case = SyncEolCountsUseCase::new(
        PortAuthenticator::new(Credentials::StaticToken("raw-token".to_string())).unwrap(),
        client(&server.base_url, 0),
        StderrProgressReporter::new(),
    );

    let report = use_case
        .execute(SyncRequest::new(vec![SyncTarget::default()]))
        .await
        .unwrap();

    assert!(!report.has_failures());
    let requests = server.requests();
    assert_eq!(requests.len(), 6);
    assert!(requests
        .iter()
        .all(|r| r.headers["authorization"] == "Bearer raw-token"));
    assert_eq!(requests[5].method, "PATCH");
    assert_eq!(requests[5].path, "/v1/blueprints/service/entities/svc1");
    let body: Value = serde_json::from_str(&requests[5].body).unwrap();
    assert_eq!(body, json!({"properties": {"number_of_eol_packages": 1}}));
}

#[tokio::test]
async fn test_pipeline_continues_when_blueprint_listing_is_unexpected() {
    let server = CannedServer::start(vec![
        CannedResponse::json(200, json!({"ok": true, "data": []})),
        CannedResponse::json(
            200,
            json!({"entities": [{"identifier": "jquery", "properties": {"state": "EOL"}}]}),
        ),
        CannedResponse::json(200, json!({"count": 1})),
        CannedResponse::json(
            200,
            json!({"entities": [
                {"identifier": "svc1", "relations": {"framework": ["jquery"]}},
                {"identifier": "svc2", "relations": []},
                {"title": "missing identifier"}
            ]}),
        ),
        CannedResponse::json(200, json!({"count": 3})),
        CannedResponse::json(200, json!({"ok": true})),
        CannedResponse::json(200, json!({"ok": true})),
    ])
    .await;

    let use_case = SyncEolCountsUseCase::new(
        PortAuthenticator::new(Credentials::StaticToken("raw-token".to_string())).unwrap(),
        client(&server.base_url, 0),
        StderrProgressReporter::new(),
    );

    let mut request = SyncRequest::new(vec![SyncTarget::default()]);
    request.concurrency = 1;
    let report = use_case.execute(request).await.unwrap();

    let target = &report.targets[0];
    assert_eq!(target.status, TargetStatus::Completed);
    assert_eq!(
        target.services,
        vec![
            ServiceOutcome::new("svc1", ServiceResult::Updated { count: 1 }),
            ServiceOutcome::new("svc2", ServiceResult::Updated { count: 0 }),
        ]
    );
    assert_eq!(target.warnings.len(), 1);

    let requests = server.requests();
    assert_eq!(requests.len(), 7);
    assert_eq!(requests[1].path, "/v1/blueprints/framework/entities");
    assert_eq!(requests[5].path, "/v1/blueprints/service/entities/svc1");
    assert_eq!(requests[6].path, "/v1/blueprints/service/entities/svc2");
}
