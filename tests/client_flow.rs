use pretty_assertions::assert_eq;
use search_harness::models::Envelope;
use search_harness::{
    Config, HarnessError, ServiceClient, run_delete, run_indexing, run_search,
};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn write_documents(dir: &TempDir, documents: &Value) -> PathBuf {
    let path = dir.path().join("sample_document.json");
    std::fs::write(&path, serde_json::to_string(documents).unwrap()).unwrap();
    path
}

fn client_for(server: &MockServer) -> ServiceClient {
    let config = Config::default_config();
    ServiceClient::with_base_url(
        server.uri(),
        Envelope::from(&config.envelope),
        Duration::from_secs(5),
    )
    .unwrap()
}

async fn mount(server: &MockServer, endpoint: &str, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn requests_to(server: &MockServer, endpoint: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == endpoint)
        .collect()
}

#[tokio::test]
async fn test_indexing_sends_documents_verbatim() {
    let server = MockServer::start().await;
    mount(&server, "/indexing", 200, json!({"status": "ok"})).await;

    let dir = TempDir::new().unwrap();
    let documents = json!([
        {"document_id": "b", "text": "두 번째", "tags": ["x", "y"]},
        {"document_id": "a", "text": "첫 번째", "score": 0.5},
        {"document_id": "c", "nested": {"k": null}}
    ]);
    let file_path = write_documents(&dir, &documents);

    let client = client_for(&server);
    let mut out = Vec::new();
    let response = run_indexing(&client, &file_path, &mut out).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({"status": "ok"}));

    let sent = requests_to(&server, "/indexing").await;
    assert_eq!(sent.len(), 1);

    let body: Value = sent[0].body_json().unwrap();
    assert_eq!(body["documents"], documents);
    assert_eq!(body["group_id"], "001");
    assert_eq!(body["user_id"], "001");
    assert_eq!(body["session_id"], "001");
}

#[tokio::test]
async fn test_envelope_identifiers_match_across_endpoints() {
    let server = MockServer::start().await;
    mount(&server, "/indexing", 200, json!({"status": "ok"})).await;
    mount(&server, "/search", 200, json!({"results": []})).await;

    let dir = TempDir::new().unwrap();
    let file_path = write_documents(&dir, &json!([{"id": "1", "text": "..."}]));
    let config = Config::default_config();

    let client = client_for(&server);
    let mut out = Vec::new();
    run_search(&client, &file_path, &config.query, &mut out)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let ids: Vec<(Value, Value, Value)> = requests
        .iter()
        .map(|r| {
            let body: Value = r.body_json().unwrap();
            (
                body["group_id"].clone(),
                body["user_id"].clone(),
                body["session_id"].clone(),
            )
        })
        .collect();

    assert_eq!(ids[0], ids[1]);
    assert_eq!(ids[0], (json!("001"), json!("001"), json!("001")));
}

#[tokio::test]
async fn test_search_query_shape_is_fixed() {
    let server = MockServer::start().await;
    mount(&server, "/indexing", 200, json!({"status": "ok"})).await;
    mount(&server, "/search", 200, json!({"results": []})).await;

    let dir = TempDir::new().unwrap();
    let file_path = write_documents(
        &dir,
        &json!([{"document_id": "99", "text": "top_k 10 please", "top_k": 10}]),
    );
    let config = Config::default_config();

    let client = client_for(&server);
    let mut out = Vec::new();
    run_search(&client, &file_path, &config.query, &mut out)
        .await
        .unwrap();

    let sent = requests_to(&server, "/search").await;
    assert_eq!(sent.len(), 1);

    let body: Value = sent[0].body_json().unwrap();
    assert_eq!(body["top_k"], 3);
    assert_eq!(body["query"]["query_id"], "0001");
    assert!(!body["query"]["text"].as_str().unwrap().is_empty());
    assert!(body.get("documents").is_none());
}

#[tokio::test]
async fn test_indexing_non_200_fails_before_printing_body() {
    let server = MockServer::start().await;
    mount(&server, "/indexing", 500, json!({"detail": "boom"})).await;

    let dir = TempDir::new().unwrap();
    let file_path = write_documents(&dir, &json!([{"id": "1"}]));

    let client = client_for(&server);
    let mut out = Vec::new();
    let err = run_indexing(&client, &file_path, &mut out)
        .await
        .unwrap_err();

    assert!(err.is_status_assertion());
    assert_eq!(String::from_utf8(out).unwrap(), "500\n");
}

#[tokio::test]
async fn test_search_non_200_reports_response_error() {
    let server = MockServer::start().await;
    mount(&server, "/indexing", 200, json!({"status": "ok"})).await;
    mount(&server, "/search", 503, json!({"detail": "index missing"})).await;

    let dir = TempDir::new().unwrap();
    let file_path = write_documents(&dir, &json!([{"id": "1"}]));
    let config = Config::default_config();

    let client = client_for(&server);
    let mut out = Vec::new();
    let err = run_search(&client, &file_path, &config.query, &mut out)
        .await
        .unwrap_err();

    match &err {
        HarnessError::StatusAssertion {
            endpoint,
            status,
            message,
        } => {
            assert_eq!(endpoint, "/search");
            assert_eq!(*status, 503);
            assert_eq!(message, "Response Error!");
        }
        other => panic!("unexpected error: {other}"),
    }

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("index missing"));
    assert!(!printed.contains("Prediction Output"));
}

#[tokio::test]
async fn test_search_skipped_when_indexing_fails() {
    let server = MockServer::start().await;
    mount(&server, "/indexing", 400, json!({})).await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file_path = write_documents(&dir, &json!([]));
    let config = Config::default_config();

    let client = client_for(&server);
    let mut out = Vec::new();
    let result = run_search(&client, &file_path, &config.query, &mut out).await;

    assert!(result.unwrap_err().is_status_assertion());
}

#[tokio::test]
async fn test_missing_document_file_sends_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let client = client_for(&server);
    let mut out = Vec::new();
    let result = run_indexing(&client, &dir.path().join("absent.json"), &mut out).await;

    assert!(matches!(result, Err(HarnessError::FileOperation { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_unreachable_service_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = Config::default_config();
    let client = ServiceClient::with_base_url(
        format!("http://127.0.0.1:{}", port),
        Envelope::from(&config.envelope),
        Duration::from_secs(5),
    )
    .unwrap();

    let dir = TempDir::new().unwrap();
    let file_path = write_documents(&dir, &json!([{"id": "1"}]));

    let mut out = Vec::new();
    let result = run_indexing(&client, &file_path, &mut out).await;
    assert!(matches!(result, Err(HarnessError::Http(_))));
}

#[tokio::test]
async fn test_delete_posts_document_id() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/delete",
        200,
        json!({"group_id": "001", "user_id": "001", "session_id": "001", "deleted": true}),
    )
    .await;

    let client = client_for(&server);
    let mut out = Vec::new();
    let response = run_delete(&client, "1", &mut out).await.unwrap();

    assert_eq!(response.body["deleted"], true);

    let sent = requests_to(&server, "/delete").await;
    let body: Value = sent[0].body_json().unwrap();
    assert_eq!(
        body,
        json!({"group_id": "001", "user_id": "001", "session_id": "001", "document_id": "1"})
    );
    assert!(String::from_utf8(out).unwrap().starts_with("200\n"));
}

#[tokio::test]
async fn test_smoke_scenario_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file_path = write_documents(&dir, &json!([{"id": "1", "text": "..."}]));
    let config = Config::default_config();

    let client = client_for(&server);
    let mut out = Vec::new();
    run_indexing(&client, &file_path, &mut out).await.unwrap();
    let response = run_search(&client, &file_path, &config.query, &mut out)
        .await
        .unwrap();

    assert_eq!(response.body, json!({"results": []}));
    assert_eq!(
        String::from_utf8(out).unwrap(),
        concat!(
            "200\n",
            "{\"status\":\"ok\"}\n",
            "200\n",
            "{\"status\":\"ok\"}\n",
            "{\"results\":[]}\n",
            "##### Prediction Output #####\n",
            "{\n  \"results\": []\n}\n",
        )
    );
}

#[tokio::test]
async fn test_key_order_survives_request_and_output() {
    let server = MockServer::start().await;
    mount(&server, "/indexing", 200, json!({"status": "ok"})).await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"session_id":"001","related_documents":[{"text":"t","document_id":"1"}]}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("sample_document.json");
    std::fs::write(&file_path, r#"[{"text":"a","document_id":"1"}]"#).unwrap();

    let config = Config::default_config();
    let client = client_for(&server);
    let mut out = Vec::new();
    run_search(&client, &file_path, &config.query, &mut out)
        .await
        .unwrap();

    let sent = requests_to(&server, "/indexing").await;
    let raw = String::from_utf8(sent[0].body.clone()).unwrap();
    assert!(
        raw.contains(r#""documents":[{"text":"a","document_id":"1"}]"#),
        "document keys reordered: {}",
        raw
    );

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.ends_with(concat!(
        "##### Prediction Output #####\n",
        "{\n",
        "  \"session_id\": \"001\",\n",
        "  \"related_documents\": [\n",
        "    {\n",
        "      \"text\": \"t\",\n",
        "      \"document_id\": \"1\"\n",
        "    }\n",
        "  ]\n",
        "}\n"
    )));
}
