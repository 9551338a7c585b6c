use dfir_copilot_core::llm::{GenerateOptions, GenerateRequest, LlmBackend, LlmError, OllamaClient};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> OllamaClient {
    OllamaClient::new(Duration::from_secs(5))
        .unwrap()
        .with_probe_timeout(Duration::from_secs(2))
}

fn request() -> GenerateRequest {
    GenerateRequest::new(
        "mistral",
        "Analyze these events",
        GenerateOptions {
            temperature: 0.7,
            num_predict: 2000,
        },
    )
}

async fn tags_server(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

async fn generate_server(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

/// An endpoint on a port nobody listens on
async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn list_models_reads_names() {
    let server = tags_server(ResponseTemplate::new(200).set_body_json(
        json!({"models": [{"name": "mistral:latest"}, {"name": "llama3:8b"}, {}]}),
    ))
    .await;

    let models = client().list_models(&server.uri()).await;
    assert_eq!(models, vec!["mistral:latest", "llama3:8b", "unknown"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_models_tolerates_trailing_slash_on_endpoint() {
    let server = tags_server(
        ResponseTemplate::new(200).set_body_json(json!({"models": [{"name": "phi3"}]})),
    )
    .await;

    let models = client().list_models(&format!("{}/", server.uri())).await;
    assert_eq!(models, vec!["phi3"]);
}

#[tokio::test]
async fn list_models_is_empty_on_malformed_body() {
    let server = tags_server(ResponseTemplate::new(200).set_body_string("not json")).await;
    assert!(client().list_models(&server.uri()).await.is_empty());
}

#[tokio::test]
async fn list_models_is_empty_on_error_status() {
    let server = tags_server(ResponseTemplate::new(500).set_body_json(json!({}))).await;
    assert!(client().list_models(&server.uri()).await.is_empty());
}

#[tokio::test]
async fn probe_needs_a_200() {
    let up = tags_server(ResponseTemplate::new(200).set_body_json(json!({"models": []}))).await;
    assert!(client().probe(&up.uri()).await);

    let not_found = tags_server(ResponseTemplate::new(404)).await;
    assert!(!client().probe(&not_found.uri()).await);
}

#[tokio::test]
async fn probe_gives_up_after_its_own_timeout() {
    let slow = tags_server(ResponseTemplate::new(200).set_delay(Duration::from_secs(3))).await;
    let client = OllamaClient::new(Duration::from_secs(60))
        .unwrap()
        .with_probe_timeout(Duration::from_millis(500));
    assert!(!client.probe(&slow.uri()).await);
}

#[tokio::test]
async fn probe_false_when_nothing_listens() {
    let endpoint = dead_endpoint().await;
    assert!(!client().probe(&endpoint).await);
    assert!(client().list_models(&endpoint).await.is_empty());
}

#[tokio::test]
async fn generate_posts_non_streaming_body() {
    let server = generate_server(ResponseTemplate::new(200).set_body_json(
        json!({"model": "mistral", "response": "Summary\nall quiet", "done": true}),
    ))
    .await;

    let text = client().generate(&server.uri(), &request()).await.unwrap();
    assert_eq!(text, "Summary\nall quiet");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body: Value = received[0].body_json().unwrap();
    assert_eq!(body["model"], "mistral");
    assert_eq!(body["prompt"], "Analyze these events");
    assert_eq!(body["stream"], false);
    assert_eq!(body["options"]["num_predict"], 2000);
}

#[tokio::test]
async fn generate_without_response_field_uses_placeholder() {
    let server =
        generate_server(ResponseTemplate::new(200).set_body_json(json!({"done": true}))).await;
    let text = client().generate(&server.uri(), &request()).await.unwrap();
    assert_eq!(text, "No response generated");
}

#[tokio::test]
async fn generate_malformed_body_is_request_error() {
    let server = generate_server(ResponseTemplate::new(200).set_body_string("not json")).await;
    let err = client().generate(&server.uri(), &request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Request(ref msg) if msg.starts_with("Failed to parse generate JSON")));
}

#[tokio::test]
async fn generate_error_status_is_request_error() {
    let server = generate_server(
        ResponseTemplate::new(404).set_body_json(json!({"error": "model 'nope' not found"})),
    )
    .await;
    let err = client().generate(&server.uri(), &request()).await.unwrap_err();
    match err {
        LlmError::Request(msg) => {
            assert!(msg.contains("404"));
            assert!(msg.contains("model 'nope' not found"));
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn generate_connection_refused_is_connect_error() {
    let endpoint = dead_endpoint().await;
    let err = client().generate(&endpoint, &request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Connect(ref ep) if *ep == endpoint));
    assert!(err.to_string().contains("Ensure Ollama is running"));
}

#[tokio::test]
async fn generate_times_out_when_server_stalls() {
    let server = generate_server(
        ResponseTemplate::new(200)
            .set_body_json(json!({"response": "late"}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let client = OllamaClient::new(Duration::from_secs(1)).unwrap();
    let err = client.generate(&server.uri(), &request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Timeout(d) if d == Duration::from_secs(1)));
    assert_eq!(err.to_string(), "Request to LLM timed out after 1 seconds");
}
