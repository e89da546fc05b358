use std::time::Duration;

use crater_engine::{
    FailureKind, GenerationPayload, GenerationService, PreviewResponse, ServiceClient,
    ServiceSettings,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload() -> GenerationPayload {
    GenerationPayload {
        source_doc_ids: vec!["doc-1".to_string(), "doc-2".to_string()],
        custom_prompt: "Outline the sources".to_string(),
    }
}

fn client(server: &MockServer) -> ServiceClient {
    ServiceClient::new(ServiceSettings::new(server.uri()).with_token("token-1")).expect("client")
}

#[tokio::test]
async fn preview_posts_selection_and_parses_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content/generate/preview"))
        .and(header("authorization", "Bearer token-1"))
        .and(body_json(json!({
            "source_doc_ids": ["doc-1", "doc-2"],
            "custom_prompt": "Outline the sources",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "example_snippet": "Intro...",
            "estimated_tokens": 512,
            "toc": {"sections": []},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let preview = client(&server).preview(&payload()).await.expect("preview ok");

    assert_eq!(
        preview,
        PreviewResponse {
            toc: Some(json!({"sections": []})),
            style_guide: None,
            example_snippet: Some("Intro...".to_string()),
            estimated_tokens: Some(512),
            source_citations: Vec::new(),
        }
    );
}

#[tokio::test]
async fn preview_keeps_outline_and_style_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content/generate/preview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "toc": {"sections": ["Introduction", "Main Content", "Conclusion"]},
            "style_guide": {"tone": "professional", "audience": "general"},
            "example_snippet": "Intro...",
            "source_citations": ["doc-1"],
            "estimated_tokens": 512,
        })))
        .mount(&server)
        .await;

    let preview = client(&server).preview(&payload()).await.expect("preview ok");

    assert_eq!(
        preview.toc,
        Some(json!({"sections": ["Introduction", "Main Content", "Conclusion"]}))
    );
    assert_eq!(
        preview.style_guide,
        Some(json!({"tone": "professional", "audience": "general"}))
    );
    assert_eq!(preview.source_citations, vec!["doc-1".to_string()]);
}

#[tokio::test]
async fn preview_tolerates_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content/generate/preview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let preview = client(&server).preview(&payload()).await.expect("preview ok");
    assert_eq!(preview, PreviewResponse::default());
}

#[tokio::test]
async fn preview_accepts_fractional_token_estimate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content/generate/preview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "example_snippet": "Intro...",
            "estimated_tokens": 512.0,
        })))
        .mount(&server)
        .await;

    let preview = client(&server).preview(&payload()).await.expect("preview ok");
    assert_eq!(preview.example_snippet.as_deref(), Some("Intro..."));
    assert_eq!(preview.estimated_tokens, Some(512));
}

#[tokio::test]
async fn preview_tolerates_null_citations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content/generate/preview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "example_snippet": "Intro...",
            "estimated_tokens": 512,
            "source_citations": null,
        })))
        .mount(&server)
        .await;

    let preview = client(&server).preview(&payload()).await.expect("preview ok");
    assert_eq!(preview.estimated_tokens, Some(512));
    assert!(preview.source_citations.is_empty());
}

#[tokio::test]
async fn preview_rejects_non_object_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content/generate/preview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Intro..."])))
        .mount(&server)
        .await;

    let err = client(&server).preview(&payload()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn preview_reports_service_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content/generate/preview"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).preview(&payload()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert!(err.message.contains("boom"));
}

#[tokio::test]
async fn generate_only_checks_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not even json"))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).generate(&payload()).await.expect("generate ok");
}

#[tokio::test]
async fn generate_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content/generate"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).generate(&payload()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn optional_request_timeout_applies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/content/generate"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let settings = ServiceSettings {
        request_timeout_secs: Some(0),
        ..ServiceSettings::new(server.uri())
    };
    let client = ServiceClient::new(settings).expect("client");

    let err = client.generate(&payload()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    // Port 9 (discard) is closed on test hosts.
    let client = ServiceClient::new(ServiceSettings::new("http://127.0.0.1:9")).expect("client");
    let err = client.preview(&payload()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}
