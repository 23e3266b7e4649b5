//! Gemini Client Integration Tests with Mocked Network Responses
//!
//! These tests use wiremock to stand in for the Generative Language API and
//! validate text generation, image generation and error handling.

use ai_attorney::flows::{ImageFlow, LegalFlows};
use ai_attorney::imaging::{ImageAcquirer, ImageState};
use ai_attorney::llm::gemini::GeminiClient;
use ai_attorney::llm::LLMClient;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Helper Functions =============

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(
        "test-key".to_string(),
        server.uri(),
        "gemini-2.0-flash".to_string(),
        "gemini-2.0-flash-exp".to_string(),
        5,
    )
    .expect("client")
}

/// Create a mock generateContent response from parts
fn mock_response(parts: serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": parts},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 20}
    })
}

// ============= Text Generation =============

#[tokio::test]
async fn test_generate_with_system() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "be brief"}]}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(mock_response(json!([{"text": "Hello"}]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(&server)
        .generate_with_system("be brief", "hi")
        .await
        .unwrap();
    assert_eq!(reply, "Hello");
}

#[tokio::test]
async fn test_api_error_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).generate("hi").await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("403"));
    assert!(message.contains("API key not valid"));
}

#[tokio::test]
async fn test_empty_text_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    assert!(client(&server).generate("hi").await.is_err());
}

#[tokio::test]
async fn test_legal_guidance_through_gemini() {
    let server = MockServer::start().await;

    let reply = "```json\n{\"legalAdvice\": \"File a police complaint.\", \
                 \"ipcSections\": [\"IPC 378\", \"IPC 379\"], \
                 \"shouldIncorporateDetails\": true}\n```";
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(mock_response(json!([{"text": reply}]))),
        )
        .mount(&server)
        .await;

    let flows = LegalFlows::new(Arc::new(client(&server)));
    let guidance = flows
        .provide_legal_guidance("My bicycle was stolen")
        .await
        .unwrap();

    assert_eq!(guidance.legal_advice, "File a police complaint.");
    assert_eq!(guidance.ipc_sections, vec!["IPC 378", "IPC 379"]);
    assert!(guidance.should_incorporate_details);
}

// ============= Image Generation =============

#[tokio::test]
async fn test_image_generation_returns_data_uri() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash-exp:generateContent"))
        .and(body_partial_json(json!({
            "generationConfig": {"responseModalities": ["IMAGE", "TEXT"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response(json!([
            {"text": "Here is your image"},
            {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo"}}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let media = client(&server).generate_media("a courtroom").await.unwrap();
    assert_eq!(
        media.media_url.as_deref(),
        Some("data:image/png;base64,iVBORw0KGgo")
    );
    assert_eq!(media.text, "Here is your image");
}

#[tokio::test]
async fn test_acquirer_resolves_through_gemini() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response(json!([
            {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/4AAQ"}}
        ]))))
        .mount(&server)
        .await;

    let acquirer = ImageAcquirer::new(
        Arc::new(ImageFlow::new(Arc::new(client(&server)))),
        400,
        300,
    );
    acquirer.request("a gavel").unwrap().await.unwrap();
    assert_eq!(
        acquirer.state(),
        ImageState::Resolved("data:image/jpeg;base64,/9j/4AAQ".to_string())
    );
}

#[tokio::test]
async fn test_acquirer_falls_back_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let acquirer = ImageAcquirer::new(
        Arc::new(ImageFlow::new(Arc::new(client(&server)))),
        400,
        300,
    )
    .with_fallback("https://example.com/fallback.png");
    acquirer.request("a gavel").unwrap().await.unwrap();

    let state = acquirer.state();
    assert_eq!(state.url(), Some("https://example.com/fallback.png"));
    assert!(state.error().unwrap().contains("Gemini API error (500)"));
}
