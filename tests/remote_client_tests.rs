//! HTTP client tests against a mocked voice-agent platform
//!
//! These use wiremock so request shape and error mapping are checked without
//! touching the real API.

use serde_json::json;
use voice_provisioner::config::RateLimitConfig;
use voice_provisioner::remote::{
    AssistantSpec, Credential, HttpResourceClient, ModelSpec, PhoneNumberSpec, PromptMessage,
    RemoteError, RemoteResourceClient, VoiceSpec, UNEXPECTED_ERROR_MESSAGE,
};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpResourceClient {
    let rate_limit = RateLimitConfig {
        requests_per_second: 50,
        burst_capacity: 50,
    };
    HttpResourceClient::with_base_url(&format!("{}/", server.uri()), &rate_limit)
        .expect("client builds")
}

fn credential() -> Credential {
    Credential::new("sk_test_123")
}

fn assistant_spec() -> AssistantSpec {
    AssistantSpec {
        name: "Coffee Bot".to_string(),
        model: ModelSpec {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            messages: vec![PromptMessage {
                role: "system".to_string(),
                content: "You are Coffee Bot.".to_string(),
            }],
        },
        voice: VoiceSpec {
            provider: "vapi".to_string(),
            voice_id: "Elliot".to_string(),
        },
        first_message: "Hello! This is Coffee Bot. How can I help you today?".to_string(),
    }
}

fn number_spec() -> PhoneNumberSpec {
    PhoneNumberSpec {
        provider: "vapi".to_string(),
        number_desired_area_code: "415".to_string(),
        name: "Coffee Bot phone line".to_string(),
    }
}

#[tokio::test]
async fn test_create_assistant_sends_authenticated_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/assistant"))
        .and(header("authorization", "Bearer sk_test_123"))
        .and(body_partial_json(json!({
            "name": "Coffee Bot",
            "firstMessage": "Hello! This is Coffee Bot. How can I help you today?",
            "voice": { "provider": "vapi", "voiceId": "Elliot" },
            "model": { "provider": "openai", "model": "gpt-4o-mini" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "asst_1",
            "orgId": "org_9",
            "createdAt": "2026-10-19T12:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .create_assistant(&credential(), &assistant_spec())
        .await
        .unwrap();

    assert_eq!(created.id, "asst_1");
}

#[tokio::test]
async fn test_purchase_number_requests_area_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/phone-number"))
        .and(body_json(json!({
            "provider": "vapi",
            "numberDesiredAreaCode": "415",
            "name": "Coffee Bot phone line"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pn_1",
            "number": "+14155550100",
            "status": "active"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let number = client_for(&server)
        .purchase_number(&credential(), &number_spec())
        .await
        .unwrap();

    assert_eq!(number.id, "pn_1");
    assert_eq!(number.number, "+14155550100");
}

#[tokio::test]
async fn test_associate_number_patches_assistant_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/phone-number/pn_1"))
        .and(header("authorization", "Bearer sk_test_123"))
        .and(body_json(json!({ "assistantId": "asst_1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pn_1",
            "assistantId": "asst_1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .associate_number(&credential(), "pn_1", "asst_1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_server_message_becomes_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/phone-number"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({ "message": "quota exceeded" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .purchase_number(&credential(), &number_spec())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(402));
    assert_eq!(err.user_message(), "quota exceeded");
}

#[tokio::test]
async fn test_message_list_is_joined() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/assistant"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": ["name must be shorter", "voice is invalid"],
            "error": "Bad Request"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_assistant(&credential(), &assistant_spec())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "name must be shorter; voice is invalid");
}

#[tokio::test]
async fn test_unreadable_error_body_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/assistant"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_assistant(&credential(), &assistant_spec())
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Api { status: 502, .. }));
    assert_eq!(err.user_message(), "Request failed with status code 502");
}

#[tokio::test]
async fn test_undecodable_success_body_is_unexpected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/phone-number"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "pn_1" })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .purchase_number(&credential(), &number_spec())
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Unexpected { .. }));
    assert_eq!(err.user_message(), UNEXPECTED_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_phone_number_id_stays_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/phone-number/pn%2F1%3Fx"))
        .and(body_json(json!({ "assistantId": "asst_1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "pn/1?x" })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .associate_number(&credential(), "pn/1?x", "asst_1")
        .await
        .unwrap();
}
