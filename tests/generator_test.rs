//! Generator integration tests against a mocked chat-completions endpoint.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use thought_graph::config::{LlmConfig, RequestConfig};
use thought_graph::generator::ChainGenerator;
use thought_graph::llm::OpenAiClient;
use thought_graph::model::ThoughtType;

fn config_for(server: &MockServer) -> (LlmConfig, RequestConfig) {
    let llm = LlmConfig {
        api_key: Some("test_key".to_string()),
        base_url: server.uri(),
        model: "gpt-4o-mini".to_string(),
        temperature: 0.7,
    };
    let request = RequestConfig {
        timeout_ms: 2_000,
        max_retries: 0,
        retry_delay_ms: 10,
    };
    (llm, request)
}

fn generator_for(server: &MockServer) -> ChainGenerator {
    let (llm, request) = config_for(server);
    let client = OpenAiClient::new(&llm, request).expect("Failed to build client");
    ChainGenerator::new(Arc::new(client), llm.temperature)
}

/// Wrap a reasoning-graph JSON value in an OpenAI-shaped completion body.
fn completion_body(reasoning: serde_json::Value) -> serde_json::Value {
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": reasoning.to_string()}}
        ],
        "usage": {"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150}
    })
}

fn assert_fallback(nodes: &[thought_graph::model::ThoughtNode], prompt: &str) {
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].thought_type, ThoughtType::Question);
    assert_eq!(
        nodes[0].content,
        format!("Understanding the question: {}", prompt)
    );
    assert_eq!(nodes[1].content, "Processing the request...");
    assert_eq!(
        nodes[2].content,
        "Unable to generate detailed reasoning at this time."
    );
}

#[tokio::test]
async fn test_valid_completion_produces_chain() {
    let server = MockServer::start().await;

    let reasoning = json!({
        "thoughts": [
            {"id": "1", "type": "question", "content": "Why is the sky blue?", "confidence": 1.0},
            {"id": "2", "type": "retrieval", "content": "Sunlight contains all colors", "confidence": 0.9},
            {"id": "3", "type": "retrieval", "content": "Atmosphere scatters short wavelengths more", "confidence": 0.9},
            {"id": "4", "type": "reasoning", "content": "Blue light scatters most across the sky", "confidence": 0.85},
            {"id": "5", "type": "conclusion", "content": "Rayleigh scattering makes the sky blue", "confidence": 0.9}
        ],
        "edges": [
            {"from": "1", "to": "2", "label": "seeks"},
            {"from": "2", "to": "4", "label": "informs", "confidence": 0.9},
            {"from": "3", "to": "4", "label": "informs", "confidence": 0.9},
            {"from": "4", "to": "5", "label": "concludes"}
        ]
    });

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(reasoning)))
        .expect(1)
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    let (nodes, edges) = generator.generate("Why is the sky blue?", "sess-1").await;

    assert_eq!(nodes.len(), 5);
    assert_eq!(edges.len(), 4);
    assert_eq!(nodes[0].id, "sess-1_node_1");
    assert_eq!(nodes[4].thought_type, ThoughtType::Conclusion);
    assert_eq!(nodes[2].metadata.get("original_id"), Some(&json!("3")));
    assert_eq!(edges[0].source_id, "sess-1_node_1");
    assert_eq!(edges[3].target_id, "sess-1_node_5");
    assert!((edges[0].confidence - 1.0).abs() < f64::EPSILON);
    assert!((edges[1].confidence - 0.9).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_schema_violation_yields_fallback() {
    let server = MockServer::start().await;

    // Missing the required `edges` field
    let reasoning = json!({
        "thoughts": [
            {"id": "1", "type": "question", "content": "Q", "confidence": 0.9}
        ]
    });

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(reasoning)))
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    let (nodes, edges) = generator.generate("a prompt", "sess-1").await;

    assert_fallback(&nodes, "a prompt");
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].label, "analyzing");
    assert_eq!(edges[1].label, "concludes");
}

#[tokio::test]
async fn test_server_error_yields_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    let (nodes, edges) = generator.generate("a prompt", "sess-1").await;

    assert_fallback(&nodes, "a prompt");
    assert_eq!(edges.len(), 2);
}

#[tokio::test]
async fn test_timeout_yields_fallback() {
    let server = MockServer::start().await;

    let reasoning = json!({"thoughts": [], "edges": []});

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(reasoning))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let (llm, _) = config_for(&server);
    let request = RequestConfig {
        timeout_ms: 200,
        max_retries: 0,
        retry_delay_ms: 10,
    };
    let client = OpenAiClient::new(&llm, request).expect("Failed to build client");
    let generator = ChainGenerator::new(Arc::new(client), 0.7);

    let (nodes, _) = generator.generate("a prompt", "sess-1").await;
    assert_fallback(&nodes, "a prompt");
}

#[tokio::test]
async fn test_retries_before_falling_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(3)
        .mount(&server)
        .await;

    let (llm, _) = config_for(&server);
    let request = RequestConfig {
        timeout_ms: 2_000,
        max_retries: 2,
        retry_delay_ms: 1,
    };
    let client = OpenAiClient::new(&llm, request).expect("Failed to build client");
    let generator = ChainGenerator::new(Arc::new(client), 0.7);

    let (nodes, _) = generator.generate("a prompt", "sess-1").await;
    assert_fallback(&nodes, "a prompt");
}

#[tokio::test]
async fn test_missing_credentials_yields_fallback_without_request() {
    let server = MockServer::start().await;

    // No mock mounted: any request would 404 and the .expect below would
    // catch an unexpected call anyway.
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let llm = LlmConfig {
        api_key: None,
        base_url: server.uri(),
        model: "gpt-4o-mini".to_string(),
        temperature: 0.7,
    };
    let client = OpenAiClient::new(&llm, RequestConfig::default()).expect("Failed to build client");
    let generator = ChainGenerator::new(Arc::new(client), 0.7);

    assert!(!generator.is_configured());

    let (nodes, _) = generator.generate("a prompt", "sess-1").await;
    assert_fallback(&nodes, "a prompt");
}
