use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use super::types::{ChatRequest, ChatResponse};
use super::CompletionClient;
use crate::config::{LlmConfig, RequestConfig};
use crate::error::{GenerationError, GenerationResult};

/// Client for the OpenAI chat-completions API
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    request_config: RequestConfig,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: &LlmConfig, request_config: RequestConfig) -> GenerationResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(GenerationError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            request_config,
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a single request (internal)
    async fn execute_request(
        &self,
        url: &str,
        api_key: &str,
        request: &ChatRequest,
    ) -> GenerationResult<String> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Calling chat-completions endpoint"
        );

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_ms: self.request_config.timeout_ms,
                    }
                } else {
                    GenerationError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let chat_response: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::InvalidResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        chat_response
            .first_content()
            .map(|s| s.to_string())
            .ok_or_else(|| GenerationError::InvalidResponse {
                message: "Response contained no completion choices".to_string(),
            })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> GenerationResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredentials)?;

        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatRequest::json_mode(&self.model, system_prompt, user_prompt, temperature);

        let mut last_error = None;
        let mut retries = 0;

        while retries <= self.request_config.max_retries {
            if retries > 0 {
                let delay = Duration::from_millis(
                    self.request_config.retry_delay_ms * (2_u64.pow(retries - 1)),
                );
                warn!(
                    model = %self.model,
                    retry = retries,
                    delay_ms = delay.as_millis(),
                    "Retrying completion request"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();

            match self.execute_request(&url, api_key, &request).await {
                Ok(completion) => {
                    let latency = start.elapsed();
                    info!(
                        model = %self.model,
                        latency_ms = latency.as_millis(),
                        "Completion call succeeded"
                    );
                    return Ok(completion);
                }
                Err(e) => {
                    let latency = start.elapsed();
                    error!(
                        model = %self.model,
                        error = %e,
                        latency_ms = latency.as_millis(),
                        retry = retries,
                        "Completion call failed"
                    );
                    last_error = Some(e);
                    retries += 1;
                }
            }
        }

        Err(GenerationError::Unavailable {
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
            retries,
        })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = LlmConfig {
            api_key: Some("test_key".to_string()),
            base_url: "https://api.openai.com/".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
        };

        let client = OpenAiClient::new(&config, RequestConfig::default()).unwrap();
        assert_eq!(client.base_url(), "https://api.openai.com");
        assert!(client.is_configured());
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let client = OpenAiClient::new(&LlmConfig::default(), RequestConfig::default()).unwrap();
        assert!(!client.is_configured());

        let result = client.complete("system", "user", 0.7).await;
        assert!(matches!(result, Err(GenerationError::MissingCredentials)));
    }
}
