use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Temperature for ranking calls. Kept low so repeated rankings of the
/// same batch stay close to deterministic.
const RANKING_TEMPERATURE: f64 = 0.3;

/// Errors that can occur when calling the relevance oracle
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Narrow seam over the external relevance-scoring service.
///
/// The core cascade only ever needs "send this prompt, give me back the
/// generated text"; everything transport-specific stays behind this
/// trait so the soft-failure path is testable with a deterministic stub.
#[async_trait]
pub trait RelevanceOracle: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput<'a>,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationInput<'a> {
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    output: Option<GenerationOutput>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Depending on the model, generated text arrives either as `output.text`
/// or as `output.choices[0]`.
#[derive(Debug, Deserialize)]
struct GenerationOutput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    choices: Option<Vec<GenerationChoice>>,
}

#[derive(Debug, Deserialize)]
struct GenerationChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GenerationResponse {
    fn into_text(self) -> Option<String> {
        let output = self.output?;
        if let Some(text) = output.text {
            if !text.trim().is_empty() {
                return Some(text.trim().to_string());
            }
        }
        let choice = output.choices?.into_iter().next()?;
        if let Some(content) = choice.message.and_then(|m| m.content) {
            return Some(content.trim().to_string());
        }
        choice.text.map(|t| t.trim().to_string())
    }
}

/// DashScope text-generation client
///
/// Single point of entry for all oracle calls: batch relevance ranking
/// during matching and long-form case generation. No retries are
/// performed; callers decide whether a failure is soft or fatal.
pub struct DashScopeClient {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

impl DashScopeClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            api_key,
            model,
            temperature,
            max_tokens,
            client,
        }
    }

    /// Send a prompt and return the generated text.
    pub async fn generate(&self, prompt: &str, temperature: f64) -> Result<String, OracleError> {
        let request = GenerationRequest {
            model: &self.model,
            input: GenerationInput {
                messages: vec![Message {
                    role: "user",
                    content: prompt,
                }],
            },
            parameters: GenerationParameters {
                temperature,
                max_tokens: self.max_tokens,
            },
        };

        tracing::debug!("Calling relevance oracle, model: {}", self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body: GenerationResponse = response.json().await.map_err(|e| {
            OracleError::InvalidResponse(format!("Failed to decode response body: {}", e))
        })?;

        if !status.is_success() {
            let message = body
                .message
                .or(body.code)
                .unwrap_or_else(|| status.to_string());
            return Err(OracleError::ApiError(format!(
                "Oracle call failed ({}): {}",
                status, message
            )));
        }

        body.into_text()
            .ok_or_else(|| OracleError::InvalidResponse("Missing generated text".into()))
    }

    /// Temperature used for long-form generation, from configuration.
    pub fn generation_temperature(&self) -> f64 {
        self.temperature
    }
}

#[async_trait]
impl RelevanceOracle for DashScopeClient {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.generate(prompt, RANKING_TEMPERATURE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: String) -> DashScopeClient {
        DashScopeClient::new(endpoint, "test_key".to_string(), "qwen-turbo".to_string(), 0.7, 2000)
    }

    #[tokio::test]
    async fn test_generate_reads_output_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"output": {"text": "  generated text  "}}"#)
            .create_async()
            .await;

        let oracle = client(server.url() + "/");
        let text = oracle.generate("prompt", 0.3).await.unwrap();

        assert_eq!(text, "generated text");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_reads_choices_format() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"output": {"choices": [{"message": {"content": "from choices"}}]}}"#)
            .create_async()
            .await;

        let oracle = client(server.url() + "/");
        let text = oracle.generate("prompt", 0.3).await.unwrap();

        assert_eq!(text, "from choices");
    }

    #[tokio::test]
    async fn test_generate_non_success_status_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code": "InvalidApiKey", "message": "Invalid API-key provided."}"#)
            .create_async()
            .await;

        let oracle = client(server.url() + "/");
        let err = oracle.generate("prompt", 0.3).await.unwrap_err();

        match err {
            OracleError::ApiError(message) => assert!(message.contains("Invalid API-key")),
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_missing_output_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"request_id": "abc"}"#)
            .create_async()
            .await;

        let oracle = client(server.url() + "/");
        let err = oracle.generate("prompt", 0.3).await.unwrap_err();

        assert!(matches!(err, OracleError::InvalidResponse(_)));
    }
}
