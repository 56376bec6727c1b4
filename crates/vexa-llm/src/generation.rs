//! OpenAI-compatible chat-completions client (Groq by default).

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use vexa_core::config::VexaConfig;
use vexa_core::error::VexaError;

use crate::http::{authorize, build_client, endpoint, ensure_success, http_error};
use crate::{GenerationRequest, GenerationService};

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: [PromptMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct PromptMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Generation client for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VexaError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        })
    }

    /// Build from the `provider` and `generation` config sections.
    pub fn from_config(config: &VexaConfig, api_key: Option<String>) -> Result<Self, VexaError> {
        Self::new(
            config.provider.base_url.clone(),
            api_key,
            config.generation.model.clone(),
            Duration::from_secs(config.generation.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl GenerationService for ChatCompletionsClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, VexaError> {
        let body = CompletionBody {
            model: &self.model,
            messages: [PromptMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        };

        let builder = self
            .client
            .post(endpoint(&self.base_url, "chat/completions"))
            .json(&body);
        let response = authorize(builder, self.api_key.as_deref())
            .send()
            .await
            .map_err(http_error)?;
        let response = ensure_success(response).await?;

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| VexaError::Generation(format!("malformed completion: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| VexaError::Generation("completion contained no text".to_string()))?;

        tracing::debug!(
            model = %self.model,
            prompt_len = request.prompt.len(),
            reply_len = text.len(),
            "Generation completed"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            max_output_tokens: 500,
            temperature: 0.7,
        }
    }

    fn client(server: &MockServer, key: Option<&str>) -> ChatCompletionsClient {
        ChatCompletionsClient::new(
            server.uri(),
            key.map(str::to_string),
            "llama-3.1-70b-versatile",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "llama-3.1-70b-versatile",
                "max_tokens": 500,
                "messages": [{"role": "user", "content": "Say hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Hello"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server, Some("sk-test"))
            .generate(&request("Say hello"))
            .await
            .unwrap();
        assert_eq!(text, "Hello");
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client(&server, None)
            .generate(&request("Hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, VexaError::Http(_)));
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_generate_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client(&server, None)
            .generate(&request("Hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, VexaError::Generation(_)));
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server, None)
            .generate(&request("Hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, VexaError::Generation(_)));
    }

    #[tokio::test]
    async fn test_generate_unreachable_provider() {
        let client = ChatCompletionsClient::new(
            "http://127.0.0.1:9",
            None,
            "m",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client.generate(&request("Hi")).await.unwrap_err();
        assert!(matches!(err, VexaError::Http(_)));
    }

    #[test]
    fn test_from_config_uses_generation_model() {
        let config = VexaConfig::default();
        let client = ChatCompletionsClient::from_config(&config, None).unwrap();
        assert_eq!(client.model(), "llama-3.1-70b-versatile");
    }
}
