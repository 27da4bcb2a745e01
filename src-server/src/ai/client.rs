//! OpenAI-compatible chat completion client.

use serde::{Deserialize, Serialize};

use super::prompt::{build_prompt, AiRequest};
use crate::domain::{DomainError, DomainResult};

pub const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Built once at startup and shared through `AppState`
#[derive(Debug, Clone)]
pub struct AiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AiClient {
    pub fn new(api_key: Option<String>, base_url: Option<String>, model: Option<String>) -> DomainResult<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DomainError::Configuration("OPENAI_API_KEY is not configured".to_string()))?;

        let base_url = base_url
            .as_deref()
            .unwrap_or(DEFAULT_AI_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the prompt for `request` and return the generated text
    pub async fn complete(&self, request: &AiRequest) -> DomainResult<String> {
        let prompt = build_prompt(request);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: &prompt }],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ai_failure(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ai_failure(format!("upstream returned {}: {}", status, text)));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| ai_failure(format!("invalid response: {}", e)))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ai_failure("empty completion".to_string()))
    }
}

fn ai_failure(detail: String) -> DomainError {
    log::error!("AI error: {}", detail);
    DomainError::AiFailure(detail)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::ai::AiAction;

    fn client_for(server: &MockServer) -> AiClient {
        AiClient::new(Some("test-key".to_string()), Some(format!("{}/", server.uri())), None).unwrap()
    }

    fn generate(title: &str) -> AiRequest {
        AiRequest {
            action: AiAction::Generate,
            title: Some(title.to_string()),
            content: None,
        }
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        assert!(matches!(AiClient::new(None, None, None), Err(DomainError::Configuration(_))));
        assert!(matches!(
            AiClient::new(Some("  ".to_string()), None, None),
            Err(DomainError::Configuration(_))
        ));
        let client = AiClient::new(Some("k".to_string()), None, None).unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_complete_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "  Investigate the crash.  " } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).complete(&generate("Fix bug")).await.unwrap();
        assert_eq!(text, "Investigate the crash.");
    }

    #[tokio::test]
    async fn test_upstream_error_is_ai_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let result = client_for(&server).complete(&generate("Fix bug")).await;
        assert!(matches!(result, Err(DomainError::AiFailure(ref msg)) if msg.contains("overloaded")));
    }

    #[tokio::test]
    async fn test_empty_choices_is_ai_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let result = client_for(&server).complete(&generate("Fix bug")).await;
        assert!(matches!(result, Err(DomainError::AiFailure(_))));
    }
}
