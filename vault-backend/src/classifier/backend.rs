//! Classification backends: anything that can answer "which of these notes match?"

use crate::config::ClassifierConfig;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Classification request failed: {0}")]
    Transport(String),

    #[error("Classification HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed classification response: {0}")]
    Malformed(String),

    #[error("Classifier not configured: {0}")]
    Config(String),
}

/// One call to the external text-understanding service.
///
/// Implementations return the raw structured reply; shape checks and
/// filtering against the batch happen in the classifier.
#[async_trait]
pub trait ClassificationBackend: Send + Sync {
    async fn classify(
        &self,
        instruction: &str,
        query: &str,
        batch: &[String],
    ) -> Result<Value, ClassifierError>;
}

/// OpenAI-compatible chat completions backend
pub struct OpenAiChatBackend {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiChatBackend {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Config(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl ClassificationBackend for OpenAiChatBackend {
    async fn classify(
        &self,
        instruction: &str,
        query: &str,
        batch: &[String],
    ) -> Result<Value, ClassifierError> {
        let prompt = super::prompt::batch_prompt(query, batch);
        let body = json!({
            "model": self.model,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": instruction },
                { "role": "user", "content": prompt },
            ],
        });

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifierError::Http { status, body });
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(format!("JSON parse error: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ClassifierError::Malformed("response has no message content".to_string()))?;

        parse_reply(&content)
    }
}

/// Parse model output, tolerating a fenced ```json block around it
fn parse_reply(content: &str) -> Result<Value, ClassifierError> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(unfenced)
        .map_err(|e| ClassifierError::Malformed(format!("reply is not JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ClassifierConfig {
        ClassifierConfig {
            api_url: server.uri(),
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
            ..ClassifierConfig::default()
        }
    }

    fn batch() -> Vec<String> {
        vec!["a.md".to_string(), "b.md".to_string()]
    }

    #[test]
    fn test_parse_reply_plain_and_fenced() {
        assert_eq!(parse_reply(r#"{"notes": ["a.md"]}"#).unwrap(), json!({"notes": ["a.md"]}));
        assert_eq!(
            parse_reply("```json\n{\"notes\": []}\n```").unwrap(),
            json!({"notes": []})
        );
        assert!(matches!(parse_reply("sure! a.md"), Err(ClassifierError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_chat_backend_returns_structured_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "{\"notes\": [\"b.md\"]}" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = OpenAiChatBackend::new(&config_for(&server)).unwrap();
        let reply = backend.classify("instr", "beta things", &batch()).await.unwrap();
        assert_eq!(reply, json!({"notes": ["b.md"]}));
    }

    #[tokio::test]
    async fn test_chat_backend_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let backend = OpenAiChatBackend::new(&config_for(&server)).unwrap();
        let err = backend.classify("instr", "q", &batch()).await.unwrap_err();
        match err {
            ClassifierError::Http { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_chat_backend_rejects_non_json_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "I think a.md" } }]
            })))
            .mount(&server)
            .await;

        let backend = OpenAiChatBackend::new(&config_for(&server)).unwrap();
        let err = backend.classify("instr", "q", &batch()).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Malformed(_)));
    }
}
