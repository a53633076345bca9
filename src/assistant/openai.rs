//! OpenAI-compatible `/chat/completions` client.

use super::{CompletionRequest, LanguageModel, PromptMessage};
use crate::error::LlmError;
use crate::settings::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// `None` when no API key is configured.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, LlmError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Some(OpenAiClient {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url),
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        tracing::debug!(model = %self.model, messages = request.messages.len(), "calling chat completions");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }
        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn config(key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: key.map(str::to_string),
            model: "gpt-3.5-turbo".into(),
            base_url: "http://localhost:9/v1".into(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn no_key_means_no_client() {
        assert!(OpenAiClient::from_config(&config(None)).unwrap().is_none());
    }

    #[test]
    fn builds_endpoint_from_base_url() {
        let client = OpenAiClient::from_config(&config(Some("sk-test"))).unwrap().unwrap();
        assert_eq!(client.endpoint, "http://localhost:9/v1/chat/completions");
        assert_eq!(client.model(), "gpt-3.5-turbo");
    }

    #[test]
    fn request_body_matches_wire_format() {
        let messages = vec![PromptMessage::system("be nice"), PromptMessage::user("hi")];
        let body = ChatCompletionBody {
            model: "m",
            messages: &messages,
            temperature: 0.5,
            max_tokens: 10,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "model": "m",
                "messages": [
                    {"role": "system", "content": "be nice"},
                    {"role": "user", "content": "hi"}
                ],
                "temperature": 0.5,
                "max_tokens": 10
            })
        );
    }

    #[test]
    fn parses_first_choice() {
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"Sure"}}]}"#).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Sure"));
    }
}
