//! OpenAI-compatible multimodal chat completions client

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::{ScorerError, ScorerRequest, ScorerResult, ScorerService};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for any endpoint speaking the OpenAI chat completions protocol with
/// `image_url` content parts.
pub struct OpenAiScorer {
    api_key: String,
    base_url: String,
    model: String,
    http_client: Client,
}

impl OpenAiScorer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            http_client: Client::new(),
        }
    }

    /// Point the client at a non-default endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn build_messages(request: &ScorerRequest) -> Vec<ChatMessage> {
    let mut user_content = vec![ContentPart::Text {
        text: request.prompt.clone(),
    }];
    for encoded in &request.images {
        user_content.push(ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: format!("data:image/png;base64,{encoded}"),
            },
        });
    }

    vec![
        ChatMessage {
            role: "system",
            content: vec![ContentPart::Text {
                text: request.system.clone(),
            }],
        },
        ChatMessage {
            role: "user",
            content: user_content,
        },
    ]
}

#[async_trait]
impl ScorerService for OpenAiScorer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn score(&self, request: &ScorerRequest) -> ScorerResult<String> {
        let start = Instant::now();

        let body = ChatRequest {
            model: self.model.clone(),
            messages: build_messages(request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(error) => error.error.message,
                Err(_) => format!("HTTP {}: {}", status.as_u16(), body),
            };

            // 401/403 mean a bad credential, not a transient fault
            if status == 401 || status == 403 {
                return Err(ScorerError::Config(format!(
                    "auth error ({}): {}",
                    status.as_u16(),
                    message
                )));
            }

            return Err(ScorerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: ChatResponse = response.json().await?;
        let content = api_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| ScorerError::Parse("No choices in response".to_string()))?;

        tracing::debug!(
            "Scored with {} in {}ms ({} chars)",
            self.model,
            start.elapsed().as_millis(),
            content.len()
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_layout() {
        let request = ScorerRequest::new("be strict", "rate this", vec!["aGk=".to_string()]);
        let messages = build_messages(&request);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content.len(), 2);

        let json = serde_json::to_value(&messages[1]).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(
            json["content"][1]["image_url"]["url"],
            "data:image/png;base64,aGk="
        );
    }
}
